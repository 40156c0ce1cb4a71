//! Operator console
//!
//! The resolver talks to the operator only through [`Prompt`], which keeps
//! the precedence logic testable with scripted input.

use std::io::{self, BufRead, Write};

/// Line-oriented interaction with the operator
pub trait Prompt {
    /// Print `question` and read one line, trimmed. End of input reads as
    /// an empty answer.
    fn ask(&mut self, question: &str) -> io::Result<String>;

    /// Print a warning the operator should see before the server starts
    fn warn(&mut self, message: &str) -> io::Result<()>;
}

/// [`Prompt`] over any reader/writer pair
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    /// Console bound to the process stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt for Console<R, W> {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn warn(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "[⚠️] {message}")?;
        self.output.flush()
    }
}

/// Block until the operator presses Enter, so a fatal startup error stays
/// on screen. The caller exits afterwards.
pub fn wait_for_exit<P: Prompt>(prompt: &mut P) {
    if let Err(e) = prompt.ask("\n[✅] Press Enter to exit...") {
        tracing::debug!("Exit prompt failed: {}", e);
    }
}
