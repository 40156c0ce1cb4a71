//! Markup stripping for free-text input
//!
//! Every tag and comment is removed together with its attributes. The
//! contents of elements that never hold readable text are dropped as well,
//! so `<script>x</script>` sanitizes to an empty string.

/// Elements whose inner content is discarded along with the tags
const DROP_CONTENT: &[&str] = &["script", "style", "textarea", "option"];

/// What a `<` at the current position starts
enum Markup {
    /// Not markup, keep the `<` as text
    Text,
    /// Markup spanning this many bytes
    Skip(usize),
}

/// Remove all markup from `input`.
///
/// Repeats until nothing changes, since removing one tag can join the text
/// around it into a new one (`<<i>b>`).
pub fn strip_markup(input: &str) -> String {
    let mut current = strip_once(input);
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_once(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let markup = &rest[start..];
        match classify(markup) {
            Markup::Text => {
                out.push('<');
                rest = &markup[1..];
            }
            Markup::Skip(len) => rest = &markup[len..],
        }
    }

    out.push_str(rest);
    out
}

/// `s` starts with `<`
fn classify(s: &str) -> Markup {
    let body = &s[1..];

    if body.starts_with("!--") {
        let len = s[4..].find("-->").map(|i| 4 + i + 3).unwrap_or(s.len());
        return Markup::Skip(len);
    }

    match body.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?') => {}
        _ => return Markup::Text,
    }

    let end = tag_end(s);
    let closing = body.starts_with('/');
    let name = body
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    let self_closing = s[..end].trim_end_matches('>').ends_with('/');

    if closing || self_closing || !DROP_CONTENT.contains(&name.as_str()) {
        return Markup::Skip(end);
    }

    // Skip through the matching close tag; unterminated means the rest is gone
    let lowered = s[end..].to_ascii_lowercase();
    match lowered.find(&format!("</{name}")) {
        Some(close) => {
            let close_start = end + close;
            Markup::Skip(close_start + tag_end(&s[close_start..]))
        }
        None => Markup::Skip(s.len()),
    }
}

/// Byte length of the tag at the start of `s`, up to and including `>`.
/// Quoted attribute values may contain `>`.
fn tag_end(s: &str) -> usize {
    let mut quote: Option<u8> = None;
    for (i, b) in s.bytes().enumerate().skip(1) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return i + 1,
            (None, _) => {}
        }
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_markup("SampleName"), "SampleName");
        assert_eq!(strip_markup(""), "");
        assert_eq!(strip_markup("a < b and 3 <= 4"), "a < b and 3 <= 4");
    }

    #[test]
    fn test_tags_removed_text_kept() {
        assert_eq!(strip_markup("<b>Bob</b>"), "Bob");
        assert_eq!(strip_markup("x<br/>y"), "xy");
        assert_eq!(strip_markup("<img src=x onerror=alert(1)>hi"), "hi");
        assert_eq!(strip_markup("<a href='>'>link</a>"), "link");
    }

    #[test]
    fn test_script_content_dropped() {
        assert_eq!(strip_markup("<script>x</script>"), "");
        assert_eq!(strip_markup("a<SCRIPT type=\"text/javascript\">alert(1)</Script>b"), "ab");
        assert_eq!(strip_markup("<style>p { color: red }</style>z"), "z");
        assert_eq!(strip_markup("<script>never closed"), "");
    }

    #[test]
    fn test_comments_removed() {
        assert_eq!(strip_markup("<!-- hidden -->shown"), "shown");
        assert_eq!(strip_markup("<!-- unterminated"), "");
    }

    #[test]
    fn test_rejoined_tags_removed() {
        assert_eq!(strip_markup("<<i>script>alert(1)<</i>/script>"), "");
        assert_eq!(strip_markup("<<!--x-->b>bold"), "bold");
    }

    #[test]
    fn test_unicode_survives() {
        assert_eq!(strip_markup("<i>héllo wörld ✅</i>"), "héllo wörld ✅");
    }

    proptest! {
        #[test]
        fn prop_no_tags_survive(input in ".{0,64}") {
            let out = strip_markup(&input);
            // Whatever remains cannot open a tag
            prop_assert!(!out
                .match_indices('<')
                .any(|(i, _)| out[i + 1..].starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!')));
        }
    }
}
