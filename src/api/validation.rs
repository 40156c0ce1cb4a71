//! Declarative request validation
//!
//! Each body-accepting route declares its rules as a static table on the
//! request type. The [`Validated`] extractor runs every rule against the raw
//! JSON before deserializing, so the client sees all violations at once and
//! the handler only ever receives a checked, sanitized value.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::error::{AppError, Error, ValidationFailure};

/// A single check on one field. The string is the client-facing message.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Present, not null and not an empty string
    Required(&'static str),
    IsString(&'static str),
    /// Decimal number, optionally signed, as a JSON number or string
    Numeric(&'static str),
    /// At least this many characters
    MinLength(usize, &'static str),
    /// Integer no smaller than the bound, as a JSON number or string
    IntMin(i64, &'static str),
    /// Integer no larger than the bound. Non-integers pass; pair with
    /// `IntMin` to reject them.
    IntMax(i64, &'static str),
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required(_) => "required",
            Rule::IsString(_) => "string",
            Rule::Numeric(_) => "numeric",
            Rule::MinLength(..) => "min_length",
            Rule::IntMin(..) => "int_min",
            Rule::IntMax(..) => "int_max",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rule::Required(msg) | Rule::IsString(msg) | Rule::Numeric(msg) => msg,
            Rule::MinLength(_, msg) | Rule::IntMin(_, msg) | Rule::IntMax(_, msg) => msg,
        }
    }

    fn passes(&self, value: Option<&Value>) -> bool {
        match self {
            Rule::Required(_) => match value {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            },
            Rule::IsString(_) => matches!(value, Some(Value::String(_))),
            Rule::Numeric(_) => value.and_then(scalar_text).is_some_and(|s| is_numeric(&s)),
            Rule::MinLength(min, _) => value
                .and_then(scalar_text)
                .is_some_and(|s| s.chars().count() >= *min),
            Rule::IntMin(min, _) => value.and_then(as_integer).is_some_and(|n| n >= *min),
            Rule::IntMax(max, _) => value.and_then(as_integer).map_or(true, |n| n <= *max),
        }
    }
}

/// Rules for one field of the request body
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    /// Trim surrounding whitespace before checking, and keep it trimmed
    pub trim: bool,
    pub rules: &'static [Rule],
}

/// Request bodies that carry their own validation table
pub trait Validate: DeserializeOwned + Sized {
    const RULES: &'static [FieldRules];

    /// Runs after the rules pass and the body deserializes
    fn sanitize(self) -> Result<Self, AppError> {
        Ok(self)
    }
}

/// Strings, numbers and booleans as text; everything else has none
fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

fn is_numeric(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => ("", unsigned),
    };
    !fraction.is_empty()
        && fraction.bytes().all(|b| b.is_ascii_digit())
        && whole.bytes().all(|b| b.is_ascii_digit())
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => {
            let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
            let well_formed = !digits.is_empty()
                && digits.bytes().all(|b| b.is_ascii_digit())
                && !(digits.len() > 1 && digits.starts_with('0'));
            if well_formed {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Evaluate every field's rules against `body`, trimming fields that ask
/// for it. A failed `Required` skips the rest of that field's rules; other
/// failures do not stop evaluation.
pub fn check(body: &mut Value, table: &[FieldRules]) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();
    let mut empty = Map::new();
    let fields = body.as_object_mut().unwrap_or(&mut empty);

    for field_rules in table {
        if field_rules.trim {
            if let Some(Value::String(s)) = fields.get_mut(field_rules.field) {
                let trimmed = s.trim().to_string();
                if trimmed.len() != s.len() {
                    *s = trimmed;
                }
            }
        }

        let value = fields.get(field_rules.field);
        for rule in field_rules.rules {
            if rule.passes(value) {
                continue;
            }
            failures.push(ValidationFailure::new(field_rules.field, rule.name(), rule.message()));
            if matches!(rule, Rule::Required(_)) {
                break;
            }
        }
    }

    failures
}

/// Extractor for a JSON body that passed its rules and sanitization
#[derive(Debug)]
pub struct Validated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: Validate,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::new(rejection.body_text(), rejection.status()))?;

        let failures = check(&mut body, T::RULES);
        if !failures.is_empty() {
            return Err(AppError::validation(failures).into());
        }

        let value: T = serde_json::from_value(body)
            .map_err(|e| AppError::bad_request(format!("Invalid request body: {e}")))?;

        Ok(Validated(value.sanitize()?))
    }
}

/// Accept an integer given as a JSON number or a decimal string, as long
/// as it fits `T`
pub fn lenient_integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Value::deserialize(deserializer)?;
    as_integer(&value)
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("expected an integer in range, found {value}")))
}

/// Accept a JSON string or number as text
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected a string or number, found {other}"))),
    }
}
