//! Raw submissions: presence validation and coercion into typed fields
//!
//! Clients send scores either as JSON numbers or as strings, and some omit
//! optional fields entirely. Coercion never fails: a score that cannot be
//! read as an integer becomes 0 and a missing text field becomes "".

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::record::{EvaluationFields, FieldValue};
use crate::schema::{FieldKind, FIELDS};
use crate::{Error, Result};

/// The as-received, loosely typed field-to-value mapping from a client
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawSubmission(Map<String, Value>);

impl RawSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Keys as received (logging only)
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawSubmission {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Whether a raw value counts as supplied for a required field
fn is_present(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.trim().is_empty(),
        // Zero is falsy in browser form code and is treated as not filled in
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

/// Check that every required field is present and non-empty after trimming
///
/// On failure the error lists the missing fields in canonical order.
pub fn validate(raw: &RawSubmission) -> Result<()> {
    let missing: Vec<String> = FIELDS
        .iter()
        .filter(|f| f.required && !is_present(raw.get(f.name)))
        .map(|f| f.name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation { missing })
    }
}

/// Parse the leading integer of a string, or 0
///
/// Leading whitespace is skipped, then an optional sign and a run of decimal
/// digits are read; anything after the digits is ignored. A `0x`/`0X` prefix
/// after the sign switches to hexadecimal digits. No digits, or a value
/// outside the i64 range, yields 0.
pub fn parse_int_prefix(input: &str) -> i64 {
    let s = input.trim_start();
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, body) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let end = body
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(body.len());
    if end == 0 {
        return 0;
    }

    match i64::from_str_radix(&body[..end], radix) {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => 0,
    }
}

/// Coerce a raw value to a score
pub fn coerce_score(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => f.trunc() as i64,
                    _ => 0,
                }
            }
        }
        Some(Value::String(s)) => parse_int_prefix(s),
        _ => 0,
    }
}

/// Coerce a raw value to text
pub fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}

/// Map a raw submission onto the schema, producing a fully typed record body
///
/// Unknown keys are ignored. Callers validate first; coercion itself accepts
/// anything.
pub fn coerce(raw: &RawSubmission) -> EvaluationFields {
    let mut fields = EvaluationFields::default();
    for def in FIELDS {
        let value = raw.get(def.name);
        let typed = match def.kind {
            FieldKind::Score => FieldValue::Score(coerce_score(value)),
            FieldKind::ShortText | FieldKind::LongText => FieldValue::Text(coerce_text(value)),
        };
        fields.set(def.name, typed);
    }
    fields
}
