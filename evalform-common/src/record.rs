//! Typed evaluation records

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::schema::{self, FieldDef, FieldKind, FIELDS};

/// A single typed field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Score(i64),
}

impl FieldValue {
    /// Value used when a field is absent
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Score => FieldValue::Score(0),
            FieldKind::ShortText | FieldKind::LongText => FieldValue::Text(String::new()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Score(_) => None,
        }
    }

    pub fn as_score(&self) -> Option<i64> {
        match self {
            FieldValue::Score(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    /// Plain text rendering (CSV cells)
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Score(n) => n.to_string(),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Score(n) => serializer.serialize_i64(*n),
        }
    }
}

/// One value per schema field, always in canonical order
///
/// This is both the output of coercion (ready for insert) and the body of a
/// stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationFields {
    values: Vec<FieldValue>,
}

impl Default for EvaluationFields {
    fn default() -> Self {
        Self {
            values: FIELDS.iter().map(|f| FieldValue::default_for(f.kind)).collect(),
        }
    }
}

impl EvaluationFields {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        schema::position(name).map(|i| &self.values[i])
    }

    /// Text value of a field; empty for unknown or non-text fields
    pub fn text(&self, name: &str) -> &str {
        self.get(name).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Score value of a field; zero for unknown or non-score fields
    pub fn score(&self, name: &str) -> i64 {
        self.get(name).and_then(FieldValue::as_score).unwrap_or(0)
    }

    /// Replace a field's value. Returns false (and changes nothing) when the
    /// name is unknown or the value does not match the field's kind.
    pub fn set(&mut self, name: &str, value: FieldValue) -> bool {
        let Some(i) = schema::position(name) else {
            return false;
        };
        let matches_kind = match (&value, FIELDS[i].kind) {
            (FieldValue::Score(_), FieldKind::Score) => true,
            (FieldValue::Text(_), kind) => kind.is_text(),
            _ => false,
        };
        if matches_kind {
            self.values[i] = value;
        }
        matches_kind
    }

    /// Values in canonical order
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// (definition, value) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldDef, &FieldValue)> {
        FIELDS.iter().zip(self.values.iter())
    }
}

/// A persisted evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRecord {
    /// Store-assigned identifier
    pub id: i64,
    /// Store-assigned creation timestamp, as the store renders it
    pub created_at: String,
    pub fields: EvaluationFields,
}

impl EvaluationRecord {
    pub fn text(&self, name: &str) -> &str {
        self.fields.text(name)
    }

    pub fn score(&self, name: &str) -> i64 {
        self.fields.score(name)
    }
}

/// Serializes as a flat object: `id`, `created_at`, then every field in
/// canonical order.
impl Serialize for EvaluationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELDS.len() + 2))?;
        map.serialize_entry(schema::ID_COLUMN, &self.id)?;
        map.serialize_entry(schema::CREATED_AT_COLUMN, &self.created_at)?;
        for (def, value) in self.fields.iter() {
            map.serialize_entry(def.name, value)?;
        }
        map.end()
    }
}
