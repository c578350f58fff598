//! Evaluation persistence
//!
//! Append-only access to the evaluations table: insert, list, get, count.
//! Result columns are mapped back to canonical field names here and nowhere
//! else, so a backend that folds identifier case (`firstname`) still yields
//! records keyed by `firstName`.

use evalform_common::record::{EvaluationFields, EvaluationRecord, FieldValue};
use evalform_common::schema::{self, FieldKind, FIELDS};
use evalform_common::submission::parse_int_prefix;
use evalform_common::{Error, Result};
use once_cell::sync::Lazy;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqlitePool};
use tracing::{debug, trace};

static INSERT_SQL: Lazy<String> = Lazy::new(|| {
    let columns: Vec<&str> = FIELDS.iter().map(|f| f.name).collect();
    let placeholders = vec!["?"; FIELDS.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema::TABLE_NAME,
        columns.join(", "),
        placeholders
    )
});

static LIST_SQL: Lazy<String> = Lazy::new(|| {
    format!(
        "SELECT * FROM {} ORDER BY {} DESC, {} DESC",
        schema::TABLE_NAME,
        schema::CREATED_AT_COLUMN,
        schema::ID_COLUMN
    )
});

static GET_SQL: Lazy<String> = Lazy::new(|| {
    format!(
        "SELECT * FROM {} WHERE {} = ?",
        schema::TABLE_NAME,
        schema::ID_COLUMN
    )
});

/// Store handle injected into request handlers
#[derive(Clone, Debug)]
pub struct EvaluationStore {
    pool: SqlitePool,
}

impl EvaluationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Persist a coerced submission; returns the assigned identifier
    pub async fn insert(&self, fields: &EvaluationFields) -> Result<i64> {
        let mut query = sqlx::query(INSERT_SQL.as_str());
        for value in fields.values() {
            query = match value {
                FieldValue::Text(s) => query.bind(s.as_str()),
                FieldValue::Score(n) => query.bind(*n),
            };
        }

        let id = query.execute(&self.pool).await?.last_insert_rowid();
        debug!("Inserted evaluation {}", id);
        Ok(id)
    }

    /// All records, newest first
    ///
    /// `created_at` has one-second resolution, so ties fall back to the
    /// identifier, which the store assigns in insertion order.
    pub async fn list_all(&self) -> Result<Vec<EvaluationRecord>> {
        let rows = sqlx::query(LIST_SQL.as_str()).fetch_all(&self.pool).await?;
        rows.iter().map(record_from_row).collect()
    }

    pub async fn get_by_id(&self, id: i64) -> Result<EvaluationRecord> {
        let row = sqlx::query(GET_SQL.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => record_from_row(&row),
            None => Err(Error::NotFound(format!("evaluation {}", id))),
        }
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", schema::TABLE_NAME))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Scores written by older clients may sit in the table as text
fn read_score(row: &SqliteRow, idx: usize) -> i64 {
    match row.try_get::<Option<i64>, _>(idx) {
        Ok(value) => value.unwrap_or(0),
        Err(_) => row
            .try_get::<Option<String>, _>(idx)
            .ok()
            .flatten()
            .map(|s| parse_int_prefix(&s))
            .unwrap_or(0),
    }
}

fn read_text(row: &SqliteRow, idx: usize) -> Result<String> {
    match row.try_get::<Option<String>, _>(idx) {
        Ok(value) => Ok(value.unwrap_or_default()),
        // Numeric value in a text column
        Err(_) => Ok(row
            .try_get::<Option<i64>, _>(idx)?
            .map(|n| n.to_string())
            .unwrap_or_default()),
    }
}

/// Build a record from a row, normalizing column names
fn record_from_row(row: &SqliteRow) -> Result<EvaluationRecord> {
    let mut id = None;
    let mut created_at = String::new();
    let mut fields = EvaluationFields::default();

    for (idx, column) in row.columns().iter().enumerate() {
        let Some(name) = schema::canonical_name(column.name()) else {
            trace!("Ignoring unknown column {}", column.name());
            continue;
        };

        if name == schema::ID_COLUMN {
            id = Some(row.try_get::<i64, _>(idx)?);
        } else if name == schema::CREATED_AT_COLUMN {
            created_at = read_text(row, idx)?;
        } else if let Some(def) = schema::field(name) {
            let value = match def.kind {
                FieldKind::Score => FieldValue::Score(read_score(row, idx)),
                FieldKind::ShortText | FieldKind::LongText => FieldValue::Text(read_text(row, idx)?),
            };
            fields.set(name, value);
        }
    }

    let id = id.ok_or_else(|| Error::Internal("evaluation row without id column".to_string()))?;
    Ok(EvaluationRecord { id, created_at, fields })
}
