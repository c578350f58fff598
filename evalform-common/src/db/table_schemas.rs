//! Declared table schemas
//!
//! The evaluations table is derived from the record schema, so adding a
//! field there adds the column here.

use crate::db::schema_sync::{ColumnDefinition, SchemaSync, TableSchema};
use crate::schema::{self, FieldKind, FIELDS};
use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Evaluations table
pub struct EvaluationsTableSchema;

impl TableSchema for EvaluationsTableSchema {
    fn table_name() -> &'static str {
        schema::TABLE_NAME
    }

    fn expected_columns() -> Vec<ColumnDefinition> {
        let mut columns = vec![
            ColumnDefinition::new(schema::ID_COLUMN, "INTEGER").autoincrement(),
            ColumnDefinition::new(schema::CREATED_AT_COLUMN, "DATETIME").default("CURRENT_TIMESTAMP"),
        ];

        columns.extend(FIELDS.iter().map(|f| {
            let column = ColumnDefinition::new(f.name, f.kind.sql_type());
            match f.kind {
                FieldKind::ShortText => column.not_null().default("''"),
                FieldKind::Score => column.not_null().default("0"),
                FieldKind::LongText => column.default("''"),
            }
        }));

        columns
    }
}

/// Add columns declared in code but missing from the database
pub async fn sync_all_table_schemas(pool: &SqlitePool) -> Result<()> {
    let added = SchemaSync::sync_table::<EvaluationsTableSchema>(pool).await?;
    if !added.is_empty() {
        info!(
            "Added {} column(s) to {}: {}",
            added.len(),
            schema::TABLE_NAME,
            added.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_follow_record_schema() {
        let columns = EvaluationsTableSchema::expected_columns();
        assert_eq!(columns.len(), FIELDS.len() + 2);

        assert_eq!(columns[0].name, "id");
        assert!(columns[0].primary_key && columns[0].autoincrement);
        assert_eq!(columns[1].name, "created_at");
        assert_eq!(columns[1].default_value.as_deref(), Some("CURRENT_TIMESTAMP"));

        for (column, field) in columns[2..].iter().zip(FIELDS) {
            assert_eq!(column.name, field.name);
        }
    }

    #[test]
    fn test_scores_not_null_default_zero() {
        let columns = EvaluationsTableSchema::expected_columns();
        let passion = columns.iter().find(|c| c.name == "passion").unwrap();
        assert_eq!(passion.sql_type, "INTEGER");
        assert!(passion.not_null);
        assert_eq!(passion.default_value.as_deref(), Some("0"));

        let details = columns.iter().find(|c| c.name == "projectDetails").unwrap();
        assert!(!details.not_null);

        let first = columns.iter().find(|c| c.name == "firstName").unwrap();
        assert!(first.not_null);
    }
}
