//! Column synchronization
//!
//! Keeps an existing table in step with its declared columns. Adding a field
//! to the record schema is the only supported schema change: on startup any
//! declared column missing from the table is added with `ALTER TABLE ADD
//! COLUMN`. Type or constraint drift is reported but never repaired.
//!
//! ```rust,ignore
//! SchemaSync::sync_table::<EvaluationsTableSchema>(&pool).await?;
//! ```

use crate::Result;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info, warn};

/// Column definition with SQL constraints
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    /// SQL type (e.g., "TEXT", "INTEGER", "DATETIME")
    pub sql_type: String,
    pub not_null: bool,
    pub primary_key: bool,
    pub autoincrement: bool,
    /// Literal SQL default (quoted by the caller when it is a string)
    pub default_value: Option<String>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            not_null: false,
            primary_key: false,
            autoincrement: false,
            default_value: None,
        }
    }

    /// Implies PRIMARY KEY
    pub fn autoincrement(mut self) -> Self {
        self.primary_key = true;
        self.autoincrement = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Column clause for CREATE TABLE
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type);
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
            if self.autoincrement {
                sql.push_str(" AUTOINCREMENT");
            }
        }
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default_value {
            sql.push_str(&format!(" DEFAULT {}", default));
        }
        sql
    }
}

/// Column as reported by `PRAGMA table_info`
#[derive(Debug, Clone)]
pub struct ActualColumn {
    pub cid: i32,
    pub name: String,
    pub type_name: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub pk: bool,
}

/// Difference between declared and actual columns
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDrift {
    /// Declared column absent from the table (repairable)
    MissingColumn { table: String, column: ColumnDefinition },
    /// Storage class differs (reported only)
    TypeMismatch {
        table: String,
        column: String,
        expected: String,
        actual: String,
    },
}

/// Declared schema of one table
pub trait TableSchema {
    fn table_name() -> &'static str;

    /// Columns in creation order
    fn expected_columns() -> Vec<ColumnDefinition>;

    /// `CREATE TABLE IF NOT EXISTS` statement for the declared columns
    fn create_table_sql() -> String {
        let columns: Vec<String> = Self::expected_columns()
            .iter()
            .map(|c| format!("    {}", c.to_sql()))
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            Self::table_name(),
            columns.join(",\n")
        )
    }
}

/// Reads the live schema
pub struct SchemaIntrospector;

impl SchemaIntrospector {
    /// Columns of a table ordered by position
    pub async fn introspect_table(pool: &SqlitePool, table_name: &str) -> Result<Vec<ActualColumn>> {
        let rows = sqlx::query(&format!("PRAGMA table_info({})", table_name))
            .fetch_all(pool)
            .await?;

        let mut columns: Vec<ActualColumn> = rows
            .iter()
            .map(|row| ActualColumn {
                cid: row.get("cid"),
                name: row.get("name"),
                type_name: row.get("type"),
                not_null: row.get::<i32, _>("notnull") != 0,
                default_value: row.get("dflt_value"),
                pk: row.get::<i32, _>("pk") != 0,
            })
            .collect();
        columns.sort_by_key(|c| c.cid);

        Ok(columns)
    }

    pub async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
        )
        .bind(table_name)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }
}

/// Compares declared and actual columns
pub struct SchemaDiff;

impl SchemaDiff {
    /// Column names compare without regard to ASCII case, matching SQLite's
    /// own identifier rules.
    pub fn compare(
        table_name: &str,
        expected: &[ColumnDefinition],
        actual: &[ActualColumn],
    ) -> Vec<SchemaDrift> {
        let mut drift = Vec::new();

        for expected_col in expected {
            match actual
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(&expected_col.name))
            {
                Some(actual_col) => {
                    if !Self::types_compatible(&expected_col.sql_type, &actual_col.type_name) {
                        drift.push(SchemaDrift::TypeMismatch {
                            table: table_name.to_string(),
                            column: expected_col.name.clone(),
                            expected: expected_col.sql_type.clone(),
                            actual: actual_col.type_name.clone(),
                        });
                    }
                }
                None => drift.push(SchemaDrift::MissingColumn {
                    table: table_name.to_string(),
                    column: expected_col.clone(),
                }),
            }
        }

        drift
    }

    /// SQLite type affinity comparison
    pub fn types_compatible(expected: &str, actual: &str) -> bool {
        fn affinity(ty: &str) -> &'static str {
            let ty = ty.to_uppercase();
            if ty.contains("INT") {
                "INTEGER"
            } else if ty.contains("CHAR") || ty.contains("CLOB") || ty.contains("TEXT") {
                "TEXT"
            } else if ty.contains("REAL") || ty.contains("FLOA") || ty.contains("DOUB") {
                "REAL"
            } else if ty.is_empty() || ty.contains("BLOB") {
                "BLOB"
            } else {
                "NUMERIC"
            }
        }

        affinity(expected) == affinity(actual)
    }
}

/// Applies repairable drift
pub struct SchemaSync;

impl SchemaSync {
    /// Add every declared column the table lacks; returns the added names
    ///
    /// A table that does not exist yet is left alone (creation is the
    /// caller's job).
    pub async fn sync_table<T: TableSchema>(pool: &SqlitePool) -> Result<Vec<String>> {
        let table_name = T::table_name();

        if !SchemaIntrospector::table_exists(pool, table_name).await? {
            warn!("Table '{}' does not exist; skipping column sync", table_name);
            return Ok(Vec::new());
        }

        let actual = SchemaIntrospector::introspect_table(pool, table_name).await?;
        let drift = SchemaDiff::compare(table_name, &T::expected_columns(), &actual);

        if drift.is_empty() {
            debug!("Columns up to date for '{}'", table_name);
            return Ok(Vec::new());
        }

        let mut added = Vec::new();
        for change in drift {
            match change {
                SchemaDrift::MissingColumn { table, column } => {
                    Self::add_column(pool, &table, &column).await?;
                    added.push(column.name);
                }
                SchemaDrift::TypeMismatch { table, column, expected, actual } => {
                    warn!(
                        "Type mismatch in {}.{}: expected '{}', found '{}'. Left unchanged.",
                        table, column, expected, actual
                    );
                }
            }
        }

        Ok(added)
    }

    /// `ALTER TABLE ADD COLUMN`
    ///
    /// SQLite cannot add a PRIMARY KEY column, and accepts NOT NULL only
    /// together with a DEFAULT.
    async fn add_column(pool: &SqlitePool, table: &str, column: &ColumnDefinition) -> Result<()> {
        let mut sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column.name, column.sql_type);

        if column.primary_key {
            warn!(
                "Cannot add PRIMARY KEY column {}.{}; adding it as a plain column",
                table, column.name
            );
        }

        match (&column.default_value, column.not_null) {
            (Some(default), true) => sql.push_str(&format!(" NOT NULL DEFAULT {}", default)),
            (Some(default), false) => sql.push_str(&format!(" DEFAULT {}", default)),
            (None, true) => warn!(
                "Cannot add NOT NULL column {}.{} without a DEFAULT; adding it as nullable",
                table, column.name
            ),
            (None, false) => {}
        }

        info!("Adding column {}.{} ({})", table, column.name, column.sql_type);

        match sqlx::query(&sql).execute(pool).await {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("duplicate column") => {
                // Another process added it between introspection and ALTER
                info!("Column {}.{} already present", table, column.name);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
