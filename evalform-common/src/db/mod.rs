//! Database initialization and column sync

pub mod init;
pub mod schema_sync;
pub mod table_schemas;

pub use init::{init_database, init_in_memory, migrate, PoolSettings};
pub use schema_sync::{ColumnDefinition, SchemaDiff, SchemaDrift, SchemaIntrospector, SchemaSync, TableSchema};
pub use table_schemas::EvaluationsTableSchema;
