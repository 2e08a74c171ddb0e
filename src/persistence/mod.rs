//! Persistence layer: read access to the project's SQLite database.
//!
//! The schema belongs to the Django project. This layer only inspects the
//! migration ledger and takes consistent snapshots through `sqlx`.

pub mod models;
pub mod sqlite;

pub use models::AppliedMigration;
pub use sqlite::SqliteDatabase;
