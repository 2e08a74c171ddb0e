//! Database row models.

use serde::{Deserialize, Serialize};

/// A row from Django's `django_migrations` ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMigration {
    /// Django app label (e.g. `rentals`).
    pub app: String,
    /// Migration name (e.g. `0003_favorite`).
    pub name: String,
    /// Timestamp as stored by Django, without reinterpretation.
    pub applied: String,
}
