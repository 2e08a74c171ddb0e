//! SQLite access via `sqlx::SqlitePool`.

use std::path::Path;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::models::AppliedMigration;
use crate::error::OpsError;

/// Django's migration ledger table.
const MIGRATIONS_TABLE: &str = "django_migrations";

/// Handle to an existing project database.
///
/// Never creates the file; opening a missing database is an error.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Opens an existing database file.
    ///
    /// A read-only handle cannot modify the database in any way and is used
    /// for inspection.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::DatabaseMissing`] if the file does not exist, or
    /// [`OpsError::Database`] if SQLite cannot open it.
    pub async fn open(path: &Path, read_only: bool) -> Result<Self, OpsError> {
        if !path.is_file() {
            return Err(OpsError::DatabaseMissing(path.to_path_buf()));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false)
            .read_only(read_only);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| OpsError::Database(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Returns `true` if Django has created its migration ledger.
    ///
    /// # Errors
    ///
    /// Returns an [`OpsError::Database`] on database failure.
    pub async fn has_migration_table(&self) -> Result<bool, OpsError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(MIGRATIONS_TABLE)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| OpsError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Lists applied migrations in the order Django recorded them.
    ///
    /// An unmigrated database (no ledger yet) yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an [`OpsError::Database`] on database failure.
    pub async fn applied_migrations(&self) -> Result<Vec<AppliedMigration>, OpsError> {
        if !self.has_migration_table().await? {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, (String, String, String)>(
            "SELECT app, name, CAST(applied AS TEXT) FROM django_migrations ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| OpsError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(app, name, applied)| AppliedMigration { app, name, applied })
            .collect())
    }

    /// Writes a transactionally consistent copy of the database to `target`
    /// using `VACUUM INTO`.
    ///
    /// `target` must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::BackupExists`] if `target` exists, or an
    /// [`OpsError::Database`] on database failure.
    pub async fn vacuum_into(&self, target: &Path) -> Result<(), OpsError> {
        if target.exists() {
            return Err(OpsError::BackupExists(target.to_path_buf()));
        }

        sqlx::query("VACUUM INTO ?")
            .bind(target.to_string_lossy().into_owned())
            .execute(&self.pool)
            .await
            .map_err(|e| OpsError::Database(e.to_string()))?;

        Ok(())
    }

    /// Closes the pool, releasing the file handle.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Creates a small Django-shaped database for tests.
    pub(crate) async fn create_fixture(path: &Path, migrations: &[(&str, &str)]) {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE django_migrations (\
             id INTEGER PRIMARY KEY AUTOINCREMENT, app VARCHAR(255) NOT NULL, \
             name VARCHAR(255) NOT NULL, applied DATETIME NOT NULL)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("CREATE TABLE inventory (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO inventory (name) VALUES ('Road bike'), ('Snowboard')")
            .execute(&pool)
            .await
            .unwrap();

        for (app, name) in migrations {
            sqlx::query(
                "INSERT INTO django_migrations (app, name, applied) \
                 VALUES (?, ?, '2026-01-15 10:00:00.000000')",
            )
            .bind(*app)
            .bind(*name)
            .execute(&pool)
            .await
            .unwrap();
        }

        pool.close().await;
    }

    #[tokio::test]
    async fn open_missing_file_is_database_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("db.sqlite3");
        let err = SqliteDatabase::open(&path, true).await.unwrap_err();
        assert!(matches!(err, OpsError::DatabaseMissing(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn lists_applied_migrations_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("db.sqlite3");
        create_fixture(
            &path,
            &[("users", "0001_initial"), ("inventory", "0003_favorite")],
        )
        .await;

        let db = SqliteDatabase::open(&path, true).await.unwrap();
        let applied = db.applied_migrations().await.unwrap();
        db.close().await;

        let names: Vec<_> = applied
            .iter()
            .map(|m| format!("{}.{}", m.app, m.name))
            .collect();
        assert_eq!(names, vec!["users.0001_initial", "inventory.0003_favorite"]);
        assert!(applied.iter().all(|m| m.applied.starts_with("2026-01-15")));
    }

    #[tokio::test]
    async fn unmigrated_database_has_no_migrations() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("db.sqlite3");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .unwrap()
            .close()
            .await;

        let db = SqliteDatabase::open(&path, true).await.unwrap();
        assert!(!db.has_migration_table().await.unwrap());
        assert!(db.applied_migrations().await.unwrap().is_empty());
        db.close().await;
    }

    #[tokio::test]
    async fn vacuum_into_produces_readable_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("db.sqlite3");
        let target = tmp.path().join("snapshot.sqlite3");
        create_fixture(&source, &[("users", "0001_initial")]).await;

        let db = SqliteDatabase::open(&source, false).await.unwrap();
        db.vacuum_into(&target).await.unwrap();
        let again = db.vacuum_into(&target).await.unwrap_err();
        db.close().await;
        assert!(matches!(again, OpsError::BackupExists(_)));

        let copy = SqliteDatabase::open(&target, true).await.unwrap();
        assert_eq!(copy.applied_migrations().await.unwrap().len(), 1);
        copy.close().await;
    }
}
