//! SQLite backups under `backups/db-<YYYYMMDD-HHMMSS>.sqlite3`.
//!
//! The default mode copies the database file byte-for-byte. It takes no
//! lock, so a server writing at the same moment can leave a torn copy.
//! [`BackupMode::Online`] snapshots through SQLite instead and is safe
//! against concurrent writers.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::domain::BackupName;
use crate::error::OpsError;
use crate::persistence::SqliteDatabase;

/// How the snapshot is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackupMode {
    /// Plain file copy; output is byte-identical to the source.
    #[default]
    Copy,
    /// `VACUUM INTO`; output is a consistent, compacted database.
    Online,
}

/// A backup file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupEntry {
    /// Full path of the backup.
    pub path: PathBuf,
    /// File name, `db-<timestamp>.sqlite3`.
    pub file_name: String,
    /// Local time encoded in the name.
    pub taken_at: NaiveDateTime,
    /// Size in bytes.
    pub size_bytes: u64,
}

/// Backs up `database` into `backups_dir`, naming the file after
/// `taken_at`.
///
/// The source is checked before anything is created, so a missing database
/// leaves `backups_dir` untouched. An existing backup is never overwritten.
///
/// # Errors
///
/// Returns [`OpsError::DatabaseMissing`] if the source is absent,
/// [`OpsError::BackupExists`] on a name collision, [`OpsError::Io`] or
/// [`OpsError::Database`] if the copy fails. A failed copy leaves no file
/// behind.
pub async fn create_backup(
    database: &Path,
    backups_dir: &Path,
    taken_at: NaiveDateTime,
    mode: BackupMode,
) -> Result<BackupEntry, OpsError> {
    match tokio::fs::metadata(database).await {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(OpsError::DatabaseMissing(database.to_path_buf())),
    }

    tokio::fs::create_dir_all(backups_dir)
        .await
        .map_err(OpsError::io(format!("creating {}", backups_dir.display())))?;

    let name = BackupName::new(taken_at);
    let target = backups_dir.join(name.to_string());

    match mode {
        BackupMode::Copy => copy_file(database, &target).await?,
        BackupMode::Online => {
            let db = SqliteDatabase::open(database, false).await?;
            let result = db.vacuum_into(&target).await;
            db.close().await;
            result?;
        }
    }

    let size_bytes = tokio::fs::metadata(&target)
        .await
        .map_err(OpsError::io(format!("reading {}", target.display())))?
        .len();

    tracing::info!(
        source = %database.display(),
        backup = %target.display(),
        size_bytes,
        ?mode,
        "backup created"
    );

    Ok(BackupEntry {
        path: target,
        file_name: name.to_string(),
        taken_at: name.taken_at(),
        size_bytes,
    })
}

async fn copy_file(source: &Path, target: &Path) -> Result<(), OpsError> {
    let mut src = tokio::fs::File::open(source)
        .await
        .map_err(OpsError::io(format!("opening {}", source.display())))?;

    let mut dst = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                OpsError::BackupExists(target.to_path_buf())
            } else {
                OpsError::io(format!("creating {}", target.display()))(e)
            }
        })?;

    let copied = async {
        tokio::io::copy(&mut src, &mut dst).await?;
        dst.flush().await?;
        dst.sync_all().await
    }
    .await;

    if let Err(e) = copied {
        drop(dst);
        if let Err(cleanup) = tokio::fs::remove_file(target).await {
            tracing::warn!(error = %cleanup, backup = %target.display(), "cannot remove partial backup");
        }
        return Err(OpsError::io(format!("copying to {}", target.display()))(e));
    }

    Ok(())
}

/// Lists backups in `backups_dir`, newest first.
///
/// Files not named like a backup are ignored. A missing directory holds no
/// backups.
///
/// # Errors
///
/// Returns [`OpsError::Io`] if the directory cannot be read.
pub async fn list_backups(backups_dir: &Path) -> Result<Vec<BackupEntry>, OpsError> {
    let mut dir = match tokio::fs::read_dir(backups_dir).await {
        Ok(dir) => dir,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(OpsError::io(format!("reading {}", backups_dir.display()))(e)),
    };

    let mut entries = Vec::new();
    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(OpsError::io(format!("reading {}", backups_dir.display())))?
    {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(name) = BackupName::parse(&file_name) else {
            continue;
        };
        let meta = entry
            .metadata()
            .await
            .map_err(OpsError::io(format!("reading {}", entry.path().display())))?;
        if !meta.is_file() {
            continue;
        }
        entries.push(BackupEntry {
            path: entry.path(),
            file_name,
            taken_at: name.taken_at(),
            size_bytes: meta.len(),
        });
    }

    entries.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
    Ok(entries)
}

/// Deletes all but the newest `keep` backups and returns the removed ones.
///
/// # Errors
///
/// Returns [`OpsError::Io`] if listing or deleting fails. Backups deleted
/// before the failure stay deleted.
pub async fn prune_backups(backups_dir: &Path, keep: usize) -> Result<Vec<BackupEntry>, OpsError> {
    let mut removed = Vec::new();
    for entry in list_backups(backups_dir).await?.into_iter().skip(keep) {
        tokio::fs::remove_file(&entry.path)
            .await
            .map_err(OpsError::io(format!("removing {}", entry.path.display())))?;
        tracing::info!(backup = %entry.path.display(), "pruned backup");
        removed.push(entry);
    }
    Ok(removed)
}
