//! Read-only project health report.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::backup::list_backups;
use super::launcher::SERVER_BINARY;
use super::tools::resolve_executable;
use crate::context::OpsContext;
use crate::domain::VirtualEnv;
use crate::persistence::SqliteDatabase;

/// Presence of a single path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathCheck {
    /// Path that was checked.
    pub path: PathBuf,
    /// Whether it exists.
    pub present: bool,
}

impl PathCheck {
    fn file(path: PathBuf) -> Self {
        let present = path.is_file();
        Self { path, present }
    }
}

/// Database findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseStatus {
    /// Database file.
    pub path: PathBuf,
    /// Whether the file exists.
    pub present: bool,
    /// File size, when present.
    pub size_bytes: Option<u64>,
    /// Rows in `django_migrations`, when readable.
    pub applied_migrations: Option<usize>,
    /// Why the database could not be inspected.
    pub error: Option<String>,
}

/// Backup directory findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupsStatus {
    /// Backup directory.
    pub dir: PathBuf,
    /// Number of backups found.
    pub count: usize,
    /// File name of the newest backup.
    pub latest: Option<String>,
}

/// Everything `sportrent status` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Project root.
    pub project_root: PathBuf,
    /// `host:port` the launcher binds to.
    pub bind_address: String,
    /// Exported `DJANGO_SETTINGS_MODULE`.
    pub settings_module: String,
    /// Entry-point file.
    pub entry_point: PathCheck,
    /// Dependency manifest.
    pub requirements: PathCheck,
    /// Located virtual environment.
    pub venv: Option<PathBuf>,
    /// Environment interpreter, when an environment exists.
    pub interpreter: Option<PathCheck>,
    /// Resolved ASGI server binary.
    pub daphne: Option<PathBuf>,
    /// Database findings.
    pub database: DatabaseStatus,
    /// Backup findings.
    pub backups: BackupsStatus,
}

impl StatusReport {
    /// `true` when `serve` has everything it needs.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.entry_point.present && self.daphne.is_some()
    }

    /// Human-readable multi-line rendering.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut lines = vec![
            format!("project      {}", self.project_root.display()),
            format!("address      {}", self.bind_address),
            format!("settings     {}", self.settings_module),
            format!("entry point  {}", check(&self.entry_point)),
            format!("manifest     {}", check(&self.requirements)),
            format!("venv         {}", optional_path(self.venv.as_deref())),
        ];
        if let Some(interpreter) = &self.interpreter {
            lines.push(format!("interpreter  {}", check(interpreter)));
        }
        lines.push(format!("daphne       {}", optional_path(self.daphne.as_deref())));
        lines.push(format!("database     {}", describe_database(&self.database)));

        let latest = self
            .backups
            .latest
            .as_ref()
            .map(|l| format!(", latest {l}"))
            .unwrap_or_default();
        lines.push(format!(
            "backups      {} in {}{latest}",
            self.backups.count,
            self.backups.dir.display()
        ));
        lines.push(format!(
            "ready        {}",
            if self.is_ready() { "yes" } else { "no" }
        ));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

fn describe_database(db: &DatabaseStatus) -> String {
    let mut details = vec![if db.present {
        format!("{} bytes", db.size_bytes.unwrap_or(0))
    } else {
        "missing".to_string()
    }];
    if let Some(applied) = db.applied_migrations {
        details.push(format!("{applied} migrations applied"));
    }
    if let Some(error) = &db.error {
        details.push(format!("unreadable: {error}"));
    }
    format!("{} ({})", db.path.display(), details.join(", "))
}

fn check(c: &PathCheck) -> String {
    format!(
        "{} ({})",
        c.path.display(),
        if c.present { "ok" } else { "missing" }
    )
}

fn optional_path(path: Option<&Path>) -> String {
    path.map_or_else(|| "not found".to_string(), |p| p.display().to_string())
}

/// Collects the report. Never modifies the project; problems are reported,
/// not raised.
pub async fn collect(ctx: &OpsContext) -> StatusReport {
    let layout = &ctx.layout;
    let venv = VirtualEnv::locate(layout);
    let daphne = resolve_executable(SERVER_BINARY, venv.as_ref(), ctx).ok();

    let backups = match list_backups(layout.backups_dir()).await {
        Ok(list) => BackupsStatus {
            dir: layout.backups_dir().to_path_buf(),
            count: list.len(),
            latest: list.first().map(|e| e.file_name.clone()),
        },
        Err(error) => {
            tracing::warn!(%error, "cannot list backups");
            BackupsStatus {
                dir: layout.backups_dir().to_path_buf(),
                count: 0,
                latest: None,
            }
        }
    };

    StatusReport {
        project_root: layout.root().to_path_buf(),
        bind_address: ctx.config.bind_address(),
        settings_module: ctx.config.settings_module.clone(),
        entry_point: PathCheck::file(layout.entry_point()),
        requirements: PathCheck::file(layout.requirements().to_path_buf()),
        interpreter: venv.as_ref().map(|v| PathCheck::file(v.interpreter())),
        venv: venv.map(|v| v.root().to_path_buf()),
        daphne,
        database: inspect_database(layout.database()).await,
        backups,
    }
}

async fn inspect_database(path: &Path) -> DatabaseStatus {
    let mut status = DatabaseStatus {
        path: path.to_path_buf(),
        present: false,
        size_bytes: None,
        applied_migrations: None,
        error: None,
    };

    let Ok(meta) = tokio::fs::metadata(path).await else {
        return status;
    };
    status.present = meta.is_file();
    status.size_bytes = Some(meta.len());
    if !status.present {
        return status;
    }

    match SqliteDatabase::open(path, true).await {
        Ok(db) => {
            match db.applied_migrations().await {
                Ok(applied) => status.applied_migrations = Some(applied.len()),
                Err(error) => status.error = Some(error.to_string()),
            }
            db.close().await;
        }
        Err(error) => status.error = Some(error.to_string()),
    }
    status
}
