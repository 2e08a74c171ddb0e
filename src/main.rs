//! `sportrent` operator binary.
//!
//! Parses the command line, loads configuration, initialises tracing and
//! dispatches to the service layer. Errors are printed to stderr and mapped
//! to the process exit code.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sportrent_ops::cli::{BackupAction, BackupArgs, Cli, Commands, CreateArgs};
use sportrent_ops::config::{LogFormat, OpsConfig};
use sportrent_ops::context::OpsContext;
use sportrent_ops::error::OpsError;
use sportrent_ops::probe;
use sportrent_ops::process::SystemRunner;
use sportrent_ops::service::{self, BackupMode, SeedOptions};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("sportrent: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), OpsError> {
    let config = OpsConfig::from_env(cli.project.as_deref())?;
    init_tracing(config.log_format, cli.quiet, cli.verbose);

    let ctx = OpsContext::new(config);
    let runner = SystemRunner::new();
    tracing::debug!(root = %ctx.layout.root().display(), "project resolved");

    match cli.command {
        Commands::Serve => service::launcher::serve(&ctx, &runner).await,
        Commands::Bootstrap => {
            let report = service::bootstrap::bootstrap(&ctx, &runner).await?;
            println!(
                "environment {} ({})",
                report.venv.display(),
                if report.venv_created { "created" } else { "existing" }
            );
            Ok(())
        }
        Commands::Seed(args) => {
            let options = SeedOptions {
                backup_first: args.backup,
            };
            let report = service::seeder::seed(&ctx, &runner, options).await?;
            if let Some(backup) = report.backup {
                println!("backup {}", backup.path.display());
            }
            Ok(())
        }
        Commands::Backup(args) => backup(&ctx, args).await,
        Commands::Status(args) => {
            let report = service::status::collect(&ctx).await;
            if args.json {
                println!("{}", to_json(&report)?);
            } else {
                print!("{}", report.render_text());
            }
            Ok(())
        }
        Commands::Probe(args) => {
            let report = probe::run(&ctx.config).await;
            if args.json {
                println!("{}", to_json(&report)?);
            } else {
                print!("{}", report.render_text());
            }
            if report.is_healthy() {
                Ok(())
            } else {
                Err(OpsError::Probe(format!(
                    "{} is not serving both HTTP and WebSocket",
                    ctx.config.bind_address()
                )))
            }
        }
    }
}

async fn backup(ctx: &OpsContext, args: BackupArgs) -> Result<(), OpsError> {
    let backups_dir = ctx.layout.backups_dir();
    match args.action.unwrap_or(BackupAction::Create(args.create)) {
        BackupAction::Create(CreateArgs { online }) => {
            let mode = if online {
                BackupMode::Online
            } else {
                BackupMode::Copy
            };
            let taken_at = chrono::Local::now().naive_local();
            let entry = service::backup::create_backup(
                ctx.layout.database(),
                backups_dir,
                taken_at,
                mode,
            )
            .await?;
            println!("{}", entry.path.display());
        }
        BackupAction::List(list) => {
            let entries = service::backup::list_backups(backups_dir).await?;
            if list.json {
                println!("{}", to_json(&entries)?);
            } else {
                for entry in entries {
                    println!("{}  {:>12}  {}", entry.taken_at, entry.size_bytes, entry.file_name);
                }
            }
        }
        BackupAction::Prune(prune) => {
            let removed = service::backup::prune_backups(backups_dir, prune.keep).await?;
            for entry in &removed {
                println!("removed {}", entry.path.display());
            }
        }
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, OpsError> {
    serde_json::to_string_pretty(value).map_err(|e| OpsError::Io {
        context: "serializing output".to_string(),
        source: e.into(),
    })
}

fn init_tracing(format: LogFormat, quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(error) = result {
        eprintln!("sportrent: logging disabled: {error}");
    }
}
