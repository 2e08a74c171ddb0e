//! Service layer: one module per operator command.
//!
//! Services check preconditions, build [`crate::process::ToolCommand`]s and
//! run them through a [`crate::process::CommandRunner`], strictly in
//! sequence. The first failure ends the command; nothing is retried.

pub mod backup;
pub mod bootstrap;
pub mod launcher;
pub mod seeder;
pub mod status;
pub mod tools;

pub use backup::{BackupEntry, BackupMode};
pub use bootstrap::BootstrapReport;
pub use seeder::{SeedOptions, SeedReport};
pub use status::StatusReport;
