//! # sportrent-ops
//!
//! Operator tooling for the SportRent Django project served by Daphne.
//!
//! The crate does not reimplement the web application. It drives the
//! project from the outside: launching the ASGI server, bootstrapping the
//! virtual environment, seeding demo data, and backing up the SQLite
//! database.
//!
//! ## Architecture
//!
//! ```text
//! sportrent <command>            (cli, main)
//!     │
//!     ├── OpsConfig / OpsContext  (config, context)
//!     │
//!     ├── Services                (service/)
//!     │     launcher · bootstrap · seeder · backup · status
//!     │
//!     ├── ProjectLayout, VirtualEnv, BackupName  (domain/)
//!     ├── ToolCommand → CommandRunner            (process/)
//!     ├── SqliteDatabase                         (persistence/)
//!     └── HTTP + WebSocket probe                 (probe/)
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod probe;
pub mod process;
pub mod service;
