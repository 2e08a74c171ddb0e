//! Domain layer: project layout, virtual environments, and backup naming.
//!
//! These types describe the operator's view of a SportRent checkout. They
//! resolve paths and answer existence questions but never spawn processes;
//! that belongs to the service layer.

pub mod backup_name;
pub mod layout;
pub mod venv;

pub use backup_name::BackupName;
pub use layout::ProjectLayout;
pub use venv::VirtualEnv;
