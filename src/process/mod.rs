//! Process layer: child tool descriptions and the runner that executes them.
//!
//! Services build [`ToolCommand`]s and hand them to a [`CommandRunner`].
//! The production runner is [`SystemRunner`]; tests substitute a recording
//! runner so no Python toolchain is needed.

pub mod command;
pub mod runner;

#[cfg(test)]
pub(crate) mod recording;

pub use command::ToolCommand;
pub use runner::{CommandRunner, SystemRunner};
