//! Test runner that records commands instead of spawning them.

use std::sync::Mutex;

use super::{CommandRunner, ToolCommand};
use crate::error::OpsError;

type Hook = Box<dyn Fn(&ToolCommand) -> Result<(), OpsError> + Send + Sync>;

/// Records every command; an optional hook simulates side effects or
/// failures.
pub(crate) struct RecordingRunner {
    calls: Mutex<Vec<ToolCommand>>,
    hook: Option<Hook>,
}

impl RecordingRunner {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            hook: None,
        }
    }

    pub(crate) fn with_hook<F>(hook: F) -> Self
    where
        F: Fn(&ToolCommand) -> Result<(), OpsError> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            hook: Some(Box::new(hook)),
        }
    }

    pub(crate) fn calls(&self) -> Vec<ToolCommand> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub(crate) fn labels(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.label().to_string())
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &ToolCommand) -> Result<(), OpsError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.clone());
        }
        match &self.hook {
            Some(hook) => hook(command),
            None => Ok(()),
        }
    }
}
