//! Runners that execute [`ToolCommand`]s.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Child;

use super::ToolCommand;
use crate::error::OpsError;

/// Executes child tools to completion.
///
/// A run succeeds only when the child exits with status zero. Any other
/// status becomes [`OpsError::ToolFailed`] carrying the child's code.
pub trait CommandRunner {
    /// Runs `command` and waits for it to exit.
    fn run(&self, command: &ToolCommand) -> impl Future<Output = Result<(), OpsError>> + Send;
}

/// Runs commands as real child processes with inherited stdio.
///
/// An interrupt or terminate signal received while a child runs is forwarded
/// to the child, which then has `grace` to exit on its own before it is
/// killed.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    grace: Duration,
}

impl SystemRunner {
    /// Creates a runner with the default 10 second interrupt grace period.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            grace: Duration::from_secs(10),
        }
    }

    /// Overrides the interrupt grace period.
    #[must_use]
    pub const fn with_grace(grace: Duration) -> Self {
        Self { grace }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, command: &ToolCommand) -> Result<(), OpsError> {
        let mut cmd = tokio::process::Command::new(command.program());
        cmd.args(command.arg_list())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = command.working_dir() {
            cmd.current_dir(dir);
        }
        for (key, value) in command.env_list() {
            cmd.env(key, value);
        }

        tracing::info!(tool = command.label(), command = %command, "running");

        let mut shutdown = Shutdown::listen().map_err(OpsError::io("installing signal handlers"))?;
        let mut child = cmd.spawn().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                OpsError::ExecutableNotFound(command.program().display().to_string())
            } else {
                OpsError::Spawn {
                    tool: command.label().to_string(),
                    source,
                }
            }
        })?;

        let waiting = format!("waiting for {}", command.label());
        let status = tokio::select! {
            status = child.wait() => status.map_err(OpsError::io(waiting))?,
            signal = shutdown.recv() => {
                tracing::info!(tool = command.label(), %signal, "forwarding signal to child");
                forward(&mut child, signal)
                    .map_err(OpsError::io(format!("signalling {}", command.label())))?;
                match tokio::time::timeout(self.grace, child.wait()).await {
                    Ok(status) => status.map_err(OpsError::io(waiting))?,
                    Err(_) => {
                        tracing::warn!(tool = command.label(), "grace period elapsed, killing child");
                        child
                            .kill()
                            .await
                            .map_err(OpsError::io(format!("killing {}", command.label())))?;
                        child.wait().await.map_err(OpsError::io(waiting))?
                    }
                }
            }
        };

        if status.success() {
            tracing::debug!(tool = command.label(), "finished");
            Ok(())
        } else {
            Err(OpsError::ToolFailed {
                tool: command.label().to_string(),
                code: status.code(),
            })
        }
    }
}

/// Signal that asked the operator process to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("interrupt"),
            Self::Terminate => f.write_str("terminate"),
        }
    }
}

/// Signal listeners, registered before the child is spawned.
#[cfg(unix)]
struct Shutdown {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Shutdown {
    fn listen() -> std::io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(&mut self) -> StopSignal {
        tokio::select! {
            _ = self.interrupt.recv() => StopSignal::Interrupt,
            _ = self.terminate.recv() => StopSignal::Terminate,
        }
    }
}

#[cfg(not(unix))]
struct Shutdown;

#[cfg(not(unix))]
impl Shutdown {
    fn listen() -> std::io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> StopSignal {
        match tokio::signal::ctrl_c().await {
            Ok(()) => StopSignal::Interrupt,
            Err(error) => {
                tracing::warn!(%error, "cannot listen for Ctrl-C");
                std::future::pending().await
            }
        }
    }
}

/// Sends the matching signal to the child. A child that already exited is
/// not an error.
#[cfg(unix)]
fn forward(child: &mut Child, signal: StopSignal) -> std::io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        return Ok(());
    };
    let pid = i32::try_from(pid).map_err(std::io::Error::other)?;
    let signal = match signal {
        StopSignal::Interrupt => Signal::SIGINT,
        StopSignal::Terminate => Signal::SIGTERM,
    };
    match kill(Pid::from_raw(pid), signal) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(errno.into()),
    }
}

#[cfg(not(unix))]
fn forward(child: &mut Child, _signal: StopSignal) -> std::io::Result<()> {
    child.start_kill()
}
