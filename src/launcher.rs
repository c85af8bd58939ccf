//! Launching the external engine
//!
//! The [`Launcher`] trait is the seam between dispatch and the operating
//! system. [`ProcessLauncher`] spawns a real child and waits for it; tests
//! substitute their own implementation.

use std::process::{Command, ExitStatus};

use crate::error::{DispatchError, Result};
use crate::invocation::ExternalInvocation;

/// Runs an invocation to completion and reports its exit code
pub trait Launcher {
    fn launch(&self, invocation: &ExternalInvocation) -> Result<i32>;
}

/// Spawns the engine as a child process with inherited stdio
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }

    /// Build the command. Environment bindings go on the child only.
    pub fn command(invocation: &ExternalInvocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);

        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }

        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }

        cmd
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, invocation: &ExternalInvocation) -> Result<i32> {
        log::info!("Launching {} engine: {}", invocation.mode, invocation);

        let status = Self::command(invocation)
            .status()
            .map_err(|source| DispatchError::Launch {
                program: invocation.program.clone(),
                source,
            })?;

        let code = exit_code(status);
        if code == 0 {
            log::info!("{} exited successfully", invocation.program);
        } else {
            log::warn!("{} exited with status {}", invocation.program, code);
        }
        Ok(code)
    }
}

/// Map a child's exit status to our own exit code.
///
/// A child killed by signal N maps to 128 + N, as shells report it.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
