//! Mode dispatcher
//!
//! Turns a [`Request`] into at most one [`ExternalInvocation`] and, when
//! asked to run, hands it to a [`Launcher`]. Dispatch itself performs no I/O.

use crate::config::{EngineConfig, UnknownModePolicy};
use crate::error::{DispatchError, Result};
use crate::invocation::{ExternalInvocation, Request, ResolvedConfig};
use crate::launcher::Launcher;
use crate::mode::Mode;

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    engine: EngineConfig,
    unknown_mode: UnknownModePolicy,
}

impl Dispatcher {
    pub fn new(engine: EngineConfig, unknown_mode: UnknownModePolicy) -> Self {
        Self { engine, unknown_mode }
    }

    /// Resolve a request into the command to run.
    ///
    /// Returns `Ok(None)` only for an unknown token under
    /// [`UnknownModePolicy::Ignore`].
    pub fn dispatch(&self, request: &Request) -> Result<Option<ExternalInvocation>> {
        let mode = match Mode::parse(&request.token) {
            Ok(mode) => mode,
            Err(DispatchError::UnknownMode(token)) if self.unknown_mode == UnknownModePolicy::Ignore => {
                log::info!("Ignoring unknown mode '{}'", token);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let resolved = ResolvedConfig::resolve(mode, &request.args)?;
        log::debug!("Resolved {} configuration: {:?}", mode, resolved);

        Ok(Some(resolved.to_invocation(&self.engine)))
    }

    /// Dispatch and launch, returning the exit code to propagate.
    pub fn run(&self, request: &Request, launcher: &dyn Launcher) -> Result<i32> {
        match self.dispatch(request)? {
            Some(invocation) => launcher.launch(&invocation),
            None => Ok(0),
        }
    }
}
