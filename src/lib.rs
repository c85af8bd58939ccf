//! pmrun - process-mining engine dispatcher
//!
//! Selects one of two fixed engine pipelines from a mode token, derives the
//! per-mode arguments and environment, and launches the external engine.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod invocation;
pub mod launcher;
pub mod mode;

pub use dispatch::Dispatcher;
pub use error::{DispatchError, Result};
