//! Dispatch modes.
//!
//! The mode set is closed. Tokens are matched case-sensitively against
//! [`MODE_TOKENS`]; `SPL` is the legacy spelling of `SPLIT` and selects
//! the same pipeline.

use serde::Serialize;
use std::fmt;

use crate::error::{DispatchError, Result};

/// Which pipeline a run selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Service-discovery engine, algorithm SMD
    Split,
    /// Analysis-engine CLI driven by the ILP import/export script
    Ilp,
}

/// Accepted mode tokens and the mode each one selects.
pub const MODE_TOKENS: &[(&str, Mode)] = &[("SPLIT", Mode::Split), ("SPL", Mode::Split), ("ILP", Mode::Ilp)];

/// All accepted tokens, in table order
pub fn accepted_tokens() -> Vec<&'static str> {
    MODE_TOKENS.iter().map(|(token, _)| *token).collect()
}

impl Mode {
    /// Parse a mode token. Unrecognized tokens (including "") are an error.
    pub fn parse(token: &str) -> Result<Self> {
        MODE_TOKENS
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, mode)| *mode)
            .ok_or_else(|| DispatchError::UnknownMode(token.to_string()))
    }

    /// Canonical token for this mode
    pub fn token(&self) -> &'static str {
        match self {
            Mode::Split => "SPLIT",
            Mode::Ilp => "ILP",
        }
    }

    /// Names of the positional arguments this mode consumes, in order.
    pub fn required_args(&self) -> &'static [&'static str] {
        match self {
            Mode::Split => &["first", "second"],
            Mode::Ilp => &["import-log", "export-model"],
        }
    }

    /// One-line summary shown by `--list-modes`
    pub fn description(&self) -> &'static str {
        match self {
            Mode::Split => "service discovery (SMD) with two pass-through arguments",
            Mode::Ilp => "import a log and export a PNML model via the ILP script",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}
