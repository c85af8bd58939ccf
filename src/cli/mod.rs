//! CLI module for pmrun - command-line interface.
//!
//! The mode token is a free-form positional so unknown tokens reach the
//! dispatcher instead of being rejected by clap.

pub mod commands;

pub use commands::Cli;
