//! CLI definition using clap.
//!
//! `pmrun [OPTIONS] [MODE] [ARGS]...`

use clap::Parser;
use std::path::PathBuf;

/// pmrun - launch a process-mining engine pipeline by mode
#[derive(Parser, Debug)]
#[command(name = "pmrun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the resolved engine command instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, print the command as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// List accepted mode tokens and exit
    #[arg(long)]
    pub list_modes: bool,

    /// Treat unknown modes as a successful no-op
    #[arg(long)]
    pub lenient: bool,

    /// Mode token (SPLIT, SPL or ILP) followed by its arguments.
    /// Everything after the mode token is passed through as given.
    #[arg(value_name = "MODE [ARGS]", trailing_var_arg = true, allow_hyphen_values = true)]
    pub positional: Vec<String>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Mode token, with a missing token treated as empty
    pub fn mode_token(&self) -> &str {
        self.positional.first().map(String::as_str).unwrap_or_default()
    }

    /// Arguments following the mode token
    pub fn mode_args(&self) -> &[String] {
        self.positional.get(1..).unwrap_or_default()
    }
}
