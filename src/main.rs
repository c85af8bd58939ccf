use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

use pmrun::config::{Config, UnknownModePolicy};
use pmrun::invocation::Request;
use pmrun::launcher::ProcessLauncher;
use pmrun::mode::MODE_TOKENS;
use pmrun::{DispatchError, Dispatcher};

mod cli;

use cli::Cli;

fn open_log_file() -> Result<(PathBuf, fs::File)> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pmrun")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("pmrun.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .context("Failed to open log file")?;

    Ok((log_file, file))
}

/// Log to the data-dir log file, or to stderr when that is unavailable
fn setup_logging() {
    let mut builder = env_logger::Builder::from_default_env();

    match open_log_file() {
        Ok((path, file)) => {
            builder.target(env_logger::Target::Pipe(Box::new(file))).init();
            info!("Logging initialized, writing to: {}", path.display());
        }
        Err(e) => {
            builder.init();
            log::warn!("File logging unavailable, using stderr: {:#}", e);
        }
    }
}

fn list_modes() {
    for (token, mode) in MODE_TOKENS {
        println!("{:<6} {}", token.green(), mode.description());
    }
}

/// Run the selected pipeline and return the exit code to propagate
fn run_application(cli: &Cli, config: &Config) -> Result<i32> {
    info!("Starting application");

    if cli.list_modes {
        list_modes();
        return Ok(0);
    }

    let policy = if cli.lenient {
        UnknownModePolicy::Ignore
    } else {
        config.unknown_mode
    };
    if let Err(e) = config.engine.validate() {
        return Ok(report(&e));
    }
    let dispatcher = Dispatcher::new(config.engine.clone(), policy);
    let request = Request::new(cli.mode_token(), cli.mode_args().to_vec());

    if cli.dry_run {
        let invocation = dispatcher.dispatch(&request);
        return match invocation {
            Ok(Some(invocation)) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&invocation)?);
                } else {
                    println!("{}", invocation);
                }
                Ok(0)
            }
            Ok(None) => {
                if cli.is_verbose() {
                    println!("{}", "Unknown mode ignored, nothing to run".yellow());
                }
                Ok(0)
            }
            Err(e) => Ok(report(&e)),
        };
    }

    if cli.is_verbose() {
        println!("{} {} {:?}", "Dispatching:".cyan(), request.token, request.args);
    }

    match dispatcher.run(&request, &ProcessLauncher::new()) {
        Ok(code) => {
            if cli.is_verbose() {
                let status = format!("Engine exited with status {}", code);
                println!("{}", if code == 0 { status.green() } else { status.red() });
            }
            Ok(code)
        }
        Err(e) => Ok(report(&e)),
    }
}

fn report(err: &DispatchError) -> i32 {
    log::error!("{}", err);
    eprintln!("{} {}", "Error:".red(), err);
    err.exit_code()
}

fn main() -> Result<()> {
    // Setup logging first
    setup_logging();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    let code = run_application(&cli, &config).context("Application failed")?;

    info!("Exiting with status {}", code);
    std::process::exit(code);
}
