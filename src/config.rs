use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DispatchError;

/// What to do with a mode token outside the accepted set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownModePolicy {
    /// Fail with a usage error and nonzero exit
    #[default]
    Reject,
    /// Do nothing and exit successfully (legacy behavior)
    Ignore,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub unknown_mode: UnknownModePolicy,
    pub engine: EngineConfig,
}

/// How to launch the external engine for each pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Working directory for the child; inherits ours when unset
    pub working_dir: Option<PathBuf>,
    pub service_discovery: ServiceDiscoveryConfig,
    pub analysis: AnalysisConfig,
}

impl EngineConfig {
    /// Reject configurations that cannot produce a runnable command
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.service_discovery.program.trim().is_empty() {
            return Err(DispatchError::Config("service-discovery.program is empty".to_string()));
        }
        if self.analysis.program.trim().is_empty() {
            return Err(DispatchError::Config("analysis.program is empty".to_string()));
        }
        if self.analysis.script.as_os_str().is_empty() {
            return Err(DispatchError::Config("analysis.script is empty".to_string()));
        }
        Ok(())
    }
}

/// Service-discovery engine: program plus the runtime flags placed before
/// the SMD parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDiscoveryConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ServiceDiscoveryConfig {
    fn default() -> Self {
        Self {
            program: "java".to_string(),
            args: vec![
                "-cp".to_string(),
                "lib/*".to_string(),
                "org.processmining.servicediscovery.Main".to_string(),
            ],
        }
    }
}

/// Analysis-engine CLI and the script it runs in ILP mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalysisConfig {
    pub program: String,
    pub args: Vec<String>,
    pub script_flag: String,
    pub script: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            program: "java".to_string(),
            args: vec![
                "-cp".to_string(),
                "lib/*".to_string(),
                "org.processmining.contexts.cli.CLI".to_string(),
            ],
            script_flag: "-f".to_string(),
            script: PathBuf::from("Scripts").join("ILP.txt"),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
