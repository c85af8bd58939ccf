//! Invocation model
//!
//! A [`Request`] is resolved into a [`ResolvedConfig`] (pure function of mode
//! and positional arguments), which is then materialized against the engine
//! configuration into an [`ExternalInvocation`].

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use crate::config::EngineConfig;
use crate::error::{DispatchError, Result};
use crate::mode::Mode;

/// Service-discovery algorithm identifier
pub const SPLIT_ALGORITHM: &str = "SMD";
/// Sensitivity passed to the service-discovery engine
pub const SPLIT_SENSITIVITY: &str = "0.1";
/// Threshold passed to the service-discovery engine
pub const SPLIT_THRESHOLD: &str = "0.0";
/// Boolean mode flag passed to the service-discovery engine
pub const SPLIT_FLAG: &str = "false";

/// Environment variable holding the log to import (ILP)
pub const ENV_IMPORT_LOG: &str = "IMPORTLOG";
/// Environment variable holding the model to export (ILP)
pub const ENV_EXPORT_MODEL: &str = "EXPORTMODEL";
/// Suffix appended verbatim to the export model base name
pub const PNML_SUFFIX: &str = ".pnml";

/// Raw input for one run: the mode token and everything after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub token: String,
    pub args: Vec<String>,
}

impl Request {
    pub fn new(token: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            token: token.into(),
            args,
        }
    }
}

/// Per-mode configuration derived from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedConfig {
    Split { first: String, second: String },
    Ilp { import_log: String, export_model: String },
}

impl ResolvedConfig {
    /// Resolve the mode-specific configuration from positional arguments.
    ///
    /// Both modes need two arguments; anything beyond that is ignored.
    pub fn resolve(mode: Mode, args: &[String]) -> Result<Self> {
        let names = mode.required_args();
        if let Some((position, name)) = names.iter().enumerate().nth(args.len()) {
            return Err(DispatchError::MissingArgument {
                mode: mode.to_string(),
                name: *name,
                position: position + 1,
            });
        }
        if args.len() > names.len() {
            log::warn!(
                "{}: ignoring {} extra argument(s): {:?}",
                mode,
                args.len() - names.len(),
                &args[names.len()..]
            );
        }

        let first = args[0].clone();
        let second = args[1].clone();
        Ok(match mode {
            Mode::Split => ResolvedConfig::Split { first, second },
            Mode::Ilp => ResolvedConfig::Ilp {
                import_log: first,
                export_model: format!("{}{}", second, PNML_SUFFIX),
            },
        })
    }

    pub fn mode(&self) -> Mode {
        match self {
            ResolvedConfig::Split { .. } => Mode::Split,
            ResolvedConfig::Ilp { .. } => Mode::Ilp,
        }
    }

    /// Mode arguments handed to the engine after its runtime flags
    pub fn params(&self, engine: &EngineConfig) -> Vec<String> {
        match self {
            ResolvedConfig::Split { first, second } => vec![
                SPLIT_ALGORITHM.to_string(),
                SPLIT_SENSITIVITY.to_string(),
                SPLIT_THRESHOLD.to_string(),
                SPLIT_FLAG.to_string(),
                first.clone(),
                second.clone(),
            ],
            ResolvedConfig::Ilp { .. } => vec![
                engine.analysis.script_flag.clone(),
                engine.analysis.script.to_string_lossy().into_owned(),
            ],
        }
    }

    /// Environment bindings for the child process
    pub fn env(&self) -> Vec<(String, String)> {
        match self {
            ResolvedConfig::Split { .. } => Vec::new(),
            ResolvedConfig::Ilp {
                import_log,
                export_model,
            } => vec![
                (ENV_IMPORT_LOG.to_string(), import_log.clone()),
                (ENV_EXPORT_MODEL.to_string(), export_model.clone()),
            ],
        }
    }

    /// Materialize the full command for the configured engine
    pub fn to_invocation(&self, engine: &EngineConfig) -> ExternalInvocation {
        let (program, runtime_args) = match self {
            ResolvedConfig::Split { .. } => (&engine.service_discovery.program, &engine.service_discovery.args),
            ResolvedConfig::Ilp { .. } => (&engine.analysis.program, &engine.analysis.args),
        };

        let mut args = runtime_args.clone();
        args.extend(self.params(engine));

        ExternalInvocation {
            mode: self.mode(),
            program: program.clone(),
            args,
            env: self.env(),
            working_dir: engine.working_dir.clone(),
        }
    }
}

/// Fully materialized command: built once, launched once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalInvocation {
    pub mode: Mode,
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl ExternalInvocation {
    /// Look up an environment binding by name
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Quote a word for display so it reads back as a single shell word
fn shell_quote(word: &str) -> Cow<'_, str> {
    let plain = |c: char| c.is_ascii_alphanumeric() || "_-./:=@%+,".contains(c);
    if !word.is_empty() && word.chars().all(plain) {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(format!("'{}'", word.replace('\'', r"'\''")))
    }
}

impl fmt::Display for ExternalInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(dir) = &self.working_dir {
            write!(f, "(cd {}) ", shell_quote(&dir.to_string_lossy()))?;
        }
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, shell_quote(value))?;
        }
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_params_exact() {
        let resolved = ResolvedConfig::resolve(Mode::Split, &args(&["foo", "bar"])).unwrap();
        assert_eq!(
            resolved.params(&EngineConfig::default()),
            vec!["SMD", "0.1", "0.0", "false", "foo", "bar"]
        );
        assert!(resolved.env().is_empty());
    }

    #[test]
    fn test_ilp_env_exact() {
        let resolved = ResolvedConfig::resolve(Mode::Ilp, &args(&["input.xes", "model"])).unwrap();
        assert_eq!(
            resolved,
            ResolvedConfig::Ilp {
                import_log: "input.xes".to_string(),
                export_model: "model.pnml".to_string(),
            }
        );
        assert_eq!(
            resolved.env(),
            vec![
                ("IMPORTLOG".to_string(), "input.xes".to_string()),
                ("EXPORTMODEL".to_string(), "model.pnml".to_string()),
            ]
        );
    }

    #[test]
    fn test_pnml_suffix_is_literal() {
        let resolved = ResolvedConfig::resolve(Mode::Ilp, &args(&["log", "out/model.pnml"])).unwrap();
        let inv = resolved.to_invocation(&EngineConfig::default());
        assert_eq!(inv.env_var(ENV_EXPORT_MODEL), Some("out/model.pnml.pnml"));

        let resolved = ResolvedConfig::resolve(Mode::Ilp, &args(&["log", "dir/"])).unwrap();
        let inv = resolved.to_invocation(&EngineConfig::default());
        assert_eq!(inv.env_var(ENV_EXPORT_MODEL), Some("dir/.pnml"));
    }

    #[test]
    fn test_empty_strings_pass_through() {
        let resolved = ResolvedConfig::resolve(Mode::Ilp, &args(&["", ""])).unwrap();
        let inv = resolved.to_invocation(&EngineConfig::default());
        assert_eq!(inv.env_var(ENV_IMPORT_LOG), Some(""));
        assert_eq!(inv.env_var(ENV_EXPORT_MODEL), Some(".pnml"));
    }

    #[test]
    fn test_missing_both_arguments() {
        let err = ResolvedConfig::resolve(Mode::Split, &[]).unwrap_err();
        match err {
            DispatchError::MissingArgument { mode, name, position } => {
                assert_eq!(mode, "SPLIT");
                assert_eq!(name, "first");
                assert_eq!(position, 1);
            }
            other => panic!("Expected MissingArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_second_argument() {
        let err = ResolvedConfig::resolve(Mode::Ilp, &args(&["input.xes"])).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::MissingArgument {
                name: "export-model",
                position: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_extra_arguments_ignored() {
        let resolved = ResolvedConfig::resolve(Mode::Split, &args(&["a", "b", "c"])).unwrap();
        assert_eq!(
            resolved,
            ResolvedConfig::Split {
                first: "a".to_string(),
                second: "b".to_string(),
            }
        );
    }

    #[test]
    fn test_split_invocation_uses_service_discovery_engine() {
        let engine = EngineConfig::default();
        let inv = ResolvedConfig::resolve(Mode::Split, &args(&["foo", "bar"]))
            .unwrap()
            .to_invocation(&engine);

        assert_eq!(inv.mode, Mode::Split);
        assert_eq!(inv.program, engine.service_discovery.program);
        let n = engine.service_discovery.args.len();
        assert_eq!(&inv.args[..n], engine.service_discovery.args.as_slice());
        assert_eq!(&inv.args[n..], &["SMD", "0.1", "0.0", "false", "foo", "bar"]);
        assert!(inv.env.is_empty());
    }

    #[test]
    fn test_ilp_invocation_uses_script() {
        let engine = EngineConfig::default();
        let inv = ResolvedConfig::resolve(Mode::Ilp, &args(&["input.xes", "model"]))
            .unwrap()
            .to_invocation(&engine);

        assert_eq!(inv.mode, Mode::Ilp);
        assert_eq!(inv.program, engine.analysis.program);
        assert_eq!(&inv.args[inv.args.len() - 2..], &["-f", "Scripts/ILP.txt"]);
        assert_eq!(inv.env_var(ENV_IMPORT_LOG), Some("input.xes"));
        assert_eq!(inv.env_var(ENV_EXPORT_MODEL), Some("model.pnml"));
    }

    #[test]
    fn test_display() {
        let engine = EngineConfig {
            analysis: crate::config::AnalysisConfig {
                program: "prom".to_string(),
                args: Vec::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        let inv = ResolvedConfig::resolve(Mode::Ilp, &args(&["in.xes", "m"]))
            .unwrap()
            .to_invocation(&engine);
        assert_eq!(inv.to_string(), "IMPORTLOG=in.xes EXPORTMODEL=m.pnml prom -f Scripts/ILP.txt");
    }

    #[test]
    fn test_display_quotes_words_with_spaces() {
        let engine = EngineConfig {
            service_discovery: crate::config::ServiceDiscoveryConfig {
                program: "sd".to_string(),
                args: vec!["-cp".to_string(), "lib/*".to_string()],
            },
            ..Default::default()
        };
        let inv = ResolvedConfig::resolve(Mode::Split, &args(&["foo", "bar baz"]))
            .unwrap()
            .to_invocation(&engine);
        assert_eq!(inv.to_string(), "sd -cp 'lib/*' SMD 0.1 0.0 false foo 'bar baz'");
    }

    #[test]
    fn test_display_quotes_env_values() {
        let engine = EngineConfig {
            working_dir: Some(PathBuf::from("/opt/my prom")),
            analysis: crate::config::AnalysisConfig {
                program: "prom".to_string(),
                args: Vec::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        let inv = ResolvedConfig::resolve(Mode::Ilp, &args(&["it's.xes", ""]))
            .unwrap()
            .to_invocation(&engine);
        assert_eq!(
            inv.to_string(),
            r"(cd '/opt/my prom') IMPORTLOG='it'\''s.xes' EXPORTMODEL=.pnml prom -f Scripts/ILP.txt"
        );
    }

    #[test]
    fn test_shell_quote_empty() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("a;b"), "'a;b'");
        assert_eq!(shell_quote("plain-word_1.txt"), "plain-word_1.txt");
    }

    #[test]
    fn test_serialize_json() {
        let resolved = ResolvedConfig::resolve(Mode::Split, &args(&["a", "b"])).unwrap();
        let inv = resolved.to_invocation(&EngineConfig::default());
        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(json["program"], "java");
        assert!(json.get("working_dir").is_none());
    }
}
