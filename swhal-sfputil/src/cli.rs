//! Access to the ceos command line
//!
//! Also home of the predicate deciding whether ceos owns the transceivers.

use std::path::Path;
use std::process::Command;

use swhal_core::{CeosConfig, HalError, Result};
use tracing::{debug, warn};

/// Environment variable forcing the ceos decision (`1`/`true`/`yes` or `0`/`false`/`no`)
pub const CEOS_ENV_VAR: &str = "SWHAL_CEOS_MANAGES_XCVRS";

/// Runs one CLI command and returns its standard output
pub trait CliRunner {
    fn run(&self, command: &str) -> Result<String>;
}

/// Runs commands through the EOS `Cli` binary
///
/// The command is appended as the last argument: `Cli -p 15 -c <command>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EosCli {
    program: String,
    args: Vec<String>,
}

impl EosCli {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &CeosConfig) -> Self {
        Self::new(config.cli_program.clone(), config.cli_args.clone())
    }
}

impl Default for EosCli {
    fn default() -> Self {
        Self::from_config(&CeosConfig::default())
    }
}

impl CliRunner for EosCli {
    fn run(&self, command: &str) -> Result<String> {
        debug!("Running {} {:?} '{}'", self.program, self.args, command);

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(command)
            .output()
            .map_err(|e| HalError::Cli(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(HalError::Cli(format!(
                "'{}' failed ({}): {}",
                command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| HalError::Cli(format!("'{}' returned invalid UTF-8: {}", command, e)))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn manages_xcvrs(env_value: Option<&str>, marker_path: &Path) -> bool {
    if let Some(value) = env_value {
        match parse_flag(value) {
            Some(flag) => return flag,
            None => warn!("Ignoring {}={:?}, expected a boolean", CEOS_ENV_VAR, value),
        }
    }
    marker_path.exists()
}

/// Whether ceos manages the transceivers of this system
///
/// [`CEOS_ENV_VAR`] takes precedence; otherwise the configured marker file
/// decides. Nothing is cached.
pub fn ceos_manages_xcvrs(config: &CeosConfig) -> bool {
    let env_value = std::env::var(CEOS_ENV_VAR).ok();
    manages_xcvrs(env_value.as_deref(), &config.marker_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag(" false\n"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_marker_file_decides_without_env() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ceos_manages_xcvrs");

        assert!(!manages_xcvrs(None, &marker));
        std::fs::write(&marker, "").unwrap();
        assert!(manages_xcvrs(None, &marker));
    }

    #[test]
    fn test_env_overrides_marker() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ceos_manages_xcvrs");

        assert!(manages_xcvrs(Some("yes"), &marker));
        std::fs::write(&marker, "").unwrap();
        assert!(!manages_xcvrs(Some("0"), &marker));
        assert!(manages_xcvrs(Some("garbage"), &marker));
    }

    #[test]
    #[serial]
    fn test_ceos_manages_xcvrs_reads_env() {
        let dir = tempfile::tempdir().unwrap();
        let config = CeosConfig {
            marker_path: dir.path().join("missing"),
            ..CeosConfig::default()
        };

        std::env::set_var(CEOS_ENV_VAR, "true");
        assert!(ceos_manages_xcvrs(&config));
        std::env::remove_var(CEOS_ENV_VAR);
        assert!(!ceos_manages_xcvrs(&config));
    }

    #[test]
    fn test_eos_cli_default_command_line() {
        let cli = EosCli::default();
        assert_eq!(cli.program, "Cli");
        assert_eq!(cli.args, vec!["-p", "15", "-c"]);
    }

    #[test]
    fn test_eos_cli_runs_program() {
        let cli = EosCli::new("echo", vec!["-n".to_string()]);
        assert_eq!(cli.run("show version").unwrap(), "show version");
    }

    #[test]
    fn test_eos_cli_failure_is_cli_error() {
        let cli = EosCli::new("false", Vec::new());
        assert!(matches!(cli.run("show version"), Err(HalError::Cli(_))));

        let cli = EosCli::new("/nonexistent/Cli", Vec::new());
        assert!(matches!(cli.run("show version"), Err(HalError::Cli(_))));
    }
}
