//! Default path resolution for configuration files
//!
//! Follows the XDG base directory layout when available, with fallbacks.

use std::path::PathBuf;

/// Environment variable overriding the platform configuration path
pub const CONFIG_ENV_VAR: &str = "SWHAL_CONFIG";

/// Returns the default path for the platform configuration file.
///
/// Uses XDG config directory if available:
/// - Linux: `~/.config/swhal/platform.toml`
/// - Fallback: `/etc/swhal/platform.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("swhal")
        .join("platform.toml")
}

/// Pick the configuration path: explicit flag > environment > default
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        std::env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_is_toml() {
        let path = default_config_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
        assert!(path.ends_with("swhal/platform.toml"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_config_path(Some(PathBuf::from("/tmp/custom.toml")));
        assert_eq!(path, PathBuf::from("/tmp/custom.toml"));
    }
}
