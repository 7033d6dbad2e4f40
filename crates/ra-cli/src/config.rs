//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use ra_core::RunConfig;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Settings for allocation runs.
    #[serde(default)]
    pub allocation: RunConfig,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources override earlier ones: built-in defaults, the user
    /// config file, `config_path`, then `RA_*` environment variables with
    /// `__` separating nested keys (`RA_ALLOCATION__PERIOD_WEIGHTING=strict`).
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("RA_").split("__"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for ra.
///
/// On Linux: `~/.config/ra`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ra"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ra_core::PeriodWeighting;

    #[test]
    fn test_dirs_config_path_ends_with_ra() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "ra");
    }

    #[test]
    fn test_default_config_uses_default_run_config() {
        assert_eq!(Config::default().allocation, RunConfig::default());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ra.toml");
        std::fs::write(
            &path,
            r#"
[allocation]
slot_granularity_minutes = 60
period_weighting = "dominant"
operating_hours = "07:00-21:00"
days = ["Mon", "Wed", "Fri"]
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.allocation.slot_granularity_minutes, 60);
        assert_eq!(
            config.allocation.period_weighting,
            PeriodWeighting::Dominant
        );
        assert_eq!(config.allocation.operating_hours.to_string(), "07:00-21:00");
        assert_eq!(config.allocation.days.len(), 3);
    }

    #[test]
    fn test_missing_config_file_is_ignored() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(Some(&temp.path().join("absent.toml"))).unwrap();
        assert_eq!(config.allocation.slot_granularity_minutes, 120);
    }
}
