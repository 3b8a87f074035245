//! Configuration loading and management.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use mc_core::{DEFAULT_SUMMARY_FILENAME, RateOverrides, RoleCounts};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Hourly rate overrides keyed by role id.
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,

    /// Attendees present when a session starts, keyed by role id.
    #[serde(default)]
    pub attendees: BTreeMap<String, u32>,

    /// Where `export` writes the summary when no path is given.
    pub summary_path: PathBuf,

    /// Wall-clock milliseconds between ticks of a live session.
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rates: BTreeMap::new(),
            attendees: BTreeMap::new(),
            summary_path: PathBuf::from(DEFAULT_SUMMARY_FILENAME),
            tick_interval_ms: 1000,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (MCT_*, nested keys split on "__")
        figment = figment.merge(Env::prefixed("MCT_").split("__"));

        figment.extract()
    }

    /// Configured attendees as session counts.
    pub fn role_counts(&self) -> RoleCounts {
        self.attendees
            .iter()
            .map(|(role_id, &count)| (role_id.clone(), count))
            .collect()
    }

    /// Configured rates as session overrides, clamped to zero.
    pub fn rate_overrides(&self) -> RateOverrides {
        self.rates
            .iter()
            .map(|(role_id, &rate)| (role_id.clone(), rate))
            .collect()
    }
}

/// Returns the platform-specific config directory for mct.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("mct"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_mct() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "mct");
    }

    #[test]
    fn test_default_config_exports_to_working_directory() {
        let config = Config::default();
        assert_eq!(config.summary_path, PathBuf::from("meeting-summary.json"));
        assert_eq!(config.tick_interval_ms, 1000);
        assert!(config.rates.is_empty());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("mct.toml");
        std::fs::write(
            &path,
            r#"
summary_path = "out/summary.json"
tick_interval_ms = 250

[rates]
senior_leader = 300.0
individual_contributor = -5.0

[attendees]
leader_manager = 2
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();

        assert_eq!(config.summary_path, PathBuf::from("out/summary.json"));
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.role_counts().get("leader_manager"), 2);

        let overrides = config.rate_overrides();
        assert_eq!(overrides.get("senior_leader"), Some(300.0));
        assert_eq!(overrides.get("individual_contributor"), Some(0.0));
    }
}
