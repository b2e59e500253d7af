use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::{GapPolicy, MatchMode};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Explore used pickup-truck prices and listing times by make
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pickup-explorer",
    about = "Explore used pickup-truck prices and listing times by make",
    version
)]
pub struct Settings {
    /// Listings CSV (defaults to ./vehicles_us.csv or ./data/vehicles_us.csv)
    #[arg(long)]
    pub data_path: Option<PathBuf>,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "summary"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Price cutoff toggled on the major-makes chart
    #[arg(long, default_value = "100000", value_parser = clap::value_parser!(i64).range(1..))]
    pub price_cutoff: i64,

    /// Fixed price cutoff of the minor-makes chart
    #[arg(long, default_value = "60000", value_parser = clap::value_parser!(i64).range(1..))]
    pub minor_price_cutoff: i64,

    /// Number of histogram bins (5-200)
    #[arg(long, default_value = "40", value_parser = clap::value_parser!(u32).range(5..=200))]
    pub histogram_bins: u32,

    /// How model names are matched against the pickup catalog
    #[arg(long, default_value = "substring", value_parser = ["substring", "token"])]
    pub match_mode: String,

    /// What to do when a missing value has no peers to impute from
    #[arg(long, default_value = "fail", value_parser = ["fail", "drop"])]
    pub on_imputation_gap: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (logs go to stderr when unset)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.pickup-explorer/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_cutoff: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor_price_cutoff: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram_bins: Option<u32>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".pickup-explorer").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins; remembered values only fill what was not typed.
        // clap stores arg ids by field name (underscores).
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "price_cutoff") {
            if let Some(v) = last.price_cutoff {
                settings.price_cutoff = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "minor_price_cutoff") {
            if let Some(v) = last.minor_price_cutoff {
                settings.minor_price_cutoff = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "histogram_bins") {
            if let Some(v) = last.histogram_bins {
                settings.histogram_bins = v;
            }
        }

        settings = Self::apply_debug(settings);

        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Parsed `--match-mode`; clap already restricts the spelling.
    pub fn match_mode(&self) -> MatchMode {
        self.match_mode.parse().unwrap_or_default()
    }

    /// Parsed `--on-imputation-gap`.
    pub fn gap_policy(&self) -> GapPolicy {
        self.on_imputation_gap.parse().unwrap_or_default()
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            view: Some(s.view.clone()),
            theme: Some(s.theme.clone()),
            price_cutoff: Some(s.price_cutoff),
            minor_price_cutoff: Some(s.minor_price_cutoff),
            histogram_bins: Some(s.histogram_bins),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            view: Some("summary".to_string()),
            theme: Some("dark".to_string()),
            price_cutoff: Some(80_000),
            minor_price_cutoff: Some(45_000),
            histogram_bins: Some(25),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.view, Some("summary".to_string()));
        assert_eq!(loaded.theme, Some("dark".to_string()));
        assert_eq!(loaded.price_cutoff, Some(80_000));
        assert_eq!(loaded.minor_price_cutoff, Some(45_000));
        assert_eq!(loaded.histogram_bins, Some(25));
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        };
        params.save_to(&path).expect("save");
        assert!(path.exists(), "file must exist after save");

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists(), "file must be gone after clear");
    }

    #[test]
    fn test_last_used_params_default_when_missing_or_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        assert!(LastUsedParams::load_from(&path).theme.is_none());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        let loaded = LastUsedParams::load_from(&path);
        assert!(loaded.view.is_none());
        assert!(loaded.histogram_bins.is_none());
    }

    // ── Settings parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["pickup-explorer"]);

        assert!(settings.data_path.is_none());
        assert_eq!(settings.view, "dashboard");
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.price_cutoff, 100_000);
        assert_eq!(settings.minor_price_cutoff, 60_000);
        assert_eq!(settings.histogram_bins, 40);
        assert_eq!(settings.match_mode(), MatchMode::Substring);
        assert_eq!(settings.gap_policy(), GapPolicy::Fail);
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_cli_options() {
        let settings = Settings::parse_from([
            "pickup-explorer",
            "--data-path",
            "listings.csv",
            "--match-mode",
            "token",
            "--on-imputation-gap",
            "drop",
            "--histogram-bins",
            "12",
        ]);
        assert_eq!(settings.data_path, Some(PathBuf::from("listings.csv")));
        assert_eq!(settings.match_mode(), MatchMode::Token);
        assert_eq!(settings.gap_policy(), GapPolicy::Drop);
        assert_eq!(settings.histogram_bins, 12);
    }

    #[test]
    fn test_settings_rejects_out_of_range_bins() {
        let result = Settings::try_parse_from(["pickup-explorer", "--histogram-bins", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_rejects_unknown_view() {
        let result = Settings::try_parse_from(["pickup-explorer", "--view", "realtime"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_settings_to_last_used() {
        let settings = Settings::parse_from([
            "pickup-explorer",
            "--view",
            "summary",
            "--theme",
            "classic",
            "--price-cutoff",
            "75000",
        ]);
        let last = LastUsedParams::from(&settings);

        assert_eq!(last.view, Some("summary".to_string()));
        assert_eq!(last.theme, Some("classic".to_string()));
        assert_eq!(last.price_cutoff, Some(75_000));
        assert_eq!(last.histogram_bins, Some(40));
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            view: Some("summary".to_string()),
            price_cutoff: Some(90_000),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["pickup-explorer".into()], &config_path);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.view, "summary");
        assert_eq!(settings.price_cutoff, 90_000);
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            histogram_bins: Some(10),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec![
                "pickup-explorer".into(),
                "--theme".into(),
                "light".into(),
                "--histogram-bins".into(),
                "60".into(),
            ],
            &config_path,
        );
        assert_eq!(settings.theme, "light");
        assert_eq!(settings.histogram_bins, 60);
    }

    #[test]
    fn test_load_with_last_used_does_not_remember_data_path() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let first = Settings::load_with_last_used_impl(
            vec![
                "pickup-explorer".into(),
                "--data-path".into(),
                "old/listings.csv".into(),
            ],
            &config_path,
        );
        assert_eq!(first.data_path, Some(PathBuf::from("old/listings.csv")));
        let saved = std::fs::read_to_string(&config_path).expect("saved params");
        assert!(!saved.contains("listings.csv"), "saved: {saved}");

        let second =
            Settings::load_with_last_used_impl(vec!["pickup-explorer".into()], &config_path);
        assert!(second.data_path.is_none());
    }

    #[test]
    fn test_load_with_last_used_ignores_stale_data_path_entry() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        std::fs::write(
            &config_path,
            r#"{"data_path": "old/listings.csv", "theme": "light"}"#,
        )
        .unwrap();

        let settings =
            Settings::load_with_last_used_impl(vec!["pickup-explorer".into()], &config_path);
        assert!(settings.data_path.is_none());
        assert_eq!(settings.theme, "light");
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        };
        params.save_to(&config_path).expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["pickup-explorer".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
        assert_eq!(settings.theme, "auto");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["pickup-explorer".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec![
                "pickup-explorer".into(),
                "--view".into(),
                "summary".into(),
            ],
            &config_path,
        );

        assert!(config_path.exists(), "config file must be persisted after run");
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.view, Some("summary".to_string()));
    }
}
