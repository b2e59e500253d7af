use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name looked for when `--data-path` is not given.
pub const DEFAULT_DATA_FILE: &str = "vehicles_us.csv";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the `~/.pickup-explorer/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.pickup-explorer/`
/// - `~/.pickup-explorer/logs/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let app_dir = home.join(".pickup-explorer");
    std::fs::create_dir_all(&app_dir)?;
    std::fs::create_dir_all(app_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map Python-style level names to an `EnvFilter` directive.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Falls back to `"info"` if the level string is not recognised. With
/// `log_file` set, output is appended to that file without ANSI colours so it
/// never lands on the terminal the TUI is drawing to; otherwise it goes to
/// stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let (stderr_layer, file_layer) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr);
            (Some(layer), None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate the listings CSV relative to the working directory.
///
/// See [`discover_data_path_in`].
pub fn discover_data_path(explicit: Option<&Path>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    discover_data_path_in(&cwd, explicit)
}

/// Resolve the listings CSV.
///
/// An explicit path is returned as given, whether or not it exists, so that
/// loading reports it by name. Otherwise the following are checked in order
/// and the first that exists is returned:
/// 1. `<base>/vehicles_us.csv`
/// 2. `<base>/data/vehicles_us.csv`
pub fn discover_data_path_in(base: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidates = [
        base.join(DEFAULT_DATA_FILE),
        base.join("data").join(DEFAULT_DATA_FILE),
    ];
    candidates.into_iter().find(|p| p.is_file())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::settings::{LastUsedParams, Settings};
    use tempfile::TempDir;

    // ── test_ensure_directories ───────────────────────────────────────────────

    #[test]
    fn test_ensure_directories() {
        let tmp = TempDir::new().expect("tempdir");

        // Override HOME so that dirs::home_dir() resolves to our temp dir.
        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", tmp.path());

        let result = ensure_directories();

        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }

        result.expect("ensure_directories should succeed");

        let app_dir = tmp.path().join(".pickup-explorer");
        assert!(app_dir.is_dir(), ".pickup-explorer dir must exist");
        assert!(app_dir.join("logs").is_dir(), "logs subdir must exist");
    }

    // ── level_directive ───────────────────────────────────────────────────────

    #[test]
    fn test_level_directive_maps_python_names() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("Trace"), "trace");
    }

    // ── discover_data_path_in ─────────────────────────────────────────────────

    #[test]
    fn test_discover_returns_none_when_absent() {
        let tmp = TempDir::new().expect("tempdir");
        assert_eq!(discover_data_path_in(tmp.path(), None), None);
    }

    #[test]
    fn test_discover_prefers_working_directory() {
        let tmp = TempDir::new().expect("tempdir");
        let top = tmp.path().join(DEFAULT_DATA_FILE);
        std::fs::create_dir_all(tmp.path().join("data")).unwrap();
        std::fs::write(&top, "price\n").unwrap();
        std::fs::write(tmp.path().join("data").join(DEFAULT_DATA_FILE), "price\n").unwrap();

        assert_eq!(discover_data_path_in(tmp.path(), None), Some(top));
    }

    #[test]
    fn test_discover_falls_back_to_data_dir() {
        let tmp = TempDir::new().expect("tempdir");
        let nested = tmp.path().join("data").join(DEFAULT_DATA_FILE);
        std::fs::create_dir_all(nested.parent().unwrap()).unwrap();
        std::fs::write(&nested, "price\n").unwrap();

        assert_eq!(discover_data_path_in(tmp.path(), None), Some(nested));
    }

    #[test]
    fn test_discover_explicit_path_wins() {
        let tmp = TempDir::new().expect("tempdir");
        std::fs::write(tmp.path().join(DEFAULT_DATA_FILE), "price\n").unwrap();
        let explicit = tmp.path().join("elsewhere.csv");

        assert_eq!(
            discover_data_path_in(tmp.path(), Some(&explicit)),
            Some(explicit.clone())
        );
    }

    #[test]
    fn test_discover_ignores_previous_runs_data_path() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = LastUsedParams::config_path_in(tmp.path());
        let cwd = tmp.path().join("work");
        std::fs::create_dir_all(&cwd).unwrap();
        let local = cwd.join(DEFAULT_DATA_FILE);
        std::fs::write(&local, "price\n").unwrap();

        Settings::load_with_last_used_impl(
            vec![
                "pickup-explorer".into(),
                "--data-path".into(),
                "old/listings.csv".into(),
            ],
            &config_path,
        );
        let settings =
            Settings::load_with_last_used_impl(vec!["pickup-explorer".into()], &config_path);

        assert_eq!(
            discover_data_path_in(&cwd, settings.data_path.as_deref()),
            Some(local)
        );
    }
}
