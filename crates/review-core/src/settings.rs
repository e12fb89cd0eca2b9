use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use serde::{Deserialize, Serialize};

use crate::time_utils::parse_user_date;

/// Review trend dashboard for dated e-commerce review exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "review-monitor",
    about = "Review trend dashboard for dated e-commerce review exports",
    version
)]
pub struct Settings {
    /// CSV exports or directories containing them (file names must embed YYYYMMDD)
    pub paths: Vec<PathBuf>,

    /// First day of the selected range (YYYY-MM-DD, defaults to earliest data)
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,

    /// Last day of the selected range (YYYY-MM-DD, defaults to latest data)
    #[arg(long, value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,

    /// Only show products whose id contains this text (case-sensitive)
    #[arg(long, default_value = "")]
    pub product: String,

    /// Only list reviews written by top reviewers
    #[arg(long)]
    pub top_only: bool,

    /// Drill down into the reviews created on a single day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    /// Output mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "json"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_user_date(s).map_err(|e| e.to_string())
}

// ── Preferences ────────────────────────────────────────────────────────────────

/// Choices remembered between runs: theme, output mode and input paths.
///
/// Filter arguments are per-invocation and never stored.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathBuf>,
}

impl Preferences {
    /// Snapshot the rememberable part of resolved settings.
    pub fn capture(settings: &Settings) -> Self {
        Self {
            theme: Some(settings.theme.clone()),
            view: Some(settings.view.clone()),
            paths: settings.paths.clone(),
        }
    }

    /// Fill values the user did not type on this run.
    pub fn merge_into(self, settings: &mut Settings, matches: &ArgMatches) {
        if let Some(theme) = self.theme.filter(|_| !given_on_cli(matches, "theme")) {
            settings.theme = theme;
        }
        if let Some(view) = self.view.filter(|_| !given_on_cli(matches, "view")) {
            settings.view = view;
        }
        if settings.paths.is_empty() {
            settings.paths = self.paths;
        }
    }
}

fn given_on_cli(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// JSON file holding [`Preferences`], by default
/// `~/.review-monitor/last_used.json`.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl Default for PreferenceStore {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::under(&home)
    }
}

impl PreferenceStore {
    pub fn under(base_dir: &Path) -> Self {
        Self {
            path: base_dir.join(".review-monitor").join("last_used.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files read as empty preferences.
    pub fn read(&self) -> Preferences {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::debug!("Ignoring unreadable {}: {}", self.path.display(), e);
                Preferences::default()
            }),
            Err(_) => Preferences::default(),
        }
    }

    /// Write through a sibling temp file and rename over the target.
    pub fn write(&self, prefs: &Preferences) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let body = serde_json::to_vec_pretty(prefs).map_err(io::Error::other)?;
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, body)?;
        std::fs::rename(&staging, &self.path)
    }

    pub fn remove(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

// ── Resolution ─────────────────────────────────────────────────────────────────

impl Settings {
    /// Settings for this process: command line first, then remembered
    /// preferences. The outcome is remembered for the next run.
    pub fn resolve() -> Self {
        Self::resolve_with(std::env::args_os(), &PreferenceStore::default())
    }

    pub fn resolve_with<I, T>(args: I, store: &PreferenceStore) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Settings::command().get_matches_from(args);
        let mut settings = match Settings::from_arg_matches(&matches) {
            Ok(s) => s,
            Err(e) => e.exit(),
        };

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        if settings.clear {
            if let Err(e) = store.remove() {
                tracing::warn!("Could not clear {}: {}", store.path().display(), e);
            }
            return settings;
        }

        store.read().merge_into(&mut settings, &matches);
        if let Err(e) = store.write(&Preferences::capture(&settings)) {
            tracing::debug!("Preferences not saved: {}", e);
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir) -> PreferenceStore {
        PreferenceStore::under(tmp.path())
    }

    fn run(args: &[&str], store: &PreferenceStore) -> Settings {
        let argv = std::iter::once("review-monitor").chain(args.iter().copied());
        Settings::resolve_with(argv, store)
    }

    // ── Argument parsing ──

    #[test]
    fn test_defaults() {
        let settings = Settings::parse_from(["review-monitor"]);
        assert!(settings.paths.is_empty());
        assert!(settings.from.is_none());
        assert!(settings.to.is_none());
        assert_eq!(settings.product, "");
        assert!(!settings.top_only);
        assert!(settings.date.is_none());
        assert_eq!(settings.view, "dashboard");
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug && !settings.clear);
    }

    #[test]
    fn test_filter_arguments() {
        let settings = Settings::parse_from([
            "review-monitor",
            "a/20240101_reviews.csv",
            "b",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
            "--product",
            "P1",
            "--top-only",
            "--date",
            "2024-01-03",
        ]);
        assert_eq!(settings.paths.len(), 2);
        assert_eq!(settings.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(settings.to, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(settings.product, "P1");
        assert!(settings.top_only);
        assert_eq!(settings.date, NaiveDate::from_ymd_opt(2024, 1, 3));
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        assert!(Settings::try_parse_from(["review-monitor", "--from", "01/02/2024"]).is_err());
        assert!(Settings::try_parse_from(["review-monitor", "--date", "2024-02-30"]).is_err());
    }

    // ── Preference store ──

    #[test]
    fn test_store_write_then_read() {
        let tmp = TempDir::new().expect("tempdir");
        let store = store_in(&tmp);
        let prefs = Preferences {
            theme: Some("dark".to_string()),
            view: Some("json".to_string()),
            paths: vec![PathBuf::from("/exports")],
        };
        store.write(&prefs).expect("write");
        assert_eq!(store.read(), prefs);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_store_tolerates_missing_and_garbage() {
        let tmp = TempDir::new().expect("tempdir");
        let store = store_in(&tmp);
        assert_eq!(store.read(), Preferences::default());
        store.remove().expect("removing a missing file is fine");

        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.read(), Preferences::default());
    }

    #[test]
    fn test_capture_keeps_only_remembered_fields() {
        let settings = Settings::parse_from([
            "review-monitor",
            "/exports",
            "--theme",
            "classic",
            "--product",
            "P1",
        ]);
        let prefs = Preferences::capture(&settings);
        assert_eq!(prefs.theme.as_deref(), Some("classic"));
        assert_eq!(prefs.view.as_deref(), Some("dashboard"));
        assert_eq!(prefs.paths, vec![PathBuf::from("/exports")]);
        let json = serde_json::to_string(&prefs).unwrap();
        assert!(!json.contains("P1"));
    }

    // ── Resolution ──

    #[test]
    fn test_remembered_values_fill_gaps() {
        let tmp = TempDir::new().expect("tempdir");
        let store = store_in(&tmp);
        store
            .write(&Preferences {
                theme: Some("dark".to_string()),
                view: Some("json".to_string()),
                paths: vec![PathBuf::from("/exports")],
            })
            .expect("write");

        let settings = run(&[], &store);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.view, "json");
        assert_eq!(settings.paths, vec![PathBuf::from("/exports")]);
    }

    #[test]
    fn test_command_line_beats_remembered() {
        let tmp = TempDir::new().expect("tempdir");
        let store = store_in(&tmp);
        store
            .write(&Preferences {
                theme: Some("dark".to_string()),
                paths: vec![PathBuf::from("/old")],
                ..Default::default()
            })
            .expect("write");

        let settings = run(&["/new", "--theme", "light"], &store);
        assert_eq!(settings.theme, "light");
        assert_eq!(settings.paths, vec![PathBuf::from("/new")]);
        assert_eq!(store.read().paths, vec![PathBuf::from("/new")]);
    }

    #[test]
    fn test_clear_forgets_everything() {
        let tmp = TempDir::new().expect("tempdir");
        let store = store_in(&tmp);
        store
            .write(&Preferences {
                theme: Some("classic".to_string()),
                ..Default::default()
            })
            .expect("write");

        let settings = run(&["--clear"], &store);
        assert!(!store.path().exists());
        assert_eq!(settings.theme, "auto");
    }

    #[test]
    fn test_debug_flag_raises_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = run(&["--debug", "--log-level", "ERROR"], &store_in(&tmp));
        assert_eq!(settings.log_level, "DEBUG");
    }
}
