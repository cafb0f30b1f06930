//! Configuration Module
//! Dashboard settings from built-in defaults, an optional JSON file and
//! environment overrides.

use crate::data::DataSources;
use crate::stats::{Reducer, RollingWindow, ViewOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";
pub const CONFIG_PATH_VAR: &str = "BIKESHARE_CONFIG";
pub const DAY_CSV_VAR: &str = "BIKESHARE_DAY_CSV";
pub const HOUR_CSV_VAR: &str = "BIKESHARE_HOUR_CSV";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Rolling window must be 7 or 30 days, got {0}")]
    InvalidWindow(usize),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub day_csv: PathBuf,
    pub hour_csv: PathBuf,
    /// Initial rolling window in days.
    pub rolling_window: usize,
    pub hourly_reducer: Reducer,
    /// Rows shown per table in the data preview.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            day_csv: PathBuf::from("cleaned_day_df.csv"),
            hour_csv: PathBuf::from("cleaned_hour_df.csv"),
            rolling_window: RollingWindow::default().days(),
            hourly_reducer: Reducer::default(),
            preview_rows: 50,
        }
    }
}

impl DashboardConfig {
    /// Resolve the configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        let config = Self::resolve(explicit.as_deref(), |key| std::env::var(key).ok())?;
        log::info!(
            "Config: day={}, hour={}, window={}, reducer={}",
            config.day_csv.display(),
            config.hour_csv.display(),
            config.rolling_window,
            config.hourly_reducer.label()
        );
        Ok(config)
    }

    /// Defaults, then the JSON file, then env overrides.
    ///
    /// An explicit `path` must exist. Without one, `dashboard.json` in the
    /// working directory is read only when present.
    pub fn resolve(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(day) = env(DAY_CSV_VAR) {
            config.day_csv = PathBuf::from(day);
        }
        if let Some(hour) = env(HOUR_CSV_VAR) {
            config.hour_csv = PathBuf::from(hour);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Read config file {}", path.display());
        Ok(serde_json::from_str(&text)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        RollingWindow::from_days(self.rolling_window)
            .map(|_| ())
            .ok_or(ConfigError::InvalidWindow(self.rolling_window))
    }

    pub fn sources(&self) -> DataSources {
        DataSources::new(self.day_csv.clone(), self.hour_csv.clone())
    }

    /// Initial view toggles.
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            reducer: self.hourly_reducer,
            rolling_window: RollingWindow::from_days(self.rolling_window).unwrap_or_default(),
            ..ViewOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.day_csv, PathBuf::from("cleaned_day_df.csv"));
        assert_eq!(config.hour_csv, PathBuf::from("cleaned_hour_df.csv"));
        assert_eq!(config.rolling_window, 30);
        assert_eq!(config.hourly_reducer, Reducer::Mean);
        assert_eq!(config.view_options(), ViewOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, r#"{"rolling_window": 7, "hourly_reducer": "sum"}"#).unwrap();

        let config = DashboardConfig::resolve(Some(&path), no_env).unwrap();
        assert_eq!(config.rolling_window, 7);
        assert_eq!(config.hourly_reducer, Reducer::Sum);
        assert_eq!(config.preview_rows, 50);

        let options = config.view_options();
        assert_eq!(options.rolling_window, RollingWindow::Week);
        assert_eq!(options.reducer, Reducer::Sum);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, r#"{"day_csv": "from_file.csv"}"#).unwrap();

        let env: HashMap<&str, String> = [(DAY_CSV_VAR, "from_env.csv".to_string())].into();
        let config = DashboardConfig::resolve(Some(&path), |k| env.get(k).cloned()).unwrap();
        assert_eq!(config.day_csv, PathBuf::from("from_env.csv"));
        assert_eq!(config.hour_csv, PathBuf::from("cleaned_hour_df.csv"));
        assert_eq!(config.sources().day_csv, PathBuf::from("from_env.csv"));
    }

    #[test]
    fn test_invalid_window() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, r#"{"rolling_window": 14}"#).unwrap();

        let err = DashboardConfig::resolve(Some(&path), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWindow(14)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.json");
        let err = DashboardConfig::resolve(Some(&path), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dashboard.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            DashboardConfig::resolve(Some(&path), no_env),
            Err(ConfigError::Parse(_))
        ));
    }
}
