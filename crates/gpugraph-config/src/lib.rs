//! Configuration for the `gpugraph` dashboard.
//!
//! Values are layered, later sources winning: built-in defaults, the TOML
//! file, `GPUGRAPH_*` environment variables, then command-line overrides.
//! The merged result is validated before anything touches the terminal.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gpugraph_core::{MinPaneSize, SessionSettings};

pub const ENV_PREFIX: &str = "GPUGRAPH_";

/// Shortest accepted refresh interval or telemetry timeout.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Resolved dashboard settings. Every field may be omitted from the file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between telemetry pulls.
    pub interval_secs: f64,

    /// Seconds a single telemetry pull may take before the tick is skipped.
    pub telemetry_timeout_secs: f64,

    /// `nvidia-smi` executable, looked up on `PATH` when relative.
    pub nvidia_smi: PathBuf,

    pub min_pane_lines: u16,
    pub min_pane_cols: u16,

    /// Use palette colors; when off only bold/dim attributes are drawn.
    pub color: bool,

    /// Where diagnostics go while the dashboard owns the terminal.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let min = MinPaneSize::default();
        Self {
            interval_secs: 1.0,
            telemetry_timeout_secs: 2.0,
            nvidia_smi: PathBuf::from("nvidia-smi"),
            min_pane_lines: min.lines,
            min_pane_cols: min.cols,
            color: true,
            log_file: std::env::temp_dir().join("gpugraph.log"),
        }
    }
}

impl Config {
    /// Reject values the dashboard cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_duration("interval_secs", self.interval_secs)?;
        positive_duration("telemetry_timeout_secs", self.telemetry_timeout_secs)?;
        let floor = MinPaneSize::FLOOR;
        if self.min_pane_lines < floor.lines {
            return Err(invalid("min_pane_lines", format!("must be at least {}", floor.lines)));
        }
        if self.min_pane_cols < floor.cols {
            return Err(invalid("min_pane_cols", format!("must be at least {}", floor.cols)));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval_secs).unwrap_or(Duration::from_secs(1))
    }

    pub fn telemetry_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.telemetry_timeout_secs)
            .unwrap_or(Duration::from_secs(2))
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            min_pane: MinPaneSize {
                lines: self.min_pane_lines,
                cols: self.min_pane_cols,
            },
            ..SessionSettings::default()
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn positive_duration(field: &str, secs: f64) -> Result<(), ConfigError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(invalid(field, format!("expected a positive number of seconds, got {secs}")));
    }
    let duration = Duration::try_from_secs_f64(secs).map_err(|e| invalid(field, e.to_string()))?;
    if duration < MIN_PERIOD {
        return Err(invalid(
            field,
            format!("must be at least {}s, got {secs}", MIN_PERIOD.as_secs_f64()),
        ));
    }
    Ok(())
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Command-line overrides ──────────────────────────────────────────

/// Values given on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nvidia_smi: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "gpugraph", "gpugraph").map_or_else(
        || PathBuf::from("gpugraph.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load and validate from the default config path.
pub fn load_config(overrides: &Overrides) -> Result<Config, ConfigError> {
    load_config_from(&config_path(), overrides)
}

/// Load and validate, reading the TOML layer from `path`. A missing file is
/// not an error.
pub fn load_config_from(path: &Path, overrides: &Overrides) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(overrides))
        .extract()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    fn load(overrides: &Overrides) -> figment::error::Result<Config> {
        load_config_from(Path::new("gpugraph.toml"), overrides).map_err(|e| e.to_string().into())
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        Jail::expect_with(|_| {
            let config = load(&Overrides::default())?;
            assert_eq!(config, Config::default());
            assert_eq!(config.tick_interval(), Duration::from_secs(1));
            assert_eq!(config.telemetry_timeout(), Duration::from_secs(2));
            Ok(())
        });
    }

    #[test]
    fn file_then_env_then_flags() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "gpugraph.toml",
                r#"
                    interval_secs = 5.0
                    nvidia_smi = "/opt/nvidia/bin/nvidia-smi"
                    min_pane_cols = 24
                    color = false
                "#,
            )?;
            jail.set_env("GPUGRAPH_INTERVAL_SECS", "2.5");
            jail.set_env("GPUGRAPH_MIN_PANE_LINES", "12");

            let config = load(&Overrides::default())?;
            assert_eq!(config.interval_secs, 2.5);
            assert_eq!(config.nvidia_smi, PathBuf::from("/opt/nvidia/bin/nvidia-smi"));
            assert_eq!(config.min_pane_lines, 12);
            assert_eq!(config.min_pane_cols, 24);
            assert!(!config.color);

            let config = load(&Overrides {
                interval_secs: Some(0.25),
                color: Some(true),
                ..Overrides::default()
            })?;
            assert_eq!(config.interval_secs, 0.25);
            assert!(config.color);
            assert_eq!(config.tick_interval(), Duration::from_millis(250));
            Ok(())
        });
    }

    #[test]
    fn non_positive_interval_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("GPUGRAPH_INTERVAL_SECS", "0");
            let err = load_config_from(Path::new("gpugraph.toml"), &Overrides::default())
                .unwrap_err();
            assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "interval_secs"));
            Ok(())
        });
    }

    #[test]
    fn malformed_file_is_a_figment_error() {
        Jail::expect_with(|jail| {
            jail.create_file("gpugraph.toml", "interval_secs = \"soon\"")?;
            let err = load_config_from(Path::new("gpugraph.toml"), &Overrides::default())
                .unwrap_err();
            assert!(matches!(err, ConfigError::Figment(_)));
            Ok(())
        });
    }

    #[test]
    fn validation_covers_every_bound() {
        let ok = Config::default();
        assert!(ok.validate().is_ok());

        for config in [
            Config { interval_secs: f64::NAN, ..ok.clone() },
            Config { interval_secs: -1.0, ..ok.clone() },
            Config { telemetry_timeout_secs: 0.0, ..ok.clone() },
            Config { telemetry_timeout_secs: f64::INFINITY, ..ok.clone() },
            Config { interval_secs: 1e-12, ..ok.clone() },
            Config { interval_secs: 0.000_5, ..ok.clone() },
            Config { telemetry_timeout_secs: 1e-10, ..ok.clone() },
            Config { min_pane_lines: 0, ..ok.clone() },
            Config { min_pane_lines: 4, ..ok.clone() },
            Config { min_pane_cols: 0, ..ok.clone() },
            Config { min_pane_cols: 16, ..ok.clone() },
        ] {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn smallest_accepted_values_run() {
        let config = Config {
            interval_secs: 0.001,
            telemetry_timeout_secs: 0.001,
            min_pane_lines: MinPaneSize::FLOOR.lines,
            min_pane_cols: MinPaneSize::FLOOR.cols,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
        assert!(config.telemetry_timeout() >= MIN_PERIOD);
    }

    #[test]
    fn sub_millisecond_interval_names_the_field() {
        let err = Config { interval_secs: 1e-12, ..Config::default() }
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "interval_secs"));
    }

    #[test]
    fn session_settings_carry_minimum_pane() {
        let config = Config {
            min_pane_lines: 14,
            min_pane_cols: 30,
            ..Config::default()
        };
        let settings = config.session_settings();
        assert_eq!(settings.min_pane, MinPaneSize { lines: 14, cols: 30 });
        assert_eq!(settings.reserved_lines, 1);
    }

    #[test]
    fn printed_config_parses_back() {
        let config = Config {
            interval_secs: 0.5,
            ..Config::default()
        };
        let text = config.to_toml().unwrap();
        assert!(text.contains("interval_secs = 0.5"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
