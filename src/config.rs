//! Snapper configuration loaded from a JSON file and the environment.
//!
//! The JSON document supplies the region and account used to construct
//! resource identifiers, plus an optional retention threshold:
//!
//! ```json
//! { "AWS_REGION": "eu-west-1", "ACCOUNT_ID": "123456789012", "MAX_TO_KEEP": 3 }
//! ```
//!
//! Its path comes from `RDS_SNAPPER_CONFIG`, defaulting to `config.json`
//! next to the executable. `MAX_TO_KEEP` and `DRY_RUN` may also be set as
//! environment variables (or in a `.env` file via `dotenvy`), which take
//! precedence over the file. An override that is set but cannot be parsed
//! is a fatal error, never silently ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::service::retention::DEFAULT_MAX_TO_KEEP;

/// Environment variable naming the JSON config file.
pub const CONFIG_PATH_ENV: &str = "RDS_SNAPPER_CONFIG";

/// Config file name looked up next to the executable when
/// [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// On-disk JSON document.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "AWS_REGION")]
    region: String,
    #[serde(rename = "ACCOUNT_ID")]
    account_id: String,
    #[serde(rename = "MAX_TO_KEEP", default)]
    max_to_keep: Option<usize>,
}

/// Top-level snapper configuration.
///
/// Loaded once at startup via [`SnapperConfig::load`]. Any failure is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapperConfig {
    /// File the configuration was read from.
    pub config_path: PathBuf,

    /// Region used in constructed identifiers (e.g. `eu-west-1`).
    pub region: String,

    /// Account used in constructed identifiers.
    pub account_id: String,

    /// Snapshots kept per backup source once the next one is taken.
    pub max_to_keep: usize,

    /// Plan and log without issuing create/delete calls.
    pub dry_run: bool,
}

impl SnapperConfig {
    /// Loads configuration from the file named by [`CONFIG_PATH_ENV`] and
    /// applies environment overrides.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file first.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is missing, unreadable,
    /// malformed, contains blank required values, or if an override is set
    /// to a value that cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_with(|key| {
            std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
        })
    }

    /// Same as [`SnapperConfig::load`], reading variables through `lookup`
    /// instead of the process environment.
    ///
    /// # Errors
    ///
    /// See [`SnapperConfig::load`].
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let path = lookup(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);

        let mut config = Self::from_file(&path)?;
        if let Some(raw) = lookup("MAX_TO_KEEP") {
            config.max_to_keep = parse_count("MAX_TO_KEEP", &raw)?;
        }
        if let Some(raw) = lookup("DRY_RUN") {
            config.dry_run = parse_bool("DRY_RUN", &raw)?;
        }
        Ok(config)
    }

    /// Reads and validates the JSON document at `path` without consulting
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is missing, unreadable,
    /// malformed, or contains blank required values.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let file: ConfigFile =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            config_path: path.to_path_buf(),
            region: require_non_blank("AWS_REGION", file.region)?,
            account_id: require_non_blank("ACCOUNT_ID", file.account_id)?,
            max_to_keep: file.max_to_keep.unwrap_or(DEFAULT_MAX_TO_KEEP),
            dry_run: false,
        })
    }
}

fn require_non_blank(key: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid {
            key,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// `config.json` in the executable's directory, or in the working
/// directory if the executable path is unknown.
#[must_use]
pub fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_CONFIG_FILE)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

fn parse_count(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        reason: format!("expected a non-negative integer, got {raw:?}"),
    })
}

/// Accepts `true`/`false`/`1`/`0`, case-insensitive.
fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Ok(false)
    } else {
        Err(ConfigError::Invalid {
            key,
            reason: format!("expected true, false, 1 or 0, got {raw:?}"),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let Ok(mut file) = tempfile::NamedTempFile::new() else {
            panic!("temp file");
        };
        let Ok(()) = file.write_all(contents.as_bytes()) else {
            panic!("write temp file");
        };
        file
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn load_from(
        file: &tempfile::NamedTempFile,
        vars: &[(&str, &str)],
    ) -> Result<SnapperConfig, ConfigError> {
        let path = file.path().to_string_lossy().into_owned();
        let mut all = vec![(CONFIG_PATH_ENV, path.as_str())];
        all.extend_from_slice(vars);
        SnapperConfig::load_with(lookup_from(&all))
    }

    #[test]
    fn reads_region_and_account() {
        let file = write_config(r#"{"AWS_REGION": "eu-west-1", "ACCOUNT_ID": "123456789012"}"#);
        let Ok(config) = SnapperConfig::from_file(file.path()) else {
            panic!("config should load");
        };
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.account_id, "123456789012");
        assert_eq!(config.max_to_keep, DEFAULT_MAX_TO_KEEP);
        assert!(!config.dry_run);
    }

    #[test]
    fn max_to_keep_from_file() {
        let file = write_config(
            r#"{"AWS_REGION": "us-east-1", "ACCOUNT_ID": "1", "MAX_TO_KEEP": 7}"#,
        );
        let Ok(config) = SnapperConfig::from_file(file.path()) else {
            panic!("config should load");
        };
        assert_eq!(config.max_to_keep, 7);
    }

    #[test]
    fn missing_file_is_reported() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("temp dir");
        };
        let path = dir.path().join("absent.json");
        let result = SnapperConfig::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn malformed_json_is_reported() {
        let file = write_config("{ not json");
        let result = SnapperConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Malformed { .. })));
    }

    #[test]
    fn missing_key_is_malformed() {
        let file = write_config(r#"{"AWS_REGION": "eu-west-1"}"#);
        let result = SnapperConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Malformed { .. })));
    }

    #[test]
    fn blank_account_is_invalid() {
        let file = write_config(r#"{"AWS_REGION": "eu-west-1", "ACCOUNT_ID": "  "}"#);
        let result = SnapperConfig::from_file(file.path());
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                key: "ACCOUNT_ID",
                ..
            })
        ));
    }

    #[test]
    fn load_reads_file_named_by_env() {
        let file = write_config(r#"{"AWS_REGION": "eu-west-1", "ACCOUNT_ID": "42", "MAX_TO_KEEP": 5}"#);
        let Ok(config) = load_from(&file, &[]) else {
            panic!("config should load");
        };
        assert_eq!(config.config_path, file.path());
        assert_eq!(config.max_to_keep, 5);
        assert!(!config.dry_run);
    }

    #[test]
    fn env_max_to_keep_overrides_file() {
        let file = write_config(r#"{"AWS_REGION": "eu-west-1", "ACCOUNT_ID": "42", "MAX_TO_KEEP": 5}"#);
        let Ok(config) = load_from(&file, &[("MAX_TO_KEEP", "2")]) else {
            panic!("config should load");
        };
        assert_eq!(config.max_to_keep, 2);
    }

    #[test]
    fn dry_run_accepts_any_case() {
        let file = write_config(r#"{"AWS_REGION": "eu-west-1", "ACCOUNT_ID": "42"}"#);
        for (raw, expected) in [("True", true), ("TRUE", true), ("1", true), ("False", false), ("0", false)] {
            let Ok(config) = load_from(&file, &[("DRY_RUN", raw)]) else {
                panic!("DRY_RUN={raw} should load");
            };
            assert_eq!(config.dry_run, expected, "DRY_RUN={raw}");
        }
    }

    #[test]
    fn unparseable_dry_run_is_fatal() {
        let file = write_config(r#"{"AWS_REGION": "eu-west-1", "ACCOUNT_ID": "42"}"#);
        for raw in ["yes", "on", ""] {
            let result = load_from(&file, &[("DRY_RUN", raw)]);
            assert!(
                matches!(result, Err(ConfigError::Invalid { key: "DRY_RUN", .. })),
                "DRY_RUN={raw:?}"
            );
        }
    }

    #[test]
    fn unparseable_max_to_keep_is_fatal() {
        let file = write_config(r#"{"AWS_REGION": "eu-west-1", "ACCOUNT_ID": "42", "MAX_TO_KEEP": 5}"#);
        for raw in ["three", "-1", ""] {
            let result = load_from(&file, &[("MAX_TO_KEEP", raw), ("DRY_RUN", "True")]);
            assert!(
                matches!(result, Err(ConfigError::Invalid { key: "MAX_TO_KEEP", .. })),
                "MAX_TO_KEEP={raw:?}"
            );
        }
    }

    #[test]
    fn default_path_is_next_to_executable() {
        let path = default_config_path();
        assert!(path.ends_with(DEFAULT_CONFIG_FILE));
        let exe_dir = std::env::current_exe().ok().and_then(|e| e.parent().map(Path::to_path_buf));
        assert_eq!(path.parent().map(Path::to_path_buf), exe_dir);
    }

    #[test]
    fn unset_path_falls_back_to_default_location() {
        let result = SnapperConfig::load_with(|_| None);
        let Err(ConfigError::Missing { path }) = result else {
            panic!("expected missing default config");
        };
        assert_eq!(path, default_config_path());
    }
}
