//! Source configuration and factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use marksheet_core::traits::{SheetLayout, SheetSource};

use crate::file::FileSource;
use crate::google::{GoogleAuth, GoogleSheetsSource};

/// Where the sheet data comes from.
///
/// Note: Custom Debug impl masks credentials to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Google {
        spreadsheet_id: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default)]
        access_token: Option<String>,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    File {
        path: PathBuf,
    },
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |s: &Option<String>| s.as_ref().map(|_| "***");
        match self {
            SourceConfig::Google {
                spreadsheet_id,
                api_key,
                access_token,
                base_url,
                timeout_secs,
            } => f
                .debug_struct("Google")
                .field("spreadsheet_id", spreadsheet_id)
                .field("api_key", &mask(api_key))
                .field("access_token", &mask(access_token))
                .field("base_url", base_url)
                .field("timeout_secs", timeout_secs)
                .finish(),
            SourceConfig::File { path } => f.debug_struct("File").field("path", path).finish(),
        }
    }
}

/// Top-level marksheet configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarksheetConfig {
    /// The sheet backend. `None` until configured.
    #[serde(default)]
    pub source: Option<SourceConfig>,
    /// Ranges holding the assignment, marks and credential columns.
    #[serde(default)]
    pub layout: SheetLayout,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a source config.
fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    let resolve = |s: &Option<String>| s.as_deref().map(resolve_env_vars);
    match config {
        SourceConfig::Google {
            spreadsheet_id,
            api_key,
            access_token,
            base_url,
            timeout_secs,
        } => SourceConfig::Google {
            spreadsheet_id: resolve_env_vars(spreadsheet_id),
            api_key: resolve(api_key),
            access_token: resolve(access_token),
            base_url: resolve(base_url),
            timeout_secs: *timeout_secs,
        },
        SourceConfig::File { path } => SourceConfig::File {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `marksheet.toml` in the current directory
/// 2. `~/.config/marksheet/config.toml`
///
/// Environment variable overrides: `MARKSHEET_SPREADSHEET_ID`,
/// `MARKSHEET_API_KEY`, `MARKSHEET_ACCESS_TOKEN`.
pub fn load_config() -> Result<MarksheetConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MarksheetConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("marksheet.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => MarksheetConfig::default(),
    };

    Ok(apply_env_overrides(config, |name| std::env::var(name).ok()))
}

/// Parse a TOML config string and resolve `${VAR}` references.
pub fn parse_config(content: &str) -> Result<MarksheetConfig> {
    let mut config: MarksheetConfig = toml::from_str(content)?;
    config.source = config.source.as_ref().map(resolve_source_config);
    Ok(config)
}

/// Apply `MARKSHEET_*` overrides. A spreadsheet id override turns any
/// configured source into a Google source.
fn apply_env_overrides(
    mut config: MarksheetConfig,
    env: impl Fn(&str) -> Option<String>,
) -> MarksheetConfig {
    if let Some(id) = env("MARKSHEET_SPREADSHEET_ID") {
        match &mut config.source {
            Some(SourceConfig::Google { spreadsheet_id, .. }) => *spreadsheet_id = id,
            _ => {
                config.source = Some(SourceConfig::Google {
                    spreadsheet_id: id,
                    api_key: None,
                    access_token: None,
                    base_url: None,
                    timeout_secs: None,
                })
            }
        }
    }

    if let Some(SourceConfig::Google {
        api_key,
        access_token,
        ..
    }) = &mut config.source
    {
        if let Some(key) = env("MARKSHEET_API_KEY") {
            *api_key = Some(key);
        }
        if let Some(token) = env("MARKSHEET_ACCESS_TOKEN") {
            *access_token = Some(token);
        }
    }

    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("marksheet"))
}

/// Create a source instance from its configuration.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn SheetSource>> {
    match config {
        SourceConfig::Google {
            spreadsheet_id,
            api_key,
            access_token,
            base_url,
            timeout_secs,
        } => {
            anyhow::ensure!(!spreadsheet_id.trim().is_empty(), "spreadsheet_id is empty");
            let non_empty = |s: &Option<String>| s.clone().filter(|v| !v.trim().is_empty());
            let auth = match (non_empty(access_token), non_empty(api_key)) {
                (Some(token), _) => GoogleAuth::AccessToken(token),
                (None, Some(key)) => GoogleAuth::ApiKey(key),
                (None, None) => anyhow::bail!(
                    "google source needs an api_key or access_token (or MARKSHEET_API_KEY)"
                ),
            };
            Ok(Box::new(GoogleSheetsSource::new(
                spreadsheet_id,
                auth,
                base_url.clone(),
                *timeout_secs,
            )?))
        }
        SourceConfig::File { path } => Ok(Box::new(FileSource::open(path)?)),
    }
}

/// Create the configured source, or explain how to configure one.
pub fn create_configured_source(config: &MarksheetConfig) -> Result<Box<dyn SheetSource>> {
    match &config.source {
        Some(source) => create_source(source),
        None => anyhow::bail!(
            "no source configured. Run `marksheet init` or set MARKSHEET_SPREADSHEET_ID"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_MARKSHEET_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_MARKSHEET_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_MARKSHEET_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_MARKSHEET_UNSET_VAR_XYZ}"), "");
        std::env::remove_var("_MARKSHEET_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = MarksheetConfig::default();
        assert!(config.source.is_none());
        assert_eq!(config.layout, SheetLayout::default());
        assert!(create_configured_source(&config).is_err());
    }

    #[test]
    fn parse_google_config() {
        let toml_str = r#"
[source]
type = "google"
spreadsheet_id = "abc123"
api_key = "key-1"

[layout]
credentials = "Logins!A1:B200"
"#;
        let config = parse_config(toml_str).unwrap();
        assert!(matches!(
            &config.source,
            Some(SourceConfig::Google { spreadsheet_id, .. }) if spreadsheet_id == "abc123"
        ));
        assert_eq!(config.layout.credentials, "Logins!A1:B200");
        assert_eq!(config.layout.assignments, "Sheet1!A1:E500");
    }

    #[test]
    fn parse_file_config() {
        let config = parse_config("[source]\ntype = \"file\"\npath = \"snapshot.json\"\n").unwrap();
        assert!(matches!(
            &config.source,
            Some(SourceConfig::File { path }) if path == Path::new("snapshot.json")
        ));
    }

    #[test]
    fn debug_masks_secrets() {
        let config = SourceConfig::Google {
            spreadsheet_id: "abc".into(),
            api_key: Some("very-secret".into()),
            access_token: None,
            base_url: None,
            timeout_secs: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = [
            ("MARKSHEET_SPREADSHEET_ID", "from-env"),
            ("MARKSHEET_API_KEY", "env-key"),
        ]
        .into_iter()
        .collect();
        let config = apply_env_overrides(
            parse_config("[source]\ntype = \"file\"\npath = \"s.json\"\n").unwrap(),
            |name| env.get(name).map(|v| v.to_string()),
        );
        match config.source {
            Some(SourceConfig::Google {
                spreadsheet_id,
                api_key,
                ..
            }) => {
                assert_eq!(spreadsheet_id, "from-env");
                assert_eq!(api_key.as_deref(), Some("env-key"));
            }
            other => panic!("expected google source, got {other:?}"),
        }
    }

    #[test]
    fn no_overrides_keeps_config() {
        let config = apply_env_overrides(MarksheetConfig::default(), |_| None);
        assert!(config.source.is_none());
    }

    #[test]
    fn google_source_requires_credentials() {
        let config = SourceConfig::Google {
            spreadsheet_id: "abc".into(),
            api_key: Some("  ".into()),
            access_token: None,
            base_url: None,
            timeout_secs: None,
        };
        let err = create_source(&config).err().unwrap();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn creates_google_source() {
        let config = SourceConfig::Google {
            spreadsheet_id: "abc".into(),
            api_key: Some("key".into()),
            access_token: None,
            base_url: None,
            timeout_secs: Some(10),
        };
        assert_eq!(create_source(&config).unwrap().name(), "google");
    }

    #[test]
    fn load_explicit_missing_path() {
        let err = load_config_from(Some(Path::new("/nonexistent/marksheet.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_path_and_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("snapshot.json");
        std::fs::write(&snapshot, r#"{"Sheet1!A1:E500": [["Enroll"]]}"#).unwrap();
        let config_path = dir.path().join("marksheet.toml");
        std::fs::write(
            &config_path,
            format!("[source]\ntype = \"file\"\npath = {:?}\n", snapshot.display().to_string()),
        )
        .unwrap();

        let config = load_config_from(Some(&config_path)).unwrap();
        let source = create_configured_source(&config).unwrap();
        assert_eq!(source.name(), "file");
    }
}
