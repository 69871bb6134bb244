use crate::datasets::DEFAULT_TABLE_URL;
use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable naming a local table file; overrides every other source
pub const TABLE_FILE_ENV: &str = "CONFIG_FILE_PATH";

/// Prefix for environment overrides, e.g. `ASNLOOKUP_TABLE_URL`
pub const ENV_PREFIX: &str = "ASNLOOKUP";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsnLookupConfig {
    /// URL of the prefix table, used when no local file is configured
    pub table_url: String,

    /// Local prefix table file, takes precedence over `table_url`
    pub table_file: Option<String>,
}

impl Default for AsnLookupConfig {
    fn default() -> Self {
        Self {
            table_url: DEFAULT_TABLE_URL.to_string(),
            table_file: None,
        }
    }
}

impl AsnLookupConfig {
    /// Function to create and initialize a new configuration
    ///
    /// Sources, lowest priority first: the TOML file at `path` (or
    /// `$HOME/.asnlookup.toml` when it exists), `ASNLOOKUP_*` environment
    /// variables, then `CONFIG_FILE_PATH`.
    pub fn new(path: &Option<String>) -> Result<AsnLookupConfig> {
        let file = match path {
            Some(p) => {
                let path = PathBuf::from(p);
                if !path.exists() {
                    return Err(anyhow!("Configuration file {} does not exist", p));
                }
                Some(path)
            }
            None => None,
        };

        let file = Self::resolve_config_file(file.as_deref());
        Self::load(file.as_deref(), std::env::vars().collect())
    }

    /// The config file that is read: `explicit` if given, else
    /// `$HOME/.asnlookup.toml` when it exists.
    pub fn resolve_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::config_file_path().filter(|p| p.exists()),
        }
    }

    /// Build the configuration from an optional file and an explicit environment.
    fn load(file: Option<&Path>, env: HashMap<String, String>) -> Result<AsnLookupConfig> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            let path_str = path
                .to_str()
                .ok_or_else(|| anyhow!("Could not convert path to string"))?;
            builder = builder.add_source(config::File::with_name(path_str));
        }

        // E.g., `ASNLOOKUP_TABLE_URL=https://example.net/table.txt asnlookup lookup 1.1.1.1`
        let env_source: config::Map<String, String> = env
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        builder = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(Some(env_source)));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        let table_url = config
            .get("table_url")
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_TABLE_URL.to_string());

        let table_file = env
            .get(TABLE_FILE_ENV)
            .or_else(|| config.get("table_file"))
            .filter(|s| !s.is_empty())
            .cloned();

        Ok(AsnLookupConfig {
            table_url,
            table_file,
        })
    }

    /// Where to read the prefix table from: the local file if set, else the URL
    pub fn table_location(&self) -> &str {
        self.table_file.as_deref().unwrap_or(self.table_url.as_str())
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let lines = [
            format!("Table URL:          {}", self.table_url),
            format!(
                "Table File:         {}",
                self.table_file.as_deref().unwrap_or("(not set)")
            ),
            format!("Table Location:     {}", self.table_location()),
        ];
        lines.join("\n")
    }

    /// Default config file path, `$HOME/.asnlookup.toml`
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".asnlookup.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = AsnLookupConfig::default();
        assert_eq!(config.table_url, DEFAULT_TABLE_URL);
        assert_eq!(config.table_file, None);
        assert_eq!(config.table_location(), DEFAULT_TABLE_URL);
    }

    #[test]
    fn test_load_without_sources() {
        let config = AsnLookupConfig::load(None, HashMap::new()).unwrap();
        assert_eq!(config, AsnLookupConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = AsnLookupConfig::load(
            None,
            env(&[("ASNLOOKUP_TABLE_URL", "https://example.net/table.txt")]),
        )
        .unwrap();
        assert_eq!(config.table_url, "https://example.net/table.txt");
        assert_eq!(config.table_location(), "https://example.net/table.txt");
    }

    #[test]
    fn test_table_file_env_wins() {
        let config = AsnLookupConfig::load(
            None,
            env(&[
                ("ASNLOOKUP_TABLE_FILE", "/tmp/other.txt"),
                (TABLE_FILE_ENV, "/tmp/table.txt"),
            ]),
        )
        .unwrap();
        assert_eq!(config.table_file.as_deref(), Some("/tmp/table.txt"));
        assert_eq!(config.table_location(), "/tmp/table.txt");

        // an empty value counts as unset
        let config = AsnLookupConfig::load(None, env(&[(TABLE_FILE_ENV, "")])).unwrap();
        assert_eq!(config.table_file, None);
    }

    #[test]
    fn test_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "table_url = \"https://mirror.example.org/table.txt\"").unwrap();
        writeln!(file, "table_file = \"/srv/table.txt\"").unwrap();
        file.flush().unwrap();

        let config = AsnLookupConfig::load(Some(file.path()), HashMap::new()).unwrap();
        assert_eq!(config.table_url, "https://mirror.example.org/table.txt");
        assert_eq!(config.table_location(), "/srv/table.txt");

        // environment beats the file
        let config = AsnLookupConfig::load(
            Some(file.path()),
            env(&[("ASNLOOKUP_TABLE_URL", "https://env.example.org/t.txt")]),
        )
        .unwrap();
        assert_eq!(config.table_url, "https://env.example.org/t.txt");
    }

    #[test]
    fn test_missing_config_file() {
        let result = AsnLookupConfig::new(&Some("/nonexistent/asnlookup.toml".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_explicit_config_file() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert_eq!(
            AsnLookupConfig::resolve_config_file(Some(file.path())),
            Some(file.path().to_path_buf())
        );
    }

    #[test]
    fn test_summary() {
        let config = AsnLookupConfig {
            table_url: "https://example.net/t.txt".to_string(),
            table_file: None,
        };
        let summary = config.summary();
        assert!(summary.contains("https://example.net/t.txt"));
        assert!(summary.contains("(not set)"));
    }
}
