use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

fn default_autosave() -> bool {
    true
}

/// Editor settings read from `~/.config/blockpad/config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// JSON file holding the edited document
    pub document_path: PathBuf,
    /// Save after every change instead of only on request
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::default_document_path())
    }
}

impl Config {
    pub fn new(document_path: PathBuf) -> Self {
        Self {
            document_path,
            autosave: default_autosave(),
        }
    }

    /// Settings for an editing session.
    ///
    /// A document path given on the command line wins over the config file,
    /// which wins over [`Config::default_document_path`]. Autosave comes from
    /// the config file whenever there is one.
    pub fn resolve(document_arg: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::resolve_from(Self::config_path(), document_arg)
    }

    pub fn resolve_from<P: AsRef<Path>>(
        config_path: P,
        document_arg: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let config = Self::load_from_path(config_path)?.unwrap_or_default();
        Ok(match document_arg {
            Some(document_path) => Self {
                document_path,
                ..config
            },
            None => config,
        })
    }

    /// `Ok(None)` when there is no config file
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;
        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(Self {
            document_path: expand_path(&config.document_path),
            ..config
        }))
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    /// Holds the config file, the default document and the log file
    pub fn config_dir() -> PathBuf {
        PathBuf::from(shellexpand::tilde("~/.config/blockpad").as_ref())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Where a document goes when neither the command line nor a config file names one
    pub fn default_document_path() -> PathBuf {
        Self::config_dir().join("document.json")
    }
}

/// Expand `~` and `$VAR` in a configured path, leaving it as written if a
/// variable is unset
fn expand_path(path: &Path) -> PathBuf {
    match shellexpand::full(&path.to_string_lossy()) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let config_file = dir.path().join("config.toml");
        std::fs::write(&config_file, content).unwrap();
        config_file
    }

    #[test]
    fn test_default_document_sits_next_to_config() {
        let document_path = Config::default_document_path();
        assert!(document_path.ends_with(".config/blockpad/document.json"));
        assert_eq!(document_path.parent(), Config::config_path().parent());
    }

    #[test]
    fn test_autosave_defaults_to_true() {
        let config: Config = toml::from_str(r#"document_path = "/tmp/doc.json""#).unwrap();
        assert!(config.autosave);
    }

    #[test]
    fn test_resolve_without_config_uses_default_document() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::resolve_from(temp_dir.path().join("missing.toml"), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_resolve_uses_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(
            &temp_dir,
            "document_path = \"/tmp/notes.json\"\nautosave = false\n",
        );

        let config = Config::resolve_from(&config_file, None).unwrap();

        assert_eq!(config.document_path, PathBuf::from("/tmp/notes.json"));
        assert!(!config.autosave);
    }

    #[test]
    fn test_command_line_document_wins_over_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(
            &temp_dir,
            "document_path = \"/tmp/notes.json\"\nautosave = false\n",
        );

        let config =
            Config::resolve_from(&config_file, Some(PathBuf::from("other.json"))).unwrap();

        assert_eq!(config.document_path, PathBuf::from("other.json"));
        assert!(!config.autosave);
    }

    #[test]
    fn test_configured_document_path_is_expanded() {
        unsafe {
            env::set_var("BLOCKPAD_TEST_DOCS", "/test/env/docs");
        }
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(
            &temp_dir,
            r#"document_path = "$BLOCKPAD_TEST_DOCS/doc.json""#,
        );

        let config = Config::resolve_from(&config_file, None).unwrap();

        assert_eq!(config.document_path, PathBuf::from("/test/env/docs/doc.json"));
        unsafe {
            env::remove_var("BLOCKPAD_TEST_DOCS");
        }
    }

    #[test]
    fn test_broken_config_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(&temp_dir, "document_path = ");

        let result = Config::resolve_from(&config_file, Some(PathBuf::from("doc.json")));

        assert!(matches!(
            result,
            Err(ConfigError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_saved_config_resolves_back() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let saved = Config {
            document_path: PathBuf::from("/tmp/doc.json"),
            autosave: false,
        };

        saved.save_to_path(&config_file).unwrap();

        assert_eq!(Config::resolve_from(&config_file, None).unwrap(), saved);
    }
}
