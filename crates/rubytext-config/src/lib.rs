use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use rubytext_engine::{NotationStyle, Settings};

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

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bracket pair for manual reading overrides.
    pub notation_style: NotationStyle,
    /// Annotate read-only renders.
    pub reading_mode: bool,
    /// Annotate the live editing surface.
    pub editing_mode: bool,
    /// Optional TSV reading dictionary (`surface<TAB>reading` per line).
    pub dictionary_path: Option<PathBuf>,
    /// Document identifiers the engine must neither scan nor decorate.
    pub skip_documents: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notation_style: NotationStyle::Curly,
            reading_mode: true,
            editing_mode: true,
            dictionary_path: None,
            skip_documents: Vec::new(),
        }
    }
}

impl Config {
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

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the dictionary path
        config.dictionary_path = config
            .dictionary_path
            .map(|p| Self::expand_path(&p).unwrap_or(p));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/rubytext");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Engine settings view of this config.
    pub fn settings(&self) -> Settings {
        Settings {
            notation_style: self.notation_style,
            reading_mode: self.reading_mode,
            editing_mode: self.editing_mode,
        }
    }

    pub fn is_skipped(&self, doc_id: &str) -> bool {
        self.skip_documents.iter().any(|d| d == doc_id)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
