use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{EdfError, Result};

/// Settings for [`Catalog::scan`](crate::Catalog::scan).
///
/// Every key is optional in the TOML form:
///
/// ```toml
/// directory = "recordings"
/// extension = "edf"
/// workers = 4
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Root directory, scanned recursively.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// File extension to pick up, compared case-insensitively, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Number of decode threads.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_directory() -> PathBuf {
    PathBuf::from("edf")
}

fn default_extension() -> String {
    "edf".to_string()
}

fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            extension: default_extension(),
            workers: default_workers(),
        }
    }
}

impl CatalogConfig {
    /// Parses a TOML document.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edfcatalog::CatalogConfig;
    ///
    /// let config = CatalogConfig::from_toml_str("directory = \"data\"\nworkers = 2")?;
    /// assert_eq!(config.directory.to_str(), Some("data"));
    /// assert_eq!(config.extension, "edf");
    /// assert_eq!(config.workers, 2);
    ///
    /// assert!(CatalogConfig::from_toml_str("workers = 0").is_err());
    /// # Ok::<(), edfcatalog::EdfError>(())
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EdfError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Like [`load`](Self::load), falling back to the defaults when the file is
    /// missing or broken.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load {}, using default config: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EdfError::InvalidConfig(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(EdfError::InvalidConfig("workers must be at least 1".to_string()));
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(EdfError::InvalidConfig(format!(
                "extension must be given without a leading dot: {:?}",
                self.extension
            )));
        }
        Ok(())
    }

    /// Whether `path` carries the configured extension.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}
