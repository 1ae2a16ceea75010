use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::automation::BreakKind;
use crate::pages::{PageRequest, DEFAULT_FILENAME};

/// User configuration for addpage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Save target when neither a source nor `--save-as` is given
    pub default_filename: PathBuf,

    /// Show the application window
    pub visible: bool,

    /// Break inserted at the end of the document
    pub break_kind: BreakKind,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_filename: PathBuf::from(DEFAULT_FILENAME),
            visible: true,
            break_kind: BreakKind::Page,
        }
    }
}

impl Config {
    /// Load config from config directory
    pub fn load() -> Result<Self> {
        match Self::get_config_path() {
            Some(config_path) => Self::load_from(&config_path),
            None => Ok(Config::default()),
        }
    }

    /// Load config from a file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            return Ok(config);
        }

        Ok(Config::default())
    }

    /// Save config to config directory
    pub fn save(&self) -> Result<Option<PathBuf>> {
        match Self::get_config_path() {
            Some(config_path) => {
                self.save_to(&config_path)?;
                Ok(Some(config_path))
            }
            None => Ok(None),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("addpage").join("config.toml"))
    }

    /// Initialize default config file
    pub fn init_default() -> Result<Option<PathBuf>> {
        Config::default().save()
    }

    /// A request carrying this config's defaults.
    pub fn request(&self) -> PageRequest {
        PageRequest::new()
            .visible(self.visible)
            .break_kind(self.break_kind)
            .default_filename(&self.default_filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "visible = false\nbreak_kind = \"column\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.visible);
        assert_eq!(config.break_kind, BreakKind::Column);
        assert_eq!(config.default_filename, PathBuf::from(DEFAULT_FILENAME));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            default_filename: PathBuf::from("Blank.docx"),
            visible: false,
            break_kind: BreakKind::Page,
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn request_uses_config_values() {
        let config = Config {
            default_filename: PathBuf::from("Blank.docx"),
            visible: false,
            break_kind: BreakKind::Line,
        };
        let request = config.request();
        assert!(!request.visible);
        assert_eq!(request.break_kind, BreakKind::Line);
        assert_eq!(request.save_path(), PathBuf::from("Blank.docx"));
    }

    #[test]
    fn invalid_break_kind_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "break_kind = \"section\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
