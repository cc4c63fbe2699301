//! INI file configuration adapter.
//!
//! Section and key names are case-insensitive; values are returned as
//! written.

use crate::domain::error::AccrueError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AccrueError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| AccrueError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, AccrueError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| AccrueError::ConfigParse {
                file: "<string>".into(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn sections(&self) -> Vec<String> {
        let mut sections = self.config.sections();
        sections.sort();
        sections
    }

    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, AccrueError> {
        self.config
            .getfloat(section, key)
            .map(|v| v.unwrap_or(default))
            .map_err(|reason| AccrueError::ConfigInvalid {
                section: section.into(),
                key: key.into(),
                reason,
            })
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, AccrueError> {
        match self.config.get(section, key) {
            None => Ok(default),
            Some(v) => Self::parse_bool(v.trim()).ok_or_else(|| AccrueError::ConfigInvalid {
                section: section.into(),
                key: key.into(),
                reason: format!("expected true/false, yes/no or 1/0, got {v:?}"),
            }),
        }
    }
}
