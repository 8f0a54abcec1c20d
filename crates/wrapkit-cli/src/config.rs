//! Run options: a JSON file, then command-line overrides

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use wrapkit_overload::OverloadSettings;
use wrapkit_properties::PropertyOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WrapSettings {
    /// Hierarchy flag marking types that must not be wrapped
    pub exclude_flag: String,
    pub wrap_legacy: bool,
    /// Protected methods contribute to properties
    pub protected_properties: bool,
    pub constructors: bool,
}

impl Default for WrapSettings {
    fn default() -> Self {
        let overloads = OverloadSettings::default();
        Self {
            exclude_flag: overloads.exclude_flag,
            wrap_legacy: overloads.wrap_legacy,
            protected_properties: false,
            constructors: overloads.constructors,
        }
    }
}

/// Flags that override single fields of the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub exclude_flag: Option<String>,
    pub no_legacy: bool,
    pub protected_properties: bool,
    pub no_constructors: bool,
}

impl WrapSettings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, or the file at `path`, with `overrides` applied
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(flag) = &overrides.exclude_flag {
            settings.exclude_flag = flag.clone();
        }
        if overrides.no_legacy {
            settings.wrap_legacy = false;
        }
        if overrides.protected_properties {
            settings.protected_properties = true;
        }
        if overrides.no_constructors {
            settings.constructors = false;
        }
        Ok(settings)
    }

    pub fn overloads(&self) -> OverloadSettings {
        OverloadSettings {
            exclude_flag: self.exclude_flag.clone(),
            wrap_legacy: self.wrap_legacy,
            constructors: self.constructors,
        }
    }

    pub fn properties(&self) -> PropertyOptions {
        PropertyOptions {
            include_protected: self.protected_properties,
        }
    }
}
