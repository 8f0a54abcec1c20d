//! Options that change which methods are planned and how

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverloadSettings {
    /// Hierarchy flag that marks a type as not to be wrapped
    pub exclude_flag: String,
    /// Plan legacy methods (the emitter guards them)
    pub wrap_legacy: bool,
    /// Plan constructors as an unbound group named after the class
    pub constructors: bool,
}

impl Default for OverloadSettings {
    fn default() -> Self {
        Self {
            exclude_flag: "WRAP_EXCLUDE".to_string(),
            wrap_legacy: true,
            constructors: true,
        }
    }
}
