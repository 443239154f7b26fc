use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SourceError, SourceResult};

/// File name looked up next to the analyzed sources.
pub const CONFIG_FILE_NAME: &str = "relay.toml";

/// Contents of `relay.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Settings for code generating assists
    pub assist: AssistConfig,
}

/// Settings shared by the assists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// One indentation level in generated code
    pub indent: String,

    /// Traits never delegated, by simple name or full path
    pub skip_traits: Vec<String>,

    /// Put `#[inline]` on generated forwarding methods
    pub inline_forwarders: bool,
}

impl Default for AssistConfig {
    fn default() -> Self {
        AssistConfig {
            indent: "    ".to_string(),
            skip_traits: Vec::new(),
            inline_forwarders: false,
        }
    }
}

impl AssistConfig {
    /// Whether `trait_path` (e.g. `std::fmt::Debug`) is listed in `skip_traits`.
    pub fn skips(&self, trait_path: &str) -> bool {
        let simple = trait_path.rsplit("::").next().unwrap_or(trait_path);
        self.skip_traits
            .iter()
            .any(|skipped| skipped == trait_path || skipped == simple)
    }
}

impl ProjectConfig {
    /// Parses the contents of a `relay.toml` file.
    pub fn from_toml_str(text: &str) -> SourceResult<Self> {
        toml::from_str(text).map_err(|err| SourceError::ConfigParse {
            message: err.message().to_string(),
            src: text.to_string(),
            span: err.span().map(Into::into),
        })
    }

    /// Loads `relay.toml` from `dir`. A missing file yields the defaults.
    pub fn load(dir: &Path) -> SourceResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            log::debug!("no {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
            return Ok(ProjectConfig::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|e| SourceError::read(&path, e))?;
        Self::from_toml_str(&text)
    }
}
