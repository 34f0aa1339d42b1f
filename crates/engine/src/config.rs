//! Engine configuration via `lamina.toml`
//!
//! The engine itself performs no file I/O; the embedder reads the config
//! file and hands the contents to [`EngineConfig::from_toml_str`]. On first
//! start an embedder can write [`EngineConfig::default_toml`] to the data
//! directory and point users at it.

use lamina_core::{Error, IsolationLevel, Result};
use serde::{Deserialize, Serialize};

/// Config file name embedders are expected to use.
pub const CONFIG_FILE_NAME: &str = "lamina.toml";

/// Engine configuration
///
/// # Example
///
/// ```toml
/// # Default isolation level for new transactions:
/// # "read_committed", "repeatable_read", "snapshot", or "serializable"
/// isolation = "snapshot"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Default isolation level as a string; validated by
    /// [`EngineConfig::isolation_level`].
    #[serde(default = "default_isolation_str")]
    pub isolation: String,
}

fn default_isolation_str() -> String {
    IsolationLevel::default().as_str().to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            isolation: default_isolation_str(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when the text is not valid TOML or has the
    /// wrong shape. Unknown isolation names are only rejected later, by
    /// [`EngineConfig::isolation_level`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    /// Parse the isolation string into an [`IsolationLevel`]
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not one of `"read_committed"`,
    /// `"repeatable_read"`, `"snapshot"`, or `"serializable"`.
    pub fn isolation_level(&self) -> Result<IsolationLevel> {
        IsolationLevel::parse(&self.isolation)
            .ok_or_else(|| Error::invalid_isolation(self.isolation.clone()))
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# lamina engine configuration
#
# Default isolation level for new transactions:
#   "read_committed"  = reads observe the latest committed state
#   "repeatable_read" = reads frozen at begin, no commit validation
#   "snapshot"        = frozen reads plus first-committer-wins (default)
#   "serializable"    = frozen reads plus read-write conflict checks
isolation = "snapshot"
"#
    }
}
