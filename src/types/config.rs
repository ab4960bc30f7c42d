//! Configuration structures.
//!
//! Every section defaults sensibly, so a partial JSON document is enough to
//! override a single field.

use super::{Error, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Template routing configuration.
    #[serde(default)]
    pub router: RouterConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Parse a JSON configuration document and validate it.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)?;
        config.router.validate()?;
        Ok(config)
    }
}

/// How template paths are matched and how emitted events are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Prefix of every emitted event name (`<namespace>.<callback>`).
    pub namespace: String,

    /// Directory segment preceding the template fragment in source paths.
    pub template_root: String,

    /// Template file extension, without the leading dot.
    pub template_extension: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            namespace: "Bake".to_string(),
            template_root: "Bake".to_string(),
            template_extension: "ctp".to_string(),
        }
    }
}

impl RouterConfig {
    /// Reject empty segments; they would make every path match.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("namespace", &self.namespace),
            ("template_root", &self.template_root),
            ("template_extension", &self.template_extension),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(format!("{} cannot be empty", field)));
            }
        }
        Ok(())
    }

    /// Path marker searched for in the source path, e.g. `Bake/Model/table.ctp`.
    pub fn template_marker(&self, fragment: &str) -> String {
        format!(
            "{}/{}.{}",
            self.template_root, fragment, self.template_extension
        )
    }

    /// Fully-qualified event name, e.g. `Bake.beforeRenderTable`.
    pub fn event_name(&self, callback_name: &str) -> String {
        format!("{}.{}", self.namespace, callback_name)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
