//! Startup configuration for [`crate::default_data_stack`], modeled on
//! the CLI flags `server.go`'s `ProgOpts` exposes for the same purpose.

use serde::{Deserialize, Serialize};

/// Configuration for building the initial `DataStack` at startup.
///
/// Typically loaded from a TOML config file via `toml::from_str`, with
/// CLI flags overriding individual fields before
/// [`crate::default_data_stack`] is called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataStackConfig {
    /// Either a full store URI (`bolt:///var/lib/dr-provision/store.db`)
    /// or a bare scheme (`bolt`, `file`, `memory`) combined with
    /// `data_root` to build one.
    pub backend_type: String,
    /// Root directory backing a bare `backend_type` scheme.
    pub data_root: String,
    /// Optional local-override content store URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_content: Option<String>,
    /// Optional default content store URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_content: Option<String>,
    /// Directory scanned non-recursively for SaaS content packs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saas_content_root: Option<String>,
}

impl DataStackConfig {
    /// Parse a `DataStackConfig` from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
