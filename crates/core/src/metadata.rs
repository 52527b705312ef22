//! The small string-keyed metadata map a physical store may carry.
//!
//! Recognized keys per the external interface (`Name`, `Description`,
//! `Version`, `Type`) are promoted to fields; anything else a content
//! pack's file sets is preserved in `extra` rather than dropped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata attached to a physical store via `MetaData`/`SetMetaData`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Identifier used as the role-map key (SaaS/plugin content name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form version tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Semantic category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    /// Any other string key the source file carried.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Metadata {
    /// Build metadata with only a name set — the common case when a
    /// role slot assigns a default identity to a backing store.
    pub fn named(name: impl Into<String>) -> Self {
        Metadata {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Read the `Name` key, falling back to `extra["Name"]` for metadata
    /// loaded from a raw string map that didn't go through this type.
    pub fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.extra.get("Name").map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_sets_name_only() {
        let m = Metadata::named("BackingStore");
        assert_eq!(m.name(), Some("BackingStore"));
        assert!(m.description.is_none());
    }

    #[test]
    fn name_falls_back_to_extra() {
        let mut m = Metadata::default();
        m.extra.insert("Name".to_string(), "pack-a".to_string());
        assert_eq!(m.name(), Some("pack-a"));
    }

    proptest::proptest! {
        /// Any metadata built from the recognized fields round-trips through
        /// a JSON encode/decode cycle with no loss (the shape every physical
        /// store's `MetaData`/`SetMetaData` persists across a reopen).
        #[test]
        fn metadata_round_trips_through_json(
            name in proptest::option::of("[a-zA-Z0-9_-]{1,16}"),
            description in proptest::option::of(".{0,32}"),
            version in proptest::option::of("[0-9]{1,3}\\.[0-9]{1,3}"),
        ) {
            let metadata = Metadata {
                name,
                description,
                version,
                r#type: None,
                extra: Default::default(),
            };
            let encoded = serde_json::to_vec(&metadata).unwrap();
            let decoded: Metadata = serde_json::from_slice(&encoded).unwrap();
            proptest::prop_assert_eq!(metadata, decoded);
        }
    }
}
