//! The closed set of physical store variants and their URI scheme names.

use crate::error::Error;
use std::fmt;

/// Tag identifying which physical store variant backs a store.
///
/// Closed set: `Open` rejects any scheme outside this list with
/// `Error::Config`, and `cleanup()` only knows how to remove on-disk
/// artifacts for the variants that have any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreType {
    /// In-memory, never persisted.
    Memory,
    /// Single flat file holding one serialized blob per sub.
    File,
    /// Directory tree of files, one file per (sub, key).
    Directory,
    /// Embedded B-tree file (the Bolt-equivalent backing store).
    Bolt,
    /// Remote coordination service accessed over HTTP.
    Remote,
}

impl StoreType {
    /// Parse a URI scheme into a store type.
    pub fn from_scheme(scheme: &str) -> std::result::Result<Self, Error> {
        match scheme {
            "memory" => Ok(StoreType::Memory),
            "file" => Ok(StoreType::File),
            "directory" => Ok(StoreType::Directory),
            "bolt" => Ok(StoreType::Bolt),
            "consul" | "remote" => Ok(StoreType::Remote),
            other => Err(Error::config(format!("unknown store scheme: {other}"))),
        }
    }

    /// The canonical scheme name for this store type.
    pub fn scheme(&self) -> &'static str {
        match self {
            StoreType::Memory => "memory",
            StoreType::File => "file",
            StoreType::Directory => "directory",
            StoreType::Bolt => "bolt",
            StoreType::Remote => "remote",
        }
    }

    /// Whether this variant owns on-disk artifacts that `cleanup()`
    /// should remove once a store is displaced by a rebuild.
    pub fn owns_local_artifact(&self) -> bool {
        matches!(self, StoreType::File | StoreType::Directory | StoreType::Bolt)
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_schemes_parse() {
        assert_eq!(StoreType::from_scheme("memory").unwrap(), StoreType::Memory);
        assert_eq!(StoreType::from_scheme("bolt").unwrap(), StoreType::Bolt);
        assert_eq!(StoreType::from_scheme("consul").unwrap(), StoreType::Remote);
    }

    #[test]
    fn unknown_scheme_is_config_error() {
        assert!(matches!(
            StoreType::from_scheme("ftp"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn ownership_matches_variant() {
        assert!(StoreType::File.owns_local_artifact());
        assert!(StoreType::Directory.owns_local_artifact());
        assert!(StoreType::Bolt.owns_local_artifact());
        assert!(!StoreType::Memory.owns_local_artifact());
        assert!(!StoreType::Remote.owns_local_artifact());
    }
}
