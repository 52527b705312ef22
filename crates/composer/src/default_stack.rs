//! Startup construction of a `DataStack` from a `DataStackConfig`
//! (spec §4.3 "DefaultDataStack"), grounded on `midlayer/stack.go`'s
//! function of the same name.

use crate::config::DataStackConfig;
use crate::DataStack;
use provision_core::{Error, Metadata, Result};
use provision_store::PhysicalStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

/// Build the startup `DataStack`: open the writable backend, optional
/// local/default content, and every SaaS content pack under
/// `saas_content_root`, then rebuild.
pub fn default_data_stack(config: &DataStackConfig, basic_content: Arc<dyn PhysicalStore>) -> Result<DataStack> {
    let write_content = open_backend(&config.backend_type, &config.data_root)?;
    write_content.set_metadata(Metadata {
        name: Some("BackingStore".into()),
        description: Some("Writable backing store".into()),
        version: Some("user".into()),
        ..Default::default()
    });

    let mut stack = DataStack::new(write_content, basic_content);

    if let Some(local) = &config.local_content {
        let local_store = provision_store::open(local)?;
        if name_of(&local_store).is_none() {
            local_store.set_metadata(Metadata {
                name: Some("LocalStore".into()),
                description: Some("Local Override Store".into()),
                version: Some("user".into()),
                ..Default::default()
            });
        }
        stack.local_content = Some(local_store);
    }

    if let Some(root) = &config.saas_content_root {
        stack.saas_contents = scan_saas_directory(root)?;
    }

    if let Some(default) = &config.default_content {
        let default_store = provision_store::open(default)?;
        if name_of(&default_store).is_none() {
            default_store.set_metadata(Metadata {
                name: Some("DefaultStore".into()),
                description: Some("Initial Default Content".into()),
                version: Some("user".into()),
                ..Default::default()
            });
        }
        stack.default_content = Some(default_store);
    }

    stack.build_stack()?;
    Ok(stack)
}

fn name_of(store: &Arc<dyn PhysicalStore>) -> Option<String> {
    store.metadata().and_then(|m| m.name().map(str::to_string))
}

/// `backend_type` is either a full store URI or a bare scheme to
/// combine with `data_root` (spec §6's store-URI grammar, both forms
/// accepted by the CLI per `server.go`'s `ProgOpts`).
fn open_backend(backend_type: &str, data_root: &str) -> Result<Arc<dyn PhysicalStore>> {
    if Url::parse(backend_type).map(|u| !u.scheme().is_empty()).unwrap_or(false) {
        provision_store::open(backend_type)
    } else {
        provision_store::open(&format!("{backend_type}://{data_root}"))
    }
}

/// Non-recursive scan of `root`: every regular file becomes a file
/// store keyed by its `Name` metadata field (spec §6 "SaaS content
/// directory layout").
fn scan_saas_directory(root: &str) -> Result<BTreeMap<String, Arc<dyn PhysicalStore>>> {
    let mut contents = BTreeMap::new();
    let entries = std::fs::read_dir(root)?;

    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let codec = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => "yaml",
            _ => "json",
        };
        let uri = format!("file://{}?codec={codec}", path.display());
        let store = provision_store::open(&uri)?;

        let name = name_of(&store).ok_or_else(|| {
            Error::config(format!("SaaS content file {} has no Name metadata", path.display()))
        })?;
        if contents.contains_key(&name) {
            return Err(Error::config(format!("duplicate SaaS content name '{name}'")));
        }
        contents.insert(name, store);
    }

    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn write_file(dir: &std::path::Path, name: &str, content: &serde_json::Value) {
        std::fs::write(dir.join(name), serde_json::to_vec(content).unwrap()).unwrap();
    }

    #[test]
    fn builds_from_bare_scheme_and_data_root() {
        let dir = tempdir().unwrap();
        let config = DataStackConfig {
            backend_type: "memory".to_string(),
            data_root: dir.path().display().to_string(),
            local_content: None,
            default_content: None,
            saas_content_root: None,
        };
        let stack = default_data_stack(&config, Arc::new(provision_store::MemoryStore::new())).unwrap();
        assert_eq!(stack.write_content.metadata().unwrap().name(), Some("BackingStore"));
    }

    #[test]
    fn scans_saas_directory_keyed_by_metadata_name() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "pack-a.json",
            &json!({"metadata": {"name": "pack-a"}, "subs": {"subnets": {}}}),
        );

        let config = DataStackConfig {
            backend_type: "memory".to_string(),
            data_root: "ignored".to_string(),
            local_content: None,
            default_content: None,
            saas_content_root: Some(dir.path().display().to_string()),
        };
        let stack = default_data_stack(&config, Arc::new(provision_store::MemoryStore::new())).unwrap();
        assert!(stack.saas_contents.contains_key("pack-a"));
    }

    #[test]
    fn rejects_duplicate_saas_names() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "a.json", &json!({"metadata": {"name": "dup"}}));
        write_file(dir.path(), "b.json", &json!({"metadata": {"name": "dup"}}));

        let err = scan_saas_directory(&dir.path().display().to_string()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
