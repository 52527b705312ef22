//! Remote coordination-service physical store, accessed over HTTP.
//!
//! Wire layout: `GET {base}/subs` lists sub names, `GET {base}/{sub}`
//! lists keys, `GET {base}/{sub}/{key}` / `PUT` / `DELETE` act on a
//! single value. Values travel as JSON regardless of the store's
//! configured codec — the codec seam concerns on-disk encoding; a
//! coordination service speaks its own wire format.

use crate::physical::PhysicalStore;
use parking_lot::RwLock;
use provision_core::{Error, Metadata, Result, StoreType, Value};

/// A store backed by an HTTP coordination service.
pub struct RemoteStore {
    base_url: String,
    agent: ureq::Agent,
    metadata: RwLock<Option<Metadata>>,
    closed: RwLock<bool>,
}

impl std::fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore").field("base_url", &self.base_url).finish()
    }
}

impl RemoteStore {
    /// Point at a coordination service reachable at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        RemoteStore {
            base_url: base_url.into(),
            agent: ureq::Agent::new(),
            metadata: RwLock::new(None),
            closed: RwLock::new(false),
        }
    }

    fn check_open(&self) -> Result<()> {
        if *self.closed.read() {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.trim_end_matches('/').to_string();
        for seg in segments {
            url.push('/');
            url.push_str(seg);
        }
        url
    }
}

impl PhysicalStore for RemoteStore {
    fn store_type(&self) -> StoreType {
        StoreType::Remote
    }

    fn close(&self) -> Result<()> {
        *self.closed.write() = true;
        Ok(())
    }

    fn keys(&self, sub: &str) -> Result<Vec<String>> {
        self.check_open()?;
        let resp = self.agent.get(&self.url(&[sub])).call();
        match resp {
            Ok(response) => {
                let keys: Vec<String> = response
                    .into_json()
                    .map_err(|e| Error::Io(format!("malformed remote response: {e}")))?;
                let mut keys = keys;
                keys.sort();
                Ok(keys)
            }
            Err(ureq::Error::Status(404, _)) => Ok(Vec::new()),
            Err(e) => Err(Error::Io(e.to_string())),
        }
    }

    fn subs(&self) -> Vec<String> {
        let Ok(resp) = self.agent.get(&self.url(&["subs"])).call() else {
            return Vec::new();
        };
        resp.into_json().unwrap_or_default()
    }

    fn load(&self, sub: &str, key: &str) -> Result<Value> {
        self.check_open()?;
        match self.agent.get(&self.url(&[sub, key])).call() {
            Ok(response) => response
                .into_json()
                .map_err(|e| Error::Io(format!("malformed remote response: {e}"))),
            Err(ureq::Error::Status(404, _)) => Err(Error::not_found(sub, key)),
            Err(e) => Err(Error::Io(e.to_string())),
        }
    }

    fn save(&self, sub: &str, key: &str, value: &Value) -> Result<()> {
        self.check_open()?;
        self.agent
            .put(&self.url(&[sub, key]))
            .send_json(value.clone())
            .map_err(|e| Error::Io(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, sub: &str, key: &str) -> Result<()> {
        self.check_open()?;
        match self.agent.delete(&self.url(&[sub, key])).call() {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(404, _)) => Err(Error::not_found(sub, key)),
            Err(e) => Err(Error::Io(e.to_string())),
        }
    }

    fn location(&self) -> Option<String> {
        None
    }

    fn metadata(&self) -> Option<Metadata> {
        self.metadata.read().clone()
    }

    fn set_metadata(&self, metadata: Metadata) {
        *self.metadata.write() = Some(metadata);
    }
}
