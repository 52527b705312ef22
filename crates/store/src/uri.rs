//! Store URI parsing: `scheme://path[?codec=json|yaml]`.

use provision_core::{Error, Result, StoreType};
use url::Url;

/// A parsed store URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreUri {
    /// The store variant named by the scheme.
    pub store_type: StoreType,
    /// The path or host+path portion, scheme-dependent.
    pub path: String,
    /// Explicit `codec=` query parameter, if present.
    pub codec: Option<String>,
}

impl StoreUri {
    /// Parse a URI of shape `scheme://path?codec=json|yaml`.
    pub fn parse(uri: &str) -> Result<Self> {
        let url = Url::parse(uri).map_err(|e| Error::config(format!("invalid store URI '{uri}': {e}")))?;
        let store_type = StoreType::from_scheme(url.scheme())?;

        let path = match store_type {
            StoreType::Remote => {
                let host = url.host_str().unwrap_or_default();
                let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
                format!("{host}{port}{}", url.path())
            }
            _ => {
                // `scheme:///abs/path` parses with no host and an
                // absolute `url.path()`; `scheme://data` (relative form,
                // as `DefaultDataStack` builds from a bare data root)
                // parses `data` as the host and an empty path.
                match url.host_str() {
                    Some(host) => format!("{host}{}", url.path()),
                    None => url.path().to_string(),
                }
            }
        };

        let codec = url
            .query_pairs()
            .find(|(k, _)| k == "codec")
            .map(|(_, v)| v.into_owned());

        Ok(StoreUri { store_type, path, codec })
    }

    /// Resolve the codec identifier: explicit `codec=` wins, otherwise
    /// infer from the path's file extension, defaulting to JSON.
    pub fn codec_id(&self) -> &str {
        if let Some(codec) = &self.codec {
            return codec;
        }
        let ext = std::path::Path::new(&self.path)
            .extension()
            .and_then(|e| e.to_str());
        crate::codec::id_for_extension(ext)
    }
}
