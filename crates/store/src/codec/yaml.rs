//! YAML codec — used when a store URI names `codec=yaml` (or `.yaml`/
//! `.yml` file extensions imply it, per `codec::for_uri`).

use super::traits::{Codec, CodecError};
use provision_core::Value;

/// YAML codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        serde_yaml::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        serde_yaml::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn id(&self) -> &'static str {
        "yaml"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips() {
        let codec = YamlCodec;
        let v = json!({"addr": "192.168.1.0"});
        let bytes = codec.encode(&v).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), v);
    }
}
