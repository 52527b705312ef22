//! Codec seam: JSON and YAML, selected per physical store by the
//! `codec=` query parameter on its URI or, failing that, by file
//! extension.

mod json;
mod traits;
mod yaml;

pub use json::JsonCodec;
pub use traits::{Codec, CodecError};
pub use yaml::YamlCodec;

/// Resolve a codec by its identifier (`"json"` or `"yaml"`).
pub fn get_codec(id: &str) -> Result<Box<dyn Codec>, CodecError> {
    match id {
        "json" => Ok(Box::new(JsonCodec)),
        "yaml" | "yml" => Ok(Box::new(YamlCodec)),
        other => Err(CodecError::Unknown(other.to_string())),
    }
}

/// Infer a codec id from a file extension, defaulting to JSON.
///
/// Per the external interface: codec defaults to JSON; `.yaml`/`.yml`
/// extensions imply YAML when no explicit `codec=` was given.
pub fn id_for_extension(ext: Option<&str>) -> &'static str {
    match ext {
        Some("yaml") | Some("yml") => "yaml",
        _ => "json",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_json() {
        assert_eq!(get_codec("json").unwrap().id(), "json");
    }

    #[test]
    fn get_yaml_variants() {
        assert_eq!(get_codec("yaml").unwrap().id(), "yaml");
        assert_eq!(get_codec("yml").unwrap().id(), "yaml");
    }

    #[test]
    fn get_unknown_is_error() {
        assert!(matches!(get_codec("toml"), Err(CodecError::Unknown(_))));
    }

    #[test]
    fn extension_inference() {
        assert_eq!(id_for_extension(Some("yaml")), "yaml");
        assert_eq!(id_for_extension(Some("yml")), "yaml");
        assert_eq!(id_for_extension(Some("json")), "json");
        assert_eq!(id_for_extension(None), "json");
    }
}
