//! YAML front matter handling.
//!
//! Documents produced by the normalized-rendering mirror may begin with a
//! delimited YAML block encoding page attributes (title, description, ...),
//! followed by the markdown body. `split` takes such a document apart and
//! `compose` is its inverse, so a stored document can be reconstructed
//! byte-for-byte from a search hit.

use serde_json::{Map, Value};
use thiserror::Error;

/// Page attributes carried in a front matter block. String keys, JSON values.
pub type Metadata = Map<String, Value>;

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("unterminated front matter block")]
    Unterminated,
    #[error("front matter is not a mapping")]
    NotAMapping,
    #[error("invalid front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

const DELIMITER: &str = "---";

/// Splits a document into its front matter block (if any) and body.
///
/// A document without a leading delimiter is returned whole with no
/// metadata. A leading delimiter with malformed YAML behind it is an error;
/// callers recover by treating the whole document as content.
pub fn split(text: &str) -> Result<(Option<Metadata>, String), FrontmatterError> {
    let text = text.trim();
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return Ok((None, text.to_string()));
    };

    let mut block_len = None;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            block_len = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }
    let (block_end, body_start) = block_len.ok_or(FrontmatterError::Unterminated)?;

    let parsed: serde_yaml::Value = serde_yaml::from_str(&rest[..block_end])?;
    let metadata = match parsed {
        serde_yaml::Value::Mapping(mapping) => mapping_to_json(mapping),
        serde_yaml::Value::Null => Metadata::new(),
        _ => return Err(FrontmatterError::NotAMapping),
    };

    let content = rest[body_start..].trim().to_string();
    Ok((Some(metadata), content))
}

/// Recombines metadata and content into a single front-mattered document.
pub fn compose(metadata: &Metadata, content: &str) -> Result<String, FrontmatterError> {
    let yaml = serde_yaml::to_string(metadata)?;
    Ok(format!(
        "{DELIMITER}\n{yaml}{DELIMITER}\n\n{content}"
    ))
}

/// Converts a YAML mapping into string-keyed JSON. Values JSON cannot hold
/// (tags, non-finite floats, non-string keys) degrade to their string
/// rendering instead of failing the whole document.
fn mapping_to_json(mapping: serde_yaml::Mapping) -> Metadata {
    let mut out = Metadata::new();
    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(s) => s,
            other => stringify(&other),
        };
        out.insert(key, yaml_to_json(value));
    }
    out
}

fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                match n.as_f64().and_then(serde_json::Number::from_f64) {
                    Some(f) => Value::Number(f),
                    None => Value::String(n.to_string()),
                }
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => Value::Object(mapping_to_json(mapping)),
        tagged @ serde_yaml::Value::Tagged(_) => Value::String(stringify(&tagged)),
    }
}

fn stringify(value: &serde_yaml::Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: Value) -> Metadata {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn document_without_block_has_no_metadata() {
        let (metadata, content) = split("# Just markdown\n\nBody text.").unwrap();
        assert!(metadata.is_none());
        assert_eq!(content, "# Just markdown\n\nBody text.");
    }

    #[test]
    fn splits_block_and_body() {
        let doc = "---\ntitle: A\ntags:\n  - web\n  - rust\n---\n\nHello";
        let (metadata, content) = split(doc).unwrap();
        assert_eq!(
            metadata.unwrap(),
            meta(json!({"title": "A", "tags": ["web", "rust"]}))
        );
        assert_eq!(content, "Hello");
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let doc = "---\ntitle: [unclosed\n---\n\nHello";
        assert!(matches!(split(doc), Err(FrontmatterError::Yaml(_))));
    }

    #[test]
    fn unterminated_block_is_an_error() {
        let doc = "---\ntitle: A\nno closing delimiter";
        assert!(matches!(split(doc), Err(FrontmatterError::Unterminated)));
    }

    #[test]
    fn scalar_block_is_rejected() {
        let doc = "---\njust a string\n---\n\nHello";
        assert!(matches!(split(doc), Err(FrontmatterError::NotAMapping)));
    }

    #[test]
    fn preserves_primitive_types() {
        let doc = "---\ncount: 3\nratio: 0.5\ndraft: false\nnote: null\n---\n\nBody";
        let (metadata, _) = split(doc).unwrap();
        assert_eq!(
            metadata.unwrap(),
            meta(json!({"count": 3, "ratio": 0.5, "draft": false, "note": null}))
        );
    }

    #[test]
    fn non_string_keys_degrade_to_strings() {
        let doc = "---\n2024: archived\n---\n\nBody";
        let (metadata, _) = split(doc).unwrap();
        assert_eq!(metadata.unwrap(), meta(json!({"2024": "archived"})));
    }

    #[test]
    fn round_trip_is_lossless() {
        let metadata = meta(json!({
            "title": "A page",
            "description": "What it is about",
            "words": 120
        }));
        let content = "First paragraph.\n\nSecond paragraph.";

        let document = compose(&metadata, content).unwrap();
        let (reparsed, body) = split(&document).unwrap();

        assert_eq!(reparsed.unwrap(), metadata);
        assert_eq!(body, content);
    }
}
