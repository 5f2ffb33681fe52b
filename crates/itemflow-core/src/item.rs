//! Items: the immutable values flowing through a pipeline.
//!
//! An item pairs a payload with a classifier string. The coarse [`Kind`] is
//! always re-derived from the classifier, never stored alongside it.

use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse content category derived from a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Unknown,
    Image,
    Compressed,
    Json,
    Object,
}

/// Classifier prefixes in priority order; the first match wins.
const CLASSIFIER_PREFIXES: [(&str, Kind); 4] = [
    ("image", Kind::Image),
    ("json", Kind::Json),
    ("zip", Kind::Compressed),
    ("object", Kind::Object),
];

/// Map a classifier string to its [`Kind`].
///
/// Total and pure: unmatched strings (including `""`) are `Kind::Unknown`.
pub fn classify(classifier: &str) -> Kind {
    CLASSIFIER_PREFIXES
        .iter()
        .find(|(prefix, _)| classifier.starts_with(prefix))
        .map(|(_, kind)| *kind)
        .unwrap_or(Kind::Unknown)
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Unknown => "unknown",
            Kind::Image => "image",
            Kind::Compressed => "compressed",
            Kind::Json => "json",
            Kind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Item content. The universe of payloads is closed so actions can match on
/// it exhaustively.
#[derive(Debug, Clone)]
pub enum Payload {
    /// No content (placeholder items)
    Empty,
    /// Raw, still-encoded bytes
    Bytes(Vec<u8>),
    /// A decoded bitmap
    Image(DynamicImage),
    /// A parsed JSON document
    Json(serde_json::Value),
}

impl Payload {
    /// Variant name, used in error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Payload::Empty => "empty",
            Payload::Bytes(_) => "bytes",
            Payload::Image(_) => "image",
            Payload::Json(_) => "json",
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&DynamicImage> {
        match self {
            Payload::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// A payload plus the classifier describing its current form.
///
/// Items are never mutated; actions build a new item from the one they receive.
#[derive(Debug, Clone)]
pub struct Item {
    payload: Payload,
    classifier: String,
}

impl Item {
    pub fn new(payload: Payload, classifier: impl Into<String>) -> Self {
        Self {
            payload,
            classifier: classifier.into(),
        }
    }

    /// Shorthand for an item holding raw bytes.
    pub fn from_bytes(bytes: Vec<u8>, classifier: impl Into<String>) -> Self {
        Self::new(Payload::Bytes(bytes), classifier)
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn classifier(&self) -> &str {
        &self.classifier
    }

    /// Kind derived from the classifier on every call.
    pub fn kind(&self) -> Kind {
        classify(&self.classifier)
    }

    /// Serializable description of the item.
    pub fn summary(&self) -> ItemSummary {
        let payload = match &self.payload {
            Payload::Empty => PayloadSummary::Empty,
            Payload::Bytes(bytes) => PayloadSummary::Bytes {
                len: bytes.len(),
                content_hash: blake3::hash(bytes).to_hex().to_string(),
            },
            Payload::Image(image) => {
                let (width, height) = image.dimensions();
                PayloadSummary::Image {
                    width,
                    height,
                    color: format!("{:?}", image.color()),
                }
            }
            Payload::Json(value) => PayloadSummary::Json {
                value_type: json_type_name(value),
            },
        };

        ItemSummary {
            classifier: self.classifier.clone(),
            kind: self.kind(),
            payload,
        }
    }
}

/// Output record for a final item.
#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub classifier: String,
    pub kind: Kind,
    pub payload: PayloadSummary,
}

/// Payload description inside an [`ItemSummary`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PayloadSummary {
    Empty,
    Bytes {
        len: usize,
        /// BLAKE3 hex digest of the bytes
        content_hash: String,
    },
    Image {
        width: u32,
        height: u32,
        color: String,
    },
    Json {
        value_type: &'static str,
    },
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_examples() {
        assert_eq!(classify("image/png"), Kind::Image);
        assert_eq!(classify("jsonl-thing"), Kind::Json);
        assert_eq!(classify("zipfile"), Kind::Compressed);
        assert_eq!(classify("object/json"), Kind::Object);
        assert_eq!(classify(""), Kind::Unknown);
    }

    #[test]
    fn test_classify_prefix_at_position_zero_only() {
        assert_eq!(classify("application/json"), Kind::Unknown);
        assert_eq!(classify("x-image"), Kind::Unknown);
        assert_eq!(classify("Image/png"), Kind::Unknown);
    }

    #[test]
    fn test_classify_is_deterministic() {
        for s in ["image", "json", "zip", "object", "other", ""] {
            assert_eq!(classify(s), classify(s));
        }
    }

    #[test]
    fn test_kind_follows_classifier() {
        let item = Item::new(Payload::Empty, "json");
        assert_eq!(item.kind(), Kind::Json);
        assert_eq!(item.classifier(), "json");
    }

    #[test]
    fn test_summary_bytes_hash() {
        let item = Item::from_bytes(b"{}".to_vec(), "json");
        let summary = item.summary();
        match summary.payload {
            PayloadSummary::Bytes { len, content_hash } => {
                assert_eq!(len, 2);
                assert_eq!(content_hash.len(), 64);
            }
            other => panic!("unexpected summary: {other:?}"),
        }
    }

    #[test]
    fn test_summary_image_dimensions() {
        let item = Item::new(
            Payload::Image(DynamicImage::new_rgb8(4, 3)),
            "object/image",
        );
        let json = serde_json::to_value(item.summary()).unwrap();
        assert_eq!(json["kind"], "object");
        assert_eq!(json["payload"]["type"], "image");
        assert_eq!(json["payload"]["width"], 4);
        assert_eq!(json["payload"]["height"], 3);
    }

    #[test]
    fn test_payload_accessors() {
        let payload = Payload::Json(serde_json::json!({"a": 1}));
        assert!(payload.as_json().is_some());
        assert!(payload.as_bytes().is_none());
        assert_eq!(payload.variant_name(), "json");
    }
}
