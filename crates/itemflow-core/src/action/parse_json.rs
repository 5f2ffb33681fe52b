//! JSON parsing: JSON text becomes a parsed document.

use crate::error::ActionError;
use crate::item::{Item, Kind, Payload};

use super::Process;

/// Classifier of a parsed JSON document.
pub const PARSED_JSON_CLASSIFIER: &str = "object/json";

/// Parses JSON text with `serde_json`.
///
/// An empty payload parses as `null` so placeholder items still reach the
/// object form.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParseJsonAction;

impl ParseJsonAction {
    pub fn new() -> Self {
        Self
    }
}

impl Process for ParseJsonAction {
    fn name(&self) -> &str {
        "parse-json"
    }

    fn can_process(&self, item: &Item) -> bool {
        item.kind() == Kind::Json && matches!(item.payload(), Payload::Bytes(_) | Payload::Empty)
    }

    fn process(&self, item: &Item) -> Result<Item, ActionError> {
        if item.kind() != Kind::Json {
            return Err(ActionError::Unsupported { kind: item.kind() });
        }
        let value = match item.payload() {
            Payload::Empty => serde_json::Value::Null,
            Payload::Bytes(bytes) => {
                let bytes = bytes
                    .strip_prefix(&[0xEF, 0xBB, 0xBF])
                    .unwrap_or(bytes.as_slice());
                serde_json::from_slice(bytes)?
            }
            other => {
                return Err(ActionError::UnexpectedPayload {
                    expected: "bytes",
                    found: other.variant_name(),
                })
            }
        };
        Ok(Item::new(Payload::Json(value), PARSED_JSON_CLASSIFIER))
    }
}
