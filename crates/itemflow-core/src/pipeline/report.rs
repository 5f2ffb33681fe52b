//! Execution results.

use serde::Serialize;
use std::time::Duration;

use crate::item::{Item, ItemSummary};

/// One applied action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    /// Name of the action that fired
    pub action: String,
    /// Classifier of the item it received
    pub from: String,
    /// Classifier of the item it produced
    pub to: String,
}

/// Outcome of a completed execution.
#[derive(Debug)]
pub struct RunReport {
    /// Raw location the pipeline loaded
    pub location: String,
    /// The fixpoint item
    pub item: Item,
    /// Applied actions, in order
    pub steps: Vec<StepRecord>,
    /// Wall time from load to fixpoint
    pub elapsed: Duration,
}

impl RunReport {
    /// Serializable view of the report.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            location: self.location.clone(),
            item: self.item.summary(),
            steps: self.steps.clone(),
            elapsed_ms: self.elapsed.as_millis() as u64,
        }
    }
}

/// JSON output record for a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub location: String,
    pub item: ItemSummary,
    pub steps: Vec<StepRecord>,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Payload;

    #[test]
    fn test_summary_serializes() {
        let report = RunReport {
            location: "file://test.json".to_string(),
            item: Item::new(Payload::Json(serde_json::json!({})), "object/json"),
            steps: vec![StepRecord {
                action: "parse-json".to_string(),
                from: "json".to_string(),
                to: "object/json".to_string(),
            }],
            elapsed: Duration::from_millis(3),
        };

        let json = serde_json::to_value(report.summary()).unwrap();
        assert_eq!(json["location"], "file://test.json");
        assert_eq!(json["item"]["kind"], "object");
        assert_eq!(json["steps"][0]["action"], "parse-json");
        assert_eq!(json["elapsed_ms"], 3);
    }
}
