//! Stage Schemas
//!
//! The five record types exchanged between pipeline stages. Each record is
//! deserialized from the backend's JSON text and then checked structurally;
//! a record that fails either step never enters the narrative state.

use crate::error::{StageFailure, StageOutcome};
use crate::types::Stage;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod evidence;
pub mod premise;
pub mod report;
pub mod roster;
pub mod timeline;

pub use evidence::{EvidenceConnection, EvidenceGraph, EvidenceItem, EvidenceRequirements};
pub use premise::{CorePremise, Murderer, MurderMethod, Setting, Victim};
pub use report::{ConsistencyIssue, ConsistencyReport, IssueSource, Severity};
pub use roster::{Character, CharacterRoster, MAX_ROSTER_SIZE, MIN_ROSTER_SIZE};
pub use timeline::{Timeline, TimelineEvent};

/// A record produced by exactly one stage.
pub trait StageRecord: Serialize + DeserializeOwned {
    /// The stage that produces this record.
    const STAGE: Stage;

    /// Literal structural template embedded in the stage prompt.
    const TEMPLATE: &'static str;

    /// Structural problems with an already-deserialized record. Empty when valid.
    fn schema_violations(&self) -> Vec<String>;
}

/// Parse backend text into a stage record and check its structure.
pub fn parse_record<R: StageRecord>(text: &str) -> StageOutcome<R> {
    let record: R = match serde_json::from_str(text) {
        Ok(record) => record,
        Err(e) => {
            return StageOutcome::Failure(StageFailure::StructuredParse {
                stage: R::STAGE,
                reason: e.to_string(),
            })
        }
    };

    let violations = record.schema_violations();
    if violations.is_empty() {
        StageOutcome::Success(record)
    } else {
        StageOutcome::Failure(StageFailure::SchemaViolation {
            stage: R::STAGE,
            violations,
        })
    }
}

/// Canonical form used when comparing character or evidence names.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub(crate) fn require_text(violations: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        violations.push(format!("{} must not be empty", field));
    }
}
