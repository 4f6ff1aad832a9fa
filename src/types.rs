//! Shared identifiers for the generation pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the pipeline, each producing exactly one record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CorePremise,
    CharacterRoster,
    Timeline,
    EvidenceGraph,
    ConsistencyReport,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 5] = [
        Stage::CorePremise,
        Stage::CharacterRoster,
        Stage::Timeline,
        Stage::EvidenceGraph,
        Stage::ConsistencyReport,
    ];

    /// Zero-based position in execution order.
    pub fn index(self) -> usize {
        match self {
            Stage::CorePremise => 0,
            Stage::CharacterRoster => 1,
            Stage::Timeline => 2,
            Stage::EvidenceGraph => 3,
            Stage::ConsistencyReport => 4,
        }
    }

    /// The stage that runs after this one, if any.
    pub fn next(self) -> Option<Stage> {
        Stage::ALL.get(self.index() + 1).copied()
    }

    /// Lower-case label used in progress lines ("Generating core story...").
    pub fn progress_label(self) -> &'static str {
        match self {
            Stage::CorePremise => "Generating core story...",
            Stage::CharacterRoster => "Generating characters...",
            Stage::Timeline => "Generating timeline...",
            Stage::EvidenceGraph => "Generating evidence...",
            Stage::ConsistencyReport => "Validating mystery consistency...",
        }
    }

    /// Heading printed above a successful stage's record.
    pub fn result_heading(self) -> &'static str {
        match self {
            Stage::CorePremise => "Core story generated:",
            Stage::CharacterRoster => "Characters generated:",
            Stage::Timeline => "Timeline generated:",
            Stage::EvidenceGraph => "Evidence generated:",
            Stage::ConsistencyReport => "Validation results:",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::CorePremise => "core premise",
            Stage::CharacterRoster => "character roster",
            Stage::Timeline => "timeline",
            Stage::EvidenceGraph => "evidence graph",
            Stage::ConsistencyReport => "consistency report",
        };
        f.write_str(name)
    }
}
