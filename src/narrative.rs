//! Narrative State Accumulator
//!
//! The running aggregate of records produced by completed stages. Each slot is
//! written once and never mutated afterwards; an aborted run simply stops
//! filling slots.

use crate::error::ApiError;
use crate::schema::{
    normalize_name, CharacterRoster, ConsistencyReport, CorePremise, EvidenceGraph, Timeline,
};
use crate::types::Stage;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NarrativeState {
    core: Option<CorePremise>,
    characters: Option<CharacterRoster>,
    timeline: Option<Timeline>,
    evidence: Option<EvidenceGraph>,
    report: Option<ConsistencyReport>,
}

fn fill<T>(slot: &mut Option<T>, value: T, stage: Stage) -> Result<(), ApiError> {
    if slot.is_some() {
        return Err(ApiError::AlreadyRecorded(stage));
    }
    *slot = Some(value);
    Ok(())
}

impl NarrativeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_core(&mut self, core: CorePremise) -> Result<(), ApiError> {
        fill(&mut self.core, core, Stage::CorePremise)
    }

    pub fn record_characters(&mut self, roster: CharacterRoster) -> Result<(), ApiError> {
        fill(&mut self.characters, roster, Stage::CharacterRoster)
    }

    pub fn record_timeline(&mut self, timeline: Timeline) -> Result<(), ApiError> {
        fill(&mut self.timeline, timeline, Stage::Timeline)
    }

    pub fn record_evidence(&mut self, evidence: EvidenceGraph) -> Result<(), ApiError> {
        fill(&mut self.evidence, evidence, Stage::EvidenceGraph)
    }

    pub fn record_report(&mut self, report: ConsistencyReport) -> Result<(), ApiError> {
        fill(&mut self.report, report, Stage::ConsistencyReport)
    }

    pub fn core(&self) -> Option<&CorePremise> {
        self.core.as_ref()
    }

    pub fn characters(&self) -> Option<&CharacterRoster> {
        self.characters.as_ref()
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn evidence(&self) -> Option<&EvidenceGraph> {
        self.evidence.as_ref()
    }

    pub fn report(&self) -> Option<&ConsistencyReport> {
        self.report.as_ref()
    }

    /// Stages whose records are present, in execution order.
    pub fn completed_stages(&self) -> Vec<Stage> {
        let present = [
            self.core.is_some(),
            self.characters.is_some(),
            self.timeline.is_some(),
            self.evidence.is_some(),
            self.report.is_some(),
        ];
        Stage::ALL
            .iter()
            .zip(present)
            .filter(|(_, done)| *done)
            .map(|(stage, _)| *stage)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.completed_stages().len() == Stage::ALL.len()
    }

    /// Normalized names a timeline may reference: victim, murderer and roster.
    pub fn known_names(&self) -> HashSet<String> {
        known_names(self.core.as_ref(), self.characters.as_ref())
    }
}

/// Closed-world name set built from a premise and roster.
pub fn known_names(
    core: Option<&CorePremise>,
    roster: Option<&CharacterRoster>,
) -> HashSet<String> {
    let mut names = HashSet::new();
    if let Some(core) = core {
        names.insert(normalize_name(&core.victim.name));
        names.insert(normalize_name(&core.murderer.name));
    }
    if let Some(roster) = roster {
        names.extend(roster.names().map(normalize_name));
    }
    names
}
