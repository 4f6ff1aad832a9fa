//! Continuity audit: mechanical cross-stage checks over the narrative.
//!
//! Complements the editor stage with findings that do not depend on the
//! backend: timeline references outside the cast, characters whose alibi is
//! never placed on the timeline, and evidence graphs with no discoverable path
//! to the murderer.

use crate::narrative::known_names;
use crate::schema::{
    normalize_name, CharacterRoster, ConsistencyIssue, CorePremise, EvidenceGraph, IssueSource,
    Severity, Timeline,
};
use std::collections::HashSet;

pub const KIND_REFERENCE: &str = "unknown_character_reference";
pub const KIND_ALIBI: &str = "unplaced_alibi";
pub const KIND_SOLVABILITY: &str = "unsolvable";

/// A timeline name outside {victim, murderer} and the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownReference {
    pub event_index: usize,
    pub time: String,
    pub name: String,
}

/// Closed-world reference check for a timeline.
pub fn unknown_references(
    core: &CorePremise,
    roster: &CharacterRoster,
    timeline: &Timeline,
) -> Vec<UnknownReference> {
    let known = known_names(Some(core), Some(roster));
    timeline
        .references()
        .filter(|(_, name)| !known.contains(&normalize_name(name)))
        .map(|(event_index, name)| UnknownReference {
            event_index,
            time: timeline.events[event_index].time.clone(),
            name: name.to_string(),
        })
        .collect()
}

/// Roster characters that appear in no timeline event.
pub fn unplaced_characters<'a>(roster: &'a CharacterRoster, timeline: &Timeline) -> Vec<&'a str> {
    let placed: HashSet<String> = timeline
        .references()
        .map(|(_, name)| normalize_name(name))
        .collect();
    roster
        .names()
        .filter(|name| !placed.contains(&normalize_name(name)))
        .collect()
}

/// Lowercase alphanumeric words, so "Dr. Marsh's" becomes `["dr", "marsh", "s"]`.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether any needle appears in `text` as a run of whole words.
fn mentions(text: &str, needles: &[Vec<String>]) -> bool {
    let haystack = words(text);
    needles.iter().any(|needle| {
        !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle.as_slice())
    })
}

/// Whether some evidence reachable from the discoverable set names the murderer.
///
/// The murderer is matched by full name, or by surname when no other cast
/// member shares it. Matches are on whole words.
pub fn is_solvable(core: &CorePremise, roster: &CharacterRoster, evidence: &EvidenceGraph) -> bool {
    let full_name = words(&core.murderer.name);
    let mut needles = vec![full_name.clone()];

    if let Some(surname) = full_name.last().filter(|s| s.len() >= 3 && full_name.len() > 1) {
        let murderer = normalize_name(&core.murderer.name);
        let shared = known_names(Some(core), Some(roster))
            .iter()
            .filter(|name| **name != murderer)
            .any(|name| words(name).contains(surname));
        if !shared {
            needles.push(vec![surname.clone()]);
        }
    }

    evidence.reachable().into_iter().any(|i| {
        let item = &evidence.items[i];
        mentions(&item.true_significance, &needles)
            || item.leads_to.iter().any(|target| mentions(target, &needles))
    })
}

fn finding(kind: &str, description: String, severity: Severity, fix: &str) -> ConsistencyIssue {
    ConsistencyIssue {
        kind: kind.to_string(),
        description,
        severity: severity.as_str().to_string(),
        suggested_fix: fix.to_string(),
        source: IssueSource::Audit,
    }
}

/// Run every check and return findings tagged with the audit source.
pub fn audit_narrative(
    core: &CorePremise,
    roster: &CharacterRoster,
    timeline: &Timeline,
    evidence: &EvidenceGraph,
) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();

    for reference in unknown_references(core, roster, timeline) {
        issues.push(finding(
            KIND_REFERENCE,
            format!(
                "Timeline event {} at {} involves '{}', who is not in the cast",
                reference.event_index, reference.time, reference.name
            ),
            Severity::High,
            "Add the character to the roster or remove them from the event",
        ));
    }

    for name in unplaced_characters(roster, timeline) {
        issues.push(finding(
            KIND_ALIBI,
            format!("{} states an alibi but appears in no timeline event", name),
            Severity::Medium,
            "Add a timeline event that places the character where their alibi says",
        ));
    }

    if !is_solvable(core, roster, evidence) {
        issues.push(finding(
            KIND_SOLVABILITY,
            format!(
                "No discoverable chain of evidence identifies {}",
                core.murderer.name
            ),
            Severity::High,
            "Connect a discoverable item to evidence whose significance names the murderer",
        ));
    }

    issues
}
