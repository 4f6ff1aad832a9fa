//! Stage prompts: a fixed persona per stage plus a user prompt built from a
//! narrow projection of earlier records and the literal output template.
//!
//! Later prompts restate concrete names and times from earlier stages so the
//! backend generates against established facts. This is advisory grounding
//! only; mechanical checks live in `schema` and `audit`.

use crate::schema::{
    CharacterRoster, ConsistencyReport, CorePremise, EvidenceGraph, StageRecord, Timeline,
};
use serde::Serialize;

pub const WRITER_PERSONA: &str = "You are a mystery writer specializing in murder mysteries. \
You excel at creating compelling core premises that can be expanded into full stories.";

pub const CHARACTER_DESIGNER_PERSONA: &str = "You are a character designer for murder mysteries. \
You excel at creating interconnected casts of characters with complex relationships and motives.";

pub const PLOT_DESIGNER_PERSONA: &str = "You are a mystery plot designer specializing in creating \
detailed, consistent timelines that account for all character movements and key events.";

pub const FORENSICS_PERSONA: &str = "You are a forensics expert and mystery designer. You excel at \
creating networks of evidence that form a solvable trail while maintaining plausible red herrings.";

pub const EDITOR_PERSONA: &str = "You are a mystery editor specializing in detecting plot holes, \
timeline inconsistencies, and logical errors in mystery narratives.";

/// Instruction and prompt for one gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePrompt {
    pub instruction: &'static str,
    pub prompt: String,
}

fn format_section<R: StageRecord>() -> String {
    format!(
        "Format your response as a JSON object with the following structure:\n{}",
        R::TEMPLATE
    )
}

pub fn core_premise() -> StagePrompt {
    let prompt = format!(
        "Create a core murder mystery premise. Include:\n\
         1. The setting (time and place)\n\
         2. The victim (who they are and why they were targeted)\n\
         3. The murderer (who they are and their motive)\n\
         4. The basic method of murder\n\
         5. The key twist that makes this interesting\n\n\
         {}",
        format_section::<CorePremise>()
    );
    StagePrompt {
        instruction: WRITER_PERSONA,
        prompt,
    }
}

pub fn character_roster(core: &CorePremise) -> StagePrompt {
    let prompt = format!(
        "Given this core mystery:\n\
         Setting: {location} in {period}\n\
         Victim: {victim}, {victim_job}\n\
         Murderer: {murderer}, {murderer_job}\n\n\
         Create a cast of 5-7 additional suspects/witnesses who would be present at the scene.\n\
         Each character should have:\n\
         1. A connection to the victim\n\
         2. A potential motive for murder (even if they're innocent)\n\
         3. A secret they're hiding (may or may not be related to the murder)\n\
         4. Their whereabouts during the murder, stated as a time window\n\n\
         Do not include the victim or the murderer in the cast.\n\n\
         {format}",
        location = core.setting.location,
        period = core.setting.time_period,
        victim = core.victim.name,
        victim_job = core.victim.occupation,
        murderer = core.murderer.name,
        murderer_job = core.murderer.occupation,
        format = format_section::<CharacterRoster>(),
    );
    StagePrompt {
        instruction: CHARACTER_DESIGNER_PERSONA,
        prompt,
    }
}

pub fn timeline(core: &CorePremise, roster: &CharacterRoster) -> StagePrompt {
    let suspects = roster
        .characters
        .iter()
        .map(|c| format!("- {}: {}", c.name, c.alibi))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        "Given this murder mystery:\n\
         Setting: {location} in {period}\n\
         Time of Murder: {time}\n\
         Victim: {victim}\n\
         Murderer: {murderer}\n\
         Murder Method: {circumstances}\n\n\
         Suspects and their stated alibis:\n{suspects}\n\n\
         Create a detailed timeline of events spanning from 2 hours before to 2 hours after the murder.\n\
         Include movements and actions for:\n\
         1. The victim's final hours\n\
         2. The murderer's preparations and actions\n\
         3. Key movements of all suspects\n\
         4. Important events that create alibis or opportunities\n\n\
         Only list the victim, the murderer and the suspects above in characters_involved, \
         using their names exactly as written.\n\n\
         {format}\n\n\
         Ensure all character movements are consistent with their provided alibis.",
        location = core.setting.location,
        period = core.setting.time_period,
        time = core.setting.specific_time,
        victim = core.victim.name,
        murderer = core.murderer.name,
        circumstances = core.murder_method.circumstances,
        suspects = suspects,
        format = format_section::<Timeline>(),
    );
    StagePrompt {
        instruction: PLOT_DESIGNER_PERSONA,
        prompt,
    }
}

pub fn evidence_graph(
    core: &CorePremise,
    roster: &CharacterRoster,
    timeline: &Timeline,
) -> StagePrompt {
    let suspects = roster.names().collect::<Vec<_>>().join(", ");
    let events = timeline
        .events
        .iter()
        .map(|e| format!("- {}: {}", e.time, e.event))
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        "Given this murder mystery:\n\
         Setting: {location}\n\
         Murder Method: {weapon}\n\
         Key Twist: {twist}\n\
         True Murderer: {murderer}\n\
         Suspects: {suspects}\n\
         Timeline:\n{events}\n\n\
         Create a collection of evidence that will be discovered during the investigation. Include:\n\
         1. Physical evidence at the crime scene\n\
         2. Documentary evidence (notes, letters, receipts, etc.)\n\
         3. Witness testimonies or observations\n\
         4. Red herrings that seem important but lead to wrong conclusions\n\
         5. Key evidence that points to the real killer\n\n\
         For each piece of evidence, specify:\n\
         - Where it's found\n\
         - Initial interpretation\n\
         - True significance\n\
         - Requirements to discover it (if any)\n\n\
         Every evidence_a and evidence_b must be the name of an item in the evidence list.\n\n\
         {format}",
        location = core.setting.location,
        weapon = core.murder_method.weapon,
        twist = core.key_twist,
        murderer = core.murderer.name,
        suspects = suspects,
        events = events,
        format = format_section::<EvidenceGraph>(),
    );
    StagePrompt {
        instruction: FORENSICS_PERSONA,
        prompt,
    }
}

#[derive(Serialize)]
struct NarrativeView<'a> {
    core: &'a CorePremise,
    characters: &'a CharacterRoster,
    timeline: &'a Timeline,
    evidence: &'a EvidenceGraph,
}

pub fn consistency(
    core: &CorePremise,
    roster: &CharacterRoster,
    timeline: &Timeline,
    evidence: &EvidenceGraph,
) -> StagePrompt {
    let view = NarrativeView {
        core,
        characters: roster,
        timeline,
        evidence,
    };
    // Serializing plain string-keyed structs cannot fail.
    let narrative = serde_json::to_string_pretty(&view).unwrap_or_default();

    let prompt = format!(
        "Review this mystery's components for consistency and logic.\n\n\
         Mystery:\n{narrative}\n\n\
         Check for:\n\
         1. Timeline contradictions\n\
         2. Evidence that couldn't exist given the sequence of events\n\
         3. Alibis that don't make sense\n\
         4. Plot holes in the central mystery\n\
         5. Ensure the mystery is solvable with the given evidence\n\n\
         {format}",
        narrative = narrative,
        format = format_section::<ConsistencyReport>(),
    );
    StagePrompt {
        instruction: EDITOR_PERSONA,
        prompt,
    }
}
