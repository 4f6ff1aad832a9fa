//! Stage functions.
//!
//! Each builds its prompt from the records it depends on, makes one gateway
//! call and parses the reply. A reply that cannot be parsed or checked is
//! logged and returned as `StageOutcome::Failure`; gateway errors propagate.

use crate::audit::unknown_references;
use crate::error::{ApiError, StageFailure, StageOutcome};
use crate::gateway::CompletionGateway;
use crate::prompts::{self, StagePrompt};
use crate::schema::{
    parse_record, CharacterRoster, ConsistencyReport, CorePremise, EvidenceGraph, StageRecord,
    Timeline,
};
use tracing::{debug, warn};

async fn run_stage<R, G>(gateway: &G, prompt: StagePrompt) -> Result<StageOutcome<R>, ApiError>
where
    R: StageRecord,
    G: CompletionGateway + ?Sized,
{
    debug!(
        stage = %R::STAGE,
        prompt_chars = prompt.prompt.len(),
        "Requesting stage completion"
    );
    let text = gateway.complete(prompt.instruction, &prompt.prompt).await?;
    let outcome = parse_record::<R>(&text);
    if let StageOutcome::Failure(ref failure) = outcome {
        warn!(stage = %R::STAGE, error = %failure, "Stage output rejected");
    }
    Ok(outcome)
}

pub async fn generate_core_premise<G>(gateway: &G) -> Result<StageOutcome<CorePremise>, ApiError>
where
    G: CompletionGateway + ?Sized,
{
    run_stage(gateway, prompts::core_premise()).await
}

pub async fn generate_character_roster<G>(
    gateway: &G,
    core: &CorePremise,
) -> Result<StageOutcome<CharacterRoster>, ApiError>
where
    G: CompletionGateway + ?Sized,
{
    run_stage(gateway, prompts::character_roster(core)).await
}

/// With `strict_references`, a timeline naming anyone outside the victim,
/// the murderer and the roster is rejected.
pub async fn generate_timeline<G>(
    gateway: &G,
    core: &CorePremise,
    roster: &CharacterRoster,
    strict_references: bool,
) -> Result<StageOutcome<Timeline>, ApiError>
where
    G: CompletionGateway + ?Sized,
{
    let outcome: StageOutcome<Timeline> =
        run_stage(gateway, prompts::timeline(core, roster)).await?;

    let timeline = match outcome {
        StageOutcome::Success(timeline) => timeline,
        failure => return Ok(failure),
    };
    if !strict_references {
        return Ok(StageOutcome::Success(timeline));
    }

    let unknown = unknown_references(core, roster, &timeline);
    if unknown.is_empty() {
        return Ok(StageOutcome::Success(timeline));
    }

    let failure = StageFailure::SchemaViolation {
        stage: Timeline::STAGE,
        violations: unknown
            .iter()
            .map(|r| {
                format!(
                    "timeline[{}].characters_involved names unknown character '{}'",
                    r.event_index, r.name
                )
            })
            .collect(),
    };
    warn!(stage = %Timeline::STAGE, error = %failure, "Stage output rejected");
    Ok(StageOutcome::Failure(failure))
}

pub async fn generate_evidence_graph<G>(
    gateway: &G,
    core: &CorePremise,
    roster: &CharacterRoster,
    timeline: &Timeline,
) -> Result<StageOutcome<EvidenceGraph>, ApiError>
where
    G: CompletionGateway + ?Sized,
{
    run_stage(gateway, prompts::evidence_graph(core, roster, timeline)).await
}

/// Ask the editor persona to review the accumulated narrative. Read-only.
pub async fn validate_consistency<G>(
    gateway: &G,
    core: &CorePremise,
    roster: &CharacterRoster,
    timeline: &Timeline,
    evidence: &EvidenceGraph,
) -> Result<StageOutcome<ConsistencyReport>, ApiError>
where
    G: CompletionGateway + ?Sized,
{
    run_stage(gateway, prompts::consistency(core, roster, timeline, evidence)).await
}
