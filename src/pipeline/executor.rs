//! Pipeline executor.
//!
//! Owns the gateway and runs the stages strictly in order. Each successful
//! record is appended to the narrative and fed to the next stage's prompt;
//! the first failure moves the state machine to `Aborted` and no further
//! gateway calls are made.

use crate::audit::audit_narrative;
use crate::error::{ApiError, StageFailure, StageOutcome};
use crate::gateway::CompletionGateway;
use crate::narrative::NarrativeState;
use crate::pipeline::observer::StageObserver;
use crate::pipeline::stages;
use crate::pipeline::state::PipelineState;
use crate::types::Stage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};

fn default_true() -> bool {
    true
}

/// Pipeline behaviour switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Reject timelines that name anyone outside the cast.
    #[serde(default = "default_true")]
    pub strict_references: bool,

    /// Append continuity audit findings to the consistency report.
    #[serde(default = "default_true")]
    pub audit: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            strict_references: true,
            audit: true,
        }
    }
}

/// Result of one pipeline run: the terminal state, whatever was accumulated
/// before it, and the failure that stopped it (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    pub state: PipelineState,
    pub narrative: NarrativeState,
    pub failure: Option<StageFailure>,
}

impl PipelineRun {
    fn new() -> Self {
        Self {
            state: PipelineState::initial(),
            narrative: NarrativeState::new(),
            failure: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == PipelineState::Done
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self.state, PipelineState::Aborted { .. })
    }
}

pub struct PipelineExecutor<G> {
    gateway: G,
    config: PipelineConfig,
}

impl<G: CompletionGateway> PipelineExecutor<G> {
    pub fn new(gateway: G, config: PipelineConfig) -> Self {
        Self { gateway, config }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all five stages once.
    ///
    /// Returns `Ok` for both `Done` and `Aborted`; only gateway and
    /// accumulator errors are returned as `Err`.
    pub async fn run(&self, observer: &mut dyn StageObserver) -> Result<PipelineRun, ApiError> {
        let mut run = PipelineRun::new();
        let run_started = Instant::now();
        info!(
            gateway = self.gateway.gateway_name(),
            strict_references = self.config.strict_references,
            "Starting mystery generation"
        );

        observer.stage_started(Stage::CorePremise);
        let started = Instant::now();
        let outcome = stages::generate_core_premise(&self.gateway).await?;
        let Some(core) = settle(&mut run, observer, Stage::CorePremise, started, outcome) else {
            return Ok(finish(run, run_started));
        };
        run.narrative.record_core(core.clone())?;

        observer.stage_started(Stage::CharacterRoster);
        let started = Instant::now();
        let outcome = stages::generate_character_roster(&self.gateway, &core).await?;
        let Some(roster) = settle(&mut run, observer, Stage::CharacterRoster, started, outcome)
        else {
            return Ok(finish(run, run_started));
        };
        run.narrative.record_characters(roster.clone())?;

        observer.stage_started(Stage::Timeline);
        let started = Instant::now();
        let outcome = stages::generate_timeline(
            &self.gateway,
            &core,
            &roster,
            self.config.strict_references,
        )
        .await?;
        let Some(timeline) = settle(&mut run, observer, Stage::Timeline, started, outcome) else {
            return Ok(finish(run, run_started));
        };
        run.narrative.record_timeline(timeline.clone())?;

        observer.stage_started(Stage::EvidenceGraph);
        let started = Instant::now();
        let outcome =
            stages::generate_evidence_graph(&self.gateway, &core, &roster, &timeline).await?;
        let Some(evidence) = settle(&mut run, observer, Stage::EvidenceGraph, started, outcome)
        else {
            return Ok(finish(run, run_started));
        };
        run.narrative.record_evidence(evidence.clone())?;

        observer.stage_started(Stage::ConsistencyReport);
        let started = Instant::now();
        let outcome =
            stages::validate_consistency(&self.gateway, &core, &roster, &timeline, &evidence)
                .await?;
        let outcome = if self.config.audit {
            outcome.map(|report| {
                let findings = audit_narrative(&core, &roster, &timeline, &evidence);
                for finding in &findings {
                    warn!(
                        kind = %finding.kind,
                        severity = %finding.severity,
                        "{}",
                        finding.description
                    );
                }
                report.with_audit_findings(findings)
            })
        } else {
            outcome
        };
        let Some(report) = settle(&mut run, observer, Stage::ConsistencyReport, started, outcome)
        else {
            return Ok(finish(run, run_started));
        };
        run.narrative.record_report(report)?;

        Ok(finish(run, run_started))
    }
}

/// Apply one stage outcome to the run and tell the observer about it.
fn settle<T: Serialize>(
    run: &mut PipelineRun,
    observer: &mut dyn StageObserver,
    stage: Stage,
    started: Instant,
    outcome: StageOutcome<T>,
) -> Option<T> {
    debug_assert_eq!(run.state.stage(), Some(stage));
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        StageOutcome::Success(record) => {
            info!(stage = %stage, elapsed_ms, "Stage completed");
            // Records are plain string-keyed structs; serialization cannot fail.
            let value = serde_json::to_value(&record).unwrap_or(Value::Null);
            observer.stage_completed(stage, &value);
            run.state = run.state.advance();
            Some(record)
        }
        StageOutcome::Failure(failure) => {
            warn!(stage = %stage, elapsed_ms, error = %failure, "Stage failed, aborting run");
            observer.stage_failed(&failure);
            run.state = run.state.abort();
            run.failure = Some(failure);
            None
        }
    }
}

fn finish(run: PipelineRun, run_started: Instant) -> PipelineRun {
    let elapsed_ms = run_started.elapsed().as_millis() as u64;
    match run.state {
        PipelineState::Done => {
            let consistent = run.narrative.report().map(|r| r.is_consistent);
            info!(elapsed_ms, ?consistent, "Mystery generation finished");
        }
        PipelineState::Aborted { at } => {
            info!(elapsed_ms, stage = %at, "Mystery generation aborted");
        }
        _ => {}
    }
    run
}
