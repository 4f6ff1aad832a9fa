//! End-to-end pipeline runs against a scripted gateway.

use super::test_utils::{valid_replies, EVIDENCE, PREMISE, REPORT, ROSTER, TIMELINE};
use whodunit::cli::ConsoleReporter;
use whodunit::error::{StageFailure, StageOutcome};
use whodunit::gateway::ScriptedGateway;
use whodunit::pipeline::stages::validate_consistency;
use whodunit::pipeline::{PipelineConfig, PipelineExecutor, PipelineState};
use whodunit::prompts::{
    CHARACTER_DESIGNER_PERSONA, EDITOR_PERSONA, FORENSICS_PERSONA, PLOT_DESIGNER_PERSONA,
    WRITER_PERSONA,
};
use whodunit::schema::{
    CharacterRoster, CorePremise, EvidenceGraph, IssueSource, Severity, Timeline,
};
use whodunit::types::Stage;

fn output_of(reporter: ConsoleReporter<Vec<u8>>) -> String {
    String::from_utf8(reporter.into_inner()).unwrap()
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("'{}' not found in output:\n{}", needle, haystack))
}

#[tokio::test]
async fn test_full_run_prints_five_blocks_in_order() {
    let executor = PipelineExecutor::new(
        ScriptedGateway::with_responses(valid_replies()),
        PipelineConfig::default(),
    );
    let mut reporter = ConsoleReporter::new(Vec::new());

    let run = executor.run(&mut reporter).await.unwrap();

    assert_eq!(run.state, PipelineState::Done);
    assert_eq!(run.narrative.completed_stages(), Stage::ALL.to_vec());
    assert_eq!(
        run.narrative.core().unwrap(),
        &serde_json::from_str::<CorePremise>(PREMISE).unwrap()
    );
    assert_eq!(run.narrative.characters().unwrap().len(), 5);

    let output = output_of(reporter);
    let headings: Vec<usize> = Stage::ALL
        .iter()
        .map(|stage| position(&output, stage.result_heading()))
        .collect();
    assert!(headings.windows(2).all(|w| w[0] < w[1]), "{}", output);
    assert!(output.starts_with("Generating core story...\n"));
    assert!(output.contains("\"murder_method\": {"));
    assert!(!output.contains("Error:"));

    // Record fields print in the order the records declare them.
    let premise_fields: Vec<usize> = [
        "\"setting\"",
        "\"victim\"",
        "\"murderer\"",
        "\"murder_method\"",
        "\"key_twist\"",
    ]
    .iter()
    .map(|field| position(&output, field))
    .collect();
    assert!(premise_fields.windows(2).all(|w| w[0] < w[1]), "{}", output);
    assert!(position(&output, "\"is_consistent\"") < position(&output, "\"issues\""));

    let personas: Vec<String> = executor
        .gateway()
        .calls()
        .into_iter()
        .map(|c| c.system_instruction)
        .collect();
    assert_eq!(
        personas,
        vec![
            WRITER_PERSONA,
            CHARACTER_DESIGNER_PERSONA,
            PLOT_DESIGNER_PERSONA,
            FORENSICS_PERSONA,
            EDITOR_PERSONA
        ]
    );
}

#[tokio::test]
async fn test_malformed_roster_aborts_after_core() {
    let gateway = ScriptedGateway::with_responses([PREMISE, "{not json", TIMELINE, EVIDENCE, REPORT]);
    let executor = PipelineExecutor::new(gateway, PipelineConfig::default());
    let mut reporter = ConsoleReporter::new(Vec::new());

    let run = executor.run(&mut reporter).await.unwrap();

    assert_eq!(
        run.state,
        PipelineState::Aborted {
            at: Stage::CharacterRoster
        }
    );
    assert!(matches!(
        run.failure,
        Some(StageFailure::StructuredParse {
            stage: Stage::CharacterRoster,
            ..
        })
    ));
    assert_eq!(run.narrative.completed_stages(), vec![Stage::CorePremise]);

    // One call for the premise, one for the failing roster, none after.
    assert_eq!(executor.gateway().call_count(), 2);
    assert_eq!(executor.gateway().remaining(), 3);

    let output = output_of(reporter);
    assert!(output.contains("Core story generated:"));
    assert!(!output.contains("Characters generated:"));
    assert!(!output.contains("Generating timeline..."));
    assert_eq!(output.matches("Error: ").count(), 1);
    let diagnostic = run.failure.as_ref().unwrap().to_string();
    assert!(output.trim_end().ends_with(&diagnostic));
}

#[tokio::test]
async fn test_failure_at_any_stage_makes_no_later_calls() {
    for (n, stage) in Stage::ALL.iter().enumerate() {
        let mut replies = valid_replies();
        replies[n] = "not even close to json".to_string();
        let executor = PipelineExecutor::new(
            ScriptedGateway::with_responses(replies),
            PipelineConfig::default(),
        );

        let mut reporter = ConsoleReporter::new(Vec::new());
        let run = executor.run(&mut reporter).await.unwrap();

        assert_eq!(run.state, PipelineState::Aborted { at: *stage });
        assert_eq!(executor.gateway().call_count(), n + 1, "stage {}", stage);
        assert_eq!(run.narrative.completed_stages().len(), n);
    }
}

#[tokio::test]
async fn test_schema_violation_aborts_like_a_parse_failure() {
    let mut roster: serde_json::Value = serde_json::from_str(ROSTER).unwrap();
    roster["characters"].as_array_mut().unwrap().truncate(3);

    let gateway = ScriptedGateway::with_responses([PREMISE.to_string(), roster.to_string()]);
    let executor = PipelineExecutor::new(gateway, PipelineConfig::default());
    let mut reporter = ConsoleReporter::new(Vec::new());
    let run = executor.run(&mut reporter).await.unwrap();

    match run.failure {
        Some(StageFailure::SchemaViolation { stage, violations }) => {
            assert_eq!(stage, Stage::CharacterRoster);
            assert!(violations[0].contains("found 3"));
        }
        other => panic!("expected schema violation, got {:?}", other),
    }
    assert!(output_of(reporter).contains("Error: character roster response violates its schema"));
}

#[tokio::test]
async fn test_lenient_references_surface_through_the_audit() {
    let mut timeline: serde_json::Value = serde_json::from_str(TIMELINE).unwrap();
    timeline["timeline"][2]["characters_involved"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::json!("Inspector Graves"));

    let mut replies = valid_replies();
    replies[2] = timeline.to_string();
    let config = PipelineConfig {
        strict_references: false,
        audit: true,
    };
    let executor = PipelineExecutor::new(ScriptedGateway::with_responses(replies), config);
    let mut reporter = ConsoleReporter::new(Vec::new());
    let run = executor.run(&mut reporter).await.unwrap();

    assert_eq!(run.state, PipelineState::Done);
    let report = run.narrative.report().unwrap();
    assert!(!report.is_consistent);
    let audit: Vec<_> = report.issues_from(IssueSource::Audit).collect();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].kind, "unknown_character_reference");
    assert!(audit[0].description.contains("Inspector Graves"));
    assert!(output_of(reporter).contains("\"source\": \"audit\""));
}

#[tokio::test]
async fn test_validator_reports_reference_issue_from_backend() {
    let core: CorePremise = serde_json::from_str(PREMISE).unwrap();
    let roster: CharacterRoster = serde_json::from_str(ROSTER).unwrap();
    let mut timeline: Timeline = serde_json::from_str(TIMELINE).unwrap();
    timeline.events[4]
        .characters_involved
        .push("Inspector Graves".to_string());
    let evidence: EvidenceGraph = serde_json::from_str(EVIDENCE).unwrap();

    let reply = serde_json::json!({
        "is_consistent": false,
        "issues": [{
            "type": "character_reference",
            "description": "Inspector Graves appears in the timeline but is not in the cast",
            "severity": "high",
            "suggested_fix": "Add Inspector Graves to the roster or remove the reference"
        }]
    });
    let gateway = ScriptedGateway::with_responses([reply.to_string()]);

    let outcome = validate_consistency(&gateway, &core, &roster, &timeline, &evidence)
        .await
        .unwrap();
    let report = match outcome {
        StageOutcome::Success(report) => report,
        StageOutcome::Failure(failure) => panic!("unexpected failure: {}", failure),
    };

    assert!(!report.is_consistent);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, "character_reference");
    assert_eq!(report.issues[0].severity_level(), Some(Severity::High));
    assert_eq!(report.issues[0].source, IssueSource::Editor);

    // The editor saw the offending name in the narrative it reviewed.
    let call = &gateway.calls()[0];
    assert_eq!(call.system_instruction, EDITOR_PERSONA);
    assert!(call.user_prompt.contains("Inspector Graves"));
}
