//! Consistency Report: diagnostic output of the final stage. Never fed back.

use super::{require_text, StageRecord};
use crate::types::Stage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub is_consistent: bool,
    #[serde(default)]
    pub issues: Vec<ConsistencyIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyIssue {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub severity: String,
    pub suggested_fix: String,
    /// Who raised the issue. Absent in backend output, which is always the editor.
    #[serde(default)]
    pub source: IssueSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSource {
    #[default]
    Editor,
    Audit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Lenient parse of backend severity labels.
    pub fn parse(label: &str) -> Option<Severity> {
        match label.trim().to_lowercase().as_str() {
            "low" | "minor" => Some(Severity::Low),
            "medium" | "moderate" => Some(Severity::Medium),
            "high" | "major" | "critical" | "severe" => Some(Severity::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl ConsistencyIssue {
    pub fn severity_level(&self) -> Option<Severity> {
        Severity::parse(&self.severity)
    }
}

impl ConsistencyReport {
    /// Append mechanically detected issues. A high-severity finding marks the
    /// report inconsistent; findings never clear an editor's verdict.
    pub fn with_audit_findings(mut self, findings: Vec<ConsistencyIssue>) -> Self {
        if findings
            .iter()
            .any(|issue| issue.severity_level() == Some(Severity::High))
        {
            self.is_consistent = false;
        }
        self.issues.extend(findings);
        self
    }

    pub fn issues_from(&self, source: IssueSource) -> impl Iterator<Item = &ConsistencyIssue> {
        self.issues.iter().filter(move |issue| issue.source == source)
    }
}

impl StageRecord for ConsistencyReport {
    const STAGE: Stage = Stage::ConsistencyReport;

    const TEMPLATE: &'static str = r#"{
    "is_consistent": boolean,
    "issues": [
        {
            "type": string,
            "description": string,
            "severity": string,
            "suggested_fix": string
        }
    ]
}"#;

    fn schema_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        for (i, issue) in self.issues.iter().enumerate() {
            require_text(&mut violations, &format!("issues[{}].type", i), &issue.kind);
            require_text(
                &mut violations,
                &format!("issues[{}].description", i),
                &issue.description,
            );
            require_text(&mut violations, &format!("issues[{}].severity", i), &issue.severity);
            require_text(
                &mut violations,
                &format!("issues[{}].suggested_fix", i),
                &issue.suggested_fix,
            );
        }
        violations
    }
}
