//! CLI presentation: writes each stage's progress line and record to a
//! console stream as the pipeline runs.

use crate::error::StageFailure;
use crate::pipeline::StageObserver;
use crate::types::Stage;
use serde_json::Value;
use std::io::Write;
use tracing::warn;

/// `Generating <label>...`, then a blank line, `<Title> generated:` and the
/// record as pretty JSON; or `Error: <diagnostic>` on failure.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        let result = writeln!(self.out, "{}", text).and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!(error = %e, "Failed to write to console");
        }
    }
}

impl<W: Write> StageObserver for ConsoleReporter<W> {
    fn stage_started(&mut self, stage: Stage) {
        self.emit(stage.progress_label());
    }

    fn stage_completed(&mut self, stage: Stage, record: &Value) {
        let body = serde_json::to_string_pretty(record).unwrap_or_else(|_| record.to_string());
        self.emit(&format!("\n{}\n{}", stage.result_heading(), body));
    }

    fn stage_failed(&mut self, failure: &StageFailure) {
        self.emit(&format!("Error: {}", failure));
    }
}
