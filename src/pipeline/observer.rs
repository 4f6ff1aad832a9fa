//! Stage observers receive progress as the pipeline runs.

use crate::error::StageFailure;
use crate::types::Stage;
use serde_json::Value;

pub trait StageObserver {
    fn stage_started(&mut self, stage: Stage);

    fn stage_completed(&mut self, stage: Stage, record: &Value);

    fn stage_failed(&mut self, failure: &StageFailure);
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NullObserver;

impl StageObserver for NullObserver {
    fn stage_started(&mut self, _stage: Stage) {}

    fn stage_completed(&mut self, _stage: Stage, _record: &Value) {}

    fn stage_failed(&mut self, _failure: &StageFailure) {}
}
