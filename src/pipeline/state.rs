//! Pipeline state machine.
//!
//! `Core -> Characters -> Timeline -> Evidence -> Validation -> Done`, with an
//! absorbing `Aborted` state reachable from any running state. There is no
//! retry edge and no rollback.

use crate::types::Stage;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum PipelineState {
    Core,
    Characters,
    Timeline,
    Evidence,
    Validation,
    Done,
    Aborted { at: Stage },
}

impl PipelineState {
    pub fn initial() -> Self {
        PipelineState::Core
    }

    fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::CorePremise => PipelineState::Core,
            Stage::CharacterRoster => PipelineState::Characters,
            Stage::Timeline => PipelineState::Timeline,
            Stage::EvidenceGraph => PipelineState::Evidence,
            Stage::ConsistencyReport => PipelineState::Validation,
        }
    }

    /// The stage this state runs, or `None` in a terminal state.
    pub fn stage(self) -> Option<Stage> {
        match self {
            PipelineState::Core => Some(Stage::CorePremise),
            PipelineState::Characters => Some(Stage::CharacterRoster),
            PipelineState::Timeline => Some(Stage::Timeline),
            PipelineState::Evidence => Some(Stage::EvidenceGraph),
            PipelineState::Validation => Some(Stage::ConsistencyReport),
            PipelineState::Done | PipelineState::Aborted { .. } => None,
        }
    }

    /// Transition after the current stage succeeded.
    pub fn advance(self) -> Self {
        match self.stage() {
            Some(stage) => stage.next().map(Self::for_stage).unwrap_or(PipelineState::Done),
            None => self,
        }
    }

    /// Transition after the current stage failed.
    pub fn abort(self) -> Self {
        match self.stage() {
            Some(at) => PipelineState::Aborted { at },
            None => self,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.stage().is_none()
    }
}
