//! Pipeline Orchestrator: sequences the five stages, threading each stage's
//! record into the next stage's prompt and stopping at the first failure.

pub mod executor;
pub mod observer;
pub mod stages;
pub mod state;

pub use executor::{PipelineConfig, PipelineExecutor, PipelineRun};
pub use observer::{NullObserver, StageObserver};
pub use state::PipelineState;
