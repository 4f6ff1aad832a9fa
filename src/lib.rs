//! Whodunit: staged murder-mystery generation
//!
//! Generates a murder-mystery narrative through five dependent stages (core
//! premise, character roster, timeline, evidence graph, consistency report).
//! Each stage's parsed record is threaded into the next stage's prompt, and
//! the run stops at the first stage whose output cannot be parsed or checked.

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod narrative;
pub mod pipeline;
pub mod prompts;
pub mod schema;
pub mod types;
