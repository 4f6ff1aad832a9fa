//! Shared test utilities for integration tests
//!
//! Canned stage replies and serialized access to process environment.

use std::sync::{Mutex, MutexGuard};

pub const PREMISE: &str = include_str!("../fixtures/premise.json");
pub const ROSTER: &str = include_str!("../fixtures/roster.json");
pub const TIMELINE: &str = include_str!("../fixtures/timeline.json");
pub const EVIDENCE: &str = include_str!("../fixtures/evidence.json");
pub const REPORT: &str = include_str!("../fixtures/report.json");

/// The five valid replies, in stage order.
pub fn valid_replies() -> Vec<String> {
    [PREMISE, ROSTER, TIMELINE, EVIDENCE, REPORT]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Sets environment variables for the life of the guard, then restores them.
pub struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    pub fn set(vars: &[(&str, Option<&str>)]) -> Self {
        let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let saved = vars
            .iter()
            .map(|(key, value)| {
                let old = std::env::var(key).ok();
                match value {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
                (key.to_string(), old)
            })
            .collect();
        Self { saved, _lock: lock }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.saved {
            match old {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}
