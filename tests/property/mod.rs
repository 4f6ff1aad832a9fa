//! Property-based tests for stage record contracts and pipeline control flow
