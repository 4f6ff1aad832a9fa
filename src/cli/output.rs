//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain errors to the one-line message printed before exiting.
pub fn map_error(e: &ApiError) -> String {
    format!("Error: {}", e)
}
