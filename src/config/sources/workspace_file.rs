//! Workspace config files: `config/config.toml`, then the file named by
//! `WHODUNIT_ENV` (default `development`) in the same directory.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_NAME_VAR: &str = "WHODUNIT_ENV";

const DEFAULT_ENV_NAME: &str = "development";

/// Active environment name. Must be a bare file stem so it cannot point the
/// loader outside `config/`.
pub fn env_name() -> Result<String, ConfigError> {
    let name = std::env::var(ENV_NAME_VAR).unwrap_or_else(|_| DEFAULT_ENV_NAME.to_string());
    let name = name.trim();
    if name.is_empty() || name.contains(|c: char| c == '/' || c == '\\') || name.starts_with('.') {
        return Err(ConfigError::Message(format!(
            "{} must be a plain name, got '{}'",
            ENV_NAME_VAR, name
        )));
    }
    Ok(name.to_string())
}

/// Candidate files in precedence order, lowest first.
pub fn workspace_config_paths(workspace_root: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let config_dir = workspace_root.join("config");
    Ok(vec![
        config_dir.join("config.toml"),
        config_dir.join(format!("{}.toml", env_name()?)),
    ])
}

/// Add the workspace files that exist; missing ones are skipped.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for path in workspace_config_paths(workspace_root)? {
        if path.is_file() {
            debug!(config_path = %path.display(), "Loading workspace configuration");
            builder = builder.add_source(File::from(path.as_path()).required(true));
        } else {
            debug!(config_path = %path.display(), "No workspace configuration file");
        }
    }
    Ok(builder)
}
