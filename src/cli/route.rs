//! CLI route: run context. Loads configuration, builds the gateway stack and
//! runs the pipeline with console presentation.

use crate::cli::presentation::ConsoleReporter;
use crate::config::{ConfigLoader, WhodunitConfig};
use crate::error::ApiError;
use crate::gateway::{build_gateway, CompletionGateway};
use crate::pipeline::{PipelineExecutor, PipelineRun};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Runtime context for CLI execution: workspace, config path and loaded config.
pub struct RunContext {
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
    config: WhodunitConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        config.ensure_valid()?;

        Ok(Self {
            workspace_root,
            config_path,
            config,
        })
    }

    pub fn workspace_root(&self) -> &PathBuf {
        &self.workspace_root
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub fn config(&self) -> &WhodunitConfig {
        &self.config
    }

    /// Run the pipeline against the configured backend, printing to stdout.
    pub fn execute(&self) -> Result<PipelineRun, ApiError> {
        let gateway = build_gateway(&self.config.provider, &self.config.retry)?;
        info!(
            gateway = gateway.gateway_name(),
            model = %self.config.provider.model,
            "Gateway ready"
        );
        let stdout = std::io::stdout();
        self.execute_with(gateway, stdout.lock())
    }

    /// Run the pipeline against `gateway`, writing stage output to `out`.
    pub fn execute_with<G, W>(&self, gateway: G, out: W) -> Result<PipelineRun, ApiError>
    where
        G: CompletionGateway,
        W: Write,
    {
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| ApiError::ProviderError(format!("Failed to create runtime: {}", e)))?;

        let executor = PipelineExecutor::new(gateway, self.config.pipeline.clone());
        let mut reporter = ConsoleReporter::new(out);
        rt.block_on(executor.run(&mut reporter))
    }
}
