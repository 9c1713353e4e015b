use std::sync::Arc;
use transcoder_core::{
    Config, JobRunner, OutputLayout, SubmissionGateway, TaskRegistry, ToolInvoker, ToolProbe,
};

/// Shared application state
pub struct AppState {
    config: Config,
    registry: Arc<TaskRegistry>,
    gateway: SubmissionGateway,
    layout: OutputLayout,
}

impl AppState {
    /// Wires the registry, runner and gateway from configuration.
    pub fn new(config: Config, invoker: Arc<dyn ToolInvoker>, probe: Arc<dyn ToolProbe>) -> Self {
        let layout = config.storage.output_layout();
        let registry = Arc::new(TaskRegistry::new());
        let runner = Arc::new(JobRunner::new(
            Arc::clone(&registry),
            invoker,
            layout.clone(),
        ));
        let gateway = SubmissionGateway::new(runner, probe, config.storage.upload_dir.clone());

        Self {
            config,
            registry,
            gateway,
            layout,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn gateway(&self) -> &SubmissionGateway {
        &self.gateway
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }
}
