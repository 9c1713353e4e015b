pub mod artifacts;
pub mod config;
pub mod converter;
pub mod gateway;
pub mod metrics;
pub mod pipeline;
pub mod runner;
pub mod task;
pub mod testing;

pub use artifacts::{list_artifacts, resolve_artifact, Artifact, ArtifactError, ArtifactKind};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ServerConfig,
    StorageConfig,
};
pub use converter::{
    resolve_tool, resolve_tool_blocking, ConverterConfig, ConverterError, FfmpegInvoker,
    PathToolProbe, ToolInvoker, ToolProbe,
};
pub use gateway::{sanitize_filename, SubmissionError, SubmissionGateway, Upload};
pub use pipeline::{
    plan, plan_actions, plan_for, Actions, MediaFormat, Operation, OutputLayout, PipelinePlan,
    PipelineStep, PlanError, StepKind,
};
pub use runner::{execute_plan, JobRunner, RunError, SilentObserver, StepObserver};
pub use task::{Task, TaskError, TaskId, TaskIdGenerator, TaskRegistry, TaskStatus};
