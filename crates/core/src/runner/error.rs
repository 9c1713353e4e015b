//! Error types for the runner module.

use thiserror::Error;

use crate::converter::ConverterError;
use crate::pipeline::StepKind;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The plan has no steps.
    #[error("Pipeline plan is empty")]
    EmptyPlan,

    /// A step failed; remaining steps were not run.
    #[error("Error during {}: {source}", step.noun())]
    StepFailed {
        step: StepKind,
        #[source]
        source: ConverterError,
    },
}
