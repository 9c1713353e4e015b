//! Pipeline planning.

use std::path::Path;

use super::error::PlanError;
use super::layout::OutputLayout;
use super::types::{Actions, MediaFormat, Operation, PipelinePlan, PipelineStep, StepKind};

/// Plans a pipeline for a requested operation label.
///
/// Fails with [`PlanError::UnsupportedOperation`] when the label is not
/// recognised.
pub fn plan(
    layout: &OutputLayout,
    input: &Path,
    operation: &str,
) -> Result<PipelinePlan, PlanError> {
    let operation: Operation = operation.parse()?;
    Ok(plan_for(layout, input, operation))
}

/// Plans a pipeline for a single known operation. Never empty.
pub fn plan_for(layout: &OutputLayout, input: &Path, operation: Operation) -> PipelinePlan {
    build(layout, input, Actions::from(operation))
}

/// Plans a pipeline for a set of actions.
///
/// Non-MP4 inputs are always converted first, so an empty action set still
/// yields a single conversion step for them. For MP4 inputs an empty action
/// set is an error.
///
/// When both actions are requested, audio is extracted from the compressed
/// file only if the input had to be converted. An MP4 input feeds both steps
/// directly.
pub fn plan_actions(
    layout: &OutputLayout,
    input: &Path,
    actions: Actions,
) -> Result<PipelinePlan, PlanError> {
    if actions.is_empty() && MediaFormat::from_path(input).is_canonical() {
        return Err(PlanError::NothingToDo {
            path: input.to_path_buf(),
        });
    }
    Ok(build(layout, input, actions))
}

fn build(layout: &OutputLayout, input: &Path, actions: Actions) -> PipelinePlan {
    let canonical = MediaFormat::from_path(input).is_canonical();
    let mut kinds = Vec::with_capacity(3);
    if !canonical {
        kinds.push(StepKind::ConvertContainer);
    }
    if actions.compress {
        kinds.push(StepKind::Compress);
    }
    if actions.extract_audio {
        kinds.push(StepKind::ExtractAudio);
    }

    let mut steps: Vec<PipelineStep> = Vec::with_capacity(kinds.len());
    let mut current = input.to_path_buf();
    for kind in kinds {
        let output = layout.output_for(kind, &current);
        steps.push(PipelineStep {
            kind,
            input: current.clone(),
            output: output.clone(),
        });
        // A compressed copy of an untouched MP4 is a side artifact.
        if !(canonical && kind == StepKind::Compress) {
            current = output;
        }
    }

    PipelinePlan::new(steps)
}
