//! Job execution.
//!
//! Drives one task through `queued → processing → completed | error`:
//!
//! 1. mark the task as processing
//! 2. plan the pipeline (unknown operations end the task in `error`)
//! 3. run each step through the [`ToolInvoker`](crate::converter::ToolInvoker),
//!    publishing a progress message before and after every step
//! 4. record the final artifact, or the first failure
//!
//! Steps run exactly once. There is no retry, timeout or cancellation.

mod error;
mod job;
mod observer;

pub use error::RunError;
pub use job::{execute_plan, JobRunner};
pub use observer::{finished_message, started_message, SilentObserver, StepObserver};
