//! Submission gateway.
//!
//! Accepts an uploaded file plus an operation label, stages the file in the
//! upload directory, registers a `queued` task and hands it to the
//! [`JobRunner`](crate::runner::JobRunner). The caller gets the task id back
//! immediately; processing continues in the background.
//!
//! Operation labels are not validated here. An unknown label produces a task
//! that ends in `error` with an "Unsupported operation" message.

mod error;
mod filename;
mod submit;

pub use error::SubmissionError;
pub use filename::sanitize_filename;
pub use submit::{SubmissionGateway, Upload};
