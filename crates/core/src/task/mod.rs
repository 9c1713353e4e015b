//! Task tracking.
//!
//! The [`TaskRegistry`] is the single source of truth polled by clients. It is
//! shared by handle (`Arc<TaskRegistry>`) between the submission gateway, the
//! job runners and the HTTP layer.

mod error;
mod ids;
mod registry;
mod types;

pub use error::TaskError;
pub use ids::TaskIdGenerator;
pub use registry::TaskRegistry;
pub use types::{Task, TaskId, TaskStatus};
