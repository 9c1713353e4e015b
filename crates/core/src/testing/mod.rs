//! Testing utilities and mock implementations.
//!
//! Lets the runner, gateway and HTTP layer be exercised without a real
//! ffmpeg binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use transcoder_core::testing::{MockInvoker, StaticToolProbe};
//!
//! let invoker = MockInvoker::new();
//! let probe = StaticToolProbe::available();
//!
//! // Configure behavior
//! invoker.set_materialize_outputs(true).await;
//!
//! // Use in a JobRunner / SubmissionGateway...
//! ```

mod mock_invoker;
mod static_probe;

pub use mock_invoker::MockInvoker;
pub use static_probe::StaticToolProbe;
