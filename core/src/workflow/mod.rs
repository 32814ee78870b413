// core/src/workflow/mod.rs

//! A small step-pipeline runner used by the checkout and identity flows.
//!
//! A flow is declared once as an ordered list of named steps. Each request
//! builds a fresh context, wraps it in [`ContextData`], runs the pipeline and
//! reads its results back out of the context:
//!
//! ```ignore
//! let ctx = ContextData::new(ChargeCtx::new(principal, cart));
//! match pipeline.run(ctx.clone()).await? {
//!   PipelineOutcome::Completed => Ok(ctx.snapshot()),
//!   PipelineOutcome::Stopped => ...,
//! }
//! ```

pub mod context_data;
pub mod control;
pub mod pipeline;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineOutcome, StepControl};
pub use pipeline::{Handler, Pipeline};
pub use step::{SkipCondition, StepDef};

use thiserror::Error;

/// Framework-level failures, raised by the runner itself rather than by handlers.
#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("pipeline '{pipeline}': no handler registered for required step '{step_name}'")]
  HandlerMissing { pipeline: &'static str, step_name: String },

  #[error("pipeline '{pipeline}' stopped before producing '{missing}'")]
  Incomplete { pipeline: &'static str, missing: &'static str },
}
