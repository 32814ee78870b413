// core/src/workflow/control.rs

//! Flow signals returned by step handlers and the outcome of a whole run.

/// Returned by a handler to let the run go on or to halt it cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  Continue,
  /// Halt immediately. Remaining handlers of this step and all later steps
  /// are not executed; the run reports `PipelineOutcome::Stopped`.
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
  Completed,
  Stopped,
}
