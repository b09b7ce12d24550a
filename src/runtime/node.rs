//! Node trait for streaming processing
//!
//! Defines the ProcessNode trait that all streaming nodes implement. Nodes
//! actively process data when work() is called by the scheduler.

use super::errors::WorkResult;
use super::ports::{InputPort, OutputPort};

/// A processing node that transforms data
/// - Sources have 0 inputs and N outputs
/// - Sinks have N inputs and 0 outputs
/// - Processors have N inputs and M outputs
pub trait ProcessNode: Send {
    /// Get a debug name for this node
    fn name(&self) -> &str;

    /// Check if this node should stop processing
    fn should_stop(&self) -> bool {
        false
    }

    /// Number of input ports this node requires
    fn num_inputs(&self) -> usize;

    /// Number of output ports this node provides
    fn num_outputs(&self) -> usize;

    /// Do work: read from inputs, process, write to outputs.
    /// The scheduler provides references to input and output port slices.
    /// Returns Ok(n) where n is the number of items produced, or Err on
    /// failure (`WorkError::Shutdown` for orderly end of input).
    fn work(&mut self, inputs: &[InputPort], outputs: &[OutputPort]) -> WorkResult<usize>;
}
