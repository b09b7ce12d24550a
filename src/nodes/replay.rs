//! Source node that replays a captured edge list

use crate::runtime::edge::Edge;
use crate::runtime::errors::{WorkError, WorkResult};
use crate::runtime::node::ProcessNode;
use crate::runtime::ports::{InputPort, OutputPort};
use tracing::debug;

/// Plays a prepared list of edges into its output channel, then signals
/// end-of-stream.
///
/// The list must follow the [`Edge`] stream convention: an initial-level
/// message first, then strictly alternating transitions.
pub struct ReplaySource {
    name: String,
    edges: Vec<Edge>,
    sent: bool,
}

impl ReplaySource {
    /// Create a replay source over a captured edge list
    pub fn new(edges: Vec<Edge>) -> Self {
        Self {
            name: "replay_source".to_string(),
            edges,
            sent: false,
        }
    }

    /// With custom name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl ProcessNode for ReplaySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn should_stop(&self) -> bool {
        self.sent
    }

    fn num_inputs(&self) -> usize {
        0
    }

    fn num_outputs(&self) -> usize {
        1
    }

    fn work(&mut self, _inputs: &[InputPort], outputs: &[OutputPort]) -> WorkResult<usize> {
        let output = outputs
            .first()
            .and_then(|p| p.get::<Edge>())
            .ok_or_else(|| WorkError::NodeError("missing edge output".into()))?;

        for edge in &self.edges {
            output.send(*edge)?;
        }
        output.close();
        self.sent = true;

        debug!("Replayed {} edges", self.edges.len());
        Ok(self.edges.len())
    }
}
