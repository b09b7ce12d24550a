//! Node-based signal processing
//!
//! - **ReplaySource**: plays a prepared edge list into the graph
//! - **Decoders**: the HDMI-CEC protocol decoder and its output types
//!
//! All nodes are connected via crossbeam channels and run thread-per-node
//! under the [`Scheduler`](crate::runtime::Scheduler).

pub mod decoders;
mod replay;

pub use replay::ReplaySource;

// Re-export the edge types from the runtime
pub use crate::runtime::{BitLevel, Edge};
