//! Edge-transition representation of a captured digital channel

use std::fmt;

/// Logic level of the monitored line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitLevel {
    Low,
    High,
}

impl BitLevel {
    /// The opposite level.
    pub fn toggled(self) -> Self {
        match self {
            BitLevel::Low => BitLevel::High,
            BitLevel::High => BitLevel::Low,
        }
    }
}

impl fmt::Display for BitLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BitLevel::Low => write!(f, "LOW"),
            BitLevel::High => write!(f, "HIGH"),
        }
    }
}

/// A level change on one channel at a specific sample position
///
/// This is a run-length encoded representation: the level holds from
/// `sample` until the next `Edge` arrives. By convention the first message
/// on an edge channel states the initial level of the line; every message
/// after that is a strictly alternating transition at a strictly increasing
/// sample position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    /// Sample position at which the level takes effect (0-based)
    pub sample: u64,
    /// Level of the line from this sample onward
    pub level: BitLevel,
}

impl Edge {
    /// Create a new edge
    pub fn new(sample: u64, level: BitLevel) -> Self {
        Self { sample, level }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Edge[s={}, {}]", self.sample, self.level)
    }
}
