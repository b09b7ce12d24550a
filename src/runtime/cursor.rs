//! Forward-only cursor over one channel's edge transitions
//!
//! [`EdgeCursor`] is the decoder-facing view of a captured channel: a current
//! sample position, the level of the line at that position, and blocking
//! advances toward the next transition. Lookahead is available without
//! committing via [`EdgeCursor::would_cross_edge`], which peeks the channel's
//! putback buffer.
//!
//! The cursor never moves backward. `advance_by` only moves the position; it
//! is the caller's job to establish, via `would_cross_edge`, that no
//! transition lies inside the advanced range.

use super::edge::{BitLevel, Edge};
use super::errors::WorkResult;
use super::receiver::Receiver;

/// Cursor over a run-length-encoded edge stream.
///
/// Construction consumes the stream's leading message, which states the
/// initial level of the line (see [`Edge`]). When a node re-creates the
/// cursor on a later `work()` call, use [`EdgeCursor::resume`] with the
/// position and level saved from the previous call.
pub struct EdgeCursor<'a> {
    edges: Receiver<'a, Edge>,
    sample_rate: u32,
    sample: u64,
    level: BitLevel,
}

impl<'a> EdgeCursor<'a> {
    /// Create a cursor at the start of a capture, reading the initial level
    /// from the stream's first message.
    pub fn new(mut edges: Receiver<'a, Edge>, sample_rate: u32) -> WorkResult<Self> {
        let initial = edges.recv()?;
        Ok(Self {
            edges,
            sample_rate,
            sample: initial.sample,
            level: initial.level,
        })
    }

    /// Re-create a cursor mid-capture from a saved position and level.
    pub fn resume(
        edges: Receiver<'a, Edge>,
        sample_rate: u32,
        sample: u64,
        level: BitLevel,
    ) -> Self {
        Self {
            edges,
            sample_rate,
            sample,
            level,
        }
    }

    /// Current sample position.
    pub fn sample(&self) -> u64 {
        self.sample
    }

    /// Level of the line at the current position.
    pub fn level(&self) -> BitLevel {
        self.level
    }

    /// Sample rate of the capture in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Block until the next transition and move onto it.
    ///
    /// Returns `Err(WorkError::Shutdown)` when the capture ends.
    pub fn advance_to_next_edge(&mut self) -> WorkResult<()> {
        let edge = self.edges.recv()?;
        debug_assert!(edge.sample > self.sample, "edge stream must move forward");
        debug_assert!(edge.level != self.level, "transitions must alternate");
        self.sample = edge.sample;
        self.level = edge.level;
        Ok(())
    }

    /// Move forward exactly `samples` positions without consuming an edge.
    ///
    /// The caller must have checked via [`EdgeCursor::would_cross_edge`] that
    /// no transition lies within the range.
    pub fn advance_by(&mut self, samples: u64) {
        self.sample += samples;
    }

    /// Non-committing lookahead: would moving forward by `samples` positions
    /// reach or pass the next transition?
    ///
    /// An exhausted stream means the level holds to the end of the capture,
    /// so the answer is `false`.
    pub fn would_cross_edge(&mut self, samples: u64) -> bool {
        match self.edges.peek() {
            Ok(next) => next.sample <= self.sample + samples,
            Err(_) => false,
        }
    }

    /// Milliseconds elapsed between `since_sample` and the current position.
    pub fn elapsed_ms(&self, since_sample: u64) -> f64 {
        (self.sample - since_sample) as f64 * 1000.0 / self.sample_rate as f64
    }

    /// Number of samples covering `ms` milliseconds at the capture's sample
    /// rate, rounded to the nearest sample.
    pub fn samples_for_ms(&self, ms: f64) -> u64 {
        (ms * self.sample_rate as f64 / 1000.0).round() as u64
    }
}
