//! Decoder output sinks
//!
//! The decoder reports results through a [`CecSink`]. [`ChannelSink`]
//! forwards every event into a runtime channel, preserving emission order.
//! [`MemorySink`] collects events into shared state with commit watermarks:
//! readers only see results up to the last commit.

use std::sync::{Arc, Mutex};

use crate::runtime::errors::WorkResult;
use crate::runtime::sender::Sender;

use super::types::{CecEvent, CecFrame, Marker, MarkerKind};

/// Destination for decoded frames and markers.
///
/// `commit` marks everything emitted so far as final. `progress` reports how
/// far along the capture the decoder has advanced.
pub trait CecSink {
    fn emit_frame(&mut self, frame: CecFrame) -> WorkResult;
    fn emit_marker(&mut self, sample: u64, kind: MarkerKind) -> WorkResult;
    fn commit(&mut self) -> WorkResult;
    fn progress(&mut self, sample: u64) -> WorkResult;
}

/// Sink that forwards events into a channel, in emission order
pub struct ChannelSink {
    events: Sender<CecEvent>,
}

impl ChannelSink {
    pub fn new(events: Sender<CecEvent>) -> Self {
        Self { events }
    }
}

impl CecSink for ChannelSink {
    fn emit_frame(&mut self, frame: CecFrame) -> WorkResult {
        self.events.send(CecEvent::Frame(frame))?;
        Ok(())
    }

    fn emit_marker(&mut self, sample: u64, kind: MarkerKind) -> WorkResult {
        self.events.send(CecEvent::Marker(Marker::new(sample, kind)))?;
        Ok(())
    }

    fn commit(&mut self) -> WorkResult {
        self.events.send(CecEvent::Commit)?;
        Ok(())
    }

    fn progress(&mut self, sample: u64) -> WorkResult {
        self.events.send(CecEvent::Progress(sample))?;
        Ok(())
    }
}

#[derive(Default)]
struct MemoryState {
    frames: Vec<CecFrame>,
    markers: Vec<Marker>,
    committed_frames: usize,
    committed_markers: usize,
    progress: u64,
}

/// Sink that accumulates events in shared memory.
///
/// Cloning yields a handle over the same state, so one clone can live inside
/// a decoder node while another reads results afterwards. The read accessors
/// return only committed results.
#[derive(Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event received from a [`ChannelSink`] stream.
    pub fn apply(&mut self, event: CecEvent) -> WorkResult {
        match event {
            CecEvent::Frame(frame) => self.emit_frame(frame),
            CecEvent::Marker(marker) => self.emit_marker(marker.sample, marker.kind),
            CecEvent::Commit => self.commit(),
            CecEvent::Progress(sample) => self.progress(sample),
        }
    }

    /// Committed frames, in decode order.
    pub fn frames(&self) -> Vec<CecFrame> {
        let state = self.lock();
        state.frames[..state.committed_frames].to_vec()
    }

    /// Committed markers, in decode order.
    pub fn markers(&self) -> Vec<Marker> {
        let state = self.lock();
        state.markers[..state.committed_markers].to_vec()
    }

    /// Last reported progress position.
    pub fn progress_sample(&self) -> u64 {
        self.lock().progress
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // Decoder threads don't panic while holding the lock
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl CecSink for MemorySink {
    fn emit_frame(&mut self, frame: CecFrame) -> WorkResult {
        self.lock().frames.push(frame);
        Ok(())
    }

    fn emit_marker(&mut self, sample: u64, kind: MarkerKind) -> WorkResult {
        self.lock().markers.push(Marker::new(sample, kind));
        Ok(())
    }

    fn commit(&mut self) -> WorkResult {
        let mut state = self.lock();
        state.committed_frames = state.frames.len();
        state.committed_markers = state.markers.len();
        Ok(())
    }

    fn progress(&mut self, sample: u64) -> WorkResult {
        self.lock().progress = sample;
        Ok(())
    }
}

impl std::fmt::Debug for MemorySink {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("MemorySink")
            .field("frames", &state.frames.len())
            .field("committed_frames", &state.committed_frames)
            .field("markers", &state.markers.len())
            .field("committed_markers", &state.committed_markers)
            .field("progress", &state.progress)
            .finish()
    }
}
