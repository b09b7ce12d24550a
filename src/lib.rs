//! Streaming HDMI-CEC decoder for captured single-wire waveforms
//!
//! This library recovers CEC messages from an edge-transition stream captured
//! on the HDMI CEC line. It turns run-length-encoded level changes into
//! structured frames (start sequence, header, opcode, operands) plus bit-level
//! annotation markers, resynchronizing automatically after timing or protocol
//! violations.
//!
//! # Architecture
//!
//! - **EdgeCursor**: forward-only cursor over one channel's transitions, with
//!   blocking edge advances and non-committing lookahead
//! - **CecDecoder**: the bit-level decode state machine, runnable as a
//!   streaming node with crossbeam channels
//! - **Sinks**: [`ChannelSink`] streams [`CecEvent`]s to a consumer,
//!   [`MemorySink`] collects committed results for host snapshots
//! - **Scheduler**: thread-per-node execution with cooperative shutdown
//!
//! # Example
//!
//! ```no_run
//! use std::collections::VecDeque;
//! use cec_analyzer::{
//!     CecWaveform, Edge, EdgeCursor, MemorySink, WorkError, channel, decode_message,
//! };
//!
//! // Synthesize a capture: <TV → Player 1> "Give Device Power Status".
//! let mut waveform = CecWaveform::new(100_000);
//! waveform.hold_ms(1.0);
//! waveform.start_sequence();
//! waveform.message(&[0x04, 0x8f]);
//!
//! let (edges_out, edges_in) = channel::<Edge>(4096);
//! let tx = edges_out.get::<Edge>().unwrap();
//! for edge in waveform.finish() {
//!     tx.send(edge).unwrap();
//! }
//! tx.close();
//!
//! let mut buffer = VecDeque::new();
//! let mut cursor = EdgeCursor::new(edges_in.get(&mut buffer).unwrap(), 100_000).unwrap();
//! let mut sink = MemorySink::new();
//! loop {
//!     match decode_message(&mut cursor, &mut sink) {
//!         Ok(_) => {}
//!         Err(WorkError::Shutdown) => break,
//!         Err(e) => panic!("{e}"),
//!     }
//! }
//! for frame in sink.frames() {
//!     println!("{frame}");
//! }
//! ```

pub mod nodes;
pub mod runtime;
pub mod sim;

// Re-export the decoder and its data types
pub use nodes::ReplaySource;
pub use nodes::decoders::{
    CecDecoder, CecEvent, CecFrame, CecSink, ChannelSink, DecodeError, FrameType, Marker,
    MarkerKind, MemorySink, ReadError, decode_message, protocol,
};

// Re-export streaming runtime components
pub use runtime::{
    BitLevel, ChannelMessage, Edge, EdgeCursor, InputPort, OutputPort, ProcessNode, Receiver,
    Scheduler, Sender, WorkError, WorkResult, channel,
};

// Re-export the waveform builder for self-tests
pub use sim::CecWaveform;
