//! Protocol decoders
//!
//! The CEC decoder consumes an edge stream and produces frames and
//! annotation markers through a [`CecSink`].

pub mod cec_decoder;
pub mod protocol;
pub mod sink;
pub mod types;

pub use cec_decoder::{CecDecoder, decode_message};
pub use sink::{CecSink, ChannelSink, MemorySink};
pub use types::{CecEvent, CecFrame, DecodeError, FrameType, Marker, MarkerKind, ReadError};
