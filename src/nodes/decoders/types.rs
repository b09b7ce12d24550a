//! Decoded CEC output types: frames, markers, events, errors

use std::fmt;

use crate::runtime::errors::WorkError;

use super::protocol;

/// What a decoded frame represents within a message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameType {
    /// The start sequence that opens every message
    StartSeq,
    /// First block: source and destination addresses
    Header,
    /// Second block: the opcode
    OpCode,
    /// Third and later blocks: operand data
    Operand,
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FrameType::StartSeq => write!(f, "Start"),
            FrameType::Header => write!(f, "Header"),
            FrameType::OpCode => write!(f, "OpCode"),
            FrameType::Operand => write!(f, "Operand"),
        }
    }
}

/// One decoded protocol element covering a sample range.
///
/// A start sequence frame carries no payload; its `data`, `eom`, and `ack`
/// fields are zeroed. For block frames, `data` holds the eight data bits and
/// the flags hold the EOM and ACK bits of the block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CecFrame {
    pub frame_type: FrameType,
    pub data: u8,
    pub eom: bool,
    pub ack: bool,
    /// First sample covered by this frame (inclusive)
    pub start_sample: u64,
    /// Last sample covered by this frame (inclusive)
    pub end_sample: u64,
}

impl CecFrame {
    /// Source address nibble of a header block.
    pub fn source(&self) -> u8 {
        self.data >> 4
    }

    /// Destination address nibble of a header block.
    pub fn destination(&self) -> u8 {
        self.data & 0x0F
    }
}

impl fmt::Display for CecFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.frame_type {
            FrameType::StartSeq => write!(f, "Start Sequence")?,
            FrameType::Header => write!(
                f,
                "Header [{} -> {}]",
                protocol::device_address_name(self.source()),
                protocol::device_address_name(self.destination())
            )?,
            FrameType::OpCode => match protocol::opcode_name(self.data) {
                Some(name) => write!(f, "OpCode [{}]", name)?,
                None => write!(f, "OpCode [0x{:02X}]", self.data)?,
            },
            FrameType::Operand => write!(f, "Operand [0x{:02X}]", self.data)?,
        }
        if self.frame_type != FrameType::StartSeq {
            if self.eom {
                write!(f, " EOM")?;
            }
            if self.ack {
                write!(f, " ACK")?;
            }
        }
        Ok(())
    }
}

/// Kind of annotation marker placed at a single sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    /// Falling edge that opened a valid start sequence
    Start,
    /// End of a completed message
    Stop,
    /// A decoded zero bit, at the cell's internal rising edge
    Zero,
    /// A decoded one bit, at the cell's internal rising edge
    One,
    /// A protocol error at this position; decoding resynchronizes after it
    ErrorDot,
}

/// A point annotation on the capture timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Marker {
    pub sample: u64,
    pub kind: MarkerKind,
}

impl Marker {
    pub fn new(sample: u64, kind: MarkerKind) -> Self {
        Self { sample, kind }
    }
}

/// Everything a decoder can emit, in emission order
#[derive(Clone, Debug, PartialEq)]
pub enum CecEvent {
    Frame(CecFrame),
    Marker(Marker),
    /// Results emitted so far are final and may be displayed
    Commit,
    /// Decoding has advanced to this sample position
    Progress(u64),
}

/// A recoverable protocol violation.
///
/// These end the current message but not the decoding session: the caller
/// drops an error marker and resynchronizes on the next start sequence.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("start sequence low phase out of range: {elapsed_ms:.3} ms")]
    StartLowPhase { elapsed_ms: f64 },

    #[error("start sequence period out of range: {elapsed_ms:.3} ms")]
    StartPeriod { elapsed_ms: f64 },

    #[error("bit low phase out of range: {elapsed_ms:.3} ms")]
    BitLowPhase { elapsed_ms: f64 },

    #[error("bit period out of range: {elapsed_ms:.3} ms")]
    BitPeriod { elapsed_ms: f64 },

    #[error("ack low phase too long: {elapsed_ms:.3} ms")]
    AckTimeout { elapsed_ms: f64 },

    #[error("signal free time violated before next transition")]
    FreeTimeViolation,

    #[error("message exceeds maximum block count")]
    MessageTooLong,
}

/// Error type for decoder read operations: either a recoverable protocol
/// violation or a runtime-level failure (shutdown, channel errors).
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Work(#[from] WorkError),
}

/// Result type for decoder read operations
pub type ReadResult<T = ()> = Result<T, ReadError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(frame_type: FrameType, data: u8, eom: bool, ack: bool) -> CecFrame {
        CecFrame {
            frame_type,
            data,
            eom,
            ack,
            start_sample: 0,
            end_sample: 0,
        }
    }

    #[test]
    fn test_header_nibbles() {
        let header = frame(FrameType::Header, 0x4F, false, true);
        assert_eq!(header.source(), 0x4);
        assert_eq!(header.destination(), 0xF);
    }

    #[test]
    fn test_frame_display() {
        let start = frame(FrameType::StartSeq, 0, false, false);
        assert_eq!(format!("{}", start), "Start Sequence");

        let header = frame(FrameType::Header, 0x40, false, true);
        assert_eq!(format!("{}", header), "Header [Player 1 -> TV] ACK");

        let opcode = frame(FrameType::OpCode, 0x82, true, false);
        assert_eq!(format!("{}", opcode), "OpCode [Active Source] EOM");

        let unknown = frame(FrameType::OpCode, 0x03, false, false);
        assert_eq!(format!("{}", unknown), "OpCode [0x03]");

        let operand = frame(FrameType::Operand, 0xA5, true, true);
        assert_eq!(format!("{}", operand), "Operand [0xA5] EOM ACK");
    }
}
