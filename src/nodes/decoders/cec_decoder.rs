//! HDMI-CEC bus decoder
//!
//! Decodes a single-wire CEC capture, presented as an edge stream, into
//! protocol frames and annotation markers. Messages are made of a start
//! sequence followed by up to sixteen ten-bit blocks (eight data bits, an
//! end-of-message bit, and an acknowledge bit). Protocol violations end the
//! current message; decoding resynchronizes on the next start sequence.

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use crate::runtime::cursor::EdgeCursor;
use crate::runtime::edge::{BitLevel, Edge};
use crate::runtime::errors::{WorkError, WorkResult};
use crate::runtime::node::ProcessNode;
use crate::runtime::ports::{InputPort, OutputPort};

use super::protocol;
use super::sink::{CecSink, ChannelSink};
use super::types::{CecEvent, CecFrame, DecodeError, FrameType, MarkerKind, ReadError, ReadResult};

/// Read a start sequence: a long low pulse opening every message.
///
/// On success the cursor rests on the falling edge of the first data bit and
/// a start marker has been placed on the opening falling edge.
fn read_start_sequence<S: CecSink>(cec: &mut EdgeCursor, sink: &mut S) -> ReadResult<CecFrame> {
    // Get to a high level so the next transition is the opening falling edge
    if cec.level() == BitLevel::Low {
        cec.advance_to_next_edge()?;
    }
    cec.advance_to_next_edge()?;
    let start_sample = cec.sample();

    cec.advance_to_next_edge()?;
    let elapsed_ms = cec.elapsed_ms(start_sample);
    if !protocol::start_low_valid(elapsed_ms) {
        return Err(DecodeError::StartLowPhase { elapsed_ms }.into());
    }

    cec.advance_to_next_edge()?;
    let elapsed_ms = cec.elapsed_ms(start_sample);
    if !protocol::start_period_valid(elapsed_ms) {
        return Err(DecodeError::StartPeriod { elapsed_ms }.into());
    }

    sink.emit_marker(start_sample, MarkerKind::Start)?;

    Ok(CecFrame {
        frame_type: FrameType::StartSeq,
        data: 0,
        eom: false,
        ack: false,
        start_sample,
        // The sequence ends just before the first data bit's falling edge
        end_sample: cec.sample() - 1,
    })
}

/// Read eight data bits (MSB first) plus the end-of-message bit.
///
/// The cursor must rest on the falling edge of the first bit cell; on
/// success it rests on the falling edge that opens the acknowledge cell.
fn read_byte_eom<S: CecSink>(cec: &mut EdgeCursor, sink: &mut S) -> ReadResult<(u8, bool)> {
    let mut data: u8 = 0;
    let mut eom = false;

    // Bits 7 down to 0, then the EOM bit as a ninth cell
    for cell in 0..9 {
        let first_sample = cec.sample();

        cec.advance_to_next_edge()?; // LOW to HIGH
        let elapsed_ms = cec.elapsed_ms(first_sample);
        let value = protocol::classify_bit(elapsed_ms)
            .ok_or(DecodeError::BitLowPhase { elapsed_ms })?;

        let kind = if value { MarkerKind::One } else { MarkerKind::Zero };
        sink.emit_marker(cec.sample(), kind)?;

        cec.advance_to_next_edge()?; // HIGH to LOW
        let elapsed_ms = cec.elapsed_ms(first_sample);
        if !protocol::bit_period_valid(elapsed_ms) {
            return Err(DecodeError::BitPeriod { elapsed_ms }.into());
        }

        if cell < 8 {
            data |= (value as u8) << (7 - cell);
        } else {
            eom = value;
        }
    }

    Ok((data, eom))
}

/// Read one complete block: byte, EOM bit, ACK bit, and the trailing signal
/// free time.
///
/// `block_index` selects the frame type: the first block is the header, the
/// second the opcode, later ones operands.
fn read_block<S: CecSink>(
    cec: &mut EdgeCursor,
    sink: &mut S,
    block_index: usize,
) -> ReadResult<CecFrame> {
    // Wait until the bus is low
    if cec.level() == BitLevel::High {
        cec.advance_to_next_edge()?;
    }

    let frame_type = match block_index {
        0 => FrameType::Header,
        1 => FrameType::OpCode,
        i if i < protocol::MAX_MESSAGE_BLOCKS => FrameType::Operand,
        _ => return Err(DecodeError::MessageTooLong.into()),
    };

    let start_sample = cec.sample();
    let (data, eom) = read_byte_eom(cec, sink)?;

    // The byte reader quits just after the falling edge that opens the
    // acknowledge cell
    let ack_start = cec.sample();
    cec.advance_to_next_edge()?; // LOW to HIGH
    let elapsed_ms = cec.elapsed_ms(ack_start);

    let ack = protocol::ack_asserted(elapsed_ms);
    if elapsed_ms >= protocol::FREE_TIME_MIN_MS {
        return Err(DecodeError::AckTimeout { elapsed_ms }.into());
    }

    let kind = if ack { MarkerKind::One } else { MarkerKind::Zero };
    sink.emit_marker(cec.sample() - 1, kind)?;

    // The bus must stay high at least until the minimum signal free time,
    // measured from the start of the acknowledge cell
    let min_mark = ack_start + cec.samples_for_ms(protocol::FREE_TIME_MIN_MS);
    let nominal_mark = ack_start + cec.samples_for_ms(protocol::FREE_TIME_NOMINAL_MS);
    let to_min = min_mark.saturating_sub(cec.sample());
    let to_nominal = nominal_mark.saturating_sub(cec.sample());

    if cec.would_cross_edge(to_min) {
        return Err(DecodeError::FreeTimeViolation.into());
    }

    // Park at the nominal bit-period spacing, or at the minimum if the next
    // message starts before that
    if cec.would_cross_edge(to_nominal) {
        cec.advance_by(to_min);
    } else {
        cec.advance_by(to_nominal);
    }

    Ok(CecFrame {
        frame_type,
        data,
        eom,
        ack,
        start_sample,
        // The block ends just before the position where decoding parked
        end_sample: cec.sample() - 1,
    })
}

/// Decode one message from the cursor's current position.
///
/// Emits frames and markers into `sink` as they are decoded, committing
/// after each frame so results become visible incrementally. A protocol
/// violation drops an error marker at the offending position and returns
/// normally; the next call resynchronizes on the next start sequence.
///
/// Returns the number of frames emitted, or `Err(WorkError::Shutdown)` when
/// the capture ends.
pub fn decode_message<S: CecSink>(cec: &mut EdgeCursor, sink: &mut S) -> WorkResult<usize> {
    let start = match read_start_sequence(cec, sink) {
        Ok(frame) => frame,
        Err(ReadError::Decode(e)) => {
            debug!("Start sequence rejected at sample {}: {}", cec.sample(), e);
            sink.emit_marker(cec.sample(), MarkerKind::ErrorDot)?;
            sink.commit()?;
            return Ok(0);
        }
        Err(ReadError::Work(e)) => return Err(e),
    };

    sink.emit_frame(start)?;
    sink.commit()?;
    sink.progress(start.end_sample)?;
    let mut frames = 1;

    let mut block_index = 0;
    let mut eom = false;
    while !eom {
        let block = match read_block(cec, sink, block_index) {
            Ok(block) => block,
            Err(ReadError::Decode(e)) => {
                debug!("Block {} rejected at sample {}: {}", block_index, cec.sample(), e);
                sink.emit_marker(cec.sample(), MarkerKind::ErrorDot)?;
                break;
            }
            Err(ReadError::Work(e)) => return Err(e),
        };

        sink.emit_frame(block)?;
        sink.commit()?;
        sink.progress(block.end_sample)?;
        frames += 1;

        block_index += 1;
        eom = block.eom;
    }

    // A completed message gets an end marker; an aborted one resynchronizes
    // on the next start sequence
    if eom {
        sink.emit_marker(cec.sample(), MarkerKind::Stop)?;
    }
    sink.commit()?;
    sink.progress(cec.sample())?;

    Ok(frames)
}

/// Process node wrapping [`decode_message`]: edges in, [`CecEvent`]s out.
///
/// Each `work()` call decodes one message. Cursor position and line level
/// survive between calls so decoding picks up where it left off.
pub struct CecDecoder {
    name: String,
    sample_rate: u32,
    edge_buffer: VecDeque<Edge>,
    resume: Option<(u64, BitLevel)>,
    messages: u64,
}

impl CecDecoder {
    /// Create a decoder for a capture at the given sample rate in Hz.
    pub fn new(sample_rate: u32) -> Self {
        if sample_rate < protocol::MIN_SAMPLE_RATE_HZ {
            warn!(
                "Sample rate {} Hz is below the supported minimum of {} Hz",
                sample_rate,
                protocol::MIN_SAMPLE_RATE_HZ
            );
        }
        Self {
            name: "cec_decoder".to_string(),
            sample_rate,
            edge_buffer: VecDeque::new(),
            resume: None,
            messages: 0,
        }
    }

    /// With custom name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl ProcessNode for CecDecoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_inputs(&self) -> usize {
        1
    }

    fn num_outputs(&self) -> usize {
        1
    }

    fn work(&mut self, inputs: &[InputPort], outputs: &[OutputPort]) -> WorkResult<usize> {
        let output = outputs
            .first()
            .and_then(|p| p.get::<CecEvent>())
            .ok_or_else(|| WorkError::NodeError("missing event output".into()))?;
        let input_port = inputs
            .first()
            .ok_or_else(|| WorkError::NodeError("missing edge input".into()))?;
        let input = input_port
            .get::<Edge>(&mut self.edge_buffer)
            .ok_or_else(|| WorkError::NodeError("edge input carries the wrong type".into()))?;

        let mut cursor = match self.resume.take() {
            Some((sample, level)) => EdgeCursor::resume(input, self.sample_rate, sample, level),
            None => EdgeCursor::new(input, self.sample_rate)?,
        };

        let mut sink = ChannelSink::new(output);
        let result = decode_message(&mut cursor, &mut sink);

        // Save the position so the next call resumes mid-capture
        let position = (cursor.sample(), cursor.level());
        drop(cursor);
        self.resume = Some(position);

        let frames = result?;
        if frames > 0 {
            self.messages += 1;
            trace!(
                "[{}] Message {} decoded, {} frames",
                self.name, self.messages, frames
            );
        }
        Ok(frames)
    }
}
