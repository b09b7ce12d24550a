//! CEC waveform builder for tests and demos
//!
//! [`CecWaveform`] synthesizes the edge stream of a CEC bus capture:
//! start sequences, data bit cells, acknowledge cells, and whole messages,
//! with per-element timing overrides for exercising the tolerance windows.

use crate::runtime::edge::{BitLevel, Edge};

/// Builder for a synthetic CEC capture.
///
/// The produced edge list follows the stream convention: the first entry
/// states the initial level (high, the bus idle state), every later entry
/// is an alternating transition at a strictly increasing sample position.
pub struct CecWaveform {
    sample_rate: u32,
    edges: Vec<Edge>,
    sample: u64,
    level: BitLevel,
}

impl CecWaveform {
    /// Start a capture at the given sample rate in Hz, with the bus idle.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            edges: vec![Edge::new(0, BitLevel::High)],
            sample: 0,
            level: BitLevel::High,
        }
    }

    /// Sample rate of the capture in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Current position in samples.
    pub fn position(&self) -> u64 {
        self.sample
    }

    /// Number of samples covering `ms` milliseconds, rounded.
    pub fn samples(&self, ms: f64) -> u64 {
        (ms * self.sample_rate as f64 / 1000.0).round() as u64
    }

    /// Hold the current level for `ms` milliseconds.
    pub fn hold_ms(&mut self, ms: f64) {
        self.sample += self.samples(ms);
    }

    /// Toggle the line at the current position.
    pub fn edge(&mut self) {
        self.level = self.level.toggled();
        self.edges.push(Edge::new(self.sample, self.level));
    }

    /// A nominal start sequence: 3.7 ms low, 4.5 ms total.
    pub fn start_sequence(&mut self) {
        self.start_sequence_with(3.7, 4.5);
    }

    /// A start sequence with explicit low-phase and total durations.
    pub fn start_sequence_with(&mut self, low_ms: f64, total_ms: f64) {
        debug_assert_eq!(self.level, BitLevel::High, "bus must be idle");
        let begin = self.sample;
        self.edge(); // falling
        self.hold_ms(low_ms);
        self.edge(); // rising
        self.sample = begin + self.samples(total_ms);
    }

    /// A nominal data bit cell: 0.6 ms low for a one, 1.5 ms for a zero,
    /// 2.4 ms total.
    pub fn data_bit(&mut self, value: bool) {
        let low_ms = if value { 0.6 } else { 1.5 };
        self.data_bit_with(low_ms, 2.4);
    }

    /// A data bit cell with explicit low-phase and total durations.
    pub fn data_bit_with(&mut self, low_ms: f64, total_ms: f64) {
        debug_assert_eq!(self.level, BitLevel::High, "cell starts from high");
        let begin = self.sample;
        self.edge(); // falling
        self.hold_ms(low_ms);
        self.edge(); // rising
        self.sample = begin + self.samples(total_ms);
    }

    /// A nominal acknowledge cell: 1.5 ms low when asserted, 0.6 ms when
    /// not. Ends at the rising edge; the caller controls the spacing to
    /// whatever follows.
    pub fn ack_bit(&mut self, asserted: bool) {
        let low_ms = if asserted { 1.5 } else { 0.6 };
        self.ack_bit_with(low_ms);
    }

    /// An acknowledge cell with an explicit low-phase duration.
    pub fn ack_bit_with(&mut self, low_ms: f64) {
        debug_assert_eq!(self.level, BitLevel::High, "cell starts from high");
        self.edge(); // falling
        self.hold_ms(low_ms);
        self.edge(); // rising
    }

    /// One complete block: eight data bits MSB first, the EOM bit, and the
    /// acknowledge cell.
    pub fn block(&mut self, data: u8, eom: bool, ack: bool) {
        for bit in (0..8).rev() {
            self.data_bit(data >> bit & 1 == 1);
        }
        self.data_bit(eom);
        self.ack_bit(ack);
    }

    /// A sequence of blocks with per-block acknowledge values; the EOM bit
    /// is set on the last block. Blocks are spaced one nominal bit period
    /// apart, measured from acknowledge cell start to the next falling edge.
    pub fn message_with(&mut self, blocks: &[(u8, bool)]) {
        assert!(!blocks.is_empty(), "a message has at least a header block");
        let last = blocks.len() - 1;
        for (i, &(data, ack)) in blocks.iter().enumerate() {
            self.block(data, i == last, ack);
            if i != last {
                // Next falling edge lands 2.45 ms after acknowledge start
                self.hold_ms(if ack { 0.95 } else { 1.85 });
            }
        }
    }

    /// A sequence of blocks, all acknowledged.
    pub fn message(&mut self, data: &[u8]) {
        let blocks: Vec<(u8, bool)> = data.iter().map(|&b| (b, true)).collect();
        self.message_with(&blocks);
    }

    /// The edge list built so far.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Consume the builder and return the edge list.
    pub fn finish(self) -> Vec<Edge> {
        self.edges
    }
}
