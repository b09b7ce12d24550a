//! End-to-end decoding tests over synthetic captures

use std::collections::VecDeque;

use cec_analyzer::{
    CecDecoder, CecEvent, CecSink, CecWaveform, ChannelSink, Edge, EdgeCursor, FrameType,
    InputPort, Marker, MarkerKind, MemorySink, OutputPort, ProcessNode, ReplaySource, Scheduler,
    WorkError, WorkResult, channel, decode_message,
};

const RATE: u32 = 100_000; // 100 samples per millisecond

/// Decode a finished waveform into a memory sink.
fn decode_waveform(waveform: CecWaveform) -> MemorySink {
    let mut sink = MemorySink::new();
    run_decode(waveform, &mut sink);
    sink
}

/// Decode a finished waveform, capturing the raw event stream in order.
fn decode_events(waveform: CecWaveform) -> Vec<CecEvent> {
    let (events_out, events_in) = channel::<CecEvent>(16384);
    let sender = events_out.get::<CecEvent>().unwrap();
    let mut sink = ChannelSink::new(sender);
    run_decode(waveform, &mut sink);
    drop(sink);
    drop(events_out);

    let mut buffer = VecDeque::new();
    let mut receiver = events_in.get::<CecEvent>(&mut buffer).unwrap();
    let mut events = Vec::new();
    while let Ok(event) = receiver.recv() {
        events.push(event);
    }
    events
}

fn run_decode<S: CecSink>(waveform: CecWaveform, sink: &mut S) {
    let (edges_out, edges_in) = channel::<Edge>(16384);
    let sender = edges_out.get::<Edge>().unwrap();
    for edge in waveform.finish() {
        sender.send(edge).unwrap();
    }
    sender.close();

    let mut buffer = VecDeque::new();
    let receiver = edges_in.get::<Edge>(&mut buffer).unwrap();
    let mut cursor = EdgeCursor::new(receiver, RATE).unwrap();
    loop {
        match decode_message(&mut cursor, sink) {
            Ok(_) => {}
            Err(WorkError::Shutdown) => break,
            Err(e) => panic!("decode failed: {}", e),
        }
    }
}

fn marker_kinds(markers: &[Marker], kind: MarkerKind) -> Vec<Marker> {
    markers.iter().copied().filter(|m| m.kind == kind).collect()
}

#[test]
fn decodes_header_and_opcode_with_exact_sample_ranges() {
    // <Player 1 -> Broadcast> Active Source: header acknowledged, opcode
    // not (broadcast), end of message on the opcode block
    let mut wf = CecWaveform::new(RATE);
    wf.hold_ms(1.0);
    wf.start_sequence();
    wf.message_with(&[(0x4F, true), (0x82, false)]);
    let sink = decode_waveform(wf);

    let frames = sink.frames();
    assert_eq!(frames.len(), 3);

    assert_eq!(frames[0].frame_type, FrameType::StartSeq);
    assert_eq!(frames[0].start_sample, 100);
    assert_eq!(frames[0].end_sample, 549);

    assert_eq!(frames[1].frame_type, FrameType::Header);
    assert_eq!(frames[1].data, 0x4F);
    assert!(frames[1].ack);
    assert!(!frames[1].eom);
    assert_eq!(frames[1].start_sample, 550);
    // Parked at the nominal spacing: acknowledge start + 2.4 ms
    assert_eq!(frames[1].end_sample, 2949);

    assert_eq!(frames[2].frame_type, FrameType::OpCode);
    assert_eq!(frames[2].data, 0x82);
    assert!(!frames[2].ack);
    assert!(frames[2].eom);
    assert_eq!(frames[2].start_sample, 2955);
    assert_eq!(frames[2].end_sample, 5354);

    let markers = sink.markers();
    assert_eq!(markers.len(), 22);
    assert_eq!(markers[0], Marker::new(100, MarkerKind::Start));
    assert_eq!(markers[21], Marker::new(5355, MarkerKind::Stop));

    // Header data bits 0100 1111, then EOM zero, at each cell's rising edge
    let expected = [false, true, false, false, true, true, true, true, false];
    for (i, &one) in expected.iter().enumerate() {
        let kind = if one { MarkerKind::One } else { MarkerKind::Zero };
        assert_eq!(markers[1 + i].kind, kind, "header bit {}", i);
    }

    assert_eq!(sink.progress_sample(), 5355);
}

#[test]
fn event_stream_preserves_emission_order() {
    let mut wf = CecWaveform::new(RATE);
    wf.hold_ms(1.0);
    wf.start_sequence();
    wf.message_with(&[(0x4F, true), (0x82, false)]);
    let events = decode_events(wf);

    // Each frame is followed by a commit and a progress report; the end
    // marker lands after the last frame's commit
    let opcode_at = events
        .iter()
        .position(|e| matches!(e, CecEvent::Frame(f) if f.frame_type == FrameType::OpCode))
        .unwrap();
    assert!(matches!(events[opcode_at + 1], CecEvent::Commit));
    assert!(matches!(events[opcode_at + 2], CecEvent::Progress(5354)));
    assert!(matches!(
        events[opcode_at + 3],
        CecEvent::Marker(Marker {
            sample: 5355,
            kind: MarkerKind::Stop
        })
    ));
    assert!(matches!(events[opcode_at + 4], CecEvent::Commit));
    assert!(matches!(events[opcode_at + 5], CecEvent::Progress(5355)));
}

#[test]
fn resynchronizes_after_rejected_start_sequence() {
    // A 4.0 ms low phase is outside the start window; the decoder drops
    // one error marker and recovers on the next message
    let mut wf = CecWaveform::new(RATE);
    wf.hold_ms(1.0);
    wf.start_sequence_with(4.0, 4.8);
    wf.hold_ms(2.0);
    wf.start_sequence();
    wf.message(&[0x40, 0x82]);
    let sink = decode_waveform(wf);

    let errors = marker_kinds(&sink.markers(), MarkerKind::ErrorDot);
    assert_eq!(errors.len(), 1);
    // The violation is flagged at the rising edge that ended the low phase
    assert_eq!(errors[0].sample, 500);

    let frames = sink.frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[1].data, 0x40);
    assert_eq!(frames[2].data, 0x82);
    assert_eq!(marker_kinds(&sink.markers(), MarkerKind::Stop).len(), 1);
}

#[test]
fn all_byte_values_round_trip() {
    for data in 0..=255u8 {
        for eom in [false, true] {
            let mut wf = CecWaveform::new(RATE);
            wf.hold_ms(1.0);
            wf.start_sequence();
            wf.block(data, eom, true);
            let sink = decode_waveform(wf);

            let frames = sink.frames();
            assert_eq!(frames.len(), 2, "data 0x{:02X} eom {}", data, eom);
            assert_eq!(frames[1].data, data);
            assert_eq!(frames[1].eom, eom);
            assert!(frames[1].ack);
        }
    }
}

#[test]
fn back_to_back_messages_shorten_the_parked_range() {
    // The second message starts 2.2 ms after the acknowledge cell opens:
    // past the minimum free time but before the nominal spacing, so the
    // first block parks at the minimum instead
    let mut wf = CecWaveform::new(RATE);
    wf.hold_ms(1.0);
    wf.start_sequence();
    wf.block(0x05, true, true);
    wf.hold_ms(0.7);
    wf.start_sequence();
    wf.message(&[0x05]);
    let sink = decode_waveform(wf);

    let frames = sink.frames();
    assert_eq!(frames.len(), 4);

    let ack_start: u64 = 550 + 9 * 240;
    assert_eq!(frames[1].end_sample, ack_start + 204);
    assert_eq!(frames[2].frame_type, FrameType::StartSeq);
    assert_eq!(frames[2].start_sample, ack_start + 220);
    assert_eq!(frames[3].data, 0x05);

    assert_eq!(marker_kinds(&sink.markers(), MarkerKind::Stop).len(), 2);
    assert!(marker_kinds(&sink.markers(), MarkerKind::ErrorDot).is_empty());
}

#[test]
fn decodes_multiple_messages_in_one_capture() {
    let mut wf = CecWaveform::new(RATE);
    wf.hold_ms(1.0);
    wf.start_sequence();
    wf.message(&[0x40, 0x8F]);
    wf.hold_ms(5.0);
    wf.start_sequence();
    wf.message(&[0x04, 0x90, 0x00]);
    let sink = decode_waveform(wf);

    let frames = sink.frames();
    assert_eq!(frames.len(), 7);
    assert_eq!(frames[1].data, 0x40);
    assert_eq!(frames[2].data, 0x8F);
    assert_eq!(frames[4].data, 0x04);
    assert_eq!(frames[5].data, 0x90);
    assert_eq!(frames[6].frame_type, FrameType::Operand);
    assert_eq!(frames[6].data, 0x00);
    assert!(frames[6].eom);

    assert_eq!(marker_kinds(&sink.markers(), MarkerKind::Stop).len(), 2);
}

/// Sink node draining decoder events into a shared memory sink.
struct EventCollector {
    sink: MemorySink,
    buffer: VecDeque<CecEvent>,
}

impl ProcessNode for EventCollector {
    fn name(&self) -> &str {
        "event_collector"
    }

    fn num_inputs(&self) -> usize {
        1
    }

    fn num_outputs(&self) -> usize {
        0
    }

    fn work(&mut self, inputs: &[InputPort], _outputs: &[OutputPort]) -> WorkResult<usize> {
        let mut input = inputs[0]
            .get::<CecEvent>(&mut self.buffer)
            .ok_or_else(|| WorkError::NodeError("missing event input".to_string()))?;
        let event = input.recv()?;
        self.sink.apply(event)?;
        Ok(1)
    }
}

#[test]
fn threaded_pipeline_decodes_a_capture() {
    let mut wf = CecWaveform::new(RATE);
    wf.hold_ms(1.0);
    wf.start_sequence();
    wf.message(&[0x40, 0x82]);
    let edges = wf.finish();

    let (edges_out, edges_in) = channel::<Edge>(1024);
    let (events_out, events_in) = channel::<CecEvent>(1024);

    let results = MemorySink::new();
    let collector = EventCollector {
        sink: results.clone(),
        buffer: VecDeque::new(),
    };

    let mut scheduler = Scheduler::new();
    scheduler.start_process(Box::new(ReplaySource::new(edges)), vec![], vec![edges_out]);
    scheduler.start_process(
        Box::new(CecDecoder::new(RATE)),
        vec![edges_in],
        vec![events_out],
    );
    scheduler.start_process(Box::new(collector), vec![events_in], vec![]);
    scheduler.wait();

    let frames = results.frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].frame_type, FrameType::StartSeq);
    assert_eq!(frames[1].data, 0x40);
    assert_eq!(frames[2].data, 0x82);
    assert_eq!(
        marker_kinds(&results.markers(), MarkerKind::Stop).len(),
        1
    );
}
