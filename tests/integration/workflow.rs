//! End-to-end workflow tests
//!
//! Payload in, playback to the end, WAV out.

use crate::helpers::*;
use monovox::prelude::*;
use std::io::Cursor;

#[test]
fn test_decode_play_export() {
    init_tracing();
    let (backend, engine) = test_engine();
    let pcm = generate_pcm_staircase(12_000, -6_000, 1);
    let buffer = engine.decode(&pcm_payload(&pcm), TEST_SAMPLE_RATE).unwrap();
    assert_eq!(buffer.duration(), 0.5);

    let (mut session, events) = engine.create_session(buffer.clone());
    session.play().unwrap();
    run_for(&backend, &mut session, 1.0, 0.125);

    let events = drain(&events);
    assert_eq!(tick_positions(&events), vec![0.25]);
    assert_eq!(count_ended(&events), 1);

    let wav = engine.encode(&buffer).unwrap();
    let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
    let exported: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

    let expected: Vec<i16> = pcm.iter().map(|&s| if s > 0 { s - 1 } else { s }).collect();
    assert_eq!(exported, expected);
}

#[test]
fn test_export_while_playing() {
    let (backend, engine) = test_engine();
    let samples = generate_sine(440.0, TEST_SAMPLE_RATE, 96_000);
    let buffer = Arc::new(SampleBuffer::new(samples, TEST_SAMPLE_RATE).unwrap());

    let (mut session, events) = engine.create_session(buffer.clone());
    session.play().unwrap();

    let mut job = engine.export_in_background(buffer.clone()).unwrap();
    let bytes = loop {
        backend.advance(0.125);
        session.pump();
        match job.poll() {
            ExportStatus::Pending => std::thread::yield_now(),
            ExportStatus::Complete(bytes) => break bytes,
            ExportStatus::Failed(e) => panic!("export failed: {e}"),
        }
    };

    assert_eq!(bytes, engine.encode(&buffer).unwrap());
    assert_eq!(bytes.len(), 44 + 96_000 * 2);
    assert!(count_ended(&drain(&events)) <= 1);
    assert!(matches!(
        session.status(),
        PlaybackStatus::Playing | PlaybackStatus::Ended
    ));
}

#[test]
fn test_replay_with_new_session() {
    let (backend, engine) = test_engine();
    let buffer = silent_buffer(1.0);

    let (mut first, first_events) = engine.create_session(buffer.clone());
    first.play().unwrap();
    backend.advance(1.0);
    first.pump();
    assert_eq!(count_ended(&drain(&first_events)), 1);
    first.release();

    let (mut second, second_events) = engine.create_session(buffer);
    second.play().unwrap();
    backend.advance(1.0);
    second.pump();
    assert_eq!(count_ended(&drain(&second_events)), 1);
    assert_eq!(backend.start_count(), 2);
}
