//! Engine integration tests
//!
//! Builder validation, decode entry points and session creation.

use crate::helpers::*;
use monovox::prelude::*;
use monovox::{EngineConfig, MockBackend};

#[test]
fn test_engine_defaults() {
    let (_backend, engine) = test_engine();
    assert_eq!(engine.config(), &EngineConfig::default());
    assert!(engine.active_voice().is_none());
    assert_eq!(engine.now(), 0.0);
}

#[test]
fn test_builder_options() {
    let engine = PlaybackEngine::builder()
        .backend(MockBackend::new())
        .tick_interval(Duration::from_millis(100))
        .default_rate(1.5)
        .build()
        .unwrap();

    assert_eq!(engine.config().tick_interval, Duration::from_millis(100));

    let (session, _events) = engine.create_session(silent_buffer(1.0));
    assert_eq!(session.rate(), 1.5);
}

#[test]
fn test_builder_rejects_invalid_config() {
    for rate in [0.0, -2.0, f64::INFINITY] {
        let result = PlaybackEngine::builder()
            .backend(MockBackend::new())
            .default_rate(rate)
            .build();
        assert!(result.is_err(), "rate {rate} should be rejected");
    }

    let result = PlaybackEngine::builder()
        .backend(MockBackend::new())
        .tick_interval(Duration::from_secs(60))
        .build();
    assert!(result.is_err());
}

#[test]
fn test_decode_payload() {
    let (_backend, engine) = test_engine();
    let payload = pcm_payload(&[0, 16384, -16384, i16::MIN]);

    let buffer = engine.decode(&payload, TEST_SAMPLE_RATE).unwrap();
    assert_eq!(buffer.samples(), &[0.0, 0.5, -0.5, -1.0]);
    assert_eq!(buffer.sample_rate(), TEST_SAMPLE_RATE);
    assert_eq!(buffer.channels(), 1);
}

#[test]
fn test_decode_errors() {
    let (_backend, engine) = test_engine();

    assert!(matches!(
        engine.decode("", TEST_SAMPLE_RATE),
        Err(Error::Core(monovox::core::Error::EmptyAudio))
    ));
    assert!(matches!(
        engine.decode("not base64!", TEST_SAMPLE_RATE),
        Err(Error::Core(monovox::core::Error::DecodeFailure(_)))
    ));
    assert!(matches!(
        engine.decode(&pcm_payload(&[1, 2]), 100),
        Err(Error::Core(monovox::core::Error::DecodeFailure(_)))
    ));
}

#[test]
fn test_decode_in_background() {
    let (_backend, engine) = test_engine();
    let samples = generate_pcm_staircase(48_000, -24_000, 1);
    let payload = pcm_payload(&samples);

    let task = engine
        .decode_in_background(payload.clone(), TEST_SAMPLE_RATE)
        .unwrap();
    let buffer = task.wait().unwrap().unwrap();

    assert_eq!(*buffer, *engine.decode(&payload, TEST_SAMPLE_RATE).unwrap());
    assert!((buffer.duration() - 2.0).abs() < 1e-12);
}

#[test]
fn test_sessions_get_distinct_ids() {
    let (_backend, engine) = test_engine();
    let buffer = silent_buffer(1.0);

    let (a, _a_events) = engine.create_session(buffer.clone());
    let (b, _b_events) = engine.create_session(buffer);
    assert_ne!(a.id(), b.id());
    assert_eq!(a.status(), PlaybackStatus::Idle);
    assert_eq!(b.position(), 0.0);
}
