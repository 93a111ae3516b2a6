//! Playback integration tests
//!
//! Drives one session through its state machine with the mock clock:
//! natural end, pause/seek, rate changes, tick cadence and failures.

use crate::helpers::tolerances::POSITION_EPSILON;
use crate::helpers::*;
use approx::assert_relative_eq;
use monovox::prelude::*;
use monovox::voice::Error as VoiceError;

/// 2 s at 24 kHz, played to the end: one `Ended`, position 2.0, then silence.
#[test]
fn test_natural_end() {
    init_tracing();
    let (backend, engine) = test_engine();
    let (mut session, events) = engine.create_session(silent_buffer(2.0));

    session.play().unwrap();
    backend.advance(2.0);
    session.pump();

    assert_eq!(drain(&events), vec![PlaybackEvent::Ended]);
    assert_eq!(session.status(), PlaybackStatus::Ended);
    assert_eq!(session.position(), 2.0);
    assert!(engine.active_voice().is_none());

    run_for(&backend, &mut session, 1.0, 0.25);
    assert!(drain(&events).is_empty());
}

/// Ticks while playing, then exactly one `Ended` and nothing after it.
#[test]
fn test_ticks_until_end() {
    let (backend, engine) = test_engine();
    let (mut session, events) = engine.create_session(silent_buffer(2.0));

    session.play().unwrap();
    run_for(&backend, &mut session, 3.0, 0.25);

    let events = drain(&events);
    assert_eq!(count_ended(&events), 1);
    assert_eq!(events.last(), Some(&PlaybackEvent::Ended));

    let ticks = tick_positions(&events);
    assert_eq!(ticks.len(), 7);
    for (i, pos) in ticks.iter().enumerate() {
        assert_relative_eq!(*pos, 0.25 * (i + 1) as f64, epsilon = POSITION_EPSILON);
    }
}

#[test]
fn test_tick_cadence() {
    let (backend, engine) = test_engine();
    let (mut session, events) = engine.create_session(silent_buffer(5.0));

    session.play().unwrap();
    run_for(&backend, &mut session, 1.0, 0.125);

    let ticks = tick_positions(&drain(&events));
    assert_eq!(ticks, vec![0.25, 0.5, 0.75, 1.0]);
}

#[test]
fn test_custom_tick_interval() {
    let backend = monovox::MockBackend::new();
    let engine = PlaybackEngine::builder()
        .backend(backend.clone())
        .tick_interval(Duration::from_millis(500))
        .build()
        .unwrap();
    let (mut session, events) = engine.create_session(silent_buffer(5.0));

    session.play().unwrap();
    run_for(&backend, &mut session, 2.0, 0.125);
    assert_eq!(tick_positions(&drain(&events)).len(), 4);
}

#[test]
fn test_no_ticks_unless_playing() {
    let (backend, engine) = test_engine();
    let (mut session, events) = engine.create_session(silent_buffer(5.0));

    run_for(&backend, &mut session, 1.0, 0.25);
    assert!(drain(&events).is_empty());

    session.play().unwrap();
    run_for(&backend, &mut session, 0.5, 0.25);
    session.pause().unwrap();
    drain(&events);

    run_for(&backend, &mut session, 1.0, 0.25);
    assert!(drain(&events).is_empty());
}

/// Pause at 1.0, seek to 1.5: recorded, still paused, no new voice.
#[test]
fn test_pause_then_seek() {
    let (backend, engine) = test_engine();
    let (mut session, _events) = engine.create_session(silent_buffer(2.0));

    session.play().unwrap();
    run_for(&backend, &mut session, 1.0, 0.25);
    session.pause().unwrap();
    assert_relative_eq!(session.position(), 1.0, epsilon = POSITION_EPSILON);

    session.seek(1.5).unwrap();
    assert_eq!(session.position(), 1.5);
    assert_eq!(session.status(), PlaybackStatus::Paused);
    assert_eq!(backend.start_count(), 1);
    assert_eq!(backend.live_voices(), 0);

    session.play().unwrap();
    assert_eq!(backend.last_start().unwrap().offset, 1.5);
}

#[test]
fn test_seek_while_playing() {
    let (backend, engine) = test_engine();
    let (mut session, events) = engine.create_session(silent_buffer(2.0));

    session.play().unwrap();
    backend.advance(0.5);
    session.seek(1.75).unwrap();
    assert_eq!(session.position(), 1.75);

    backend.advance(0.25);
    session.pump();
    assert_eq!(drain(&events), vec![PlaybackEvent::Ended]);
    assert_eq!(backend.start_count(), 2);
}

#[test]
fn test_seek_to_end_while_playing_ends() {
    let (backend, engine) = test_engine();
    let (mut session, events) = engine.create_session(silent_buffer(2.0));

    session.play().unwrap();
    session.seek(10.0).unwrap();

    assert_eq!(session.status(), PlaybackStatus::Ended);
    assert_eq!(session.position(), 2.0);
    assert_eq!(drain(&events), vec![PlaybackEvent::Ended]);
    assert_eq!(backend.start_count(), 1);
    assert_eq!(backend.live_voices(), 0);
}

#[test]
fn test_rate_change_preserves_position() {
    let (backend, engine) = test_engine();
    let (mut session, events) = engine.create_session(silent_buffer(4.0));

    session.play().unwrap();
    backend.advance(1.0);
    session.set_rate(2.0).unwrap();
    assert_relative_eq!(session.position(), 1.0, epsilon = POSITION_EPSILON);

    // Remaining 3 s of audio at double speed
    backend.advance(1.5);
    session.pump();
    assert_eq!(count_ended(&drain(&events)), 1);
    assert_eq!(session.position(), 4.0);
}

#[test]
fn test_rate_stored_while_paused() {
    let (backend, engine) = test_engine();
    let (mut session, _events) = engine.create_session(silent_buffer(4.0));

    session.set_rate(0.5).unwrap();
    assert_eq!(backend.start_count(), 0);

    session.play().unwrap();
    assert_eq!(backend.last_start().unwrap().rate, 0.5);
    backend.advance(1.0);
    assert_relative_eq!(session.position(), 0.5, epsilon = POSITION_EPSILON);
}

#[test]
fn test_invalid_arguments() {
    let (_backend, engine) = test_engine();
    let (mut session, _events) = engine.create_session(silent_buffer(1.0));

    assert!(matches!(session.set_rate(0.0), Err(VoiceError::InvalidRate(_))));
    assert!(matches!(session.set_rate(f64::NAN), Err(VoiceError::InvalidRate(_))));
    assert!(matches!(session.seek(f64::NAN), Err(VoiceError::InvalidSeekTarget(_))));
    assert_eq!(session.rate(), 1.0);
}

#[test]
fn test_stop_emits_no_ended() {
    let (backend, engine) = test_engine();
    let (mut session, events) = engine.create_session(silent_buffer(1.0));

    session.play().unwrap();
    backend.advance(0.5);
    session.stop().unwrap();
    run_for(&backend, &mut session, 2.0, 0.25);

    assert_eq!(session.status(), PlaybackStatus::Idle);
    assert_eq!(session.position(), 0.0);
    assert_eq!(count_ended(&drain(&events)), 0);
    assert_eq!(backend.live_voices(), 0);
}

#[test]
fn test_stale_end_signal_ignored() {
    let (backend, engine) = test_engine();
    let (mut session, events) = engine.create_session(silent_buffer(2.0));

    session.play().unwrap();
    let first = engine.active_voice().unwrap().voice;
    session.seek(0.5).unwrap();

    assert!(backend.inject_stale_end(first));
    session.pump();

    assert!(drain(&events).is_empty());
    assert_eq!(session.status(), PlaybackStatus::Playing);
}

#[test]
fn test_start_failure_leaves_idle() {
    let (backend, engine) = test_engine();
    let (mut session, events) = engine.create_session(silent_buffer(2.0));

    backend.fail_next_start("device busy");
    let err = session.play().unwrap_err();

    assert!(matches!(err, VoiceError::DeviceStartFailure(_)));
    assert_eq!(session.status(), PlaybackStatus::Idle);
    assert!(engine.active_voice().is_none());
    assert_eq!(backend.live_voices(), 0);

    session.pump();
    assert!(drain(&events).is_empty());

    // Next attempt succeeds
    session.play().unwrap();
    assert_eq!(session.status(), PlaybackStatus::Playing);
}

#[test]
fn test_runtime_failure_emits_one_error() {
    let (backend, engine) = test_engine();
    let (mut session, events) = engine.create_session(silent_buffer(2.0));

    session.play().unwrap();
    backend.advance(0.5);
    let voice = engine.active_voice().unwrap().voice;

    assert!(backend.fail_voice(voice, "stream lost"));
    assert!(!backend.fail_voice(voice, "stream lost again"));
    session.pump();
    session.pump();

    let events = drain(&events);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        PlaybackEvent::Error(VoiceError::DeviceFailure(msg)) if msg == "stream lost"
    ));
    assert_eq!(session.status(), PlaybackStatus::Idle);
    assert_relative_eq!(session.position(), 0.5, epsilon = POSITION_EPSILON);
    assert!(engine.active_voice().is_none());
}

#[test]
fn test_release_closes_events() {
    let (backend, engine) = test_engine();
    let (mut session, events) = engine.create_session(silent_buffer(2.0));

    session.play().unwrap();
    session.release();

    assert_eq!(backend.live_voices(), 0);
    assert!(engine.active_voice().is_none());
    assert!(events.recv().is_err());
}

#[test]
fn test_drop_stops_voice() {
    let (backend, engine) = test_engine();
    {
        let (mut session, _events) = engine.create_session(silent_buffer(2.0));
        session.play().unwrap();
        assert_eq!(backend.live_voices(), 1);
    }
    assert_eq!(backend.live_voices(), 0);
}
