//! End-to-end tests for the threaded controller handle.

mod common;

use std::thread;
use std::time::{Duration, Instant};

use common::{init_logs, Call, FakeEngine};
use crossbeam_channel::unbounded;
use tts_controls::{ControllerHandle, EngineEvent};

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

fn demo_engine() -> FakeEngine {
    FakeEngine::with_voices(vec![
        tts_controls::Voice::new("Alex", "en-US"),
        tts_controls::Voice::new("Daniel", "en-GB"),
    ])
}

#[test]
fn full_playback_flow_through_the_handle() {
    init_logs();
    let engine = demo_engine();
    let (event_tx, event_rx) = unbounded::<EngineEvent>();
    let handle = ControllerHandle::spawn(Some(Box::new(engine.clone())), event_rx);

    assert!(wait_for(|| handle.is_supported()));
    assert!(wait_for(|| handle.selected_voice().as_deref() == Some("Alex")));

    handle.play("Hello world");
    assert!(wait_for(|| handle.is_playing()));
    assert_eq!(engine.speak_count(), 1);

    handle.pause();
    assert!(wait_for(|| handle.is_paused()));

    handle.play("Hello world");
    assert!(wait_for(|| handle.is_playing()));
    assert_eq!(engine.speak_count(), 1);

    // engine finishes the utterance; controller returns to idle
    let live = engine.last_spoken_id().unwrap();
    event_tx.send(EngineEvent::Ended(live)).unwrap();
    assert!(wait_for(|| !handle.is_playing() && !handle.is_paused()));
}

#[test]
fn voice_switch_restarts_playback_on_the_controller_thread() {
    init_logs();
    let engine = demo_engine();
    let (_event_tx, event_rx) = unbounded::<EngineEvent>();
    let handle = ControllerHandle::spawn(Some(Box::new(engine.clone())), event_rx);

    handle.play("Hello world");
    assert!(wait_for(|| handle.is_playing()));

    // restart fires from the thread's poll loop after the fixed delay
    handle.set_voice("Daniel");
    assert!(wait_for(|| engine.speak_count() == 2));
    assert!(wait_for(|| handle.is_playing()));
    assert!(wait_for(|| handle.selected_voice().as_deref() == Some("Daniel")));

    handle.stop();
    assert!(wait_for(|| !handle.is_playing()));
}

#[test]
fn dropping_the_handle_tears_the_controller_down() {
    let engine = demo_engine();
    let (_event_tx, event_rx) = unbounded::<EngineEvent>();
    {
        let handle = ControllerHandle::spawn(Some(Box::new(engine.clone())), event_rx);
        handle.play("Hello world");
        assert!(wait_for(|| handle.is_playing()));
    }
    // Drop joined the thread, so teardown has already cancelled the engine
    assert_eq!(engine.calls().last(), Some(&Call::Cancel));
}

#[test]
fn absent_capability_reports_unsupported() {
    let (event_tx, event_rx) = unbounded::<EngineEvent>();
    drop(event_tx); // closed event channel must not wedge the thread
    let handle = ControllerHandle::spawn(None, event_rx);

    assert!(wait_for(|| !handle.is_supported()));
    handle.play("Hello world");
    thread::sleep(Duration::from_millis(50));
    assert!(!handle.is_playing());
}
