//! Threaded front end for the controller
//!
//! Runs a dedicated thread that owns the [`SpeechController`] and drains the
//! command and engine-event channels, polling with a short timeout so the
//! deferred voice restart fires on time. The embedding page talks to the
//! widget through a cheap clonable handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{never, select, unbounded, Receiver, Sender};
use log::debug;

use super::controller::{PlaybackState, SpeechController};
use super::engine::{EngineEvent, SpeechEngine};

/// Poll interval of the controller thread.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone)]
pub enum ControlCmd {
    Play(String),
    Pause,
    Stop,
    SetRate(f32),
    SetVoice(String),
    Shutdown,
}

/// Shared playback status mirrored out of the controller thread.
#[derive(Debug, Default)]
pub struct SharedStatus {
    pub is_supported: AtomicBool,
    pub is_playing: AtomicBool,
    pub is_paused: AtomicBool,
    pub selected_voice: Mutex<Option<String>>,
}

/// Handle to a controller running on its own thread.
///
/// Dropping the last handle shuts the thread down, which tears the
/// controller down and cancels any engine activity.
pub struct ControllerHandle {
    tx: Sender<ControlCmd>,
    status: Arc<SharedStatus>,
    join: Option<thread::JoinHandle<()>>,
}

impl ControllerHandle {
    /// Spawn the controller thread. `events` is the receiving end of the
    /// channel the engine delivers its [`EngineEvent`]s on; pass `None` as
    /// the engine when the host has no speech capability.
    pub fn spawn(
        engine: Option<Box<dyn SpeechEngine>>,
        events: Receiver<EngineEvent>,
    ) -> Self {
        let (tx, rx) = unbounded::<ControlCmd>();
        let status = Arc::new(SharedStatus::default());
        let thread_status = Arc::clone(&status);
        let join = thread::spawn(move || controller_thread_main(engine, rx, events, thread_status));
        Self {
            tx,
            status,
            join: Some(join),
        }
    }

    pub fn play(&self, text: impl Into<String>) {
        let _ = self.tx.send(ControlCmd::Play(text.into()));
    }

    pub fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    pub fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    pub fn set_rate(&self, rate: f32) {
        let _ = self.tx.send(ControlCmd::SetRate(rate));
    }

    pub fn set_voice(&self, name: impl Into<String>) {
        let _ = self.tx.send(ControlCmd::SetVoice(name.into()));
    }

    pub fn is_supported(&self) -> bool {
        self.status.is_supported.load(Ordering::SeqCst)
    }

    pub fn is_playing(&self) -> bool {
        self.status.is_playing.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.status.is_paused.load(Ordering::SeqCst)
    }

    pub fn selected_voice(&self) -> Option<String> {
        self.status
            .selected_voice
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

impl Drop for ControllerHandle {
    fn drop(&mut self) {
        let _ = self.tx.send(ControlCmd::Shutdown);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

fn controller_thread_main(
    engine: Option<Box<dyn SpeechEngine>>,
    rx: Receiver<ControlCmd>,
    events: Receiver<EngineEvent>,
    status: Arc<SharedStatus>,
) {
    let mut controller = SpeechController::new(engine);
    status
        .is_supported
        .store(controller.is_supported(), Ordering::SeqCst);

    // Swapped for a never-channel once the engine side hangs up, so a closed
    // event channel does not busy-loop the select.
    let mut events = events;

    loop {
        select! {
            recv(rx) -> cmd => match cmd {
                Ok(ControlCmd::Play(text)) => controller.play(&text),
                Ok(ControlCmd::Pause) => controller.pause(),
                Ok(ControlCmd::Stop) => controller.stop(),
                Ok(ControlCmd::SetRate(rate)) => controller.set_rate(rate),
                Ok(ControlCmd::SetVoice(name)) => controller.set_voice(&name),
                Ok(ControlCmd::Shutdown) | Err(_) => break,
            },
            recv(events) -> event => match event {
                Ok(event) => controller.handle_engine_event(event),
                Err(_) => {
                    debug!("engine event channel closed");
                    events = never();
                }
            },
            default(POLL_INTERVAL) => {}
        }

        controller.tick(Instant::now());

        status.is_playing.store(
            controller.state() == PlaybackState::Playing,
            Ordering::SeqCst,
        );
        status.is_paused.store(
            controller.state() == PlaybackState::Paused,
            Ordering::SeqCst,
        );
        if let Ok(mut selected) = status.selected_voice.lock() {
            *selected = controller.selected_voice().map(|v| v.name.clone());
        }
    }
    // controller drops here; teardown cancels engine activity
}
