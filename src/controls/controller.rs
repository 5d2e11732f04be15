//! Playback state machine driving the speech engine
//!
//! Owns the voice catalog, the single live session and the pending
//! voice-switch restart. Engine callbacks are fed in as [`EngineEvent`]s and
//! checked against the live session's id, so events from a cancelled
//! utterance are discarded instead of trusted.

use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::{build_catalog, select_voice, DEFAULT_SUPPORTED_LANGUAGES};
use super::engine::{EngineEvent, SpeechEngine, UtteranceId, UtteranceRequest, Voice};
use super::surface::{ControlsSnapshot, RATE_DEFAULT, RATE_MAX, RATE_MIN};

/// Delay between cancelling the old utterance and restarting with a new
/// voice, giving the engine time to release its internal state. Empirically
/// chosen; tunable via [`SpeechController::set_restart_delay`].
pub const VOICE_RESTART_DELAY: Duration = Duration::from_millis(100);

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("speech synthesis is not supported by this host")]
    CapabilityUnavailable,
    #[error("no synthesis voice is available")]
    NoVoiceAvailable,
    #[error("speech engine error: {0}")]
    Engine(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
}

/// The utterance currently registered with the engine.
#[derive(Debug, Clone)]
struct PlaybackSession {
    id: UtteranceId,
    text: String,
    voice: Voice,
    rate: f32,
}

/// Deferred voice-switch restart, fired by [`SpeechController::tick`] once
/// its deadline passes. Cancelled by Stop, a superseding Play, or teardown.
#[derive(Debug, Clone)]
struct PendingRestart {
    due: Instant,
    text: String,
    voice: Voice,
    rate: f32,
}

/// Speech playback controller.
///
/// Single-owner, event-driven: commands come in as method calls, engine
/// callbacks as [`EngineEvent`]s via [`handle_engine_event`], and the
/// deferred voice restart fires from [`tick`]. Constructed without an engine
/// it reports unsupported and every command is a no-op.
///
/// [`handle_engine_event`]: SpeechController::handle_engine_event
/// [`tick`]: SpeechController::tick
pub struct SpeechController {
    engine: Option<Box<dyn SpeechEngine>>,
    supported_languages: Vec<String>,
    restart_delay: Duration,
    catalog: Vec<Voice>,
    selected: Option<Voice>,
    rate: f32,
    state: PlaybackState,
    live: Option<PlaybackSession>,
    pending_restart: Option<PendingRestart>,
    next_id: u64,
    loading: bool,
}

impl SpeechController {
    /// Create a controller with the default supported-language set.
    pub fn new(engine: Option<Box<dyn SpeechEngine>>) -> Self {
        let supported = DEFAULT_SUPPORTED_LANGUAGES
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self::with_languages(engine, supported)
    }

    pub fn with_languages(
        engine: Option<Box<dyn SpeechEngine>>,
        supported_languages: Vec<String>,
    ) -> Self {
        let mut controller = Self {
            engine,
            supported_languages,
            restart_delay: VOICE_RESTART_DELAY,
            catalog: Vec::new(),
            selected: None,
            rate: RATE_DEFAULT,
            state: PlaybackState::Idle,
            live: None,
            pending_restart: None,
            next_id: 0,
            loading: true,
        };
        if controller.engine.is_some() {
            controller.reload_voices();
        } else {
            controller.loading = false;
            warn!("speech synthesis capability absent; controls disabled");
        }
        controller
    }

    /// Override the voice-switch restart delay (mainly for fast tests and
    /// engines known to release state quicker or slower than the default).
    pub fn set_restart_delay(&mut self, delay: Duration) {
        self.restart_delay = delay;
    }

    pub fn is_supported(&self) -> bool {
        self.engine.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn catalog(&self) -> &[Voice] {
        &self.catalog
    }

    pub fn selected_voice(&self) -> Option<&Voice> {
        self.selected.as_ref()
    }

    /// Id of the live session, if one is registered with the engine.
    pub fn live_utterance(&self) -> Option<UtteranceId> {
        self.live.as_ref().map(|s| s.id)
    }

    /// Rate bound to the live session, if any.
    pub fn live_rate(&self) -> Option<f32> {
        self.live.as_ref().map(|s| s.rate)
    }

    /// Whether a deferred voice-switch restart is scheduled.
    pub fn restart_pending(&self) -> bool {
        self.pending_restart.is_some()
    }

    /// Why Play is currently unavailable, if it is.
    pub fn availability(&self) -> Result<(), ControlError> {
        if self.engine.is_none() {
            Err(ControlError::CapabilityUnavailable)
        } else if self.catalog.is_empty() {
            Err(ControlError::NoVoiceAvailable)
        } else {
            Ok(())
        }
    }

    /// Rebuild the catalog from the engine's current voice list, preserving
    /// the selected voice by name identity where possible.
    pub fn reload_voices(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let raw = engine.voices();
        self.catalog = build_catalog(&raw, &self.supported_languages);
        let previous = self.selected.as_ref().map(|v| v.name.clone());
        self.selected = select_voice(&self.catalog, previous.as_deref());
        self.loading = false;
        debug!(
            "voice catalog loaded: {} of {} voices usable, selected {:?}",
            self.catalog.len(),
            raw.len(),
            self.selected.as_ref().map(|v| v.name.as_str())
        );
    }

    /// Start speaking `text`, or resume if paused.
    ///
    /// No-op when the capability is absent, the text is empty or
    /// whitespace-only, no voice is selected, or playback is already
    /// running. The control surface disables Play in these conditions, so
    /// none of them is surfaced as an error.
    pub fn play(&mut self, text: &str) {
        if self.engine.is_none() {
            return;
        }
        match self.state {
            PlaybackState::Playing => return,
            PlaybackState::Paused => {
                if self.live.is_some() {
                    if let Some(engine) = self.engine.as_mut() {
                        engine.resume();
                        self.state = PlaybackState::Playing;
                    }
                }
                return;
            }
            PlaybackState::Idle => {}
        }
        if text.trim().is_empty() {
            return;
        }
        let Some(voice) = self.selected.clone() else {
            return;
        };
        // a new Play supersedes any scheduled voice restart
        self.pending_restart = None;
        self.start_session(text.to_string(), voice, self.rate);
    }

    /// Suspend playback. No-op unless currently Playing.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing || self.live.is_none() {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.pause();
            self.state = PlaybackState::Paused;
        }
    }

    /// Cancel playback and return to Idle. Always safe to call.
    pub fn stop(&mut self) {
        self.pending_restart = None;
        if let Some(engine) = self.engine.as_mut() {
            engine.cancel();
        }
        self.live = None;
        self.state = PlaybackState::Idle;
    }

    /// Set the speech rate, clamped to the slider range. Mutated directly on
    /// the live session when one exists; never builds a new session.
    pub fn set_rate(&mut self, rate: f32) {
        let rate = rate.clamp(RATE_MIN, RATE_MAX);
        self.rate = rate;
        if let (Some(live), Some(engine)) = (self.live.as_mut(), self.engine.as_mut()) {
            live.rate = rate;
            engine.set_rate(live.id, rate);
        }
    }

    /// Select a voice by name. With a live session, the current utterance is
    /// stopped and a restart with the same text and rate is scheduled after
    /// [`VOICE_RESTART_DELAY`]; otherwise only the default for the next Play
    /// changes.
    pub fn set_voice(&mut self, name: &str) {
        let Some(voice) = self.catalog.iter().find(|v| v.name == name).cloned() else {
            debug!("ignoring selection of unknown voice {name:?}");
            return;
        };
        self.selected = Some(voice.clone());
        if let Some(live) = self.live.clone() {
            self.stop();
            self.pending_restart = Some(PendingRestart {
                due: Instant::now() + self.restart_delay,
                text: live.text,
                voice,
                rate: live.rate,
            });
        }
    }

    /// Drive time-based work: fires the deferred voice restart once due.
    pub fn tick(&mut self, now: Instant) {
        let due = self.pending_restart.as_ref().map(|p| p.due);
        if due.is_some_and(|due| now >= due) {
            if let Some(pending) = self.pending_restart.take() {
                self.start_session(pending.text, pending.voice, pending.rate);
            }
        }
    }

    /// Apply an engine callback to the state machine. Events for a session
    /// other than the live one are stale and discarded.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::VoicesChanged => self.reload_voices(),
            EngineEvent::Started(id) => {
                if !self.is_live(id) {
                    debug!("discarding stale start event for {id:?}");
                }
                // idempotent confirmation: Play already moved us to Playing
            }
            EngineEvent::Ended(id) => {
                if !self.is_live(id) {
                    debug!("discarding stale end event for {id:?}");
                    return;
                }
                self.live = None;
                self.state = PlaybackState::Idle;
            }
            EngineEvent::Errored(id, reason) => {
                if !self.is_live(id) {
                    debug!("discarding stale error event for {id:?}: {reason}");
                    return;
                }
                warn!("{}", ControlError::Engine(reason));
                self.live = None;
                self.state = PlaybackState::Idle;
            }
        }
    }

    /// Snapshot of the control surface for the current host text.
    pub fn surface(&self, text: &str) -> ControlsSnapshot {
        let usable = self.is_supported() && !text.trim().is_empty();
        ControlsSnapshot {
            supported: self.is_supported(),
            loading: self.loading,
            state: self.state,
            rate: self.rate,
            voices: self.catalog.clone(),
            selected_voice: self.selected.as_ref().map(|v| v.name.clone()),
            play_enabled: usable && self.selected.is_some(),
            stop_enabled: usable && self.state != PlaybackState::Idle,
            announcement: self.state.announcement(),
        }
    }

    fn is_live(&self, id: UtteranceId) -> bool {
        self.live.as_ref().is_some_and(|s| s.id == id)
    }

    /// Cancel stray engine activity, then build and submit a new session.
    fn start_session(&mut self, text: String, voice: Voice, rate: f32) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        engine.cancel();
        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        let request = UtteranceRequest {
            id,
            text: text.clone(),
            voice: voice.name.clone(),
            rate,
            pitch: 1.0,
            volume: 1.0,
        };
        if let Err(err) = engine.speak(&request) {
            warn!("{}", ControlError::Engine(err.to_string()));
            self.live = None;
            self.state = PlaybackState::Idle;
            return;
        }
        self.live = Some(PlaybackSession {
            id,
            text,
            voice,
            rate,
        });
        self.state = PlaybackState::Playing;
    }
}

impl Drop for SpeechController {
    fn drop(&mut self) {
        // teardown: cancel engine activity and the scheduled restart so no
        // late callback or timer can touch a torn-down controller
        self.pending_restart = None;
        self.live = None;
        if let Some(engine) = self.engine.as_mut() {
            engine.cancel();
        }
    }
}
