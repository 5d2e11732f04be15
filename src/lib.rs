//! tts-controls - speech playback controller for the TTS demo widget
//!
//! Wraps a host speech-synthesis capability (the "engine") with
//! play/pause/stop, speed and voice controls, absorbing the engine's
//! asynchronous lifecycle behind an explicit state machine with a
//! stale-callback guard.
//!
//! The engine is injected as a [`SpeechEngine`] trait object and delivers
//! [`EngineEvent`]s over a channel, so the controller is testable against a
//! fake implementation and never touches a global.

pub mod controls;

pub use controls::{
    build_catalog, select_voice, ControlCmd, ControlError, ControllerHandle, ControlsSnapshot,
    EngineEvent, EngineEventSender, PlaybackState, SharedStatus, SpeechController, SpeechEngine,
    UtteranceId, UtteranceRequest, Voice, DEFAULT_SUPPORTED_LANGUAGES, RATE_DEFAULT, RATE_MAX,
    RATE_MIN, RATE_STEP, VOICE_RESTART_DELAY,
};
