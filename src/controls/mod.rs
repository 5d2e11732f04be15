//! Speech playback controls for the TTS demo widget
//!
//! Engine interface, voice catalog, playback state machine and the threaded
//! command front end.

mod catalog;
mod controller;
mod engine;
mod handle;
mod surface;

pub use catalog::{build_catalog, select_voice, DEFAULT_SUPPORTED_LANGUAGES};
pub use controller::{ControlError, PlaybackState, SpeechController, VOICE_RESTART_DELAY};
pub use engine::{
    EngineEvent, EngineEventSender, SpeechEngine, UtteranceId, UtteranceRequest, Voice,
};
pub use handle::{ControlCmd, ControllerHandle, SharedStatus};
pub use surface::{ControlsSnapshot, RATE_DEFAULT, RATE_MAX, RATE_MIN, RATE_STEP};
