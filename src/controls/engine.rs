//! Host speech-synthesis capability interface
//!
//! The controller treats the engine as a black box that speaks at most one
//! utterance at a time and reports lifecycle events asynchronously, possibly
//! after the utterance they belong to has been cancelled.

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

/// A named, language-tagged synthesis profile offered by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP-47 language tag, e.g. "en-US".
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// Generation counter identifying one playback session.
///
/// Engine events carry the id of the session they belong to; the controller
/// discards events whose id is not the live session's, so callbacks from a
/// superseded utterance cannot resurrect stale state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UtteranceId(pub u64);

/// One speech request submitted to the engine.
///
/// Pitch and volume are fixed at nominal values; rate and voice come from the
/// control surface at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceRequest {
    pub id: UtteranceId,
    pub text: String,
    pub voice: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Lifecycle events reported asynchronously by the engine.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Synthesis of the utterance actually began.
    Started(UtteranceId),
    /// The utterance finished speaking.
    Ended(UtteranceId),
    /// Synthesis failed mid-utterance. Non-fatal; the reason is logged.
    Errored(UtteranceId, String),
    /// The engine's voice list changed (e.g. it finished asynchronous
    /// initialization) and should be re-queried.
    VoicesChanged,
}

/// Channel end an engine uses to deliver its events.
pub type EngineEventSender = Sender<EngineEvent>;

/// Host speech-synthesis capability.
///
/// Implementations execute at most one utterance at a time; `speak` implies
/// whatever was previously speaking is cancelled. Events are delivered
/// through the [`EngineEventSender`] handed to the engine at wiring time.
pub trait SpeechEngine: Send {
    /// Currently available voices. May be empty before the engine finishes
    /// asynchronous initialization; a later [`EngineEvent::VoicesChanged`]
    /// signals that the list should be re-queried.
    fn voices(&self) -> Vec<Voice>;

    /// Submit a new utterance. A synchronous rejection is absorbed by the
    /// controller and logged as a warning.
    fn speak(&mut self, request: &UtteranceRequest) -> anyhow::Result<()>;

    /// Suspend the in-flight utterance.
    fn pause(&mut self);

    /// Resume a previously suspended utterance.
    fn resume(&mut self);

    /// Cancel the in-flight utterance, if any. Safe to call when idle.
    fn cancel(&mut self);

    /// Best-effort live rate change on the in-flight utterance. Engines that
    /// cannot adjust rate mid-utterance may apply it only to subsequently
    /// spoken content, or ignore it.
    fn set_rate(&mut self, id: UtteranceId, rate: f32);
}
