//! Scripted fake speech engine shared by the integration tests.

// not every test binary uses every helper
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tts_controls::{SpeechEngine, UtteranceId, UtteranceRequest, Voice};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Speak {
        id: UtteranceId,
        text: String,
        voice: String,
        rate: f32,
    },
    Pause,
    Resume,
    Cancel,
    SetRate {
        id: UtteranceId,
        rate: f32,
    },
}

/// Records every command the controller issues and serves a mutable voice
/// list. Clones share state, so a test keeps one clone and boxes another.
#[derive(Clone, Default)]
pub struct FakeEngine {
    voices: Arc<Mutex<Vec<Voice>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    reject_speak: Arc<Mutex<bool>>,
}

impl FakeEngine {
    pub fn with_voices(voices: Vec<Voice>) -> Self {
        let engine = Self::default();
        engine.set_voices(voices);
        engine
    }

    pub fn set_voices(&self, voices: Vec<Voice>) {
        *self.voices.lock().unwrap() = voices;
    }

    pub fn set_reject_speak(&self, reject: bool) {
        *self.reject_speak.lock().unwrap() = reject;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn speak_requests(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Speak { .. }))
            .collect()
    }

    pub fn speak_count(&self) -> usize {
        self.speak_requests().len()
    }

    /// Id of the most recently submitted utterance.
    pub fn last_spoken_id(&self) -> Option<UtteranceId> {
        self.speak_requests().into_iter().rev().find_map(|c| match c {
            Call::Speak { id, .. } => Some(id),
            _ => None,
        })
    }
}

impl SpeechEngine for FakeEngine {
    fn voices(&self) -> Vec<Voice> {
        self.voices.lock().unwrap().clone()
    }

    fn speak(&mut self, request: &UtteranceRequest) -> anyhow::Result<()> {
        if *self.reject_speak.lock().unwrap() {
            anyhow::bail!("synthesis rejected");
        }
        self.calls.lock().unwrap().push(Call::Speak {
            id: request.id,
            text: request.text.clone(),
            voice: request.voice.clone(),
            rate: request.rate,
        });
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.lock().unwrap().push(Call::Pause);
    }

    fn resume(&mut self) {
        self.calls.lock().unwrap().push(Call::Resume);
    }

    fn cancel(&mut self) {
        self.calls.lock().unwrap().push(Call::Cancel);
    }

    fn set_rate(&mut self, id: UtteranceId, rate: f32) {
        self.calls.lock().unwrap().push(Call::SetRate { id, rate });
    }
}

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}
