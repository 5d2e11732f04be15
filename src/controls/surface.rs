//! UI-facing snapshot of the control surface
//!
//! The page frontend renders the widget from these snapshots; nothing here
//! mutates controller state.

use serde::Serialize;

use super::controller::PlaybackState;
use super::engine::Voice;

/// Rate slider bounds: range [0.5, 2.0], step 0.1, default 1.0.
pub const RATE_MIN: f32 = 0.5;
pub const RATE_MAX: f32 = 2.0;
pub const RATE_STEP: f32 = 0.1;
pub const RATE_DEFAULT: f32 = 1.0;

impl PlaybackState {
    /// Text for the assistive-technology live status region.
    pub fn announcement(self) -> &'static str {
        match self {
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Idle => "Stopped",
        }
    }
}

/// Everything the widget needs to render its controls.
#[derive(Debug, Clone, Serialize)]
pub struct ControlsSnapshot {
    pub supported: bool,
    pub loading: bool,
    pub state: PlaybackState,
    pub rate: f32,
    pub voices: Vec<Voice>,
    pub selected_voice: Option<String>,
    /// Play/pause toggle enablement: text present, capability supported and
    /// a voice selected.
    pub play_enabled: bool,
    /// Stop button enablement: additionally requires live playback.
    pub stop_enabled: bool,
    /// Live-region text: "Playing", "Paused" or "Stopped".
    pub announcement: &'static str,
}

impl ControlsSnapshot {
    /// JSON form handed to the embedding page.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
