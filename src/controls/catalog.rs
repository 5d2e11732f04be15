//! Voice catalog: filtering, preference sorting and default selection
//!
//! The engine may report its voice list late or change it at runtime, so the
//! catalog is rebuilt wholesale from the raw list every time and the same
//! deterministic procedure re-runs.

use super::engine::Voice;

/// Language tags the demo widget offers, in preference order.
pub const DEFAULT_SUPPORTED_LANGUAGES: [&str; 6] =
    ["en-US", "en-GB", "fr-FR", "de-DE", "ru-RU", "es-ES"];

/// Language family of a BCP-47 tag ("en-US" -> "en").
fn family(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

fn is_exact_match(voice: &Voice, supported: &[String]) -> bool {
    supported.iter().any(|s| s.eq_ignore_ascii_case(&voice.lang))
}

fn is_family_match(voice: &Voice, supported: &[String]) -> bool {
    supported
        .iter()
        .any(|s| family(s).eq_ignore_ascii_case(family(&voice.lang)))
}

/// Sort rank: exact supported-tag matches first, then same-language-family
/// matches, then the rest. Ties keep the engine's reported order.
fn rank(voice: &Voice, supported: &[String]) -> u8 {
    if is_exact_match(voice, supported) {
        0
    } else if is_family_match(voice, supported) {
        1
    } else {
        2
    }
}

/// Build the selectable catalog from whatever the engine currently reports.
///
/// Voices are deduplicated by name (first occurrence wins), then filtered to
/// exact supported-tag matches. If filtering leaves nothing but the raw list
/// is non-empty, the full raw list is used instead, so the control is never
/// left without a selectable voice. The result is stably sorted by [`rank`].
pub fn build_catalog(raw: &[Voice], supported: &[String]) -> Vec<Voice> {
    let mut deduped: Vec<Voice> = Vec::with_capacity(raw.len());
    for voice in raw {
        if !deduped.iter().any(|v| v.name == voice.name) {
            deduped.push(voice.clone());
        }
    }

    let mut catalog: Vec<Voice> = deduped
        .iter()
        .filter(|v| is_exact_match(v, supported))
        .cloned()
        .collect();
    if catalog.is_empty() {
        catalog = deduped;
    }

    // sort_by_key is stable, preserving reported order within a rank
    catalog.sort_by_key(|v| rank(v, supported));
    catalog
}

/// Re-select after a catalog reload: keep the previous selection by name
/// identity if it is still present, otherwise fall back to the catalog's
/// first entry.
pub fn select_voice(catalog: &[Voice], previous: Option<&str>) -> Option<Voice> {
    if let Some(name) = previous {
        if let Some(voice) = catalog.iter().find(|v| v.name == name) {
            return Some(voice.clone());
        }
    }
    catalog.first().cloned()
}
