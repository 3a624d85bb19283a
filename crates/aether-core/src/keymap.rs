//! Keyboard shortcuts, resolved from `KeyboardEvent.key` strings.

use crate::shapes::MODE_COUNT;

pub const VOLUME_STEP: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    SetMode(usize),
    NextPalette,
    TogglePlayback,
    NextTrack,
    VolumeStep(f32),
    Capture,
}

#[inline]
pub fn mode_for_digit(key: &str) -> Option<usize> {
    let digit = key.parse::<usize>().ok()?;
    (1..=MODE_COUNT).contains(&digit).then(|| digit - 1)
}

pub fn action_for_key(key: &str) -> Option<KeyAction> {
    if let Some(mode) = mode_for_digit(key) {
        return Some(KeyAction::SetMode(mode));
    }
    match key {
        "p" | "P" => Some(KeyAction::NextPalette),
        " " => Some(KeyAction::TogglePlayback),
        "n" | "N" => Some(KeyAction::NextTrack),
        "ArrowUp" => Some(KeyAction::VolumeStep(VOLUME_STEP)),
        "ArrowDown" => Some(KeyAction::VolumeStep(-VOLUME_STEP)),
        "s" | "S" => Some(KeyAction::Capture),
        _ => None,
    }
}

/// Cyclic successor of `current` in a list of `len` entries.
#[inline]
pub fn next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (current + 1) % len
    }
}
