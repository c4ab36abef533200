//! Pitch arithmetic.
//!
//! Handles MIDI → Hz, MIDI → note name, note name → MIDI and cents detuning.
//! All tuning is 12-tone equal temperament relative to A4 = 440 Hz.

use anyhow::Result;

/// Pitch classes indexed by `midi mod 12`.
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Reference pitch of A4 (MIDI 69).
pub const A4_HZ: f64 = 440.0;
pub const A4_MIDI: i32 = 69;

/// MIDI number to frequency in Hz (A4 = 440 Hz, equal temperament).
///
/// Total over all integers; values outside 0..=127 are not rejected.
pub fn midi_to_freq(midi: i32) -> f64 {
    A4_HZ * 2.0f64.powf((midi as f64 - A4_MIDI as f64) / 12.0)
}

/// MIDI number to note name, e.g. 60 → `"C4"`, 21 → `"A0"`.
pub fn note_name(midi: i32) -> String {
    let pitch_class = PITCH_CLASSES[midi.rem_euclid(12) as usize];
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", pitch_class, octave)
}

/// Shift a frequency by `cents` hundredths of a semitone.
pub fn cents_to_freq(base_freq: f64, cents: i32) -> f64 {
    base_freq * 2.0f64.powf(cents as f64 / 1200.0)
}

/// Note name to MIDI number. C4 = 60, A4 = 69, etc.
///
/// Accepts the sharp spellings produced by [`note_name`], including
/// negative octaves (`"C-1"` = 0).
pub fn note_to_midi(note: &str) -> Option<i32> {
    let note = note.trim();
    if note.len() < 2 || !note.is_ascii() {
        return None;
    }

    let (name, octave_str) = if note.len() >= 3 && &note[1..2] == "#" {
        (&note[..2], &note[2..])
    } else {
        (&note[..1], &note[1..])
    };

    let octave: i32 = octave_str.parse().ok()?;
    let semitone = PITCH_CLASSES.iter().position(|&pc| pc == name)? as i32;
    octave.checked_add(1)?.checked_mul(12)?.checked_add(semitone)
}

/// Parse either a bare MIDI number (`"55"`) or a note name (`"G3"`).
pub fn parse_midi(value: &str) -> Result<i32> {
    let value = value.trim();
    if let Ok(midi) = value.parse::<i32>() {
        return Ok(midi);
    }
    note_to_midi(value)
        .ok_or_else(|| anyhow::anyhow!("Not a MIDI number or note name: {:?}", value))
}
