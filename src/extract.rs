//! Tempo lookup, melody track selection and melody note extraction

use std::collections::HashMap;

use log::{debug, info, trace, warn};

use crate::{
    chunk::track::{Event, TrackChunk},
    midi::Midi,
};

/// Tempo used when no tempo event exists anywhere in the file
pub const DEFAULT_TEMPO_BPM: f64 = 120.0;

/// Tracks with exactly this name never hold the melody
pub const TEMPO_TRACK_NAME: &str = "Tempo Track";

/// Microseconds in a minute, for converting tempo events to beats per minute
const MICROS_PER_MINUTE: f64 = 60_000_000.0;

/// One sounding note of the melody
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelodyNote {
    /// Frequency in Hz, rounded to 2 decimals
    pub frequency: f64,
    /// Absolute tick position from the start of the track
    pub tick: u64,
}

/// A melody note paired with the event that released it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldNote {
    /// Frequency in Hz, rounded to 2 decimals
    pub frequency: f64,
    /// Absolute tick the note started at
    pub tick: u64,
    /// Ticks between the note on and its release, never zero
    pub duration: u64,
}

/// Beats per minute from the first tempo event in the file, scanning tracks in file order and
/// events in stream order. Falls back to [`DEFAULT_TEMPO_BPM`].
///
/// A tempo of zero microseconds per quarter note has no meaning and is skipped.
pub fn tempo_bpm(midi: &Midi) -> f64 {
    let mut tempos = midi
        .tracks()
        .iter()
        .flat_map(|track| track.events())
        .filter_map(|mtrk| mtrk.event().tempo());

    let bpm = tempos
        .find(|&micros| {
            if micros == 0 {
                warn!("Ignoring tempo event of 0 microseconds per quarter note");
            }
            micros > 0
        })
        .map_or(DEFAULT_TEMPO_BPM, |micros| MICROS_PER_MINUTE / micros as f64);

    info!("Tempo: {bpm} BPM");
    bpm
}

/// The first track, in file order, that is not named [`TEMPO_TRACK_NAME`] and holds at least one
/// sounding note. `None` if no track qualifies
pub fn find_melody_track(midi: &Midi) -> Option<&TrackChunk> {
    let melody = midi
        .tracks()
        .iter()
        .find(|track| track.name() != Some(TEMPO_TRACK_NAME) && track.has_sounding_note());

    match melody {
        Some(track) => info!("Melody track: {:?}", track.name()),
        None => warn!("No melody track found, the note list will be empty"),
    }

    melody
}

/// Walks a track once, accumulating delta times into absolute ticks, and emits a note for every
/// note on event with a non zero velocity.
///
/// Every event's delta time counts towards the running tick, including note offs, silent note
/// ons and non note events, so the emitted ticks never decrease.
pub fn melody_notes(track: &TrackChunk) -> Vec<MelodyNote> {
    let mut current_tick: u64 = 0;
    let mut notes = vec![];

    for mtrk in track.events() {
        current_tick += mtrk.delta_time() as u64;

        match mtrk.event() {
            Event::SysexEvent(sysex) => trace!(
                "Tick {current_tick}: skipping {:?} sysex of {} bytes",
                sysex.kind(),
                sysex.payload().len()
            ),
            Event::MetaEvent(meta) => {
                trace!("Tick {current_tick}: meta event {:#04X}", meta.get_tag())
            }
            event => {
                if let Some(key) = event.sounding_key() {
                    notes.push(MelodyNote {
                        frequency: round2(note_to_frequency(key)),
                        tick: current_tick,
                    });
                }
            }
        }
    }

    notes
}

/// Pairs every sounding note on with the next note off, or zero velocity note on, of the same
/// key and emits the resulting notes in the order they are released.
///
/// Striking a key that is already held restarts it. Notes released on the tick they started,
/// releases with nothing held and notes still held at the end of the track are dropped.
pub fn held_notes(track: &TrackChunk) -> Vec<HeldNote> {
    let mut current_tick: u64 = 0;
    let mut active: HashMap<u8, u64> = HashMap::new();
    let mut notes = vec![];

    for mtrk in track.events() {
        current_tick += mtrk.delta_time() as u64;
        let event = mtrk.event();

        if let Some(key) = event.sounding_key() {
            active.insert(key, current_tick);
            continue;
        }

        let Some(key) = event.released_key() else {
            continue;
        };

        match active.remove(&key) {
            Some(start) if current_tick > start => notes.push(HeldNote {
                frequency: round2(note_to_frequency(key)),
                tick: start,
                duration: current_tick - start,
            }),
            Some(_) => debug!("Dropping zero length note {key} at tick {current_tick}"),
            None => debug!("Key {key} released at tick {current_tick} without being held"),
        }
    }

    if !active.is_empty() {
        warn!("Dropping {} notes that are never released", active.len());
    }

    notes
}

/// Equal tempered frequency of a MIDI note number, A4 (note 69) being 440 Hz
pub fn note_to_frequency(note: u8) -> f64 {
    440.0 * 2f64.powf((note as f64 - 69.0) / 12.0)
}

/// Rounds to 2 decimal places, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
