//! The chiptune document: tempo, resolution and per tick channel values, plus its JSON and CSV
//! renderings. Also the duration sheet, a CSV of held notes trimmed to a byte budget

use std::io::Write;

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    extract::{self, HeldNote, MelodyNote},
    midi::Midi,
};

/// Resolution written to every document.
///
/// This is deliberately independent of the source file's own division: note ticks stay in the
/// source resolution, so consumers of files not authored at 480 ticks per quarter note will see
/// skewed timing.
pub const TICKS_PER_BEAT: u32 = 480;

/// Column names of the CSV rendering's second row
const CSV_COLUMNS: [&str; 5] = ["pulse1", "pulse2", "triangle", "noise", "duration"];

/// Byte budget of a duration sheet unless told otherwise
pub const DEFAULT_MAX_CSV_BYTES: usize = 50_000;

/// A song ready for a four channel chiptune player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiptuneDocument {
    /// Input file name without its extension
    pub song_name: String,
    /// Beats per minute, rounded to 2 decimals
    pub tempo: f64,
    /// Always [`TICKS_PER_BEAT`]
    pub ticks_per_beat: u32,
    /// Melody notes in tick order
    pub notes: Vec<NoteEvent>,
}

/// Channel values for one melody note. The melody always plays on the first pulse channel,
/// every other channel is silent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// First pulse channel frequency in Hz
    pulse1: [f64; 1],
    /// Second pulse channel, silent
    pulse2: [u8; 1],
    /// Triangle channel, silent
    triangle: [u8; 1],
    /// Noise channel, silent
    noise: u8,
    /// Absolute tick in the source file's resolution
    tick: u64,
}

impl NoteEvent {
    /// A melody note on the first pulse channel
    pub fn melody(frequency: f64, tick: u64) -> Self {
        Self {
            pulse1: [frequency],
            pulse2: [0],
            triangle: [0],
            noise: 0,
            tick,
        }
    }

    /// Frequency of the first pulse channel
    pub fn frequency(&self) -> f64 {
        self.pulse1[0]
    }

    /// Absolute tick the note starts at
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

impl From<MelodyNote> for NoteEvent {
    fn from(note: MelodyNote) -> Self {
        Self::melody(note.frequency, note.tick)
    }
}

impl ChiptuneDocument {
    /// Extracts tempo and melody from a parsed file. A file without a melody track produces an
    /// empty note list rather than an error
    pub fn from_midi(song_name: impl Into<String>, midi: &Midi) -> Self {
        let notes = extract::find_melody_track(midi)
            .map(extract::melody_notes)
            .unwrap_or_default();

        Self {
            song_name: song_name.into(),
            tempo: extract::round2(extract::tempo_bpm(midi)),
            ticks_per_beat: TICKS_PER_BEAT,
            notes: notes.into_iter().map(NoteEvent::from).collect(),
        }
    }

    /// Serializes to JSON, optionally pretty printed
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Writes the CSV rendering: a `song_name,tempo` row, a column header row, then one row per
    /// run of consecutive identical note events with the run length as its duration
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv_writer(writer);

        wtr.serialize((&self.song_name, self.tempo))?;
        wtr.write_record(CSV_COLUMNS)?;

        for (note, duration) in self.note_runs() {
            wtr.serialize((
                note.pulse1[0],
                note.pulse2[0],
                note.triangle[0],
                note.noise,
                duration,
            ))?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Collapses consecutive identical note events into `(note, count)` pairs
    fn note_runs(&self) -> Vec<(NoteEvent, usize)> {
        let mut runs: Vec<(NoteEvent, usize)> = vec![];

        for note in &self.notes {
            if let Some((last, count)) = runs.last_mut() {
                if last == note {
                    *count += 1;
                    continue;
                }
            }
            runs.push((*note, 1));
        }

        runs
    }
}

/// Melody notes with real lengths, rendered as CSV rows of `pulse1,pulse2,triangle,noise,duration`
#[derive(Debug, Clone, PartialEq)]
pub struct DurationSheet {
    /// Input file name without its extension
    pub song_name: String,
    /// Beats per minute, rounded to 2 decimals
    pub tempo: f64,
    /// Held melody notes in the order they are released
    pub notes: Vec<HeldNote>,
}

impl DurationSheet {
    /// Extracts tempo and held melody notes from a parsed file
    pub fn from_midi(song_name: impl Into<String>, midi: &Midi) -> Self {
        let notes = extract::find_melody_track(midi)
            .map(extract::held_notes)
            .unwrap_or_default();

        Self {
            song_name: song_name.into(),
            tempo: extract::round2(extract::tempo_bpm(midi)),
            notes,
        }
    }

    /// Writes the same two leading rows as [`ChiptuneDocument::write_csv`], then one row per held
    /// note with its length in ticks.
    ///
    /// When the full rendering is larger than `max_bytes`, only every n-th note is kept, n being
    /// the full size divided by the budget and rounded up. The two leading rows are always
    /// written, so a tiny budget can still be overshot.
    pub fn write_csv<W: Write>(&self, mut writer: W, max_bytes: usize) -> Result<(), csv::Error> {
        let full = self.render(1)?;
        let step = decimation_step(full.len(), max_bytes);

        let rendered = if step > 1 {
            info!(
                "Duration sheet is {} bytes, keeping every {step}th note to fit {max_bytes}",
                full.len()
            );
            self.render(step)?
        } else {
            full
        };

        writer.write_all(&rendered)?;
        writer.flush()?;
        Ok(())
    }

    /// Renders the leading rows and every `step`th note
    fn render(&self, step: usize) -> Result<Vec<u8>, csv::Error> {
        let mut wtr = csv_writer(vec![]);

        wtr.serialize((&self.song_name, self.tempo))?;
        wtr.write_record(CSV_COLUMNS)?;

        for note in self.notes.iter().step_by(step) {
            wtr.serialize((note.frequency, 0, 0, 0, note.duration))?;
        }

        wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
    }
}

/// Headerless, newline terminated CSV whose rows may differ in length
fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer)
}

/// How many notes to advance per kept note so `len` bytes shrink to `max_bytes`
fn decimation_step(len: usize, max_bytes: usize) -> usize {
    if len <= max_bytes {
        1
    } else {
        len.div_ceil(max_bytes.max(1))
    }
}
