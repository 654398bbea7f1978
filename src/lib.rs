//! # midi2chip
//!
//! Turns a Standard MIDI File into a compact note-event document for chiptune-style
//! playback: two pulse channels, one triangle channel and one noise channel.
//!
//! ## Overview
//!
//! MIDI files are structured as a series of chunks. Each chunk contains a 4-character ASCII
//! type identifier and a 32-bit length that specifies how many bytes of data follow. The first
//! chunk is the `MThd` header, every following `MTrk` chunk holds a stream of delta-timed
//! events. This crate parses that container from scratch, then pulls a single melody line and
//! the song tempo out of it.
//!
//! - **[`chunk`]**: The [`Chunk`] framing plus header and track parsing, including the lazy
//!   [`chunk::track::TrackEvents`] event stream with running status support.
//! - **[`reader`]**: Byte sources ([`reader::MidiReadable`]) and chunk framing over any byte
//!   iterator ([`reader::MidiStream`]).
//! - **[`midi`]**: Loads a full [`midi::Midi`] sequence (header plus tracks).
//! - **[`extract`]**: Tempo lookup, melody track selection and note/tick accumulation.
//! - **[`document`]**: The serializable [`document::ChiptuneDocument`] and its JSON/CSV output,
//!   plus the size bounded [`document::DurationSheet`] of held notes.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! let document = midi2chip::convert("songs/theme.mid").expect("Convert MIDI file");
//!
//! println!("{}", document.to_json(false).expect("Serialize document"));
//! ```

use std::path::Path;

pub mod chunk;
pub mod document;
pub mod error;
pub mod extract;
pub mod midi;
pub mod reader;

pub use document::{ChiptuneDocument, DurationSheet};
pub use error::MidiError;
pub use midi::Midi;

use reader::MidiReadable;

/// Represents a raw MIDI Chunk.
/// A MIDI Chunk consists of a 4-character ASCII type identifier and a 32-bit unsigned integer
/// specifying the length of its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// 4 byte ASCII chunk type
    pub chunk_type: [u8; 4],
    /// Length of the data that follows
    length: u32,
}

impl Chunk {
    /// Gets the length of the chunk as a usize
    pub fn len(&self) -> usize {
        self.length as usize
    }

    /// Returns if the chunk has no attributed data
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The chunk tag as text, for diagnostics
    pub fn tag(&self) -> String {
        String::from_utf8_lossy(&self.chunk_type).into_owned()
    }
}

impl From<u64> for Chunk {
    fn from(value: u64) -> Self {
        let [a, b, c, d, ..] = value.to_be_bytes();

        Self {
            chunk_type: [a, b, c, d],
            length: value as u32,
        }
    }
}

/// Reads and parses the MIDI file at `path` and assembles its chiptune document.
///
/// The song name is the file name without its extension. A file without any usable melody
/// track still converts, yielding an empty note list.
pub fn convert<P: AsRef<Path>>(path: P) -> Result<ChiptuneDocument, MidiError> {
    let (song_name, midi) = load(path.as_ref())?;

    Ok(ChiptuneDocument::from_midi(song_name, &midi))
}

/// Reads and parses the MIDI file at `path` and pairs its melody notes into a
/// [`DurationSheet`], named the same way as [`convert`] names documents
pub fn convert_durations<P: AsRef<Path>>(path: P) -> Result<DurationSheet, MidiError> {
    let (song_name, midi) = load(path.as_ref())?;

    Ok(DurationSheet::from_midi(song_name, &midi))
}

/// The parsed file along with its name minus the extension
fn load(path: &Path) -> Result<(String, Midi), MidiError> {
    let bytes = path.get_midi_bytes()?;
    let midi = Midi::try_from_midi_stream(bytes)?;

    let song_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok((song_name, midi))
}
