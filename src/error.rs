//! Crate level error type for loading and converting MIDI files

use thiserror::Error;

use crate::chunk::{
    header::{HeaderError, SmpteTicks},
    track::TrackError,
};

/// Errors that abort loading or converting a MIDI file
#[derive(Debug, Error)]
pub enum MidiError {
    /// The input could not be opened or fully read
    #[error("Failed to read MIDI input")]
    Io(#[from] std::io::Error),
    /// The header chunk is missing or malformed
    #[error("Invalid header chunk")]
    InvalidHeader(#[from] HeaderError),
    /// The file uses frame based timing
    #[error("Unsupported SMPTE time division ({0}), only ticks per quarter note is supported")]
    UnsupportedTimeDivision(SmpteTicks),
    /// The input ended partway through a chunk
    #[error("Unexpected end of file reading {what}: expected {expected} bytes, found {found}")]
    UnexpectedEof {
        /// What was being read when the input ran out
        what: &'static str,
        /// Bytes required
        expected: usize,
        /// Bytes actually available
        found: usize,
    },
    /// A track chunk's event stream could not be parsed
    #[error("Failed to parse track {index}")]
    Track {
        /// Zero based index of the offending track chunk
        index: usize,
        /// Underlying event stream error
        #[source]
        error: TrackError,
    },
}

impl MidiError {
    /// True for every truncation flavour, whether the container or a track's event data ran out
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedEof { .. }
                | Self::Track {
                    error: TrackError::UnexpectedEof,
                    ..
                }
        )
    }
}
