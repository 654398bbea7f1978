//! Whole file loading: a header chunk followed by its declared number of track chunks

use log::{debug, warn};

use crate::{
    chunk::{
        header::{Division, HeaderChunk},
        track::TrackChunk,
        ChunkParseError, ParsedChunk,
    },
    error::MidiError,
    reader::{MidiStream, CHUNK_PREAMBLE_LEN},
};

/// A fully parsed MIDI file. Built once and only read afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct Midi {
    /// The file's header chunk
    header: HeaderChunk,
    /// Tracks in file order
    tracks: Vec<TrackChunk>,
}

impl Midi {
    /// Parses a complete MIDI file from a byte stream.
    ///
    /// The first chunk must be a header using ticks per quarter note timing. Exactly as many
    /// track chunks as the header declares are then read. Chunks of unknown type in between are
    /// skipped and do not count towards that number, and anything after the last track is
    /// left unread.
    pub fn try_from_midi_stream<ITER>(mut stream: ITER) -> Result<Self, MidiError>
    where
        ITER: Iterator<Item = u8>,
    {
        let (chunk, payload) = stream
            .read_chunk_data_pair()?
            .ok_or(MidiError::UnexpectedEof {
                what: "header chunk",
                expected: CHUNK_PREAMBLE_LEN,
                found: 0,
            })?;
        let header = HeaderChunk::from_chunk(chunk.chunk_type, &payload)?;

        if let Division::TimeCodeBased(smpte) = header.division() {
            return Err(MidiError::UnsupportedTimeDivision(smpte));
        }

        debug!(
            "Header: format {:?}, {} tracks, division {:?}",
            header.format(),
            header.ntrks(),
            header.division()
        );

        let declared = header.ntrks() as usize;
        let mut tracks = Vec::with_capacity(declared);

        while tracks.len() < declared {
            let index = tracks.len();
            let pair = stream
                .read_chunk_data_pair()?
                .ok_or(MidiError::UnexpectedEof {
                    what: "track chunk",
                    expected: CHUNK_PREAMBLE_LEN,
                    found: 0,
                })?;

            match ParsedChunk::try_from(pair) {
                Ok(ParsedChunk::Track(track)) => {
                    debug!(
                        "Track {index}: {:?}, {} events",
                        track.name(),
                        track.events().len()
                    );
                    tracks.push(track);
                }
                Ok(ParsedChunk::Header(_)) => warn!("Skipping repeated header chunk"),
                Ok(ParsedChunk::Alien(chunk)) => {
                    warn!("Skipping unknown `{}` chunk of {} bytes", chunk.tag(), chunk.len())
                }
                // A stray header is skipped even when it would not parse
                Err(ChunkParseError::InvalidHeader(_)) => warn!("Skipping repeated header chunk"),
                Err(ChunkParseError::Track(error)) => {
                    return Err(MidiError::Track { index, error })
                }
            }
        }

        Ok(Self { header, tracks })
    }

    /// The header chunk
    pub fn header(&self) -> &HeaderChunk {
        &self.header
    }

    /// All tracks, in file order
    pub fn tracks(&self) -> &[TrackChunk] {
        &self.tracks
    }

    /// The file's timing resolution. Loading rejects any other kind of division
    pub fn ticks_per_quarter_note(&self) -> u16 {
        self.header.division().ticks_per_quarter_note().unwrap_or_default()
    }
}
