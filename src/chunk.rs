//! Chunk Definitions for parsed types and type headers

use header::{HeaderChunk, HeaderError};
use thiserror::Error;
use track::{TrackChunk, TrackError};

use crate::{
    chunk::chunk_types::{HEADER_CHUNK, TRACK_DATA_CHUNK},
    Chunk,
};

pub mod chunk_types;
pub mod header;
pub mod track;

/// Represents a parsed MIDI Chunk with its associated data.
/// A parsed chunk is classified based on its type, such as header or track.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedChunk {
    /// A header chunk
    Header(HeaderChunk),
    /// A track chunk,
    Track(TrackChunk),
    /// A chunk type this crate does not know about. Readers are expected to skip these
    Alien(Chunk),
}

/// Error type for attempting to parse from a raw chunk to a parsed one
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChunkParseError {
    /// Header payload is malformed
    #[error("Invalid header chunk")]
    InvalidHeader(#[from] HeaderError),
    /// Error parsing track
    #[error("Track parsing error")]
    Track(#[from] TrackError),
}

impl TryFrom<(Chunk, Vec<u8>)> for ParsedChunk {
    type Error = ChunkParseError;
    fn try_from(value: (Chunk, Vec<u8>)) -> Result<Self, Self::Error> {
        let (chunk, data) = value;

        match chunk.chunk_type {
            HEADER_CHUNK => Ok(ParsedChunk::Header(HeaderChunk::from_chunk(
                chunk.chunk_type,
                &data,
            )?)),
            TRACK_DATA_CHUNK => Ok(ParsedChunk::Track(TrackChunk::try_from(data)?)),
            _ => Ok(ParsedChunk::Alien(chunk)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChunkParseError, ParsedChunk};
    use crate::{
        chunk::{header::HeaderError, track::TrackError},
        Chunk,
    };

    #[test]
    fn header_chunks_are_classified() {
        let chunk: Chunk = 0x4d546864_00000006u64.into();
        let parsed = ParsedChunk::try_from((chunk, vec![0u8, 0, 0, 1, 0, 96]));

        assert!(matches!(parsed, Ok(ParsedChunk::Header(_))))
    }

    #[test]
    fn track_chunks_are_classified() {
        let chunk: Chunk = 0x4d54726b_00000004u64.into();
        let parsed = ParsedChunk::try_from((chunk, vec![0x00u8, 0xFF, 0x2F, 0x00]))
            .expect("Parse end of track only chunk");

        let ParsedChunk::Track(track) = parsed else {
            panic!("Expected a track chunk, got {parsed:?}");
        };
        assert_eq!(track.events().len(), 1)
    }

    #[test]
    fn unknown_chunks_are_alien() {
        let chunk: Chunk = 0x58595a57_00000001u64.into();
        let parsed = ParsedChunk::try_from((chunk, vec![0x00u8]));

        assert_eq!(parsed, Ok(ParsedChunk::Alien(chunk)))
    }

    #[test]
    fn parse_errors_are_wrapped() {
        let header: Chunk = 0x4d546864_00000002u64.into();
        let track: Chunk = 0x4d54726b_00000002u64.into();

        assert_eq!(
            ParsedChunk::try_from((header, vec![0u8, 0])),
            Err(ChunkParseError::InvalidHeader(HeaderError::BadLength(2)))
        );
        assert_eq!(
            ParsedChunk::try_from((track, vec![0x00u8, 0xF4])),
            Err(ChunkParseError::Track(TrackError::UnknownStatusByte(0xF4)))
        )
    }
}
