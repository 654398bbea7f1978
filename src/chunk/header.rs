//! Header Chunk Enum and Struct Definitions

use core::fmt;

use thiserror::Error;

use crate::chunk::chunk_types::HEADER_CHUNK;

/// Minimum payload length of a header chunk: format, ntrks and division
pub const HEADER_LEN: usize = 6;

/// Ways a header chunk can be malformed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    /// The first chunk of the file is not tagged `MThd`
    #[error("Expected `MThd` tag, found {0:?}")]
    BadMagic([u8; 4]),
    /// The declared payload is too short to hold the header fields
    #[error("Header chunk declares {0} bytes, at least 6 are required")]
    BadLength(usize),
    /// Only formats 0, 1 and 2 exist
    #[error("Invalid header format {0}")]
    InvalidFormat(u16),
}

/// Header chunk data, including format, ntrks and division as 3 16 bit unsigned integers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderChunk {
    /// The MIDI format
    format: Format,
    /// Number of tracks
    ntrks: u16,
    /// Time signature/division
    division: Division,
}

impl HeaderChunk {
    /// The overall organization of the file
    pub fn format(&self) -> Format {
        self.format
    }

    /// Number of track chunks the header declares
    pub fn ntrks(&self) -> u16 {
        self.ntrks
    }

    /// The meaning of delta times in this file
    pub fn division(&self) -> Division {
        self.division
    }

    /// Checks the chunk tag and decodes the header payload. Bytes past the first six are
    /// ignored
    pub fn from_chunk(tag: [u8; 4], payload: &[u8]) -> Result<Self, HeaderError> {
        if tag != HEADER_CHUNK {
            return Err(HeaderError::BadMagic(tag));
        }

        match payload {
            [f0, f1, n0, n1, d0, d1, ..] => Self::try_from((
                u16::from_be_bytes([*f0, *f1]),
                u16::from_be_bytes([*n0, *n1]),
                u16::from_be_bytes([*d0, *d1]),
            )),
            _ => Err(HeaderError::BadLength(payload.len())),
        }
    }
}

impl TryFrom<(u16, u16, u16)> for HeaderChunk {
    type Error = HeaderError;
    fn try_from(value: (u16, u16, u16)) -> Result<Self, Self::Error> {
        let (format, ntrks, division) = value;

        Ok(Self {
            format: format.try_into()?,
            ntrks,
            division: division.into(),
        })
    }
}

/// The overall organization of the MIDI file. Only three values are valid, making most of the 16
/// bits irrelevant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// The file contains a single multi-channel track
    Zero,
    /// The file contains one or more simultaneous tracks (or MIDI outputs) of a sequence
    One,
    /// The file contains one or more sequentially independent single-track patterns
    Two,
}

impl TryFrom<u16> for Format {
    type Error = HeaderError;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Format::Zero),
            1 => Ok(Format::One),
            2 => Ok(Format::Two),
            other => Err(HeaderError::InvalidFormat(other)),
        }
    }
}

/// The meaning of the delta-times in the MIDI sequence,
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Division {
    /// When bit 15 is a 0, bits 14-0 represent ticks per quarter note
    Metrical(u16),
    /// When bit 15 is 1, bits 14-8 represent the negative SMPTE format,
    /// and bits 7-0 represent ticks per frame
    TimeCodeBased(SmpteTicks),
}

impl Division {
    /// Ticks per quarter note, if this division is metrical
    pub fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::Metrical(tpqn) => Some(*tpqn),
            Self::TimeCodeBased(_) => None,
        }
    }
}

/// Division defined by time-code-based time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmpteTicks {
    /// Negative frames per second, stored two's complement in the division's high byte
    smpte: i8,
    /// 8 bits of ticks per frame
    tpf: u8,
}

impl SmpteTicks {
    /// Frames per second (24, 25, 29 or 30 in well formed files)
    pub fn frames_per_second(&self) -> u8 {
        self.smpte.unsigned_abs()
    }

    /// Ticks per frame
    pub fn ticks_per_frame(&self) -> u8 {
        self.tpf
    }
}

impl fmt::Display for SmpteTicks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fps, {} ticks per frame",
            self.frames_per_second(),
            self.tpf
        )
    }
}

impl From<u16> for Division {
    fn from(value: u16) -> Self {
        const MASK: u16 = 0x7FFF;
        let [high, low] = value.to_be_bytes();

        if value >> 15 == 0 {
            Division::Metrical(value & MASK)
        } else {
            // The whole high byte is the two's complement frame rate, bit 15 doubling as sign
            Division::TimeCodeBased(SmpteTicks {
                smpte: high as i8,
                tpf: low,
            })
        }
    }
}
