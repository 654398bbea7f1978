//! Meta Event Structs and Parsing

use super::{vlq::read_vlq, TrackError};
use crate::reader::Yieldable;

/// A meta level event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaEvent {
    /// Track name, tag 0x03
    TrackName(String),
    /// End of Track Identifier, tag 0x2F
    EndOfTrack,
    /// Tempo in microseconds per quarter note, tag 0x51
    Tempo(u32),
    /// Any other meta event, kept as its tag and raw payload
    Other(u8, Vec<u8>),
}

impl MetaEvent {
    /// Returns the specific event's tag
    pub fn get_tag(&self) -> u8 {
        match self {
            Self::TrackName(_) => 0x03,
            Self::EndOfTrack => 0x2F,
            Self::Tempo(_) => 0x51,
            Self::Other(tag, _) => *tag,
        }
    }

    /// Reads a meta event whose leading `0xFF` has already been consumed: a tag byte, a
    /// variable length payload size, then the payload itself
    pub fn read<ITER>(iter: &mut ITER) -> Result<Self, TrackError>
    where
        ITER: Iterator<Item = u8>,
    {
        let event_tag = iter.next().ok_or(TrackError::UnexpectedEof)?;
        let length = read_vlq(iter)?.ok_or(TrackError::UnexpectedEof)? as usize;

        let data = iter.get(length);
        if data.len() < length {
            return Err(TrackError::UnexpectedEof);
        }

        match event_tag {
            0x03 => Ok(MetaEvent::TrackName(
                String::from_utf8_lossy(&data).into_owned(),
            )),
            0x2F => Ok(MetaEvent::EndOfTrack),
            // Trailing bytes past the first three are ignored, a shorter payload is kept raw
            0x51 if data.len() >= 3 => {
                let micros = u32::from_be_bytes([0, data[0], data[1], data[2]]);
                Ok(MetaEvent::Tempo(micros))
            }
            _ => Ok(MetaEvent::Other(event_tag, data)),
        }
    }
}
