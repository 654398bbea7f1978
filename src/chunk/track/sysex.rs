//! System Exclusive Messages

use super::{vlq::read_vlq, TrackError};
use crate::reader::Yieldable;

/// A midi system exclusive event message. In a file these carry an explicit length instead of
/// relying on a terminating 0xF7
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysexEvent {
    /// Which of the two sysex forms introduced this event
    kind: SysexKind,
    /// Data payload to be parsed on a per-system basis
    payload: Vec<u8>,
}

/// The status byte a sysex event was introduced with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysexKind {
    /// 0xF0, a complete message or the first packet of one
    Message,
    /// 0xF7, a continuation packet or an escape for arbitrary bytes
    Escape,
}

impl SysexEvent {
    /// Reads a sysex event following its `0xF0` or `0xF7` status byte
    pub fn read<ITER>(status: u8, iter: &mut ITER) -> Result<Self, TrackError>
    where
        ITER: Iterator<Item = u8>,
    {
        let kind = match status {
            0xF0 => SysexKind::Message,
            0xF7 => SysexKind::Escape,
            other => return Err(TrackError::UnknownStatusByte(other)),
        };

        let length = read_vlq(iter)?.ok_or(TrackError::UnexpectedEof)? as usize;
        let payload = iter.get(length);
        if payload.len() < length {
            return Err(TrackError::UnexpectedEof);
        }

        Ok(Self { kind, payload })
    }

    /// Which sysex form this is
    pub fn kind(&self) -> SysexKind {
        self.kind
    }

    /// The raw bytes, including any trailing 0xF7
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}
