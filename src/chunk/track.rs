//! Track chunk data enums and structs

use core::iter::FusedIterator;

use meta::MetaEvent;
use status::MidiStatus;
use sysex::SysexEvent;
use thiserror::Error;

pub mod meta;
pub mod status;
pub mod sysex;
pub mod vlq;

/// Error types from parsing a track
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackError {
    /// End of the chunk while an event was still being parsed
    #[error("Reached end of chunk before done parsing")]
    UnexpectedEof,
    /// A delta time or length ran out of bytes or exceeded four bytes
    #[error("Malformed variable length quantity")]
    MalformedVarLenInt,
    /// A status byte outside every recognized range, or a data byte with no running status
    /// to fall back on
    #[error("Unknown status byte {0:#04X}")]
    UnknownStatusByte(u8),
    /// A channel event data byte had its high bit set
    #[error("Invalid data byte {0:#04X} in channel event")]
    InvalidDataByte(u8),
}

/// A track chunk, containing one or more MTrk events
#[derive(Debug, Clone, PartialEq)]
pub struct TrackChunk {
    /// Name from the first track name meta event, if there is one
    name: Option<String>,
    /// All associated track events to this chunk
    mtrk_events: Vec<MTrkEvent>,
}

impl TrackChunk {
    /// Builds a track from already parsed events, picking up its name along the way
    pub fn from_events(mtrk_events: Vec<MTrkEvent>) -> Self {
        let name = mtrk_events.iter().find_map(|mtrk| match &mtrk.event {
            Event::MetaEvent(MetaEvent::TrackName(name)) => Some(name.clone()),
            _ => None,
        });

        Self { name, mtrk_events }
    }

    /// The track's name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Events in stream order
    pub fn events(&self) -> &[MTrkEvent] {
        &self.mtrk_events
    }

    /// True if at least one note on event with a non zero velocity is present
    pub fn has_sounding_note(&self) -> bool {
        self.mtrk_events
            .iter()
            .any(|mtrk| mtrk.event.sounding_key().is_some())
    }
}

impl TryFrom<Vec<u8>> for TrackChunk {
    type Error = TrackError;
    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        let mtrk_events = TrackEvents::new(value.into_iter()).collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_events(mtrk_events))
    }
}

/// A MIDI Event with a DeltaTime and an attached Event
#[derive(Debug, Clone, PartialEq)]
pub struct MTrkEvent {
    /// Delta time is a variable-length representation of how much time to wait in ticks before the
    /// event follows.
    delta_time: u32,
    /// The event that occurs after the delta time is waited for
    event: Event,
}

impl MTrkEvent {
    /// Pairs an event with its delta time
    pub fn new(delta_time: u32, event: Event) -> Self {
        Self { delta_time, event }
    }

    /// Ticks since the previous event in the same track
    pub fn delta_time(&self) -> u32 {
        self.delta_time
    }

    /// The event itself
    pub fn event(&self) -> &Event {
        &self.event
    }
}

/// Any event that may occur
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A midi channel event
    MidiEvent(MidiStatus),
    /// A system exclusive event
    SysexEvent(SysexEvent),
    /// Specifies non-MIDI information useful to this format or to sequencers
    MetaEvent(MetaEvent),
}

impl Event {
    /// Key of a note on event with a non zero velocity
    pub fn sounding_key(&self) -> Option<u8> {
        match self {
            Self::MidiEvent(status) => status.sounding_key(),
            _ => None,
        }
    }

    /// Key of a note off, or of a note on with zero velocity
    pub fn released_key(&self) -> Option<u8> {
        match self {
            Self::MidiEvent(status) => status.released_key(),
            _ => None,
        }
    }

    /// Microseconds per quarter note, if this is a tempo event
    pub fn tempo(&self) -> Option<u32> {
        match self {
            Self::MetaEvent(MetaEvent::Tempo(micros)) => Some(*micros),
            _ => None,
        }
    }
}

/// Lazily parses a track's raw bytes into delta timed events.
///
/// Yields events in stream order until the bytes run out or an end of track event has been
/// produced. The first error is yielded once and ends the iteration, since nothing past an
/// unparseable event can be trusted.
#[derive(Debug)]
pub struct TrackEvents<ITER> {
    /// Remaining track bytes
    bytes: ITER,
    /// Last channel status byte seen, reused when a status byte is omitted
    running_status: Option<u8>,
    /// Set once the end of the track or an error has been reached
    finished: bool,
}

impl<ITER> TrackEvents<ITER>
where
    ITER: Iterator<Item = u8>,
{
    /// Starts parsing at the first delta time of a track's data
    pub fn new(bytes: ITER) -> Self {
        Self {
            bytes,
            running_status: None,
            finished: false,
        }
    }

    /// Reads one delta time and event pair, `Ok(None)` once the bytes are exhausted
    fn read_event(&mut self) -> Result<Option<MTrkEvent>, TrackError> {
        let Some(delta_time) = vlq::read_vlq(&mut self.bytes)? else {
            return Ok(None);
        };

        let byte = self.bytes.next().ok_or(TrackError::UnexpectedEof)?;

        let event = match byte {
            0xFF => Event::MetaEvent(MetaEvent::read(&mut self.bytes)?),
            0xF0 | 0xF7 => Event::SysexEvent(SysexEvent::read(byte, &mut self.bytes)?),
            0x80..=0xEF => {
                self.running_status = Some(byte);
                let first = self.bytes.next().ok_or(TrackError::UnexpectedEof)?;
                Event::MidiEvent(MidiStatus::read(byte, first, &mut self.bytes)?)
            }
            0x00..=0x7F => {
                let status = self
                    .running_status
                    .ok_or(TrackError::UnknownStatusByte(byte))?;
                Event::MidiEvent(MidiStatus::read(status, byte, &mut self.bytes)?)
            }
            other => return Err(TrackError::UnknownStatusByte(other)),
        };

        Ok(Some(MTrkEvent { delta_time, event }))
    }
}

impl<ITER> Iterator for TrackEvents<ITER>
where
    ITER: Iterator<Item = u8>,
{
    type Item = Result<MTrkEvent, TrackError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_event() {
            Ok(Some(mtrk)) => {
                if matches!(mtrk.event, Event::MetaEvent(MetaEvent::EndOfTrack)) {
                    self.finished = true;
                }
                Some(Ok(mtrk))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<ITER> FusedIterator for TrackEvents<ITER> where ITER: Iterator<Item = u8> {}
