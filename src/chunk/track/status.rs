//! Channel event status parsing

use super::TrackError;

/// A MIDI Message Status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiStatus {
    /// Turn Off event
    /// This message is sent when a note is released
    NoteOff(u8, NoteMeta),
    /// Turn On event
    /// This message is sent when a note is depressed. A velocity of zero means the same as
    /// [`MidiStatus::NoteOff`]
    NoteOn(u8, NoteMeta),
    /// Polyphonic Key Pressure
    /// This message is most often sent by pressing down a key after it "bottoms out"
    PolyphonicKeyPressure(u8, NoteMeta),
    /// Control change
    /// This message is sent when a controller value changes. Controllers include devices such as
    /// pedals and levers. Certain controller numbers are reserved.
    ControlChange(u8, ControlChange),
    /// Program change.
    /// This message is sent when the patch number changes
    ProgramChange(u8, u8),
    /// Channel Pressure
    /// This message is most often sent by pressing down on a key after it "bottoms out"
    ChannelPressure(u8, u8),
    /// Pitch Wheel Change
    /// This message is sent to indicate a change in the pitch wheel as measured by a fourteen bit
    /// value.
    PitchWheelChange(u8, u16),
}

impl MidiStatus {
    /// Parses a channel event from its status byte and first data byte, pulling the second data
    /// byte from `iter` when the event type carries one.
    ///
    /// The first data byte is passed in rather than read so that running status, where the
    /// status byte is omitted, goes through the same path.
    pub fn read<ITER>(status: u8, first: u8, iter: &mut ITER) -> Result<Self, TrackError>
    where
        ITER: Iterator<Item = u8>,
    {
        let channel = status & 0x0F;
        let first = data_byte(first)?;
        let mut second = || {
            iter.next()
                .ok_or(TrackError::UnexpectedEof)
                .and_then(data_byte)
        };

        match status >> 4 {
            0x8 => Ok(Self::NoteOff(
                channel,
                NoteMeta {
                    key: first,
                    velocity: second()?,
                },
            )),
            0x9 => Ok(Self::NoteOn(
                channel,
                NoteMeta {
                    key: first,
                    velocity: second()?,
                },
            )),
            0xA => Ok(Self::PolyphonicKeyPressure(
                channel,
                NoteMeta {
                    key: first,
                    velocity: second()?,
                },
            )),
            0xB => Ok(Self::ControlChange(
                channel,
                ControlChange {
                    controller_number: first,
                    new_value: second()?,
                },
            )),
            0xC => Ok(Self::ProgramChange(channel, first)),
            0xD => Ok(Self::ChannelPressure(channel, first)),
            0xE => {
                // Least significant 7 bits come first
                let msb = second()?;
                Ok(Self::PitchWheelChange(
                    channel,
                    ((msb as u16) << 7) | first as u16,
                ))
            }
            _ => Err(TrackError::UnknownStatusByte(status)),
        }
    }

    /// The 0 based channel the event is addressed to
    pub fn channel(&self) -> u8 {
        match self {
            Self::NoteOff(channel, _)
            | Self::NoteOn(channel, _)
            | Self::PolyphonicKeyPressure(channel, _)
            | Self::ControlChange(channel, _)
            | Self::ProgramChange(channel, _)
            | Self::ChannelPressure(channel, _)
            | Self::PitchWheelChange(channel, _) => *channel,
        }
    }

    /// The key of a note on event that actually sounds, i.e. has a non zero velocity
    pub fn sounding_key(&self) -> Option<u8> {
        match self {
            Self::NoteOn(_, note) if note.velocity() > 0 => Some(note.key()),
            _ => None,
        }
    }

    /// The key a note off, or a note on with zero velocity, lets go of
    pub fn released_key(&self) -> Option<u8> {
        match self {
            Self::NoteOff(_, note) => Some(note.key()),
            Self::NoteOn(_, note) if note.velocity() == 0 => Some(note.key()),
            _ => None,
        }
    }
}

/// Data bytes never have their high bit set
fn data_byte(byte: u8) -> Result<u8, TrackError> {
    if byte < 0x80 {
        Ok(byte)
    } else {
        Err(TrackError::InvalidDataByte(byte))
    }
}

/// Metadata for a note's relative info. Including channel, key and velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteMeta {
    /// Note key
    key: u8,
    /// Note velocity
    velocity: u8,
}

impl NoteMeta {
    /// Note number, 69 being A4
    pub fn key(&self) -> u8 {
        self.key
    }

    /// Velocity the note was struck (or released) with
    pub fn velocity(&self) -> u8 {
        self.velocity
    }
}

/// Metadata for changing a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlChange {
    /// Controller number
    controller_number: u8,
    /// New value
    new_value: u8,
}
