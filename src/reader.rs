//! MIDI file reader traits, allows for in memory byte spans to be read or files

use std::{convert::Infallible, path::Path};

use crate::{error::MidiError, Chunk};

/// Size of a chunk preamble: 4 tag bytes followed by a 4 byte big-endian length
pub const CHUNK_PREAMBLE_LEN: usize = 8;

/// Trait that allows certain amount of bytes to be yielded by an iterator
pub trait Yieldable<T> {
    /// Gets up to `n` elements while advancing the iterator. Fewer are returned if the
    /// iterator runs dry
    fn get(&mut self, n: usize) -> Vec<T>;
}

impl<ITER: Iterator> Yieldable<ITER::Item> for ITER {
    fn get(&mut self, n: usize) -> Vec<ITER::Item> {
        self.by_ref().take(n).collect()
    }
}

/// Trait that allows for different types to be translated to a MIDI parseable format
pub trait MidiReadable {
    /// Error type that may be returned from the Midi Sequence
    type Error;
    /// Creates a byte iterator from the type
    fn get_midi_bytes(self) -> Result<impl Iterator<Item = u8>, Self::Error>;
}

/// Wrapper struct to allow passing Vec<u8> to MidiReadable trait
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidiData(pub Vec<u8>);

impl From<Vec<u8>> for MidiData {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl MidiReadable for MidiData {
    type Error = Infallible;
    fn get_midi_bytes(self) -> Result<impl Iterator<Item = u8>, Self::Error> {
        Ok(self.0.into_iter())
    }
}

impl<PATH> MidiReadable for PATH
where
    PATH: AsRef<Path>,
{
    type Error = std::io::Error;
    fn get_midi_bytes(self) -> Result<impl Iterator<Item = u8>, Self::Error> {
        let bytes = std::fs::read(self.as_ref())?;
        Ok(bytes.into_iter())
    }
}

/// Chunk framing over a raw MIDI byte stream
pub trait MidiStream {
    /// Reads the next chunk preamble and its payload.
    ///
    /// Returns `Ok(None)` when the stream is exhausted exactly on a chunk boundary, and
    /// [`MidiError::UnexpectedEof`] when it ends partway through a preamble or payload.
    fn read_chunk_data_pair(&mut self) -> Result<Option<(Chunk, Vec<u8>)>, MidiError>;
}

impl<ITER> MidiStream for ITER
where
    ITER: Iterator<Item = u8>,
{
    fn read_chunk_data_pair(&mut self) -> Result<Option<(Chunk, Vec<u8>)>, MidiError> {
        let preamble = self.get(CHUNK_PREAMBLE_LEN);
        if preamble.is_empty() {
            return Ok(None);
        }
        if preamble.len() < CHUNK_PREAMBLE_LEN {
            return Err(MidiError::UnexpectedEof {
                what: "chunk preamble",
                expected: CHUNK_PREAMBLE_LEN,
                found: preamble.len(),
            });
        }

        let mut raw = [0u8; CHUNK_PREAMBLE_LEN];
        raw.copy_from_slice(&preamble);
        let chunk = Chunk::from(u64::from_be_bytes(raw));

        let data = self.get(chunk.len());
        if data.len() < chunk.len() {
            return Err(MidiError::UnexpectedEof {
                what: "chunk payload",
                expected: chunk.len(),
                found: data.len(),
            });
        }

        Ok(Some((chunk, data)))
    }
}

#[cfg(test)]
mod tests {
    use super::{MidiData, MidiReadable, MidiStream, Yieldable};
    use crate::error::MidiError;

    #[test]
    fn yieldable_stops_when_iterator_runs_dry() {
        let mut bytes = [1u8, 2, 3].into_iter();

        assert_eq!(bytes.get(2), vec![1, 2]);
        assert_eq!(bytes.get(5), vec![3]);
        assert!(bytes.get(1).is_empty())
    }

    #[test]
    fn missing_files_report_io_errors() {
        let data = "definitely/not/here.mid".get_midi_bytes();

        assert!(data.is_err())
    }

    #[test]
    fn chunk_pairs_are_framed() {
        let data = MidiData(vec![b'M', b'T', b'r', b'k', 0, 0, 0, 2, 0xAA, 0xBB]);
        let mut stream = data.get_midi_bytes().expect("In memory data is infallible");

        let (chunk, payload) = stream
            .read_chunk_data_pair()
            .expect("Read chunk")
            .expect("Chunk is present");

        assert_eq!(&chunk.chunk_type, b"MTrk");
        assert_eq!(payload, vec![0xAA, 0xBB]);
        assert!(matches!(stream.read_chunk_data_pair(), Ok(None)))
    }

    #[test]
    fn truncated_payload_is_unexpected_eof() {
        let mut stream = vec![b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00].into_iter();

        let result = stream.read_chunk_data_pair();

        assert!(matches!(
            result,
            Err(MidiError::UnexpectedEof {
                expected: 4,
                found: 1,
                ..
            })
        ))
    }

    #[test]
    fn truncated_preamble_is_unexpected_eof() {
        let mut stream = vec![b'M', b'T', b'r'].into_iter();

        assert!(matches!(
            stream.read_chunk_data_pair(),
            Err(MidiError::UnexpectedEof { found: 3, .. })
        ))
    }
}
