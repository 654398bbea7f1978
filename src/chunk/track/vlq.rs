//! Variable length quantities, the encoding behind delta times and event lengths

use super::TrackError;

/// Longest encoding the format allows, good for 28 bits of value
pub const MAX_VLQ_BYTES: usize = 4;

/// Decodes a single variable length quantity, most significant 7 bit group first.
///
/// Returns `Ok(None)` if the stream was already exhausted before the first byte, which is how
/// the end of a track's event data is detected. A stream that runs out partway through the
/// quantity, or a quantity longer than [`MAX_VLQ_BYTES`], is malformed.
pub fn read_vlq<ITER: Iterator<Item = u8>>(iter: &mut ITER) -> Result<Option<u32>, TrackError> {
    const MASK: u8 = 0x7F;
    let mut result: u32 = 0;

    for read in 0..MAX_VLQ_BYTES {
        let Some(byte) = iter.next() else {
            return if read == 0 {
                Ok(None)
            } else {
                Err(TrackError::MalformedVarLenInt)
            };
        };

        result = (result << 7) | (byte & MASK) as u32;

        if !msb_is_one(byte) {
            return Ok(Some(result));
        }
    }

    Err(TrackError::MalformedVarLenInt)
}

/// Returns true if the msb of a byte is 1
fn msb_is_one(byte: u8) -> bool {
    byte >> 7 == 1
}
