//! Sensirion CRC-8 and the per-word checksum framing used on the STC3x wire.
//!
//! Every 2-byte data word sent to or received from the sensor is followed by one CRC byte
//! computed over exactly that word. Command opcodes are sent without a CRC.

use crc::{Algorithm, Crc};

use crate::{Error, Result};

/// Number of data bytes covered by one checksum byte.
pub const WORD_LEN: usize = 2;

/// A data word plus its trailing checksum byte.
pub const GROUP_LEN: usize = WORD_LEN + 1;

/// CRC-8 with polynomial 0x31, init 0xFF and no final XOR.
pub const CRC_8_SENSIRION: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xF7,
    residue: 0x00,
};

const CRC: Crc<u8> = Crc::<u8>::new(&CRC_8_SENSIRION);

pub fn crc8(word: &[u8]) -> u8 {
    CRC.checksum(word)
}

/// Returns `data` with a checksum byte inserted after every word. A trailing odd byte forms a
/// short word of its own.
pub fn insert_checksums(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len().div_ceil(WORD_LEN));
    for word in data.chunks(WORD_LEN) {
        out.extend_from_slice(word);
        out.push(crc8(word));
    }
    out
}

/// Verifies and removes the checksum byte following every word of a response.
///
/// Fails on the first mismatching group; nothing of a corrupted response is returned.
pub fn strip_checksums(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() % GROUP_LEN != 0 {
        return Err(Error::UnexpectedLength {
            expected: data.len().next_multiple_of(GROUP_LEN),
            actual: data.len(),
        });
    }
    let mut out = Vec::with_capacity(data.len() / GROUP_LEN * WORD_LEN);
    for group in data.chunks_exact(GROUP_LEN) {
        let (word, received) = (&group[..WORD_LEN], group[WORD_LEN]);
        let expected = crc8(word);
        if received != expected {
            log::warn!(
                "checksum mismatch on word {:02X?}: received {:#04x}, expected {:#04x}",
                word,
                received,
                expected
            );
            return Err(Error::Checksum { received, expected });
        }
        out.extend_from_slice(word);
    }
    Ok(out)
}
