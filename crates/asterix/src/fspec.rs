//! Presence-bitmap codec, shared by the record FSPEC and compound indicators.
//!
//! Positions are 1-based and counted MSB-first across the octets. Every 8th
//! position is an octet's FX bit: 1 when another octet follows, 0 on the last.

use crate::{errors::CodecError, reader::Reader};

/// Returns true if `position` is an FX bit.
pub fn is_extension(position: usize) -> bool {
    position % 8 == 0
}

/// Position of the `n`-th presence bit (1-based), skipping FX positions.
pub fn position_of(n: usize) -> usize {
    n + (n - 1) / 7
}

/// Inverse of [position_of] for a non-FX position.
pub fn index_of(position: usize) -> usize {
    position - position / 8
}

/// Builds the shortest bitmap marking `present` positions.
///
/// Octets past the last present position are never emitted; an empty set
/// yields a single zero octet. FX positions in `present` are ignored.
pub fn encode(present: impl IntoIterator<Item = usize>) -> Vec<u8> {
    let mut octets = vec![0u8];

    for position in present {
        if position == 0 || is_extension(position) {
            continue;
        }

        let index = (position - 1) / 8;
        if index >= octets.len() {
            octets.resize(index + 1, 0);
        }
        octets[index] |= 0x80 >> ((position - 1) % 8);
    }

    let last = octets.len() - 1;
    for octet in &mut octets[..last] {
        *octet |= 0x01;
    }

    octets
}

/// Reads a bitmap and returns its set presence positions in ascending order.
///
/// Stops after the first octet whose FX bit is 0; fails with
/// [CodecError::TruncatedData] if the buffer ends first.
pub fn decode(reader: &mut Reader) -> Result<Vec<usize>, CodecError> {
    let mut present = Vec::new();

    for index in 0.. {
        let octet = reader.read_u8()?;

        for bit in 0..7 {
            if octet & (0x80 >> bit) != 0 {
                present.push(index * 8 + bit + 1);
            }
        }

        if octet & 0x01 == 0 {
            break;
        }
    }

    Ok(present)
}
