//! Low-level bit read and write utilities for byte slices.
//!
//! Offsets are addressed in MSB-first order: offset 0 is the high bit of the first byte.
//! ASTERIX bit numbers (bit 1 = LSB of the last byte) are converted with [offset_of].

use crate::errors::BitError;

/// Converts ASTERIX bit number `bit` (1-based from the LSB of a `length`-byte block)
/// to the MSB-first offset used by the accessors below.
pub fn offset_of(bit: u16, length: usize) -> usize {
    length * 8 - bit as usize
}

/// Reads a single bit at `bit_pos` (0 = MSB of first byte). Returns 0 or 1.
pub fn read_bit_at(data: &[u8], bit_pos: usize) -> Result<u8, BitError> {
    if bit_pos >= data.len() * 8 {
        return Err(BitError::OutOfBounds);
    }

    let byte_index = bit_pos / 8;
    let bit_index = bit_pos % 8;

    Ok((data[byte_index] >> (7 - bit_index)) & 1)
}

/// Reads `n` bits starting at `bit_pos` as an unsigned value (max 64 bits). MSB-first.
pub fn read_bits_at(data: &[u8], bit_pos: usize, n: usize) -> Result<u64, BitError> {
    check_span(data, bit_pos, n)?;

    let mut value = 0u64;
    for pos in bit_pos..bit_pos + n {
        value = (value << 1) | read_bit_at(data, pos)? as u64;
    }

    Ok(value)
}

/// ORs the low `n` bits of `value` into `data` starting at `bit_pos`. MSB-first.
///
/// Bits of `value` above `n` are ignored.
pub fn write_bits_at(
    data: &mut [u8],
    bit_pos: usize,
    n: usize,
    value: u64,
) -> Result<(), BitError> {
    check_span(data, bit_pos, n)?;

    for i in 0..n {
        if (value >> (n - 1 - i)) & 1 == 1 {
            let pos = bit_pos + i;
            data[pos / 8] |= 0x80 >> (pos % 8);
        }
    }

    Ok(())
}

fn check_span(data: &[u8], bit_pos: usize, n: usize) -> Result<(), BitError> {
    if n > 64 {
        return Err(BitError::TooManyBits);
    }

    if bit_pos
        .checked_add(n)
        .map_or(true, |end| end > data.len() * 8)
    {
        return Err(BitError::OutOfBounds);
    }

    Ok(())
}

/// Returns a mask covering the low `bits` bits.
pub fn mask(bits: usize) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

/// Sign-extends the low `bits` of `value` to a full `i64`.
pub fn sign_extend(value: u64, bits: usize) -> i64 {
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}
