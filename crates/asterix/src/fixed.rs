//! Bit-field codec: packs and unpacks the named sub-fields of one [Fixed] block.

use std::collections::HashSet;

use crate::{
    bits::{self, mask, offset_of, sign_extend},
    errors::CodecError,
    field::{BitDef, BitSpan},
    reader::Reader,
    schema::Fixed,
    value::{Fields, Value},
};

/// Input keys already taken by an earlier block of the same item.
///
/// Encoding never mutates the caller's mapping; a key claimed once is skipped
/// by every later block that defines the same name.
pub(crate) type Consumed<'s> = HashSet<&'s str>;

/// A packed Fixed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packed {
    /// Exactly `length` bytes; absent fields are zero.
    pub bytes: Vec<u8>,
    /// Number of fields present with a non-zero value.
    pub written: usize,
}

impl Fixed {
    /// Packs `values` into this block. Absent and zero-valued fields are left
    /// as zero bits, as are `FX` and `spare`.
    ///
    /// Values wider than their span are masked to it, so negative numbers land
    /// in two's-complement form.
    pub fn encode(&self, values: &Fields) -> Result<Packed, CodecError> {
        self.encode_consuming(values, &mut Consumed::new())
    }

    pub(crate) fn encode_consuming<'s>(
        &'s self,
        values: &Fields,
        consumed: &mut Consumed<'s>,
    ) -> Result<Packed, CodecError> {
        let mut bytes = vec![0u8; self.length()];
        let mut written = 0;

        for def in self.bits() {
            if def.is_placeholder() || consumed.contains(def.name.as_str()) {
                continue;
            }

            let Some(value) = values.get(&def.name) else {
                continue;
            };
            consumed.insert(def.name.as_str());

            let raw = value.to_raw(def.scale).ok_or_else(|| {
                CodecError::InvalidInput(format!("`{}` is not a numeric leaf", def.name))
            })?;

            if value.is_empty() {
                continue;
            }

            let raw = match def.span {
                BitSpan::Bit(_) => 1,
                BitSpan::Range { .. } => raw,
            };

            let width = def.span.width();
            bits::write_bits_at(
                &mut bytes,
                offset_of(def.span.high(), self.length()),
                width,
                raw & mask(width),
            )?;
            written += 1;
        }

        Ok(Packed { bytes, written })
    }

    /// Unpacks every defined field of this block, placeholders included.
    pub fn decode(&self, bytes: &[u8]) -> Result<Fields, CodecError> {
        if bytes.len() < self.length() {
            return Err(CodecError::TruncatedData {
                needed: self.length(),
                available: bytes.len(),
            });
        }

        let block = &bytes[..self.length()];
        let mut fields = Fields::new();

        for def in self.bits() {
            fields.insert(def.name.clone(), self.decode_field(block, def)?);
        }

        Ok(fields)
    }

    /// Reads one block from `reader` and unpacks it.
    pub(crate) fn read(&self, reader: &mut Reader) -> Result<Fields, CodecError> {
        let block = reader.read_bytes(self.length())?;
        self.decode(block)
    }

    fn decode_field(&self, block: &[u8], def: &BitDef) -> Result<Value, CodecError> {
        let width = def.span.width();
        let raw = bits::read_bits_at(block, offset_of(def.span.high(), self.length()), width)?;

        if let BitSpan::Bit(_) = def.span {
            return Ok(Value::U64(raw));
        }

        let value = match (def.signed, def.scale) {
            (true, Some(scale)) => Value::F64(sign_extend(raw, width) as f64 * scale),
            (false, Some(scale)) => Value::F64(raw as f64 * scale),
            (true, None) => Value::I64(sign_extend(raw, width)),
            (false, None) => Value::U64(raw),
        };

        Ok(value)
    }
}
