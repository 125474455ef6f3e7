//! Data-block framing and the [Codec] entry point.
//!
//! A data block is a 1-byte category, a 2-byte big-endian length that counts
//! the whole block (header included), and the concatenated records.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    errors::CodecError,
    reader::Reader,
    record::{decode_record, encode_record},
    schema::SchemaTable,
    value::{Record, Value},
};

/// Size of the category and length header.
pub const HEADER_LEN: usize = 3;

/// One decoded data block.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub category: u8,
    pub records: Vec<Record>,
}

/// Encoder and decoder over an explicit table of category schemas.
///
/// The codec holds no per-call state, so one instance can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    table: SchemaTable,
}

impl Codec {
    pub fn new(table: SchemaTable) -> Self {
        Codec { table }
    }

    pub fn table(&self) -> &SchemaTable {
        &self.table
    }

    /// Encodes `records` as one data block of `category`.
    pub fn encode(&self, category: u8, records: &[Record]) -> Result<Vec<u8>, CodecError> {
        let schema = self.table.get(category)?;

        let mut out = vec![category, 0, 0];
        for record in records {
            encode_record(schema, record, &mut out)?;
        }

        let length = u16::try_from(out.len()).map_err(|_| CodecError::MessageTooLong(out.len()))?;
        out[1..HEADER_LEN].copy_from_slice(&length.to_be_bytes());

        debug!(category, length, records = records.len(), "encoded data block");

        Ok(out)
    }

    /// Encodes the tagged shape `{category: records}`.
    ///
    /// The mapping must hold exactly one category. Its value is either a
    /// sequence of records or a single record.
    pub fn encode_tagged(&self, input: &BTreeMap<u8, Value>) -> Result<Vec<u8>, CodecError> {
        let mut entries = input.iter();
        let (Some((&category, value)), None) = (entries.next(), entries.next()) else {
            return Err(CodecError::InvalidInput(format!(
                "expected exactly one category, got {}",
                input.len()
            )));
        };

        match value {
            Value::List(records) => self.encode(category, records),
            Value::Map(record) => self.encode(category, std::slice::from_ref(record)),
            _ => Err(CodecError::InvalidInput(
                "category value must be a record or a sequence of records".into(),
            )),
        }
    }

    /// Decodes the data block at the start of `bytes`.
    ///
    /// Bytes past the declared length are ignored.
    pub fn decode(&self, bytes: &[u8]) -> Result<Message, CodecError> {
        let mut reader = Reader::new(bytes);
        self.decode_block(&mut reader)
    }

    /// Decodes every data block of a buffer holding several back to back.
    pub fn decode_blocks(&self, bytes: &[u8]) -> Result<Vec<Message>, CodecError> {
        let mut reader = Reader::new(bytes);
        let mut messages = Vec::new();

        while !reader.is_empty() {
            messages.push(self.decode_block(&mut reader)?);
        }

        Ok(messages)
    }

    fn decode_block(&self, reader: &mut Reader) -> Result<Message, CodecError> {
        let category = reader.read_u8()?;
        let schema = self.table.get(category)?;

        let length = reader.read_u16_be()?;
        let body_len = (length as usize)
            .checked_sub(HEADER_LEN)
            .ok_or(CodecError::BadLength(length))?;

        let mut body = Reader::new(reader.read_bytes(body_len)?);
        let mut records = Vec::new();

        while !body.is_empty() {
            records.push(decode_record(schema, &mut body)?);
        }

        debug!(category, length, records = records.len(), "decoded data block");

        Ok(Message { category, records })
    }
}
