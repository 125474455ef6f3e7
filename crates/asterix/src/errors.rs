//! Error types for schema construction and for encode/decode calls.

use thiserror::Error;

/// Errors produced when building a [crate::schema::CategorySchema] or one of its parts.
///
/// These belong to whoever loads schemas; the codec itself only ever sees
/// schemas that were already built successfully.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A bit number is 0 or lies beyond `length * 8` of its block.
    #[error("bit {bit} of `{name}` is outside a {length}-byte block")]
    BitOutOfBlock {
        name: String,
        bit: u16,
        length: usize,
    },
    /// A range was built with its high bit below its low bit.
    #[error("`{name}` has high bit {high} below low bit {low}")]
    InvertedRange { name: String, high: u16, low: u16 },
    /// Bit range is wider than 64 bits.
    #[error("`{0}` is wider than 64 bits")]
    FieldTooWide(String),
    /// Two bit definitions of the same block share at least one bit.
    #[error("`{0}` overlaps `{1}`")]
    OverlappingBits(String, String),
    /// A Fixed block has zero length.
    #[error("fixed block has zero length")]
    EmptyBlock,
    /// A Variable format has no blocks.
    #[error("variable format has no blocks")]
    EmptyVariable,
    /// An extension marker sits on a slot that is not a multiple of 8, or a
    /// multiple-of-8 slot holds something else.
    #[error("UAP slot {0} breaks the extension-marker layout")]
    MisplacedExtension(usize),
    /// A compound group has no subfields.
    #[error("compound format has no subfields")]
    EmptyCompound,
    /// A schema document could not be parsed.
    #[error("schema document: {0}")]
    Document(String),
}

/// Errors produced by encode and decode calls.
///
/// Any of these aborts the whole call: a record either decodes completely or
/// the call fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// No schema is loaded for this category.
    #[error("category {0} has no loaded schema")]
    UnknownCategory(u8),
    /// Encoder input has the wrong shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The buffer ended before a bitmap terminated or a block was complete.
    #[error("truncated data: needed {needed} bytes, {available} available")]
    TruncatedData { needed: usize, available: usize },
    /// A presence bit or indicator references a position with no schema entry.
    #[error("malformed bitmap: {0}")]
    MalformedBitmap(String),
    /// The encoded message does not fit the 16-bit length field.
    #[error("encoded message of {0} bytes exceeds the length field")]
    MessageTooLong(usize),
    /// The declared message length is shorter than the header.
    #[error("declared message length {0} is shorter than the header")]
    BadLength(u16),
    /// A bit access fell outside its block.
    #[error(transparent)]
    Bits(#[from] BitError),
}

/// Errors produced by the low-level bit accessors in [crate::bits].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitError {
    /// Requested bit range is beyond the end of the data.
    #[error("bit range out of bounds")]
    OutOfBounds,
    /// More than 64 bits were requested in a single access.
    #[error("more than 64 bits in a single access")]
    TooManyBits,
}
