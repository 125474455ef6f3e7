//! # asterix
//!
//! Schema-driven encoder and decoder for EUROCONTROL ASTERIX data blocks.
//!
//! Each category is described at run time by a [CategorySchema]: its UAP
//! (presence-bitmap ordering) and the format tree of every data item. The same
//! engine handles any category by interpreting that schema; there is no
//! per-category code.
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use asterix::{BitDef, CategorySchema, Codec, Fixed, FormatNode, SchemaTable, Value};
//!
//! let bits = vec![BitDef::range("SAC", 16, 9), BitDef::range("SIC", 8, 1)];
//! let sac_sic = Fixed::new(2, bits).unwrap();
//! let items = HashMap::from([("010".to_string(), FormatNode::Fixed(sac_sic))]);
//! let schema = CategorySchema::with_frns(48, ["010"], items).unwrap();
//!
//! let mut table = SchemaTable::new();
//! table.insert(schema);
//! let codec = Codec::new(table);
//!
//! let message = codec.decode(&[0x30, 0x00, 0x06, 0x80, 0x19, 0xC9]).unwrap();
//! assert_eq!(message.category, 48);
//!
//! let item = message.records[0]["010"].as_map().unwrap();
//! assert_eq!(item["SIC"], Value::U64(201));
//!
//! let bytes = codec.encode(48, &message.records).unwrap();
//! assert_eq!(bytes, vec![0x30, 0x00, 0x06, 0x80, 0x19, 0xC9]);
//! ```

pub mod bits;
pub mod errors;
pub mod field;
pub mod fixed;
pub mod format;
pub mod fspec;
pub mod message;
pub mod reader;
pub mod record;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;

pub use errors::{CodecError, SchemaError};
pub use field::{BitDef, BitSpan};
pub use message::{Codec, Message};
pub use schema::{CategorySchema, Fixed, FormatNode, SchemaLoader, SchemaTable, Subfield, UapSlot};
pub use value::{Fields, Record, Value};
