//! JSON-deserializable category description.
//!
//! These types describe one category the way a human-authored schema document
//! does: the UAP in FRN order and, per data item, its format tree. They are
//! converted into a [CategorySchema] once at load time.
//!
//! ```json
//! {
//!   "category": 21,
//!   "uap": ["010", "040", "-"],
//!   "items": {
//!     "010": { "type": "Fixed", "length": 2, "bits": [
//!       { "name": "SAC", "from": 16, "to": 9 },
//!       { "name": "SIC", "from": 8, "to": 1 } ] }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::{
    errors::SchemaError,
    field::BitDef,
    schema::{CategorySchema, Fixed, FormatNode, SchemaLoader, Subfield, UapSlot},
};

/// Top-level description of one category.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CategoryDef {
    pub category: u8,
    /// UAP entries. Without any `FX` entry the list is taken in FRN order and
    /// extension markers are inserted; with them it is taken verbatim.
    pub uap: Vec<String>,
    /// Data item identifier to its format.
    pub items: BTreeMap<String, FormatDef>,
}

/// Format of a data item or compound subfield.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type")]
pub enum FormatDef {
    Fixed {
        length: usize,
        bits: Vec<BitsDef>,
    },
    Repetitive {
        element: FixedDef,
    },
    Variable {
        blocks: Vec<FixedDef>,
    },
    Compound {
        subfields: Vec<SubfieldDef>,
    },
}

/// A fixed block used inside Repetitive and Variable formats.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FixedDef {
    pub length: usize,
    pub bits: Vec<BitsDef>,
}

/// One named bit or bit range.
///
/// Either `bit` or both of `from`/`to` must be given; `from`/`to` may come in
/// either order.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BitsDef {
    pub name: String,
    #[serde(default)]
    pub bit: Option<u16>,
    #[serde(default)]
    pub from: Option<u16>,
    #[serde(default)]
    pub to: Option<u16>,
    #[serde(default)]
    pub signed: bool,
    /// LSB weight of the raw value.
    #[serde(default)]
    pub scale: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SubfieldDef {
    pub name: String,
    pub format: FormatDef,
}

impl TryFrom<BitsDef> for BitDef {
    type Error = SchemaError;

    fn try_from(value: BitsDef) -> Result<Self, Self::Error> {
        let mut def = match (value.bit, value.from, value.to) {
            (Some(bit), None, None) => BitDef::bit(value.name, bit),
            (None, Some(from), Some(to)) => BitDef::range(value.name, from, to),
            _ => {
                return Err(SchemaError::Document(format!(
                    "`{}` needs either `bit` or `from`/`to`",
                    value.name
                )));
            }
        };

        def.signed = value.signed;
        def.scale = value.scale;
        Ok(def)
    }
}

impl TryFrom<FixedDef> for Fixed {
    type Error = SchemaError;

    fn try_from(value: FixedDef) -> Result<Self, Self::Error> {
        fixed(value.length, value.bits)
    }
}

fn fixed(length: usize, bits: Vec<BitsDef>) -> Result<Fixed, SchemaError> {
    let bits = bits
        .into_iter()
        .map(BitDef::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Fixed::new(length, bits)
}

impl TryFrom<FormatDef> for FormatNode {
    type Error = SchemaError;

    fn try_from(value: FormatDef) -> Result<Self, Self::Error> {
        match value {
            FormatDef::Fixed { length, bits } => Ok(FormatNode::Fixed(fixed(length, bits)?)),
            FormatDef::Repetitive { element } => Ok(FormatNode::Repetitive(element.try_into()?)),
            FormatDef::Variable { blocks } => FormatNode::variable(
                blocks
                    .into_iter()
                    .map(Fixed::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            FormatDef::Compound { subfields } => FormatNode::compound(
                subfields
                    .into_iter()
                    .map(|sub| Ok(Subfield::new(sub.name, sub.format.try_into()?)))
                    .collect::<Result<Vec<_>, SchemaError>>()?,
            ),
        }
    }
}

impl TryFrom<CategoryDef> for CategorySchema {
    type Error = SchemaError;

    fn try_from(value: CategoryDef) -> Result<Self, Self::Error> {
        let items = value
            .items
            .into_iter()
            .map(|(id, format)| Ok((id, FormatNode::try_from(format)?)))
            .collect::<Result<HashMap<_, _>, SchemaError>>()?;

        let explicit = value
            .uap
            .iter()
            .any(|slot| UapSlot::parse(slot) == UapSlot::Extension);

        if explicit {
            let uap = value.uap.iter().map(|slot| UapSlot::parse(slot)).collect();
            CategorySchema::new(value.category, uap, items)
        } else {
            CategorySchema::with_frns(value.category, value.uap.iter().map(String::as_str), items)
        }
    }
}

impl CategorySchema {
    /// Parses a JSON category document.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let def: CategoryDef =
            serde_json::from_str(json).map_err(|e| SchemaError::Document(e.to_string()))?;
        def.try_into()
    }
}

/// [SchemaLoader] over in-memory JSON category documents.
#[derive(Debug, Clone, Default)]
pub struct JsonLoader {
    documents: BTreeMap<u8, String>,
}

impl JsonLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: u8, json: impl Into<String>) -> &mut Self {
        self.documents.insert(category, json.into());
        self
    }

    pub fn categories(&self) -> impl Iterator<Item = u8> + '_ {
        self.documents.keys().copied()
    }
}

impl SchemaLoader for JsonLoader {
    type Error = SchemaError;

    fn load(&self, category: u8) -> Result<CategorySchema, Self::Error> {
        let json = self
            .documents
            .get(&category)
            .ok_or_else(|| SchemaError::Document(format!("no document for category {category}")))?;

        let schema = CategorySchema::from_json(json)?;
        if schema.category() != category {
            return Err(SchemaError::Document(format!(
                "document for category {category} declares category {}",
                schema.category()
            )));
        }

        Ok(schema)
    }
}
