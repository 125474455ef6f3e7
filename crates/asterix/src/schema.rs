//! Schema model: one category's UAP layout and data-item format tree.
//!
//! A [CategorySchema] is produced once by a [SchemaLoader] and shared read-only
//! (behind an [Arc]) by every encode and decode call for its category.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use tracing::warn;

use crate::{
    errors::{CodecError, SchemaError},
    field::BitDef,
};

/// A fixed-length block of named bit fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixed {
    length: usize,
    bits: Vec<BitDef>,
}

impl Fixed {
    /// Builds a block, checking that every span fits in `length * 8` bits,
    /// is at most 64 bits wide, and does not overlap another span.
    pub fn new(length: usize, bits: Vec<BitDef>) -> Result<Self, SchemaError> {
        if length == 0 {
            return Err(SchemaError::EmptyBlock);
        }

        for (i, def) in bits.iter().enumerate() {
            if def.span.high() < def.span.low() {
                return Err(SchemaError::InvertedRange {
                    name: def.name.clone(),
                    high: def.span.high(),
                    low: def.span.low(),
                });
            }

            if def.span.low() == 0 || def.span.high() as usize > length * 8 {
                return Err(SchemaError::BitOutOfBlock {
                    name: def.name.clone(),
                    bit: if def.span.low() == 0 { 0 } else { def.span.high() },
                    length,
                });
            }

            if def.span.width() > 64 {
                return Err(SchemaError::FieldTooWide(def.name.clone()));
            }

            if let Some(other) = bits[..i].iter().find(|o| o.span.overlaps(&def.span)) {
                return Err(SchemaError::OverlappingBits(
                    def.name.clone(),
                    other.name.clone(),
                ));
            }
        }

        Ok(Fixed { length, bits })
    }

    /// Block length in bytes.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Bit definitions in schema order.
    pub fn bits(&self) -> &[BitDef] {
        &self.bits
    }

    /// Names of the bits that carry data (everything except `FX` and `spare`).
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.bits
            .iter()
            .filter(|def| !def.is_placeholder())
            .map(|def| def.name.as_str())
    }
}

/// One named member of a Compound group.
#[derive(Debug, Clone, PartialEq)]
pub struct Subfield {
    /// Key under which a Repetitive subfield's sequence is stored. Mapping
    /// results of the other kinds merge flat into the group.
    pub name: String,
    pub format: FormatNode,
}

impl Subfield {
    pub fn new(name: impl Into<String>, format: FormatNode) -> Self {
        Subfield {
            name: name.into(),
            format,
        }
    }
}

/// Layout of one data item.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatNode {
    Fixed(Fixed),
    /// One-byte count followed by that many copies of the element block.
    Repetitive(Fixed),
    /// Chained blocks; bit 1 of each block says whether another follows.
    Variable(Vec<Fixed>),
    /// Indicator bitmap followed by the indicated subfields.
    Compound(Vec<Subfield>),
}

impl FormatNode {
    pub fn variable(blocks: Vec<Fixed>) -> Result<Self, SchemaError> {
        if blocks.is_empty() {
            return Err(SchemaError::EmptyVariable);
        }
        Ok(FormatNode::Variable(blocks))
    }

    pub fn compound(subfields: Vec<Subfield>) -> Result<Self, SchemaError> {
        if subfields.is_empty() {
            return Err(SchemaError::EmptyCompound);
        }
        Ok(FormatNode::Compound(subfields))
    }
}

/// One position of a category's User Application Profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UapSlot {
    Item(String),
    /// Unused position; never maps to a data item.
    Spare,
    /// Extension flag position; sits on every 8th slot.
    Extension,
}

impl UapSlot {
    /// Parses the document convention: `-` is spare, `FX` the extension flag.
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "-" | "" => UapSlot::Spare,
            "FX" | "fx" => UapSlot::Extension,
            id => UapSlot::Item(id.to_string()),
        }
    }
}

/// Field catalogue and presence-bitmap ordering of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySchema {
    category: u8,
    uap: Vec<UapSlot>,
    items: HashMap<String, FormatNode>,
}

impl CategorySchema {
    /// Builds a schema from a UAP that already contains its extension markers.
    ///
    /// UAP items without a format are allowed; a record that uses one fails
    /// with [CodecError::MalformedBitmap].
    pub fn new(
        category: u8,
        uap: Vec<UapSlot>,
        items: HashMap<String, FormatNode>,
    ) -> Result<Self, SchemaError> {
        for (i, slot) in uap.iter().enumerate() {
            let position = i + 1;
            let on_boundary = position % 8 == 0;

            match slot {
                UapSlot::Extension if on_boundary => {}
                UapSlot::Extension => return Err(SchemaError::MisplacedExtension(position)),
                _ if on_boundary => return Err(SchemaError::MisplacedExtension(position)),
                _ => {}
            }
        }

        Ok(CategorySchema {
            category,
            uap,
            items,
        })
    }

    /// Builds a schema from UAP entries in FRN order, inserting an extension
    /// marker after every seventh entry and padding the last octet with spares.
    /// `-` marks a spare slot.
    pub fn with_frns<'a>(
        category: u8,
        frns: impl IntoIterator<Item = &'a str>,
        items: HashMap<String, FormatNode>,
    ) -> Result<Self, SchemaError> {
        let mut uap = Vec::new();
        for (i, frn) in frns.into_iter().enumerate() {
            if i > 0 && i % 7 == 0 {
                uap.push(UapSlot::Extension);
            }
            uap.push(UapSlot::parse(frn));
        }
        if !uap.is_empty() {
            while uap.len() % 8 != 7 {
                uap.push(UapSlot::Spare);
            }
            uap.push(UapSlot::Extension);
        }

        Self::new(category, uap, items)
    }

    pub fn category(&self) -> u8 {
        self.category
    }

    /// UAP slots in order; slot position `p` (1-based) is `uap()[p - 1]`.
    pub fn uap(&self) -> &[UapSlot] {
        &self.uap
    }

    pub fn item(&self, id: &str) -> Option<&FormatNode> {
        self.items.get(id)
    }
}

/// Source of category schemas, e.g. a reader for the human-authored
/// category documents.
pub trait SchemaLoader {
    type Error: std::fmt::Display;

    fn load(&self, category: u8) -> Result<CategorySchema, Self::Error>;
}

/// Explicit table of loaded schemas, keyed by category.
#[derive(Debug, Clone, Default)]
pub struct SchemaTable {
    schemas: BTreeMap<u8, Arc<CategorySchema>>,
}

impl SchemaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads each of `categories` through `loader`. Categories the loader
    /// cannot produce are left out and later surface as
    /// [CodecError::UnknownCategory].
    pub fn load<L: SchemaLoader>(loader: &L, categories: impl IntoIterator<Item = u8>) -> Self {
        let mut table = Self::new();

        for category in categories {
            match loader.load(category) {
                Ok(schema) => table.insert(schema),
                Err(err) => warn!(category, error = %err, "schema not loaded"),
            }
        }

        table
    }

    /// Adds or replaces the schema for its category.
    pub fn insert(&mut self, schema: CategorySchema) {
        self.schemas.insert(schema.category(), Arc::new(schema));
    }

    pub fn get(&self, category: u8) -> Result<&Arc<CategorySchema>, CodecError> {
        self.schemas
            .get(&category)
            .ok_or(CodecError::UnknownCategory(category))
    }

    pub fn categories(&self) -> impl Iterator<Item = u8> + '_ {
        self.schemas.keys().copied()
    }
}
