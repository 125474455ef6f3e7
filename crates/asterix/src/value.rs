//! Values produced by decoding and accepted by encoding.

use std::collections::BTreeMap;

/// Sub-field values of one Fixed, Variable or Compound item, keyed by short name.
pub type Fields = BTreeMap<String, Value>;

/// One decoded record: data-item identifier to its value.
pub type Record = BTreeMap<String, Value>;

/// A decoded or encodable value.
///
/// Leaves are numeric. A Fixed, Variable or Compound item decodes to [Value::Map],
/// a Repetitive item to [Value::List].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Bool(bool),
    U64(u64),
    I64(i64),
    /// A scaled value.
    F64(f64),
    Map(Fields),
    List(Vec<Fields>),
}

impl Value {
    /// True for a zero leaf, an empty mapping or an empty sequence.
    ///
    /// Empty values are dropped by the encoder and never reach the wire.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Bool(b) => !b,
            Value::U64(v) => *v == 0,
            Value::I64(v) => *v == 0,
            Value::F64(v) => *v == 0.0,
            Value::Map(m) => m.is_empty(),
            Value::List(l) => l.is_empty(),
        }
    }

    /// Converts a leaf to the raw two's-complement integer sent on the wire.
    ///
    /// With a scale the value is divided by it and rounded to nearest.
    /// Returns `None` for mappings and sequences.
    pub fn to_raw(&self, scale: Option<f64>) -> Option<u64> {
        if let Some(scale) = scale {
            let real = match self {
                Value::Bool(b) => *b as u8 as f64,
                Value::U64(v) => *v as f64,
                Value::I64(v) => *v as f64,
                Value::F64(v) => *v,
                Value::Map(_) | Value::List(_) => return None,
            };
            return Some((real / scale).round() as i64 as u64);
        }

        match self {
            Value::Bool(b) => Some(*b as u64),
            Value::U64(v) => Some(*v),
            Value::I64(v) => Some(*v as u64),
            Value::F64(v) => Some(v.round() as i64 as u64),
            Value::Map(_) | Value::List(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Fields]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::U64(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<Fields> for Value {
    fn from(value: Fields) -> Self {
        Value::Map(value)
    }
}

impl From<Vec<Fields>> for Value {
    fn from(value: Vec<Fields>) -> Self {
        Value::List(value)
    }
}
