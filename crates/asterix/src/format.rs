//! Format handlers: Fixed, Repetitive, Variable and Compound items.
//!
//! The handlers recurse through the [FormatNode] tree. Encoding is symmetric
//! with decoding at every level: a Compound group dispatches to the encode
//! side of each nested kind.

use crate::{
    errors::CodecError,
    fixed::Consumed,
    fspec,
    reader::Reader,
    schema::{Fixed, FormatNode, Subfield},
    value::{Fields, Value},
};

impl FormatNode {
    /// Encodes one data item's value.
    ///
    /// Repetitive items take a [Value::List]; every other kind takes a [Value::Map].
    pub fn encode(&self, value: &Value, out: &mut Vec<u8>) -> Result<(), CodecError> {
        match self {
            FormatNode::Repetitive(element) => {
                let items = value.as_list().ok_or_else(|| {
                    CodecError::InvalidInput("repetitive item expects a sequence".into())
                })?;
                encode_repetitive(element, items, out)
            }
            _ => {
                let fields = value.as_map().ok_or_else(|| {
                    CodecError::InvalidInput("item expects a mapping of sub-fields".into())
                })?;
                encode_node(self, fields, &mut Consumed::new(), out).map(|_| ())
            }
        }
    }

    /// Decodes one data item starting at the reader's position.
    pub fn decode(&self, reader: &mut Reader) -> Result<Value, CodecError> {
        match self {
            FormatNode::Fixed(fixed) => fixed.read(reader).map(Value::Map),
            FormatNode::Repetitive(element) => decode_repetitive(element, reader).map(Value::List),
            FormatNode::Variable(blocks) => decode_variable(blocks, reader).map(Value::Map),
            FormatNode::Compound(subfields) => decode_compound(subfields, reader).map(Value::Map),
        }
    }
}

/// Encodes a mapping-valued node and returns how many non-zero fields it wrote.
fn encode_node<'s>(
    node: &'s FormatNode,
    fields: &Fields,
    consumed: &mut Consumed<'s>,
    out: &mut Vec<u8>,
) -> Result<usize, CodecError> {
    match node {
        FormatNode::Fixed(fixed) => {
            let packed = fixed.encode_consuming(fields, consumed)?;
            out.extend_from_slice(&packed.bytes);
            Ok(packed.written)
        }
        FormatNode::Variable(blocks) => encode_variable(blocks, fields, consumed, out),
        FormatNode::Compound(subfields) => encode_compound(subfields, fields, consumed, out),
        FormatNode::Repetitive(_) => Err(CodecError::InvalidInput(
            "repetitive item expects a sequence".into(),
        )),
    }
}

fn encode_repetitive(
    element: &Fixed,
    items: &[Fields],
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    let count = u8::try_from(items.len()).map_err(|_| {
        CodecError::InvalidInput(format!("{} repetitions exceed the count byte", items.len()))
    })?;

    out.push(count);
    for item in items {
        out.extend_from_slice(&element.encode(item)?.bytes);
    }

    Ok(())
}

fn encode_variable<'s>(
    blocks: &'s [Fixed],
    fields: &Fields,
    consumed: &mut Consumed<'s>,
    out: &mut Vec<u8>,
) -> Result<usize, CodecError> {
    let mut written = 0;

    for (i, block) in blocks.iter().enumerate() {
        let mut packed = block.encode_consuming(fields, consumed)?;
        written += packed.written;

        let more = blocks[i + 1..]
            .iter()
            .flat_map(Fixed::field_names)
            .any(|name| fields.contains_key(name) && !consumed.contains(name));

        if more {
            if let Some(last) = packed.bytes.last_mut() {
                *last |= 0x01;
            }
        }
        out.extend_from_slice(&packed.bytes);

        if !more {
            break;
        }
    }

    Ok(written)
}

fn encode_compound<'s>(
    subfields: &'s [Subfield],
    fields: &Fields,
    consumed: &mut Consumed<'s>,
    out: &mut Vec<u8>,
) -> Result<usize, CodecError> {
    let mut body = Vec::new();
    let mut present = Vec::new();
    let mut written = 0;

    for (i, sub) in subfields.iter().enumerate() {
        if !claims(&sub.format, &sub.name, fields, consumed) {
            continue;
        }

        match &sub.format {
            FormatNode::Repetitive(element) => {
                let items = fields.get(&sub.name).and_then(Value::as_list).ok_or_else(|| {
                    CodecError::InvalidInput(format!("`{}` expects a sequence", sub.name))
                })?;
                consumed.insert(sub.name.as_str());
                encode_repetitive(element, items, &mut body)?;
                written += items.len();
            }
            node => written += encode_node(node, fields, consumed, &mut body)?,
        }

        present.push(fspec::position_of(i + 1));
    }

    out.extend(fspec::encode(present));
    out.extend(body);

    Ok(written)
}

/// True if `fields` still holds an unconsumed key that `node` would encode.
fn claims(node: &FormatNode, name: &str, fields: &Fields, consumed: &Consumed) -> bool {
    let open = |key: &str| fields.contains_key(key) && !consumed.contains(key);

    match node {
        FormatNode::Fixed(fixed) => fixed.field_names().any(open),
        FormatNode::Repetitive(_) => open(name),
        FormatNode::Variable(blocks) => blocks.iter().flat_map(Fixed::field_names).any(open),
        FormatNode::Compound(subfields) => subfields
            .iter()
            .any(|sub| claims(&sub.format, &sub.name, fields, consumed)),
    }
}

fn decode_repetitive(element: &Fixed, reader: &mut Reader) -> Result<Vec<Fields>, CodecError> {
    let count = reader.read_u8()?;

    (0..count).map(|_| element.read(reader)).collect()
}

fn decode_variable(blocks: &[Fixed], reader: &mut Reader) -> Result<Fields, CodecError> {
    let mut merged = Fields::new();

    for block in blocks {
        let bytes = reader.read_bytes(block.length())?;
        merged.extend(block.decode(bytes)?);

        if bytes[bytes.len() - 1] & 0x01 == 0 {
            return Ok(merged);
        }
    }

    Err(CodecError::MalformedBitmap(format!(
        "variable item extends past its {} defined blocks",
        blocks.len()
    )))
}

fn decode_compound(subfields: &[Subfield], reader: &mut Reader) -> Result<Fields, CodecError> {
    let present = fspec::decode(reader)?;

    if let Some(&position) = present
        .iter()
        .find(|&&p| fspec::index_of(p) > subfields.len())
    {
        return Err(CodecError::MalformedBitmap(format!(
            "indicator bit {position} has no subfield"
        )));
    }

    let mut merged = Fields::new();

    for (i, sub) in subfields.iter().enumerate() {
        if !present.contains(&fspec::position_of(i + 1)) {
            continue;
        }

        match &sub.format {
            FormatNode::Fixed(fixed) => merged.extend(fixed.read(reader)?),
            FormatNode::Repetitive(element) => {
                let items = decode_repetitive(element, reader)?;
                merged.insert(sub.name.clone(), Value::List(items));
            }
            FormatNode::Variable(blocks) => merged.extend(decode_variable(blocks, reader)?),
            FormatNode::Compound(nested) => merged.extend(decode_compound(nested, reader)?),
        }
    }

    Ok(merged)
}
