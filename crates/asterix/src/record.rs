//! Record codec: FSPEC plus the present data items in UAP order.

use tracing::trace;

use crate::{
    errors::CodecError,
    fspec,
    reader::Reader,
    schema::{CategorySchema, UapSlot},
    value::Record,
};

/// Encodes one record against `schema`.
///
/// An item is sent when its identifier is in the UAP and its value is not
/// empty; everything else in `record` is dropped. `record` is left untouched.
pub fn encode_record(
    schema: &CategorySchema,
    record: &Record,
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    let mut present = Vec::new();
    let mut items = Vec::new();

    for (i, slot) in schema.uap().iter().enumerate() {
        let UapSlot::Item(id) = slot else {
            continue;
        };

        match record.get(id) {
            Some(value) if !value.is_empty() => {
                present.push(i + 1);
                items.push((id.as_str(), value));
            }
            _ => {}
        }
    }

    trace!(
        category = schema.category(),
        items = ?items.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
        "encoding record"
    );

    out.extend(fspec::encode(present));

    for (id, value) in items {
        let node = schema
            .item(id)
            .ok_or_else(|| CodecError::MalformedBitmap(format!("item `{id}` has no format")))?;
        node.encode(value, out)?;
    }

    Ok(())
}

/// Decodes one record starting at the reader's position.
///
/// Set bits on spare slots are ignored; a set bit past the UAP is
/// [CodecError::MalformedBitmap].
pub fn decode_record(schema: &CategorySchema, reader: &mut Reader) -> Result<Record, CodecError> {
    let mut record = Record::new();

    for position in fspec::decode(reader)? {
        let slot = schema.uap().get(position - 1).ok_or_else(|| {
            CodecError::MalformedBitmap(format!(
                "FSPEC bit {position} is beyond the UAP of category {}",
                schema.category()
            ))
        })?;

        let UapSlot::Item(id) = slot else {
            continue;
        };

        let node = schema
            .item(id)
            .ok_or_else(|| CodecError::MalformedBitmap(format!("item `{id}` has no format")))?;

        let value = node.decode(reader)?;
        record.insert(id.clone(), value);
    }

    trace!(
        category = schema.category(),
        items = ?record.keys().collect::<Vec<_>>(),
        "decoded record"
    );

    Ok(record)
}
