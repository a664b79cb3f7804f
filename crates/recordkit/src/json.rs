//! JSON-encoded columns.
//!
//! Some columns store structured data as JSON text. Before such a record is turned into an
//! INSERT or UPDATE, the listed fields are replaced with their JSON text so that the
//! parameter list captures the encoded form.

use crate::error::DbResult;
use crate::record::Record;
use crate::value::Value;
use serde::de::DeserializeOwned;

/// JSON encode/decode capability.
pub trait JsonCodec: Send + Sync {
    /// Serialize a value to JSON text.
    fn to_json_text(&self, value: &Value) -> DbResult<String>;

    /// Parse JSON text into a generic JSON tree.
    fn from_json_text(&self, text: &str) -> DbResult<serde_json::Value>;
}

/// [`JsonCodec`] backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonCodec;

impl JsonCodec for SerdeJsonCodec {
    fn to_json_text(&self, value: &Value) -> DbResult<String> {
        Ok(serde_json::to_string(value)?)
    }

    fn from_json_text(&self, text: &str) -> DbResult<serde_json::Value> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Decode JSON text into a typed value.
pub fn decode_json<T: DeserializeOwned>(text: &str) -> DbResult<T> {
    Ok(serde_json::from_str(text)?)
}

/// Which write path the JSON fields are being prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonMode {
    /// Present, non-null fields are encoded; nulls stay null.
    Insert,
    /// Present fields are encoded, nulls included (they become the text `null`).
    Update,
}

/// Replace each listed field present in `record` with its JSON text.
///
/// Encoded fields go through [`Record::set`] and are therefore marked modified.
pub fn encode_json_fields<C>(
    codec: &C,
    record: &mut Record,
    fields: &[&str],
    mode: JsonMode,
) -> DbResult<()>
where
    C: JsonCodec + ?Sized,
{
    for field in fields {
        let text = match record.get(field)? {
            None => continue,
            Some(Value::Null) if mode == JsonMode::Insert => continue,
            Some(value) => codec.to_json_text(value)?,
        };
        record.set(field, text)?;
    }
    Ok(())
}
