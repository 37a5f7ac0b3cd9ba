use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::FieldProcessor;

/// Rewrites every string leaf; keys, list lengths and other scalars are kept.
pub(crate) fn process_json(processor: &FieldProcessor<'_>, text: &str) -> Result<String> {
    let document: Value = serde_json::from_str(text).context("Failed to parse JSON")?;
    let processed = walk(document, processor)?;
    serde_json::to_string_pretty(&processed).context("Failed to serialize JSON")
}

fn walk(value: Value, processor: &FieldProcessor<'_>) -> Result<Value> {
    Ok(match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, child)| Ok((key, walk(child, processor)?)))
                .collect::<Result<Map<String, Value>>>()?,
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|child| walk(child, processor))
                .collect::<Result<Vec<Value>>>()?,
        ),
        Value::String(text) => processor.render_value(&text)?,
        scalar => scalar,
    })
}
