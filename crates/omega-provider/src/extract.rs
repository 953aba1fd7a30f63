//! Pulls the structured payload out of a Responses-style answer.

use serde_json::Value;

use crate::error::{ProviderError, Result};

/// Content part types that may carry the deck.
const CONTENT_TYPES: [&str; 5] = ["json", "json_schema", "output_text", "text", "json_object"];

/// Part types whose payload is already structured.
const JSON_TYPES: [&str; 3] = ["json", "json_schema", "json_object"];

/// Fields holding a structured payload, in precedence order.
const JSON_FIELDS: [&str; 4] = ["json", "data", "json_schema", "parsed"];

/// Fields holding a text payload, in precedence order.
const TEXT_FIELDS: [&str; 3] = ["text", "output_text", "value"];

fn part_type(part: &Value) -> Option<&str> {
    part.get("type").and_then(Value::as_str)
}

fn first_present<'a>(part: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| part.get(*field))
        .find(|value| !value.is_null())
}

/// Extract the deck JSON object from a provider answer.
///
/// Only the first output item carrying a `content` array is inspected.
pub fn extract_payload(data: &Value, model: &str) -> Result<Value> {
    let part = data
        .get("output")
        .and_then(Value::as_array)
        .and_then(|items| items.iter().find_map(|item| item.get("content")?.as_array()))
        .and_then(|parts| {
            parts
                .iter()
                .find(|part| part_type(part).is_some_and(|t| CONTENT_TYPES.contains(&t)))
        })
        .ok_or_else(|| ProviderError::EmptyResponse {
            model: model.to_string(),
        })?;

    let parsed = if part_type(part).is_some_and(|t| JSON_TYPES.contains(&t)) {
        first_present(part, &JSON_FIELDS).cloned().unwrap_or(Value::Null)
    } else {
        let text = first_present(part, &TEXT_FIELDS)
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::MissingText {
                model: model.to_string(),
            })?;
        serde_json::from_str(text).map_err(|e| ProviderError::InvalidJson {
            model: model.to_string(),
            reason: e.to_string(),
        })?
    };

    if !parsed.is_object() {
        return Err(ProviderError::InvalidJson {
            model: model.to_string(),
            reason: "payload is not a JSON object".to_string(),
        });
    }

    Ok(parsed)
}
