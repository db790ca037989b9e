//! Command batch extraction from model replies.
//!
//! A reply may carry reasoning lines, a plan block and a `FINAL_JSON:` line.
//! Only the span from the first `{` to the last `}` is parsed; everything
//! outside it is ignored. The parsed object is then checked against a closed
//! schema:
//!
//! ```json
//! {
//!   "commands": [
//!     {"agent_id": "<string>", "type": "move", "to": [<int>, <int>]},
//!     {"agent_id": "<string>", "type": "act", "action_name": "<string>"}
//!   ]
//! }
//! ```
//!
//! Unknown keys are rejected at both levels. `move` needs `to` and must not
//! carry `action_name`; `act` needs `action_name` and must not carry `to`.

use crate::command::entities::{Command, CommandBatch, Directive};
use crate::core::error::ValidationError;
use crate::core::position::GridPos;
use serde_json::{Map, Value};

const TOP_LEVEL_KEYS: [&str; 1] = ["commands"];
const COMMAND_KEYS: [&str; 4] = ["agent_id", "type", "to", "action_name"];

/// Extract the command batch embedded in `text` and validate it.
pub fn extract_and_validate(text: &str) -> Result<CommandBatch, ValidationError> {
    let candidate = extract_candidate(text)?;
    validate_batch(&candidate)
}

/// Parse the span between the first `{` and the last `}` as JSON.
pub fn extract_candidate(text: &str) -> Result<Value, ValidationError> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(ValidationError::MalformedResponse(
            "no JSON object found in response".to_string(),
        ));
    };
    if end < start {
        return Err(ValidationError::MalformedResponse(
            "no JSON object found in response".to_string(),
        ));
    }

    serde_json::from_str(&text[start..=end])
        .map_err(|e| ValidationError::MalformedResponse(format!("malformed json: {}", e)))
}

/// Check a parsed value against the command batch schema.
pub fn validate_batch(value: &Value) -> Result<CommandBatch, ValidationError> {
    let root = value
        .as_object()
        .ok_or_else(|| violation("top level must be an object"))?;
    reject_unknown_keys(root, &TOP_LEVEL_KEYS, "top level")?;

    let commands = root
        .get("commands")
        .ok_or_else(|| violation("'commands' is required"))?
        .as_array()
        .ok_or_else(|| violation("'commands' must be an array"))?;

    commands
        .iter()
        .enumerate()
        .map(|(index, item)| validate_command(index, item))
        .collect::<Result<Vec<_>, _>>()
        .map(CommandBatch::new)
}

fn violation(message: impl Into<String>) -> ValidationError {
    ValidationError::SchemaViolation(message.into())
}

fn reject_unknown_keys(
    object: &Map<String, Value>,
    allowed: &[&str],
    location: &str,
) -> Result<(), ValidationError> {
    match object.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(violation(format!(
            "{}: additional property '{}' is not allowed",
            location, key
        ))),
        None => Ok(()),
    }
}

fn validate_command(index: usize, item: &Value) -> Result<Command, ValidationError> {
    let location = format!("commands[{}]", index);
    let object = item
        .as_object()
        .ok_or_else(|| violation(format!("{}: must be an object", location)))?;
    reject_unknown_keys(object, &COMMAND_KEYS, &location)?;

    let agent_id = match object.get("agent_id") {
        Some(Value::String(id)) => id.clone(),
        Some(_) => return Err(violation(format!("{}.agent_id: must be a string", location))),
        None => return Err(violation(format!("{}: 'agent_id' is required", location))),
    };

    let kind = match object.get("type") {
        Some(Value::String(kind)) => kind.as_str(),
        Some(_) => return Err(violation(format!("{}.type: must be a string", location))),
        None => return Err(violation(format!("{}: 'type' is required", location))),
    };

    let directive = match kind {
        "move" => {
            if object.contains_key("action_name") {
                return Err(violation(format!(
                    "{}: 'action_name' is not allowed when type is 'move'",
                    location
                )));
            }
            let to = object.get("to").ok_or_else(|| {
                violation(format!("{}: 'to' is required when type is 'move'", location))
            })?;
            Directive::Move {
                to: parse_destination(to, &location)?,
            }
        }
        "act" => {
            if object.contains_key("to") {
                return Err(violation(format!(
                    "{}: 'to' is not allowed when type is 'act'",
                    location
                )));
            }
            let action_name = match object.get("action_name") {
                Some(Value::String(name)) if !name.is_empty() => name.clone(),
                Some(Value::String(_)) => {
                    return Err(violation(format!(
                        "{}.action_name: must not be empty",
                        location
                    )));
                }
                Some(_) => {
                    return Err(violation(format!(
                        "{}.action_name: must be a string",
                        location
                    )));
                }
                None => {
                    return Err(violation(format!(
                        "{}: 'action_name' is required when type is 'act'",
                        location
                    )));
                }
            };
            Directive::Act { action_name }
        }
        other => {
            return Err(violation(format!(
                "{}.type: '{}' is not one of 'move', 'act'",
                location, other
            )));
        }
    };

    Ok(Command {
        agent_id,
        directive,
    })
}

fn parse_destination(value: &Value, location: &str) -> Result<GridPos, ValidationError> {
    let invalid = || violation(format!("{}.to: must be exactly two integers", location));
    let pair = value.as_array().ok_or_else(invalid)?;
    if pair.len() != 2 {
        return Err(invalid());
    }
    let x = pair[0].as_i64().ok_or_else(invalid)?;
    let y = pair[1].as_i64().ok_or_else(invalid)?;
    Ok(GridPos::new(x, y))
}
