/// Profile record validation
///
/// Applied to every raw dataset record before any query logic runs. A record
/// passes when it is an object with a non-null `actor` object carrying non-empty
/// string `username` and `name`, and a numeric `invitesAvailable`.
use serde_json::Value;

/// Validation error detail
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

/// Validation result with detailed errors
pub type ValidationResult = Result<(), Vec<ValidationError>>;

fn error(path: &str, message: &str) -> ValidationError {
    ValidationError {
        path: path.to_string(),
        message: message.to_string(),
    }
}

/// Check one required, non-empty string field on the actor
fn require_string(actor: &Value, field: &str, errors: &mut Vec<ValidationError>) {
    let path = format!("$.actor.{}", field);
    match actor.get(field) {
        None | Some(Value::Null) => {
            errors.push(error(&path, &format!("Required field '{}' is missing", field)))
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.push(error(&path, &format!("Field '{}' must not be empty", field)))
        }
        Some(Value::String(_)) => {}
        Some(_) => errors.push(error(&path, &format!("Field '{}' must be a string", field))),
    }
}

/// Validate a raw profile record
pub fn validate_profile(record: &Value) -> ValidationResult {
    let mut errors = Vec::new();

    if !record.is_object() {
        errors.push(error("$", "Record must be an object"));
        return Err(errors);
    }

    match record.get("actor") {
        Some(actor) if actor.is_object() => {
            require_string(actor, "username", &mut errors);
            require_string(actor, "name", &mut errors);
        }
        Some(Value::Null) | None => errors.push(error("$.actor", "Required field 'actor' is missing")),
        Some(_) => errors.push(error("$.actor", "Field 'actor' must be an object")),
    }

    match record.get("invitesAvailable") {
        Some(Value::Number(_)) => {}
        None | Some(Value::Null) => errors.push(error(
            "$.invitesAvailable",
            "Required field 'invitesAvailable' is missing",
        )),
        Some(_) => errors.push(error(
            "$.invitesAvailable",
            "Field 'invitesAvailable' must be a number",
        )),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
