pub mod fields;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::store::TaskUpdate;

/// Fields the update endpoint recognizes once `id` is stripped.
const UPDATABLE_FIELDS: [&str; 7] = [
    "title",
    "description",
    "estimated_minute",
    "task_date",
    "task_order",
    "start_time",
    "end_time",
];

/// A validated create payload. `user_id` is the optional row-owner override;
/// the authorization subject is always the resolved key owner regardless.
#[derive(Debug)]
pub struct CreateTaskPayload {
    pub title: String,
    pub description: Option<String>,
    pub estimated_minute: Option<i64>,
    pub task_date: NaiveDate,
    pub task_order: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum SearchDateError {
    Missing,
    Invalid,
}

/// Validates a create payload, accumulating one message per violated field.
pub fn validate_create(raw: &Value) -> Result<CreateTaskPayload, Vec<String>> {
    let mut errors = Vec::new();

    let title = match raw.get("title") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => {
            errors.push("title is required and must be a non-empty string.".to_string());
            String::new()
        }
    };

    let description = match raw.get("description") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push("description must be a string or null.".to_string());
            None
        }
    };

    let estimated_minute = match raw.get("estimated_minute") {
        None | Some(Value::Null) => None,
        Some(v) => match fields::as_non_negative_int(v) {
            Some(n) => Some(n),
            None => {
                errors.push("estimated_minute must be a non-negative number or null.".to_string());
                None
            }
        },
    };

    // Unset dates land on today.
    let task_date = match raw.get("task_date") {
        None | Some(Value::Null) => Utc::now().date_naive(),
        Some(Value::String(s)) => match fields::calendar_date(s) {
            Some(d) => d,
            None => {
                errors.push("task_date must be a valid date in YYYY-MM-DD format.".to_string());
                Utc::now().date_naive()
            }
        },
        Some(_) => {
            errors.push("task_date must be a valid date in YYYY-MM-DD format.".to_string());
            Utc::now().date_naive()
        }
    };

    let task_order = match raw.get("task_order") {
        None | Some(Value::Null) => None,
        Some(v) => match v.as_i64() {
            Some(n) => Some(n),
            None => {
                errors.push("task_order must be a number or null.".to_string());
                None
            }
        },
    };

    let start_time = datetime_field(raw, "start_time", &mut errors);
    let end_time = datetime_field(raw, "end_time", &mut errors);

    if let (Some(start), Some(end)) = (start_time, end_time) {
        if end <= start {
            errors.push("end_time must be after start_time.".to_string());
        }
    }

    let user_id = match raw.get("user_id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push("user_id must be a string.".to_string());
            None
        }
    };

    if errors.is_empty() {
        Ok(CreateTaskPayload {
            title,
            description,
            estimated_minute,
            task_date,
            task_order,
            start_time,
            end_time,
            user_id,
        })
    } else {
        Err(errors)
    }
}

/// Validates an update payload into a normalized column/value map. Explicit
/// nulls survive so callers can clear a column; a payload with no recognized
/// updatable field at all is itself a violation.
pub fn validate_update(raw: &Value) -> Result<TaskUpdate, Vec<String>> {
    let mut errors = Vec::new();
    let mut changes = Map::new();
    let mut recognized = 0;

    let id = match raw.get("id").and_then(Value::as_i64) {
        Some(id) => id,
        None => {
            errors.push("id is required and must be a number.".to_string());
            0
        }
    };

    if let Some(obj) = raw.as_object() {
        for field in UPDATABLE_FIELDS {
            let Some(value) = obj.get(field) else {
                continue;
            };
            recognized += 1;

            match field {
                // Empty or whitespace-only titles collapse to the empty
                // string on update rather than erroring.
                "title" => match value {
                    Value::Null => {
                        changes.insert(field.to_string(), Value::Null);
                    }
                    Value::String(s) => {
                        let normalized = if s.trim().is_empty() { "" } else { s.as_str() };
                        changes.insert(field.to_string(), Value::String(normalized.to_string()));
                    }
                    _ => errors.push("title must be a string or null.".to_string()),
                },
                "description" => match value {
                    Value::Null | Value::String(_) => {
                        changes.insert(field.to_string(), value.clone());
                    }
                    _ => errors.push("description must be a string or null.".to_string()),
                },
                "estimated_minute" => match value {
                    Value::Null => {
                        changes.insert(field.to_string(), Value::Null);
                    }
                    v => match fields::as_non_negative_int(v) {
                        Some(n) => {
                            changes.insert(field.to_string(), Value::from(n));
                        }
                        None => errors.push(
                            "estimated_minute must be a non-negative number or null.".to_string(),
                        ),
                    },
                },
                "task_date" => match value {
                    Value::Null => {
                        changes.insert(field.to_string(), Value::Null);
                    }
                    Value::String(s) if fields::calendar_date(s).is_some() => {
                        changes.insert(field.to_string(), value.clone());
                    }
                    _ => errors
                        .push("task_date must be a valid date in YYYY-MM-DD format.".to_string()),
                },
                "task_order" => match value {
                    Value::Null => {
                        changes.insert(field.to_string(), Value::Null);
                    }
                    v => match v.as_i64() {
                        Some(n) => {
                            changes.insert(field.to_string(), Value::from(n));
                        }
                        None => errors.push("task_order must be a number or null.".to_string()),
                    },
                },
                "start_time" | "end_time" => match value {
                    Value::Null => {
                        changes.insert(field.to_string(), Value::Null);
                    }
                    Value::String(s) => match fields::iso_datetime(s) {
                        Some(dt) => {
                            changes.insert(field.to_string(), Value::String(dt.to_rfc3339()));
                        }
                        None => errors.push(format!(
                            "{} must be a valid ISO 8601 datetime string.",
                            field
                        )),
                    },
                    _ => errors.push(format!(
                        "{} must be a valid ISO 8601 datetime string.",
                        field
                    )),
                },
                _ => unreachable!(),
            }
        }
    }

    if recognized == 0 {
        errors.push("No updatable fields provided.".to_string());
    }

    // Ordering is only enforced when the payload sets both endpoints.
    let start = changes
        .get("start_time")
        .and_then(Value::as_str)
        .and_then(fields::iso_datetime);
    let end = changes
        .get("end_time")
        .and_then(Value::as_str)
        .and_then(fields::iso_datetime);
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            errors.push("end_time must be after start_time.".to_string());
        }
    }

    if errors.is_empty() {
        Ok(TaskUpdate { id, changes })
    } else {
        Err(errors)
    }
}

/// Validates the search endpoint's single `date` field.
pub fn validate_search_date(raw: &Value) -> Result<NaiveDate, SearchDateError> {
    let date = match raw.get("date") {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        _ => return Err(SearchDateError::Missing),
    };

    fields::calendar_date(date).ok_or(SearchDateError::Invalid)
}

fn datetime_field(raw: &Value, name: &str, errors: &mut Vec<String>) -> Option<DateTime<Utc>> {
    match raw.get(name) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match fields::iso_datetime(s) {
            Some(dt) => Some(dt),
            None => {
                errors.push(format!("{} must be a valid ISO 8601 datetime string.", name));
                None
            }
        },
        Some(_) => {
            errors.push(format!("{} must be a valid ISO 8601 datetime string.", name));
            None
        }
    }
}
