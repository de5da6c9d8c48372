//! Validation of inbound recommendation requests.
//!
//! The body is checked field by field against the request contract and every
//! failure is collected, so a 400 response can point at each offending field
//! at once. On success the defaulted, normalized request is returned.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::model::{Constraints, RecommendationRequest};

/// Flattened error detail: form-level messages plus a map from dotted field
/// path to the messages for that field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors {
    #[serde(rename = "formErrors")]
    pub form_errors: Vec<String>,
    #[serde(rename = "fieldErrors")]
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn form(message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.form_errors.push(message.into());
        errors
    }

    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.field_errors
            .entry(path.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected(what: &str, value: &Value) -> String {
    format!("Expected {}, received {}", what, kind_of(value))
}

pub fn validate_request(value: &Value) -> Result<RecommendationRequest, ValidationErrors> {
    let obj = match value {
        Value::Object(obj) => obj,
        other => return Err(ValidationErrors::form(expected("object", other))),
    };

    let mut errors = ValidationErrors::default();

    let mood = match obj.get("mood") {
        None => {
            errors.add("mood", "Required");
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.add("mood", "String must contain at least 1 character(s)");
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.add("mood", expected("string", other));
            None
        }
    };

    let constraints = match obj.get("constraints") {
        None => Some(Constraints::default()),
        Some(Value::Object(c)) => validate_constraints(c, &mut errors),
        Some(other) => {
            errors.add("constraints", expected("object", other));
            None
        }
    };

    match (mood, constraints) {
        (Some(mood), Some(constraints)) if errors.is_empty() => {
            Ok(RecommendationRequest { mood, constraints })
        }
        _ => Err(errors),
    }
}

fn validate_constraints(
    obj: &Map<String, Value>,
    errors: &mut ValidationErrors,
) -> Option<Constraints> {
    let before = errors.field_errors.len();

    let max_runtime = obj
        .get("max_runtime")
        .and_then(|v| integer_field("constraints.max_runtime", v, true, errors));

    let min_year = obj
        .get("min_year")
        .and_then(|v| integer_field("constraints.min_year", v, false, errors));

    let genres = match obj.get("genres") {
        None => Vec::new(),
        Some(Value::Array(items)) => {
            let mut genres = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) => genres.push(s.clone()),
                    other => errors.add(
                        format!("constraints.genres.{}", i),
                        expected("string", other),
                    ),
                }
            }
            genres
        }
        Some(other) => {
            errors.add("constraints.genres", expected("array", other));
            Vec::new()
        }
    };

    if errors.field_errors.len() != before {
        return None;
    }

    Some(Constraints {
        max_runtime,
        min_year,
        genres,
    })
}

/// Reads an integer-valued JSON number of any magnitude.
///
/// Integral floats are normalized to integer form where they fit (`110.0`
/// becomes `110`); larger ones such as `1e300` are kept as floats.
fn integer_field(
    path: &str,
    value: &Value,
    positive: bool,
    errors: &mut ValidationErrors,
) -> Option<Number> {
    let n = match value {
        Value::Number(n) => n,
        other => {
            errors.add(path, expected("number", other));
            return None;
        }
    };

    let int = integral(n);
    if int.is_none() {
        errors.add(path, "Expected integer, received float");
    }
    if positive && n.as_f64().map_or(true, |f| f <= 0.0) {
        errors.add(path, "Number must be greater than 0");
        return None;
    }

    int
}

fn integral(n: &Number) -> Option<Number> {
    if n.is_i64() || n.is_u64() {
        return Some(n.clone());
    }

    let f = n.as_f64()?;
    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }

    if f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Number::from(f as i64))
    } else if f >= 0.0 && f < u64::MAX as f64 {
        Some(Number::from(f as u64))
    } else {
        Number::from_f64(f)
    }
}
