//! Movie payload schema: per-field predicates and the full/partial validators.
//!
//! Validation is fail-closed. A field either has exactly the JSON type the
//! schema asks for and lies within range, or it is reported as a violation.
//! Nothing is coerced: `"1999"` is not a year and `1999.0` is not an integer.
//! Every failing field is reported, not only the first one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::types::{MovieDraft, MoviePatch};

/// Earliest accepted release year.
pub const MIN_YEAR: u16 = 1900;
/// Latest accepted release year.
pub const MAX_YEAR: u16 = 2100;
/// Longest accepted running time, in minutes.
pub const MAX_DURATION: u32 = 1000;
/// Lower bound of the rating scale.
pub const MIN_RATE: f64 = 0.0;
/// Upper bound of the rating scale.
pub const MAX_RATE: f64 = 10.0;

/// Genre labels the catalogue is built around. Not enforced: other labels
/// are accepted and only logged.
pub const KNOWN_GENRES: [&str; 9] = [
    "Action",
    "Adventure",
    "Crime",
    "Comedy",
    "Drama",
    "Fantasy",
    "Horror",
    "Thriller",
    "Sci-Fi",
];

/// Fields a movie payload may carry, in reporting order.
pub const MOVIE_FIELDS: [&str; 7] = [
    "title", "year", "director", "duration", "poster", "genre", "rate",
];

/// Field name used when the payload itself is not a JSON object.
pub const BODY_FIELD: &str = "body";

/// One rule failure: which field and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A payload failed validation. Carries every violation found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid movie payload ({} violation(s))", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Returns `true` if any violation refers to `field`.
    #[must_use]
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

/// Accumulates violations while the payload is walked field by field.
#[derive(Debug, Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn check<T>(
        &mut self,
        field: &str,
        value: &Value,
        rule: fn(&Value) -> Result<T, String>,
    ) -> Option<T> {
        match rule(value) {
            Ok(v) => Some(v),
            Err(message) => {
                self.0.push(FieldViolation::new(field, message));
                None
            }
        }
    }

    fn required<T>(
        &mut self,
        object: &Map<String, Value>,
        field: &str,
        rule: fn(&Value) -> Result<T, String>,
    ) -> Option<T> {
        if let Some(value) = object.get(field) {
            self.check(field, value, rule)
        } else {
            self.0.push(FieldViolation::new(field, "required"));
            None
        }
    }

    fn optional<T>(
        &mut self,
        object: &Map<String, Value>,
        field: &str,
        rule: fn(&Value) -> Result<T, String>,
    ) -> Option<T> {
        object
            .get(field)
            .and_then(|value| self.check(field, value, rule))
    }

    fn reject_unknown(&mut self, object: &Map<String, Value>) {
        for key in object.keys() {
            if !MOVIE_FIELDS.contains(&key.as_str()) {
                self.0.push(FieldViolation::new(key.as_str(), "unknown field"));
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_error(self) -> ValidationError {
        ValidationError { violations: self.0 }
    }
}

/// Validates a complete movie payload.
///
/// Every field in [`MOVIE_FIELDS`] must be present and valid. Other keys,
/// `id` included, are dropped from the normalized draft.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every violation found.
pub fn validate_full(payload: &Value) -> Result<MovieDraft, ValidationError> {
    let object = as_object(payload)?;
    let mut violations = Violations::default();

    let title = violations.required(object, "title", check_text);
    let year = violations.required(object, "year", check_year);
    let director = violations.required(object, "director", check_text);
    let duration = violations.required(object, "duration", check_duration);
    let poster = violations.required(object, "poster", check_poster);
    let genre = violations.required(object, "genre", check_genre);
    let rate = violations.required(object, "rate", check_rate);
    for key in object.keys().filter(|key| !MOVIE_FIELDS.contains(&key.as_str())) {
        debug!(field = %key, "dropping unknown field from full payload");
    }

    match (title, year, director, duration, poster, genre, rate) {
        (
            Some(title),
            Some(year),
            Some(director),
            Some(duration),
            Some(poster),
            Some(genre),
            Some(rate),
        ) if violations.is_empty() => Ok(MovieDraft {
            title,
            year,
            director,
            duration,
            poster,
            genre,
            rate,
        }),
        _ => Err(violations.into_error()),
    }
}

/// Validates a partial movie payload.
///
/// Any subset of [`MOVIE_FIELDS`] may be present, including none. Each
/// present field must satisfy the same rule as in [`validate_full`]. Unlike
/// the full validator, any other key (including `id`) is a violation.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every violation found.
pub fn validate_partial(payload: &Value) -> Result<MoviePatch, ValidationError> {
    let object = as_object(payload)?;
    let mut violations = Violations::default();

    let patch = MoviePatch {
        title: violations.optional(object, "title", check_text),
        year: violations.optional(object, "year", check_year),
        director: violations.optional(object, "director", check_text),
        duration: violations.optional(object, "duration", check_duration),
        poster: violations.optional(object, "poster", check_poster),
        genre: violations.optional(object, "genre", check_genre),
        rate: violations.optional(object, "rate", check_rate),
    };
    violations.reject_unknown(object);

    if violations.is_empty() {
        Ok(patch)
    } else {
        Err(violations.into_error())
    }
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
    payload.as_object().ok_or_else(|| ValidationError {
        violations: vec![FieldViolation::new(
            BODY_FIELD,
            format!("expected an object, received {}", kind_of(payload)),
        )],
    })
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

fn check_text(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) if s.trim().is_empty() => Err("must not be blank".to_string()),
        Value::String(s) => Ok(s.clone()),
        other => Err(format!("expected a string, received {}", kind_of(other))),
    }
}

fn check_integer(value: &Value, min: i64, max: i64) -> Result<i64, String> {
    let Value::Number(number) = value else {
        return Err(format!("expected an integer, received {}", kind_of(value)));
    };
    if let Some(n) = number.as_i64() {
        if (min..=max).contains(&n) {
            Ok(n)
        } else {
            Err(format!("must be between {min} and {max}"))
        }
    } else if number.is_u64() {
        Err(format!("must be between {min} and {max}"))
    } else {
        Err("expected an integer, received a fractional number".to_string())
    }
}

fn check_year(value: &Value) -> Result<u16, String> {
    let year = check_integer(value, i64::from(MIN_YEAR), i64::from(MAX_YEAR))?;
    u16::try_from(year).map_err(|_| format!("must be between {MIN_YEAR} and {MAX_YEAR}"))
}

fn check_duration(value: &Value) -> Result<u32, String> {
    let minutes = check_integer(value, 1, i64::from(MAX_DURATION))?;
    u32::try_from(minutes).map_err(|_| format!("must be between 1 and {MAX_DURATION}"))
}

fn check_rate(value: &Value) -> Result<f64, String> {
    let Value::Number(number) = value else {
        return Err(format!("expected a number, received {}", kind_of(value)));
    };
    match number.as_f64() {
        // `+ 0.0` folds a negative zero into zero.
        Some(rate) if rate.is_finite() && (MIN_RATE..=MAX_RATE).contains(&rate) => {
            Ok(rate + 0.0)
        }
        _ => Err(format!("must be between {MIN_RATE} and {MAX_RATE}")),
    }
}

fn check_poster(value: &Value) -> Result<String, String> {
    let raw = check_text(value)?;
    let url = Url::parse(&raw).map_err(|e| format!("must be a valid URL: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err("must be an http or https URL".to_string());
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err("must be a URL with a host".to_string());
    }
    Ok(raw)
}

fn check_genre(value: &Value) -> Result<Vec<String>, String> {
    let Value::Array(entries) = value else {
        return Err(format!("expected an array, received {}", kind_of(value)));
    };
    if entries.is_empty() {
        return Err("must contain at least one genre".to_string());
    }

    let mut genres: Vec<String> = Vec::with_capacity(entries.len());
    let mut seen = HashSet::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let genre = check_text(entry).map_err(|reason| format!("entry {index}: {reason}"))?;
        if !seen.insert(genre.to_lowercase()) {
            return Err(format!("entry {index}: duplicate genre"));
        }
        if !KNOWN_GENRES.iter().any(|known| known.eq_ignore_ascii_case(&genre)) {
            debug!(genre = %genre, "accepting genre outside the known vocabulary");
        }
        genres.push(genre);
    }
    Ok(genres)
}
