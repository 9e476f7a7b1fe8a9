//! Movies Core: movie records, schema validation, and the patch merge rule.

pub mod schema;
pub mod types;

pub use schema::{validate_full, validate_partial, FieldViolation, ValidationError};
pub use types::{Movie, MovieDraft, MoviePatch};
