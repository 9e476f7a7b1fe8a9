//! Seed dataset loading.
//!
//! A seed is a JSON array of complete movie objects, each carrying its own
//! `id`. Every entry goes through full schema validation before it reaches
//! the store, so a bad seed fails startup instead of serving broken records.

use serde_json::Value;
use thiserror::Error;

use movies_core::{validate_full, Movie, ValidationError};

use super::engine::StoreError;
use super::engines::InMemoryMovieStore;

/// Dataset compiled into the binary, used when no seed file is configured.
pub const BUNDLED_SEED: &str = include_str!("../../data/movies.json");

/// Reasons a seed dataset cannot be loaded.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("seed must be a JSON array of movies")]
    NotAnArray,

    #[error("seed entry {index} has no string id")]
    MissingId { index: usize },

    #[error("seed entry {id} is invalid: {source}")]
    Invalid {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parses and validates a seed dataset into records, keeping file order.
///
/// # Errors
///
/// Returns a [`SeedError`] for malformed JSON, entries without an id, or
/// entries failing full validation.
pub fn parse_seed(json: &str) -> Result<Vec<Movie>, SeedError> {
    let Value::Array(entries) = serde_json::from_str::<Value>(json)? else {
        return Err(SeedError::NotAnArray);
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, mut entry)| {
            let id = match entry.as_object_mut().and_then(|o| o.remove("id")) {
                Some(Value::String(id)) if !id.trim().is_empty() => id,
                _ => return Err(SeedError::MissingId { index }),
            };
            match validate_full(&entry) {
                Ok(draft) => Ok(draft.into_movie(id)),
                Err(source) => Err(SeedError::Invalid { id, source }),
            }
        })
        .collect()
}

/// Builds a store from a seed dataset.
///
/// # Errors
///
/// Returns a [`SeedError`] if the seed is invalid or repeats an id.
pub fn load_store(json: &str) -> Result<InMemoryMovieStore, SeedError> {
    let movies = parse_seed(json)?;
    Ok(InMemoryMovieStore::with_movies(movies)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MovieStore;

    #[test]
    fn bundled_seed_loads() {
        let store = load_store(BUNDLED_SEED).unwrap();
        assert_eq!(store.len(), 14);
        let matrix = store.filter_by_genre("sci-fi");
        assert!(matrix.iter().any(|m| m.title == "The Matrix"));
    }

    #[test]
    fn seed_keeps_file_order_and_ids() {
        let json = r#"[
            {"id":"1","title":"The Matrix","year":1999,"director":"Lana Wachowski","duration":136,
             "poster":"https://img.example.com/m.jpg","genre":["Action","Sci-Fi"],"rate":8.7},
            {"id":"2","title":"Heat","year":1995,"director":"Michael Mann","duration":170,
             "poster":"https://img.example.com/h.jpg","genre":["Crime"],"rate":8.3}
        ]"#;
        let movies = parse_seed(json).unwrap();
        let ids: Vec<_> = movies.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn seed_must_be_array() {
        assert!(matches!(parse_seed("{}"), Err(SeedError::NotAnArray)));
        assert!(matches!(parse_seed("not json"), Err(SeedError::Parse(_))));
    }

    #[test]
    fn seed_entry_without_id_fails() {
        let err = parse_seed(r#"[{"title":"x"}]"#).unwrap_err();
        assert!(matches!(err, SeedError::MissingId { index: 0 }));
    }

    #[test]
    fn invalid_seed_entry_fails() {
        let err = parse_seed(r#"[{"id":"7","title":"x"}]"#).unwrap_err();
        match err {
            SeedError::Invalid { id, source } => {
                assert_eq!(id, "7");
                assert!(source.mentions("year"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_seed_ids_fail() {
        let entry = r#"{"id":"1","title":"A","year":2001,"director":"B","duration":90,
            "poster":"https://img.example.com/a.jpg","genre":["Drama"],"rate":5}"#;
        let json = format!("[{entry},{entry}]");
        let result = load_store(&json);
        assert!(matches!(
            result,
            Err(SeedError::Store(StoreError::DuplicateId(id))) if id == "1"
        ));
    }
}
