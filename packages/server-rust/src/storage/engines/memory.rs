//! In-memory [`MovieStore`] implementation backed by a locked `Vec`.
//!
//! The whole collection sits under one [`RwLock`]. Reads clone a snapshot
//! out under the read lock; every mutation runs its lookup and its write
//! under a single write lock, so an index found is an index still valid.

use parking_lot::RwLock;
use tracing::debug;

use movies_core::{Movie, MoviePatch};

use crate::storage::engine::{MovieStore, StoreError};

/// In-memory movie storage preserving insertion order.
pub struct InMemoryMovieStore {
    movies: RwLock<Vec<Movie>>,
}

impl InMemoryMovieStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            movies: RwLock::new(Vec::new()),
        }
    }

    /// Creates a store holding `movies` in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if two records share an id.
    pub fn with_movies(movies: Vec<Movie>) -> Result<Self, StoreError> {
        let store = Self::new();
        for movie in movies {
            store.append(movie)?;
        }
        Ok(store)
    }
}

impl Default for InMemoryMovieStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieStore for InMemoryMovieStore {
    fn list(&self) -> Vec<Movie> {
        self.movies.read().clone()
    }

    fn filter_by_genre(&self, genre: &str) -> Vec<Movie> {
        self.movies
            .read()
            .iter()
            .filter(|m| m.has_genre(genre))
            .cloned()
            .collect()
    }

    fn find_by_id(&self, id: &str) -> Option<Movie> {
        self.movies.read().iter().find(|m| m.id == id).cloned()
    }

    fn append(&self, movie: Movie) -> Result<Movie, StoreError> {
        let mut movies = self.movies.write();
        if movies.iter().any(|m| m.id == movie.id) {
            return Err(StoreError::DuplicateId(movie.id));
        }
        debug!(id = %movie.id, "appending movie");
        movies.push(movie.clone());
        Ok(movie)
    }

    fn replace_by_id(&self, id: &str, patch: &MoviePatch) -> Option<Movie> {
        let mut movies = self.movies.write();
        let movie = movies.iter_mut().find(|m| m.id == id)?;
        movie.apply_patch(patch);
        Some(movie.clone())
    }

    fn remove_by_id(&self, id: &str) -> Option<Movie> {
        let mut movies = self.movies.write();
        let index = movies.iter().position(|m| m.id == id)?;
        Some(movies.remove(index))
    }

    fn len(&self) -> usize {
        self.movies.read().len()
    }
}
