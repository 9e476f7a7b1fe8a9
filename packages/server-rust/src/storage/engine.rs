//! Movie store trait and its error type.
//!
//! Defines [`MovieStore`], the single owner of the movie collection.
//! Implementations keep records in insertion order, which is also the
//! order clients see when listing.

use movies_core::{Movie, MoviePatch};
use thiserror::Error;

/// Errors raised by store mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record with this identifier is already stored.
    #[error("movie id already exists: {0}")]
    DuplicateId(String),
}

/// Ordered, mutable collection of validated movie records.
///
/// Every operation is atomic with respect to every other: read-then-write
/// sequences (`replace_by_id`, `remove_by_id`, the duplicate check in
/// `append`) never observe a stale position.
///
/// Shared as `Arc<dyn MovieStore>` across handlers.
pub trait MovieStore: Send + Sync + 'static {
    /// Point-in-time snapshot of all records, in insertion order.
    fn list(&self) -> Vec<Movie>;

    /// Records having `genre` among their genres (case-insensitive), in
    /// insertion order.
    fn filter_by_genre(&self, genre: &str) -> Vec<Movie>;

    /// The record with this identifier, or `None`.
    fn find_by_id(&self, id: &str) -> Option<Movie>;

    /// Adds a record at the end of the collection and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if the identifier is taken.
    fn append(&self, movie: Movie) -> Result<Movie, StoreError>;

    /// Merges `patch` onto the record in place and returns the result, or
    /// `None` if no record has this identifier.
    fn replace_by_id(&self, id: &str, patch: &MoviePatch) -> Option<Movie>;

    /// Removes the record and returns it, or `None` if it was absent.
    fn remove_by_id(&self, id: &str) -> Option<Movie>;

    /// Number of stored records.
    fn len(&self) -> usize;

    /// Whether the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
