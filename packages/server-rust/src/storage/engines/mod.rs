//! Concrete [`MovieStore`](super::MovieStore) implementations.

pub mod memory;

pub use memory::InMemoryMovieStore;
