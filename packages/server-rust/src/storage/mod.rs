//! Movie storage for the server.
//!
//! - [`MovieStore`]: the trait every handler talks to
//! - [`InMemoryMovieStore`]: the process-local implementation
//! - [`seed`]: builds a store from a validated seed dataset at startup

pub mod engine;
pub mod engines;
pub mod seed;

pub use engine::*;
pub use engines::InMemoryMovieStore;
pub use seed::{load_store, parse_seed, SeedError, BUNDLED_SEED};
