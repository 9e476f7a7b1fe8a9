//! Movies Server: HTTP API over an in-memory movie catalogue.

pub mod cli;
pub mod network;
pub mod storage;
pub mod telemetry;

pub use network::{build_router, AppState, NetworkConfig, NetworkModule, OriginGate};
pub use storage::{InMemoryMovieStore, MovieStore};
