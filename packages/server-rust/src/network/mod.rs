//! Networking: configuration, origin gate, middleware, handlers, and the
//! server lifecycle.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod origin;
pub mod shutdown;

pub use config::*;
pub use handlers::AppState;
pub use module::{build_router, NetworkModule};
pub use origin::{OriginDecision, OriginGate};
pub use shutdown::*;
