// HTTP API routes
//
// Route handlers for the public registry API. They share one AppState that
// carries the registry service and auth state.

pub mod common;
pub mod registry;

// Re-export common types
pub use common::{ErrorResponse, ListResponse};
pub use registry::{routes, AppState};
