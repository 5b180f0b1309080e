//! Request handler module
//!
//! Resolves each request to a squirrel resource action and runs it against
//! a freshly opened storage backend.

pub mod router;
pub mod routes;
pub mod squirrels;

// Re-export main entry point
pub use router::handle_request;
