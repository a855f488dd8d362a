//! Core functionality for the push gateway

pub mod connection;
pub mod push;
pub mod registry;

// Re-export main components for convenience
pub use connection::Connection;
pub use push::{PushService, SharedPushService};
pub use registry::{create_registry, ConnectionRegistry, Registry};
