pub mod auth;
pub mod catalog;
pub mod core;
pub mod gateway;
pub mod providers;
pub mod queue;
pub mod server;
pub mod store;

pub use crate::core::error::{ErrorKind, GatewayError, classify};
pub use crate::core::types::*;
pub use crate::gateway::Gateway;
pub use crate::server::{Server, ServerConfig};
