//! Tourgate Core - shared types for the tourgate admin access layer
//!
//! Holds the role/permission model, the user record produced by credential
//! verification, the immutable security configuration and the logging setup
//! used by the web crate.

pub mod config;
pub mod error;
pub mod logging;
pub mod rbac;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use rbac::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
