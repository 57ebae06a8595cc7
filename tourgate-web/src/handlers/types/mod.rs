//! Type definitions for handlers
//!
//! This module contains all the request/response types used by the handlers.

pub mod accounts;
pub mod admin;
pub mod common;

pub use accounts::*;
pub use admin::*;
pub use common::*;
