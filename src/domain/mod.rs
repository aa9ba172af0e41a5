//! # Domain Layer
//!
//! Conversation model, task labels, the model reply envelope, and errors.
//! This layer is independent of HTTP clients and file formats.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
