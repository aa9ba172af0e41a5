//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Model endpoints (signed foundation model, chat completions, offline mock)
//! - Export writers (plain text, `.docx`)
//! - The CLI api: configuration, container, router and controllers

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
