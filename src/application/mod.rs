//! # Application Layer
//!
//! Prompt construction, response normalization, and the chat/export use cases
//! coordinating domain and connector layers.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
