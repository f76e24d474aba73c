//! Text-completion collaborator
//!
//! The engine consumes a completion capability for free-text interpretation
//! only - never for core numeric decisions. Implementations live outside
//! this crate; tests use the scripted mock.

mod client;
mod error;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use types::{CompletionRequest, Message, Role};

#[cfg(test)]
pub use client::mock;
