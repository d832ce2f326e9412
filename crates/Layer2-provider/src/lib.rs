//! # ctxbench-provider
//!
//! Chat-completion client layer for ctxbench.
//!
//! ## Features
//! - `ChatClient` trait: the seam scenario testers drive (scriptable in tests)
//! - `PcNodeClient`: OpenAI-compatible HTTP client with PC Node vendor fields
//! - Failed calls degrade to zero-valued results instead of errors

pub mod error;
pub mod message;
pub mod providers;
pub mod r#trait;

// Core traits and types
pub use message::{ChatMessage, MessageRole};
pub use r#trait::{ChatClient, ChatRequest};

// Error
pub use error::ProviderError;

// Client implementations
pub use providers::pc_node::PcNodeClient;
