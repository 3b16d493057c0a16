//! Text-generation provider layer for stockwise
//!
//! This crate provides the seam between the analysis orchestrator and the
//! generative-language service. It includes:
//!
//! - Completion request/response types with the fixed generation parameters
//! - The `LLMProvider` trait
//! - The Gemini `generateContent` provider (behind the `gemini` feature)

pub mod completion;
pub mod error;
pub mod provider;

// Re-export main types
pub use completion::{
    Candidate, CompletionRequest, CompletionResponse, Content, GenerationConfig, Part,
    UsageMetadata,
};
pub use error::{LLMError, Result};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "gemini")]
pub mod providers;
