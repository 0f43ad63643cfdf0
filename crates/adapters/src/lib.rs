//! carelog adapters crate
//!
//! Implementations of the domain ports:
//! - `llm`: OpenAI-compatible chat and transcription providers, a stub
//!   provider, and the factory selecting between them

pub mod llm;

pub use llm::*;
