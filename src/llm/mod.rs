//! LLM integration module.
//!
//! Provides the inference backend abstraction, an Ollama-compatible client
//! and the prompt used for batch listing evaluation.

mod client;
mod prompts;

pub use client::{InferenceBackend, OllamaClient};
pub use prompts::{MIN_REQUIREMENTS, Prompts, Requirements};
