//! LLM transport for the DCE.

pub mod ollama;

pub use ollama::OllamaChatClient;
