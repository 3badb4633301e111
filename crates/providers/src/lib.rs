//! LLM provider implementations for GroundCrew.
//!
//! All providers implement the `groundcrew_core::Provider` trait.
//! The selector maps a model identifier to the right client.

pub mod anthropic;
pub mod catalog;
pub mod ollama;
pub mod openai;
pub mod selector;

pub use anthropic::AnthropicProvider;
pub use catalog::{ModelInfo, catalog};
pub use ollama::OllamaProvider;
pub use openai::{OpenAiEmbedder, OpenAiProvider};
pub use selector::{ProviderKind, ProviderProfile, SelectedProvider, select};
