//! Static model catalog.
//!
//! The identifiers a deployment advertises to clients. Dispatching is what
//! the selector does; this list exists so the frontend can render a model
//! picker without hardcoding identifiers.

use serde::Serialize;

use crate::selector::ProviderKind;

/// One advertised model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub provider: ProviderKind,
}

/// The advertised model list.
pub fn catalog() -> Vec<ModelInfo> {
    vec![
        ModelInfo {
            id: "gpt-3.5-turbo",
            name: "GPT-3.5 Turbo",
            description: "Fast and efficient for most queries",
            provider: ProviderKind::OpenAi,
        },
        ModelInfo {
            id: "gpt-4",
            name: "GPT-4",
            description: "Most capable model for complex tasks",
            provider: ProviderKind::OpenAi,
        },
        ModelInfo {
            id: "claude-2",
            name: "Claude 2",
            description: "Balanced performance with strong reasoning",
            provider: ProviderKind::Anthropic,
        },
        ModelInfo {
            id: "ollama/llama2",
            name: "Llama 2",
            description: "Open source large language model",
            provider: ProviderKind::Ollama,
        },
        ModelInfo {
            id: "ollama/mistral",
            name: "Mistral",
            description: "Efficient open source model",
            provider: ProviderKind::Ollama,
        },
        ModelInfo {
            id: "ollama/codellama",
            name: "CodeLlama",
            description: "Specialized for code generation",
            provider: ProviderKind::Ollama,
        },
    ]
}
