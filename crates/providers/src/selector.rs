//! Provider selector — maps a model identifier to a concrete client.
//!
//! Dispatch is a fixed rule list evaluated in order, first match wins.
//! Credentials come from the request override first, then configuration;
//! environment lookup happens at config load, never here, so selection is
//! fully deterministic for a given config.

use std::sync::Arc;
use std::time::Duration;

use groundcrew_config::AppConfig;
use groundcrew_core::{Provider, error::ProviderError};
use serde::Serialize;
use tracing::debug;

use crate::anthropic::AnthropicProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

/// Identifier prefixes that route to the local Ollama daemon.
const LOCAL_PREFIXES: &[&str] = &["ollama/", "local/"];

/// Identifier prefix for the hosted GPT family.
const GPT_PREFIX: &str = "gpt-";

/// Hosted Claude-family models, matched by exact name.
const CLAUDE_MODELS: &[&str] = &["claude-2", "claude-2.1", "claude-instant-1.2"];

/// Models that accept image input.
const VISION_MODELS: &[&str] = &["gpt-4-vision-preview", "gpt-4o"];

/// Models that accept audio input.
const AUDIO_MODELS: &[&str] = &[];

/// The closed set of provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Ollama,
}

/// Resolved configuration for one provider request.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub kind: ProviderKind,
    /// The model name as sent on the wire (local prefix stripped).
    pub model: String,
    pub temperature: f32,
    pub supports_vision: bool,
    pub supports_audio: bool,
}

/// A selected provider: the profile plus a ready-to-call client.
pub struct SelectedProvider {
    pub profile: ProviderProfile,
    pub provider: Arc<dyn Provider>,
}

impl std::fmt::Debug for SelectedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedProvider")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

/// Select and construct a provider for the given model identifier.
///
/// Rules, first match wins:
/// 1. `ollama/` or `local/` prefix → Ollama; no credential required.
/// 2. `gpt-` prefix → OpenAI; credential = override else config.
/// 3. exact Claude-family name → Anthropic; same credential rule.
/// 4. anything else → `UnsupportedModel`.
pub fn select(
    model: &str,
    credential_override: Option<&str>,
    config: &AppConfig,
) -> std::result::Result<SelectedProvider, ProviderError> {
    let settings = &config.providers;
    let timeout = Duration::from_secs(settings.request_timeout_secs);
    let temperature = config.default_temperature;

    let profile = |kind: ProviderKind, wire_model: &str| ProviderProfile {
        kind,
        model: wire_model.to_string(),
        temperature,
        supports_vision: VISION_MODELS.contains(&model),
        supports_audio: AUDIO_MODELS.contains(&model),
    };

    if let Some(stripped) = LOCAL_PREFIXES
        .iter()
        .find_map(|p| model.strip_prefix(p))
    {
        debug!(model, "Selected Ollama provider");
        return Ok(SelectedProvider {
            profile: profile(ProviderKind::Ollama, stripped),
            provider: Arc::new(OllamaProvider::new(
                &settings.ollama_url,
                stripped,
                temperature,
                timeout,
            )),
        });
    }

    if model.starts_with(GPT_PREFIX) {
        let key = resolve_credential(credential_override, settings.openai_api_key.as_deref())
            .ok_or_else(|| ProviderError::MissingCredential("openai".into()))?;
        debug!(model, "Selected OpenAI provider");
        return Ok(SelectedProvider {
            profile: profile(ProviderKind::OpenAi, model),
            provider: Arc::new(OpenAiProvider::new(key, model, temperature, timeout)),
        });
    }

    if CLAUDE_MODELS.contains(&model) {
        let key = resolve_credential(credential_override, settings.anthropic_api_key.as_deref())
            .ok_or_else(|| ProviderError::MissingCredential("anthropic".into()))?;
        debug!(model, "Selected Anthropic provider");
        return Ok(SelectedProvider {
            profile: profile(ProviderKind::Anthropic, model),
            provider: Arc::new(AnthropicProvider::new(key, model, temperature, timeout)),
        });
    }

    Err(ProviderError::UnsupportedModel(model.to_string()))
}

fn resolve_credential(override_key: Option<&str>, configured: Option<&str>) -> Option<String> {
    override_key
        .filter(|k| !k.is_empty())
        .or(configured)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_config() -> AppConfig {
        AppConfig::default()
    }

    fn config_with_keys() -> AppConfig {
        let mut config = AppConfig::default();
        config.providers.openai_api_key = Some("sk-test".into());
        config.providers.anthropic_api_key = Some("sk-ant-test".into());
        config
    }

    #[test]
    fn ollama_prefix_needs_no_credential() {
        let selected = select("ollama/llama2", None, &bare_config()).unwrap();
        assert_eq!(selected.profile.kind, ProviderKind::Ollama);
        assert_eq!(selected.profile.model, "llama2");
        assert_eq!(selected.provider.name(), "ollama");
    }

    #[test]
    fn local_prefix_is_an_alias_for_ollama() {
        let selected = select("local/llama3", None, &bare_config()).unwrap();
        assert_eq!(selected.profile.kind, ProviderKind::Ollama);
        assert_eq!(selected.profile.model, "llama3");
    }

    #[test]
    fn gpt_without_credential_fails() {
        let err = select("gpt-4", None, &bare_config()).unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential(_)));
    }

    #[test]
    fn gpt_with_configured_credential_succeeds() {
        let selected = select("gpt-4", None, &config_with_keys()).unwrap();
        assert_eq!(selected.profile.kind, ProviderKind::OpenAi);
        assert_eq!(selected.profile.model, "gpt-4");
    }

    #[test]
    fn request_override_beats_configuration() {
        // Config has no keys; the per-request key alone must be enough.
        let selected = select("gpt-3.5-turbo", Some("sk-user"), &bare_config()).unwrap();
        assert_eq!(selected.profile.kind, ProviderKind::OpenAi);
    }

    #[test]
    fn empty_override_does_not_count() {
        let err = select("gpt-4", Some(""), &bare_config()).unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential(_)));
    }

    #[test]
    fn claude_matches_exact_names_only() {
        let selected = select("claude-2", Some("sk-ant"), &bare_config()).unwrap();
        assert_eq!(selected.profile.kind, ProviderKind::Anthropic);

        // Prefix matches are not enough for the Claude family
        let err = select("claude-9-fictional", Some("sk-ant"), &bare_config()).unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedModel(_)));
    }

    #[test]
    fn claude_without_credential_fails() {
        let err = select("claude-2", None, &bare_config()).unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential(_)));
    }

    #[test]
    fn unknown_model_names_the_identifier() {
        let err = select("unknown-model", None, &bare_config()).unwrap_err();
        match err {
            ProviderError::UnsupportedModel(id) => assert_eq!(id, "unknown-model"),
            other => panic!("expected UnsupportedModel, got {other:?}"),
        }
    }

    #[test]
    fn vision_flag_comes_from_the_allow_list() {
        let config = config_with_keys();
        assert!(select("gpt-4-vision-preview", None, &config).unwrap().profile.supports_vision);
        assert!(!select("gpt-4", None, &config).unwrap().profile.supports_vision);
    }

    #[test]
    fn nothing_supports_audio() {
        let config = config_with_keys();
        assert!(!select("gpt-4o", None, &config).unwrap().profile.supports_audio);
        assert!(!select("ollama/llama2", None, &config).unwrap().profile.supports_audio);
    }

    #[test]
    fn temperature_comes_from_config() {
        let mut config = config_with_keys();
        config.default_temperature = 0.2;
        let selected = select("gpt-4", None, &config).unwrap();
        assert!((selected.profile.temperature - 0.2).abs() < f32::EPSILON);
    }
}
