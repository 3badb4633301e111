//! The `doctor` command — checks credentials and probes the local daemon.

use std::time::Duration;

use groundcrew_config::AppConfig;
use groundcrew_core::Provider;
use groundcrew_providers::OllamaProvider;

pub async fn run(config: AppConfig) {
    let key_status = |present: bool| if present { "configured" } else { "missing" };

    println!(
        "openai api key:    {}",
        key_status(config.providers.openai_api_key.is_some())
    );
    println!(
        "anthropic api key: {}",
        key_status(config.providers.anthropic_api_key.is_some())
    );

    let ollama = OllamaProvider::new(
        &config.providers.ollama_url,
        "llama2",
        config.default_temperature,
        Duration::from_secs(5),
    );
    match ollama.health_check().await {
        Ok(true) => println!("ollama:            reachable at {}", config.providers.ollama_url),
        _ => println!("ollama:            unreachable at {}", config.providers.ollama_url),
    }
}
