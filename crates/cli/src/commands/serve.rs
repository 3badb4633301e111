//! The `serve` command — runs the HTTP gateway.

use groundcrew_config::AppConfig;

pub async fn run(
    mut config: AppConfig,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port {
        config.gateway.port = port;
    }
    config.validate()?;

    groundcrew_gateway::start(config).await
}
