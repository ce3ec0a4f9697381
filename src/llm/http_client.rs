use crate::config::ProviderConfig;
use reqwest::Client;
use std::time::Duration;

/// Pooled client with the configured request and connect timeouts.
///
/// Falls back to a default client if the builder rejects the settings.
pub fn build_provider_client(config: &ProviderConfig) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|error| {
            tracing::warn!("falling back to default HTTP client: {error}");
            Client::new()
        })
}
