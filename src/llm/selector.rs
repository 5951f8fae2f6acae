use crate::config::{ConfigError, LotusConfig};
use crate::llm::{GenAIClient, LLMClient};
use genai::adapter::AdapterKind;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct SelectedClient {
    pub client: Arc<dyn LLMClient>,
    pub provider: AdapterKind,
    pub description: String,
}

/// Builds the generation client described by `config`.
///
/// Fails before any request is made if the provider's credential variable is
/// not set.
pub fn select_llm_client(config: &LotusConfig) -> Result<SelectedClient, ConfigError> {
    config.check_credentials()?;

    let client = GenAIClient::new(
        config.provider,
        config.model.clone(),
        Duration::from_secs(config.request_timeout_secs),
    );

    info!("Using provider: {} ({})", config.provider, config.model);

    Ok(SelectedClient {
        client: Arc::new(client),
        provider: config.provider,
        description: format!("{} ({})", config.provider, config.model),
    })
}
