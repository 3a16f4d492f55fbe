mod gemini;
mod models;
mod ollama;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::ValueEnum;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;

/// A service that answers a prompt with a single complete reply
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Short provider name for the status bar and logs
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    async fn ask(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProviderKind {
    #[default]
    Gemini,
    Ollama,
}

impl ProviderKind {
    /// Parse a provider name, ignoring case
    pub fn parse(name: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(name.trim(), true)
            .map_err(|_| anyhow::anyhow!("Unknown provider {:?}, expected gemini or ollama", name))
    }
}

pub fn create_provider(config: &Config) -> Result<Arc<dyn AnswerProvider>> {
    let provider: Arc<dyn AnswerProvider> = match config.provider {
        ProviderKind::Gemini => {
            let api_key = config
                .gemini
                .api_key
                .clone()
                .context("GEMINI_API_KEY must be set to use the Gemini provider")?;
            Arc::new(GeminiClient::new(
                api_key,
                &config.gemini.model,
                &config.gemini.base_url,
            )?)
        }
        ProviderKind::Ollama => Arc::new(OllamaClient::new(
            &config.ollama.host,
            config.ollama.port,
            &config.ollama.model,
        )),
    };

    info!(provider = provider.name(), model = provider.model(), "reply service ready");
    Ok(provider)
}
