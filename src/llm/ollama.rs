use super::AnswerProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::Ollama;
use tracing::debug;

pub struct OllamaClient {
    client: Ollama,
    model: String,
}

impl OllamaClient {
    pub fn new(host: &str, port: u16, model: &str) -> Self {
        Self {
            client: Ollama::new(host.to_string(), port),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl AnswerProvider for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn ask(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, chars = prompt.len(), "sending prompt to Ollama");
        let request = GenerationRequest::new(self.model.clone(), prompt.to_string());

        let response = self
            .client
            .generate(request)
            .await
            .context("Failed to generate completion from Ollama")?;

        Ok(response.response)
    }
}
