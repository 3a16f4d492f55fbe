//! Stub reply services for unit tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::llm::AnswerProvider;

enum Outcome {
    Reply(String),
    Fail(String),
}

/// Answers every prompt the same way and records what it was asked
pub struct StubProvider {
    outcome: Outcome,
    prompts: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn reply(text: &str) -> Self {
        Self::with_outcome(Outcome::Reply(text.to_string()))
    }

    pub fn fail(reason: &str) -> Self {
        Self::with_outcome(Outcome::Fail(reason.to_string()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AnswerProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn ask(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.outcome {
            Outcome::Reply(text) => Ok(text.clone()),
            Outcome::Fail(reason) => Err(anyhow::anyhow!("{}", reason)),
        }
    }
}

/// Holds its reply until the test sends it through the gate, so the
/// pending state can be observed while `ask` is suspended
pub struct GatedProvider {
    gate: Mutex<Option<oneshot::Receiver<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl GatedProvider {
    pub fn new() -> (Self, oneshot::Sender<String>) {
        let (release, gate) = oneshot::channel();
        let provider = Self {
            gate: Mutex::new(Some(gate)),
            prompts: Mutex::new(Vec::new()),
        };
        (provider, release)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AnswerProvider for GatedProvider {
    fn name(&self) -> &str {
        "gated"
    }

    fn model(&self) -> &str {
        "gated-model"
    }

    async fn ask(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let gate = self
            .gate
            .lock()
            .ok()
            .and_then(|mut gate| gate.take())
            .context("gated provider only answers once")?;
        gate.await.context("gate dropped before release")
    }
}
