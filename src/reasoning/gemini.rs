//! Gemini-backed reasoner
//!
//! Live variant of the reasoning service.

use crate::config::AnalystConfig;
use crate::gemini::GeminiClient;
use crate::reasoning::Reasoner;
use crate::Result;
use async_trait::async_trait;

pub struct GeminiReasoner {
    client: GeminiClient,
}

impl GeminiReasoner {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Build from config; `None` when no key is configured.
    pub fn from_config(config: &AnalystConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let client = GeminiClient::new(api_key, config.model.clone(), config.reasoning_timeout)?
            .with_base_url(config.gemini_base_url.as_str());
        Ok(Some(Self::new(client)))
    }
}

#[async_trait]
impl Reasoner for GeminiReasoner {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.client.generate(prompt).await
    }

    fn describe(&self) -> String {
        format!("Google Gemini ({})", self.client.model())
    }
}
