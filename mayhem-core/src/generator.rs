//! Question generation through the Groq completion API.
//!
//! [`QuestionSource`] is the seam between the game and the outside world.
//! [`QuestionGenerator`] is the production implementation: one prompt, one
//! HTTP call, then the [`parse_questions`] boundary. There is no retry and no
//! cache; a failure goes straight back to the caller.

use async_trait::async_trait;
use groq::{FinishReason, Groq, Message, Request};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::prompts::{build_question_prompt, NONCE_RANGE, SYSTEM_PROMPT};
use crate::question::{parse_questions, ParseError, Question, QuestionMode};

/// Errors from question generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Groq API error: {0}")]
    Api(#[from] groq::Error),

    #[error("the completion contained no text")]
    EmptyCompletion,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl GenerationError {
    /// True when the failure is a missing or rejected credential.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            GenerationError::Api(groq::Error::NoApiKey)
                | GenerationError::Api(groq::Error::Api { status: 401, .. })
                | GenerationError::Api(groq::Error::Api { status: 403, .. })
        )
    }
}

/// Anything that can hand the game a batch of questions.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Produce up to `count` questions about `category`.
    async fn generate(
        &self,
        category: &str,
        count: usize,
        mode: QuestionMode,
    ) -> Result<Vec<Question>, GenerationError>;
}

/// Sampling parameters for generation requests.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model override; the client's model is used when `None`.
    pub model: Option<String>,

    /// Maximum output tokens.
    pub max_tokens: usize,

    pub temperature: f32,
    pub top_p: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 4000,
            temperature: 1.0,
            top_p: 0.95,
            presence_penalty: 0.6,
            frequency_penalty: 0.6,
        }
    }
}

/// Generates questions with a Groq-hosted model.
pub struct QuestionGenerator {
    client: Option<Groq>,
    config: GeneratorConfig,
}

impl QuestionGenerator {
    pub fn new(client: Groq) -> Self {
        Self {
            client: Some(client),
            config: GeneratorConfig::default(),
        }
    }

    /// A generator with no API key. Every call fails with
    /// `groq::Error::NoApiKey`.
    pub fn unconfigured() -> Self {
        Self {
            client: None,
            config: GeneratorConfig::default(),
        }
    }

    /// Create a generator from `GROQ_API_KEY` / `GROQ_MODEL`.
    pub fn from_env() -> Result<Self, GenerationError> {
        Ok(Self::new(Groq::from_env()?))
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn build_request(
        &self,
        category: &str,
        count: usize,
        mode: QuestionMode,
        nonce: u32,
    ) -> Request {
        let prompt = build_question_prompt(category, count, mode, nonce);
        let mut request = Request::new(vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)])
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature)
            .with_top_p(self.config.top_p)
            .with_presence_penalty(self.config.presence_penalty)
            .with_frequency_penalty(self.config.frequency_penalty);

        if let Some(model) = &self.config.model {
            request = request.with_model(model.clone());
        }
        request
    }
}

#[async_trait]
impl QuestionSource for QuestionGenerator {
    async fn generate(
        &self,
        category: &str,
        count: usize,
        mode: QuestionMode,
    ) -> Result<Vec<Question>, GenerationError> {
        let client = self.client.as_ref().ok_or(groq::Error::NoApiKey)?;
        let nonce = rand::thread_rng().gen_range(NONCE_RANGE);
        let request = self.build_request(category, count, mode, nonce);

        info!(%category, %mode, count, model = %client.model(), "generating questions");
        let response = client.complete(request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }
        if response.finish_reason() == Some(FinishReason::Length) {
            warn!(max_tokens = self.config.max_tokens, "completion hit the token limit");
        }

        let content = response
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GenerationError::EmptyCompletion)?;
        debug!(bytes = content.len(), "received completion");

        let questions = parse_questions(content, count)?;
        info!(requested = count, received = questions.len(), "questions ready");
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> QuestionGenerator {
        QuestionGenerator::new(Groq::new("test-key").unwrap())
    }

    #[test]
    fn test_default_sampling() {
        let config = GeneratorConfig::default();
        assert_eq!(config.max_tokens, 4000);
        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.top_p, 0.95);
        assert_eq!(config.presence_penalty, 0.6);
        assert_eq!(config.frequency_penalty, 0.6);
    }

    #[test]
    fn test_build_request() {
        let request = generator().build_request("chess", 20, QuestionMode::Custom, 424242);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert!(request.messages[1].content.contains("[Session ID: 424242]"));
        assert!(request.messages[1].content.contains("chess"));
        assert_eq!(request.max_tokens, 4000);
        assert_eq!(request.temperature, Some(1.0));
        assert_eq!(request.top_p, Some(0.95));
        assert_eq!(request.presence_penalty, Some(0.6));
        assert_eq!(request.frequency_penalty, Some(0.6));
        assert!(request.model.is_none());
    }

    #[test]
    fn test_model_override() {
        let config = GeneratorConfig {
            model: Some("llama-3.1-8b-instant".to_string()),
            ..GeneratorConfig::default()
        };
        let request = generator()
            .with_config(config)
            .build_request("chess", 1, QuestionMode::Custom, 100000);
        assert_eq!(request.model.as_deref(), Some("llama-3.1-8b-instant"));
    }

    #[tokio::test]
    async fn test_unconfigured_generator_reports_missing_key() {
        let err = QuestionGenerator::unconfigured()
            .generate("chess", 5, QuestionMode::Custom)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Api(groq::Error::NoApiKey)));
        assert!(err.is_credential_error());
    }

    #[test]
    fn test_credential_errors() {
        assert!(GenerationError::Api(groq::Error::NoApiKey).is_credential_error());
        assert!(GenerationError::Api(groq::Error::Api {
            status: 401,
            message: "invalid api key".to_string(),
        })
        .is_credential_error());
        let network = GenerationError::Api(groq::Error::Network("reset".to_string()));
        assert!(!network.is_credential_error());
        assert!(!GenerationError::Parse(ParseError::EmptyList).is_credential_error());
    }
}
