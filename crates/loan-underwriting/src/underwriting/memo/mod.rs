//! Credit memo generation.
//!
//! The memo is the one stage with an external dependency. A `TextGenerator`
//! is injected into the pipeline; when it fails, times out, or has no
//! credentials, `MemoWriter` substitutes the deterministic template from
//! `fallback`.

mod fallback;
mod openai;
mod prompt;

pub use fallback::fallback_memo;
pub use openai::OpenAiTextGenerator;
pub use prompt::{build_memo_prompt, MemoPrompt, SYSTEM_PROMPT};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::decision::Recommendation;
use super::domain::{BusinessProfile, LoanRequest};
use super::metrics::FinancialMetrics;
use super::risk::RiskAssessment;
use crate::config::MemoConfig;

/// Capability interface for the third-party text-generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &MemoPrompt) -> Result<String, MemoError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoError {
    #[error("no text-generation credentials configured")]
    MissingCredentials,
    #[error("text-generation transport failed: {0}")]
    Transport(String),
    #[error("text-generation service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("text-generation response could not be decoded: {0}")]
    Decode(String),
    #[error("text-generation service returned no content")]
    EmptyResponse,
    #[error("text-generation call exceeded {0:?}")]
    Timeout(Duration),
}

/// Stand-in used when no credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &MemoPrompt) -> Result<String, MemoError> {
        Err(MemoError::MissingCredentials)
    }
}

/// Pick the OpenAI client when credentials exist, otherwise the disabled stand-in.
pub fn generator_from_config(config: &MemoConfig) -> Result<Arc<dyn TextGenerator>, MemoError> {
    if config.has_credentials() {
        Ok(Arc::new(OpenAiTextGenerator::from_config(config)?))
    } else {
        Ok(Arc::new(DisabledGenerator))
    }
}

/// Structured facts a memo is written from.
#[derive(Debug, Clone, Copy)]
pub struct MemoFacts<'a> {
    pub business: &'a BusinessProfile,
    pub loan: &'a LoanRequest,
    pub metrics: &'a FinancialMetrics,
    pub assessment: &'a RiskAssessment,
    pub recommendation: &'a Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditMemo {
    pub text: String,
    pub source: MemoSource,
}

/// Bounded, best-effort wrapper around a `TextGenerator`.
pub struct MemoWriter<G: ?Sized> {
    generator: Arc<G>,
    timeout: Duration,
    max_attempts: u8,
}

impl<G> MemoWriter<G>
where
    G: TextGenerator + ?Sized,
{
    pub fn new(generator: Arc<G>, timeout: Duration, max_attempts: u8) -> Self {
        Self {
            generator,
            timeout,
            max_attempts: max_attempts.clamp(1, 2),
        }
    }

    pub fn from_config(generator: Arc<G>, config: &MemoConfig) -> Self {
        Self::new(generator, config.timeout, config.max_attempts)
    }

    /// Never fails: any generator error resolves to the fallback template.
    pub async fn write(&self, facts: &MemoFacts<'_>) -> CreditMemo {
        let prompt = build_memo_prompt(facts);

        for attempt in 1..=self.max_attempts {
            match tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await {
                Ok(Ok(text)) if !text.trim().is_empty() => {
                    return CreditMemo {
                        text,
                        source: MemoSource::Generated,
                    };
                }
                Ok(Ok(_)) => {
                    warn!(attempt, error = %MemoError::EmptyResponse, "memo generation failed");
                }
                Ok(Err(MemoError::MissingCredentials)) => {
                    debug!("memo generation disabled; using template");
                    break;
                }
                Ok(Err(err)) => {
                    warn!(attempt, error = %err, "memo generation failed");
                }
                Err(_) => {
                    warn!(
                        attempt,
                        error = %MemoError::Timeout(self.timeout),
                        "memo generation timed out"
                    );
                }
            }
        }

        CreditMemo {
            text: fallback_memo(facts),
            source: MemoSource::Fallback,
        }
    }
}
