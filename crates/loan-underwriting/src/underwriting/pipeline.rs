use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info};

use super::decision::{DecisionEngine, Recommendation};
use super::domain::{AnalyzeRequest, BusinessProfile, LoanApplication, LoanRequest};
use super::intake::{IntakeGuard, ValidationError};
use super::memo::{CreditMemo, MemoFacts, MemoWriter, TextGenerator};
use super::metrics::{FinancialMetrics, MetricsEngine};
use super::risk::{RiskAssessment, RiskEngine};
use crate::config::MemoConfig;

/// Whether a run ends with the memo stage or stops after scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    Full,
    ScoreOnly,
}

/// Output of the three deterministic stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnderwritingAssessment {
    pub metrics: FinancialMetrics,
    pub assessment: RiskAssessment,
    pub recommendation: Recommendation,
    pub underwriting_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnderwritingReport {
    pub business: BusinessProfile,
    pub loan: LoanRequest,
    pub metrics: FinancialMetrics,
    pub assessment: RiskAssessment,
    pub recommendation: Recommendation,
    pub underwriting_score: u8,
    /// `None` when the run was score-only.
    pub memo: Option<CreditMemo>,
}

/// Internal faults in the deterministic stages.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("metric {metric} evaluated to a non-finite value ({value})")]
    NonFiniteMetric { metric: &'static str, value: f64 },
}

/// Error raised when analyzing a raw request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnderwritingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Orchestrates intake, metrics, risk, decision, and the optional memo.
///
/// Holds no per-request state, so one instance can be shared across
/// concurrent requests behind an `Arc`.
pub struct UnderwritingPipeline<G: ?Sized> {
    guard: IntakeGuard,
    metrics: MetricsEngine,
    risk: RiskEngine,
    decision: DecisionEngine,
    memo: MemoWriter<G>,
}

impl<G> UnderwritingPipeline<G>
where
    G: TextGenerator + ?Sized + 'static,
{
    pub fn new(generator: Arc<G>, config: &MemoConfig) -> Self {
        Self::assemble(
            IntakeGuard::default(),
            MemoWriter::from_config(generator, config),
        )
    }

    pub fn with_guard(
        guard: IntakeGuard,
        generator: Arc<G>,
        memo_timeout: Duration,
        memo_attempts: u8,
    ) -> Self {
        Self::assemble(
            guard,
            MemoWriter::new(generator, memo_timeout, memo_attempts),
        )
    }

    fn assemble(guard: IntakeGuard, memo: MemoWriter<G>) -> Self {
        Self {
            guard,
            metrics: MetricsEngine::new(),
            risk: RiskEngine::new(),
            decision: DecisionEngine::new(),
            memo,
        }
    }

    pub fn guard(&self) -> &IntakeGuard {
        &self.guard
    }

    /// Run the pure stages: metrics, risk, then decision.
    pub fn evaluate(
        &self,
        application: &LoanApplication,
    ) -> Result<UnderwritingAssessment, PipelineError> {
        let metrics =
            self.metrics
                .analyze(&application.bank, application.tax.as_ref(), &application.loan);

        if let Some((metric, value)) = metrics.first_non_finite() {
            error!(
                business = %application.business.business_name,
                metric,
                value,
                "metric computation produced a non-finite value"
            );
            return Err(PipelineError::NonFiniteMetric { metric, value });
        }

        let assessment = self.risk.assess(&metrics, application.bank.nsf_fees);
        let outcome = self.decision.decide(&assessment, &metrics);

        Ok(UnderwritingAssessment {
            metrics,
            assessment,
            recommendation: outcome.recommendation,
            underwriting_score: outcome.underwriting_score,
        })
    }

    pub async fn run(
        &self,
        application: LoanApplication,
        mode: PipelineMode,
    ) -> Result<UnderwritingReport, PipelineError> {
        let UnderwritingAssessment {
            metrics,
            assessment,
            recommendation,
            underwriting_score,
        } = self.evaluate(&application)?;

        let LoanApplication { business, loan, .. } = application;

        let memo = match mode {
            PipelineMode::Full => {
                let facts = MemoFacts {
                    business: &business,
                    loan: &loan,
                    metrics: &metrics,
                    assessment: &assessment,
                    recommendation: &recommendation,
                };
                Some(self.memo.write(&facts).await)
            }
            PipelineMode::ScoreOnly => None,
        };

        info!(
            business = %business.business_name,
            risk_level = assessment.tier.label(),
            decision = recommendation.decision().label(),
            underwriting_score,
            memo_source = ?memo.as_ref().map(|memo| memo.source),
            "underwriting completed"
        );

        Ok(UnderwritingReport {
            business,
            loan,
            metrics,
            assessment,
            recommendation,
            underwriting_score,
            memo,
        })
    }

    pub async fn analyze(
        &self,
        application: LoanApplication,
    ) -> Result<UnderwritingReport, PipelineError> {
        self.run(application, PipelineMode::Full).await
    }

    pub async fn quick_score(
        &self,
        application: LoanApplication,
    ) -> Result<UnderwritingReport, PipelineError> {
        self.run(application, PipelineMode::ScoreOnly).await
    }

    /// Validate a raw request and run it; nothing is computed when validation fails.
    pub async fn analyze_request(
        &self,
        request: AnalyzeRequest,
        mode: PipelineMode,
    ) -> Result<UnderwritingReport, UnderwritingError> {
        let application = self.guard.application_from_request(request)?;
        Ok(self.run(application, mode).await?)
    }
}
