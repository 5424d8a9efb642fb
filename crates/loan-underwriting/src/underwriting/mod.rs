//! Small-business loan underwriting.
//!
//! Requests pass through `IntakeGuard`, then the three pure engines
//! (`MetricsEngine`, `RiskEngine`, `DecisionEngine`), and finally the
//! best-effort memo stage. `UnderwritingPipeline` wires the stages together
//! and `underwriting_router` exposes them over HTTP.

pub mod decision;
pub mod domain;
pub mod format;
pub(crate) mod intake;
pub mod memo;
pub mod metrics;
pub mod pipeline;
pub mod risk;
pub mod router;
pub mod views;

#[cfg(test)]
mod tests;

pub use decision::{Decision, DecisionEngine, DecisionOutcome, Recommendation};
pub use domain::{
    AnalyzeRequest, BankRecord, BusinessProfile, LoanApplication, LoanRequest, TaxRecord,
    DEFAULT_ANNUAL_INTEREST_RATE, DEFAULT_TERM_MONTHS,
};
pub use intake::{IntakeGuard, ValidationError, DEFAULT_MAX_INTEREST_RATE};
pub use memo::{
    generator_from_config, CreditMemo, DisabledGenerator, MemoError, MemoFacts, MemoPrompt,
    MemoSource, MemoWriter, OpenAiTextGenerator, TextGenerator,
};
pub use metrics::{FinancialMetrics, MetricsEngine};
pub use pipeline::{
    PipelineError, PipelineMode, UnderwritingAssessment, UnderwritingError, UnderwritingPipeline,
    UnderwritingReport,
};
pub use risk::{FlagKind, RiskAssessment, RiskEngine, RiskFlag, RiskTier, Severity};
pub use router::underwriting_router;
pub use views::{AnalysisResponse, BusinessInfoView, HealthView, QuickScoreResponse};
