mod policy;
mod score;

pub use policy::{recommend, Decision, Recommendation};
pub use score::underwriting_score;

use serde::{Deserialize, Serialize};

use super::metrics::FinancialMetrics;
use super::risk::RiskAssessment;

/// Final adjudication for one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub recommendation: Recommendation,
    pub underwriting_score: u8,
}

/// Stateless engine combining the risk tier and metrics into a decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionEngine;

impl DecisionEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn decide(&self, assessment: &RiskAssessment, metrics: &FinancialMetrics) -> DecisionOutcome {
        let recommendation = recommend(assessment, metrics.dscr, metrics.stability_score);
        let underwriting_score = underwriting_score(
            assessment.tier,
            metrics.dscr,
            metrics.stability_score,
            metrics.revenue_volatility,
        );

        DecisionOutcome {
            recommendation,
            underwriting_score,
        }
    }
}
