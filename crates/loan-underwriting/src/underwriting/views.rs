use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decision::Decision;
use super::memo::MemoSource;
use super::metrics::FinancialMetrics;
use super::pipeline::UnderwritingReport;
use super::risk::{RiskAssessment, RiskTier};

pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";

pub const COMPONENTS: [&str; 4] = ["MetricsEngine", "RiskEngine", "DecisionEngine", "MemoGenerator"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessInfoView {
    pub business_name: String,
    pub industry: String,
    pub loan_amount: f64,
    pub annual_interest_rate: f64,
    pub term_months: u32,
    pub business_age_years: u32,
}

/// Envelope returned by the full analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub status: String,
    pub business_info: BusinessInfoView,
    pub financial_metrics: FinancialMetrics,
    pub risk_assessment: RiskAssessment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo_source: Option<MemoSource>,
    pub recommendation: Decision,
    pub conditions: Vec<String>,
    pub decline_reasons: Vec<String>,
    pub underwriting_score: u8,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResponse {
    pub fn from_report(report: UnderwritingReport, analyzed_at: DateTime<Utc>) -> Self {
        let UnderwritingReport {
            business,
            loan,
            metrics,
            assessment,
            recommendation,
            underwriting_score,
            memo,
        } = report;

        let (credit_memo, memo_source) = match memo {
            Some(memo) => (Some(memo.text), Some(memo.source)),
            None => (None, None),
        };

        Self {
            status: STATUS_COMPLETED.to_string(),
            business_info: BusinessInfoView {
                business_name: business.business_name,
                industry: business.industry,
                loan_amount: loan.loan_amount,
                annual_interest_rate: loan.annual_interest_rate,
                term_months: loan.term_months,
                business_age_years: loan.business_age_years,
            },
            financial_metrics: metrics,
            risk_assessment: assessment,
            credit_memo,
            memo_source,
            recommendation: recommendation.decision(),
            conditions: recommendation.conditions().to_vec(),
            decline_reasons: recommendation.reasons().to_vec(),
            underwriting_score,
            analyzed_at,
        }
    }
}

/// Envelope returned by the score-only endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickScoreResponse {
    pub status: String,
    pub business_name: String,
    pub underwriting_score: u8,
    pub recommendation: Decision,
    pub risk_level: RiskTier,
}

impl From<&UnderwritingReport> for QuickScoreResponse {
    fn from(report: &UnderwritingReport) -> Self {
        Self {
            status: STATUS_COMPLETED.to_string(),
            business_name: report.business.business_name.clone(),
            underwriting_score: report.underwriting_score,
            recommendation: report.recommendation.decision(),
            risk_level: report.assessment.tier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthView {
    pub status: String,
    pub version: String,
    pub components: Vec<String>,
}

impl HealthView {
    pub fn current() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            components: COMPONENTS.iter().map(|name| name.to_string()).collect(),
        }
    }
}
