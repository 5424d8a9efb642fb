use serde::{Deserialize, Serialize};

use super::super::risk::{FlagKind, RiskAssessment, RiskTier};

const DECLINE_DSCR: f64 = 1.0;
const GUARANTEE_DSCR: f64 = 1.35;
const REPORTING_STABILITY: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approve,
    ApproveWithConditions,
    Decline,
}

impl Decision {
    pub const fn label(self) -> &'static str {
        match self {
            Decision::Approve => "APPROVE",
            Decision::ApproveWithConditions => "APPROVE_WITH_CONDITIONS",
            Decision::Decline => "DECLINE",
        }
    }
}

/// Lending decision with the conditions or reasons that justify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Approve,
    ApproveWithConditions { conditions: Vec<String> },
    Decline { reasons: Vec<String> },
}

impl Recommendation {
    pub fn decision(&self) -> Decision {
        match self {
            Recommendation::Approve => Decision::Approve,
            Recommendation::ApproveWithConditions { .. } => Decision::ApproveWithConditions,
            Recommendation::Decline { .. } => Decision::Decline,
        }
    }

    pub fn conditions(&self) -> &[String] {
        match self {
            Recommendation::ApproveWithConditions { conditions } => conditions,
            _ => &[],
        }
    }

    pub fn reasons(&self) -> &[String] {
        match self {
            Recommendation::Decline { reasons } => reasons,
            _ => &[],
        }
    }
}

/// First matching rule wins: multi-factor decline, coverage decline,
/// conditional approval for elevated risk, otherwise approval.
pub fn recommend(assessment: &RiskAssessment, dscr: f64, stability_score: u8) -> Recommendation {
    let tier = assessment.tier;

    if tier == RiskTier::High && assessment.high_severity_count() >= 2 {
        let mut reasons = vec!["Multiple critical risk factors identified".to_string()];
        if dscr < DECLINE_DSCR {
            reasons.push(format!(
                "DSCR of {dscr:.2} indicates insufficient debt service capacity"
            ));
        }
        reasons.push("High volatility or cash flow concerns".to_string());
        return Recommendation::Decline { reasons };
    }

    if dscr < DECLINE_DSCR {
        return Recommendation::Decline {
            reasons: vec![
                format!("DSCR of {dscr:.2} is below {DECLINE_DSCR:.1} minimum threshold"),
                "Insufficient cash flow to service debt".to_string(),
            ],
        };
    }

    if matches!(tier, RiskTier::High | RiskTier::Moderate) {
        let mut conditions = Vec::new();

        if dscr < GUARANTEE_DSCR {
            conditions.push("Require personal guarantee from business owner");
        }
        if stability_score < REPORTING_STABILITY {
            conditions.push("Require quarterly financial reporting");
        }
        if assessment.has_flag(FlagKind::UnstableRevenue) {
            conditions.push("Monitor cash flow closely for first 12 months");
        }
        if assessment.has_flag(FlagKind::HighLeverage) {
            conditions.push("Reduce loan amount to 80% of request");
        }
        if assessment.has_flag(FlagKind::CashFlowIssues) {
            conditions.push("Establish cash reserve requirement of 3 months expenses");
        }
        if conditions.is_empty() {
            conditions.push("Standard terms with enhanced monitoring");
        }

        return Recommendation::ApproveWithConditions {
            conditions: conditions.into_iter().map(str::to_string).collect(),
        };
    }

    Recommendation::Approve
}
