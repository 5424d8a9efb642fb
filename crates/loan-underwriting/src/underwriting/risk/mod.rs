mod rules;
mod signals;

pub use rules::{
    check_cash_flow_issues, check_declining_revenue, check_high_leverage, check_low_dscr,
    check_negative_cash_flow, check_unstable_revenue, evaluate_rules,
};
pub use signals::positive_signals;

use serde::{Deserialize, Serialize};

use super::metrics::FinancialMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
        }
    }
}

/// Closed set of risk conditions the engine can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagKind {
    LowDscr,
    UnstableRevenue,
    CashFlowIssues,
    HighLeverage,
    NegativeCashFlow,
    DecliningRevenue,
}

impl FlagKind {
    pub const fn severity(self) -> Severity {
        match self {
            FlagKind::LowDscr | FlagKind::CashFlowIssues | FlagKind::NegativeCashFlow => {
                Severity::High
            }
            FlagKind::UnstableRevenue | FlagKind::HighLeverage | FlagKind::DecliningRevenue => {
                Severity::Medium
            }
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FlagKind::LowDscr => "LOW_DSCR",
            FlagKind::UnstableRevenue => "UNSTABLE_REVENUE",
            FlagKind::CashFlowIssues => "CASH_FLOW_ISSUES",
            FlagKind::HighLeverage => "HIGH_LEVERAGE",
            FlagKind::NegativeCashFlow => "NEGATIVE_CASH_FLOW",
            FlagKind::DecliningRevenue => "DECLINING_REVENUE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFlag {
    pub severity: Severity,
    pub flag: FlagKind,
    pub message: String,
}

impl RiskFlag {
    pub fn new(flag: FlagKind, message: impl Into<String>) -> Self {
        Self {
            severity: flag.severity(),
            flag,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Moderate => "MODERATE",
            RiskTier::High => "HIGH",
        }
    }
}

/// Any HIGH flag, or three MEDIUM flags, makes the application HIGH risk.
pub fn risk_tier(flags: &[RiskFlag]) -> RiskTier {
    let high = flags
        .iter()
        .filter(|flag| flag.severity == Severity::High)
        .count();
    let medium = flags
        .iter()
        .filter(|flag| flag.severity == Severity::Medium)
        .count();

    if high > 0 || medium >= 3 {
        RiskTier::High
    } else if medium >= 1 {
        RiskTier::Moderate
    } else {
        RiskTier::Low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(rename = "risk_level")]
    pub tier: RiskTier,
    pub flags: Vec<RiskFlag>,
    pub positive_signals: Vec<String>,
}

impl RiskAssessment {
    pub fn high_severity_count(&self) -> usize {
        self.flags
            .iter()
            .filter(|flag| flag.severity == Severity::High)
            .count()
    }

    pub fn has_flag(&self, kind: FlagKind) -> bool {
        self.flags.iter().any(|flag| flag.flag == kind)
    }
}

/// Stateless evaluator applying the fixed threshold rules to a metrics set.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskEngine;

impl RiskEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(&self, metrics: &FinancialMetrics, nsf_count: u32) -> RiskAssessment {
        let flags = evaluate_rules(metrics, nsf_count);
        let tier = risk_tier(&flags);
        let positive_signals = positive_signals(metrics, nsf_count);

        RiskAssessment {
            tier,
            flags,
            positive_signals,
        }
    }
}
