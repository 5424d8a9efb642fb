use super::super::format::{currency, percent};
use super::super::metrics::FinancialMetrics;
use super::{FlagKind, RiskFlag};

pub(crate) const MIN_DSCR: f64 = 1.25;
pub(crate) const MAX_VOLATILITY: f64 = 0.40;
pub(crate) const MAX_NSF_FEES: u32 = 3;
pub(crate) const MAX_DEBT_TO_REVENUE: f64 = 0.50;
pub(crate) const MIN_REVENUE_TREND: f64 = -0.10;

/// Run every check in its fixed order.
///
/// Downstream conditions read flags in this order, so it must not change.
pub fn evaluate_rules(metrics: &FinancialMetrics, nsf_count: u32) -> Vec<RiskFlag> {
    [
        check_low_dscr(metrics.dscr),
        check_unstable_revenue(metrics.revenue_volatility),
        check_cash_flow_issues(nsf_count),
        check_high_leverage(metrics.debt_to_revenue),
        check_negative_cash_flow(metrics.avg_monthly_cash_flow),
        check_declining_revenue(metrics.revenue_trend),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn check_low_dscr(dscr: f64) -> Option<RiskFlag> {
    (dscr < MIN_DSCR).then(|| {
        RiskFlag::new(
            FlagKind::LowDscr,
            format!("DSCR of {dscr:.2} is below {MIN_DSCR:.2} minimum threshold"),
        )
    })
}

pub fn check_unstable_revenue(volatility: f64) -> Option<RiskFlag> {
    (volatility > MAX_VOLATILITY).then(|| {
        RiskFlag::new(
            FlagKind::UnstableRevenue,
            format!(
                "Revenue volatility of {} indicates unstable cash flow",
                percent(volatility)
            ),
        )
    })
}

pub fn check_cash_flow_issues(nsf_fees: u32) -> Option<RiskFlag> {
    (nsf_fees > MAX_NSF_FEES).then(|| {
        RiskFlag::new(
            FlagKind::CashFlowIssues,
            format!("{nsf_fees} NSF fees indicate recurring cash flow problems"),
        )
    })
}

pub fn check_high_leverage(debt_to_revenue: f64) -> Option<RiskFlag> {
    (debt_to_revenue > MAX_DEBT_TO_REVENUE).then(|| {
        RiskFlag::new(
            FlagKind::HighLeverage,
            format!(
                "Debt-to-revenue ratio of {} exceeds 50% threshold",
                percent(debt_to_revenue)
            ),
        )
    })
}

pub fn check_negative_cash_flow(avg_monthly_cash_flow: f64) -> Option<RiskFlag> {
    (avg_monthly_cash_flow < 0.0).then(|| {
        RiskFlag::new(
            FlagKind::NegativeCashFlow,
            format!(
                "Negative average monthly cash flow of {}",
                currency(avg_monthly_cash_flow)
            ),
        )
    })
}

pub fn check_declining_revenue(revenue_trend: f64) -> Option<RiskFlag> {
    (revenue_trend < MIN_REVENUE_TREND).then(|| {
        RiskFlag::new(
            FlagKind::DecliningRevenue,
            format!("Revenue declining by {}", percent(revenue_trend.abs())),
        )
    })
}
