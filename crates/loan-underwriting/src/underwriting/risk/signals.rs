use super::super::metrics::FinancialMetrics;

const STRONG_CASH_FLOW: f64 = 10_000.0;
const LOW_VOLATILITY: f64 = 0.20;
const LOW_LEVERAGE: f64 = 0.30;

/// Strengths worth surfacing next to the risk flags.
///
/// Independent of the flag rules: one metric may raise a flag on one axis and
/// a positive signal on another. Tiered signals emit only their highest tier.
pub fn positive_signals(metrics: &FinancialMetrics, nsf_count: u32) -> Vec<String> {
    let mut signals = Vec::new();

    if metrics.avg_monthly_cash_flow > STRONG_CASH_FLOW {
        signals.push("Strong cash flow reserves");
    }

    if metrics.dscr >= 1.75 {
        signals.push("Excellent DSCR");
    } else if metrics.dscr >= 1.5 {
        signals.push("Strong DSCR");
    } else if metrics.dscr >= 1.25 {
        signals.push("Adequate DSCR");
    }

    if metrics.revenue_volatility < LOW_VOLATILITY {
        signals.push("Low revenue volatility");
    }

    if metrics.stability_score >= 80 {
        signals.push("High business stability");
    } else if metrics.stability_score >= 70 {
        signals.push("Good business stability");
    }

    if metrics.revenue_trend > 0.15 {
        signals.push("Strong revenue growth");
    } else if metrics.revenue_trend > 0.0 {
        signals.push("Growing revenue");
    }

    if nsf_count == 0 {
        signals.push("Clean payment history");
    }

    if metrics.debt_to_revenue < LOW_LEVERAGE {
        signals.push("Low financial leverage");
    }

    signals.into_iter().map(str::to_string).collect()
}
