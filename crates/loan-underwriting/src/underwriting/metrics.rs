//! Financial metrics derived from bank statements, tax filings, and loan terms.
//!
//! Every function here is total: empty series, zero revenue, and zero-length
//! terms resolve to `0.0` instead of failing.

use serde::{Deserialize, Serialize};

use super::domain::{BankRecord, LoanRequest, TaxRecord};

/// Months averaged on each side of the revenue trend comparison.
const TREND_WINDOW: usize = 6;
const AGE_CAP_YEARS: u32 = 10;

/// Standardized metrics produced for every analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub avg_monthly_revenue: f64,
    pub revenue_volatility: f64,
    pub avg_monthly_cash_flow: f64,
    pub dscr: f64,
    pub debt_to_revenue: f64,
    pub annual_revenue: f64,
    pub net_income: f64,
    pub stability_score: u8,
    pub total_debt: f64,
    pub revenue_trend: f64,
}

impl FinancialMetrics {
    /// First metric that failed to resolve to a finite number, if any.
    pub fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        [
            ("avg_monthly_revenue", self.avg_monthly_revenue),
            ("revenue_volatility", self.revenue_volatility),
            ("avg_monthly_cash_flow", self.avg_monthly_cash_flow),
            ("dscr", self.dscr),
            ("debt_to_revenue", self.debt_to_revenue),
            ("annual_revenue", self.annual_revenue),
            ("net_income", self.net_income),
            ("total_debt", self.total_debt),
            ("revenue_trend", self.revenue_trend),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    }
}

/// Stateless calculator mapping raw figures onto `FinancialMetrics`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsEngine;

impl MetricsEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(
        &self,
        bank: &BankRecord,
        tax: Option<&TaxRecord>,
        loan: &LoanRequest,
    ) -> FinancialMetrics {
        let deposits = &bank.monthly_deposits;

        let avg_monthly_revenue = average_monthly_revenue(deposits);
        let revenue_volatility = revenue_volatility(deposits);

        let avg_monthly_cash_flow = match (mean(deposits), mean(&bank.monthly_withdrawals)) {
            (Some(inflow), Some(outflow)) => inflow - outflow,
            _ => 0.0,
        };

        // Existing debt is amortized on the new loan's rate and term: a
        // conservative stand-in for its real schedule.
        let new_loan_payment = monthly_payment(
            loan.loan_amount,
            loan.annual_interest_rate,
            loan.term_months,
        );
        let existing_debt_payment = monthly_payment(
            loan.existing_debt,
            loan.annual_interest_rate,
            loan.term_months,
        );
        let total_monthly_payment = new_loan_payment + existing_debt_payment;
        let dscr = dscr(avg_monthly_cash_flow, total_monthly_payment);

        let total_debt = loan.existing_debt + loan.loan_amount;
        let annual_revenue = tax
            .map(|record| record.gross_revenue)
            .filter(|revenue| *revenue > 0.0)
            .unwrap_or(avg_monthly_revenue * 12.0);
        let net_income = tax.map(|record| record.net_income).unwrap_or(0.0);
        let debt_to_revenue = debt_to_revenue(total_debt, annual_revenue);

        let revenue_trend = revenue_trend(deposits);
        let stability_score = stability_score(
            revenue_volatility,
            loan.business_age_years,
            bank.nsf_fees,
            revenue_trend,
        );

        FinancialMetrics {
            avg_monthly_revenue,
            revenue_volatility,
            avg_monthly_cash_flow: round_to(avg_monthly_cash_flow, 2),
            dscr,
            debt_to_revenue,
            annual_revenue,
            net_income,
            stability_score,
            total_debt,
            revenue_trend: round_to(revenue_trend, 4),
        }
    }
}

pub fn average_monthly_revenue(deposits: &[f64]) -> f64 {
    mean(deposits).map(|avg| round_to(avg, 2)).unwrap_or(0.0)
}

/// Coefficient of variation using the sample (n - 1) standard deviation.
pub fn revenue_volatility(series: &[f64]) -> f64 {
    if series.len() <= 1 {
        return 0.0;
    }

    let Some(avg) = mean(series) else {
        return 0.0;
    };
    if avg == 0.0 {
        return 0.0;
    }

    let squared: f64 = series.iter().map(|value| (value - avg).powi(2)).sum();
    let std_dev = (squared / (series.len() - 1) as f64).sqrt();
    round_to(std_dev / avg, 4)
}

/// Level payment for a fully amortizing loan.
///
/// This is the only payment formula in the crate; new and existing debt both
/// go through it.
pub fn monthly_payment(principal: f64, annual_rate: f64, term_months: u32) -> f64 {
    if principal == 0.0 || term_months == 0 {
        return 0.0;
    }

    let periods = term_months as f64;
    if annual_rate == 0.0 {
        return round_to(principal / periods, 2);
    }

    let monthly_rate = annual_rate / 12.0;
    let growth = (1.0 + monthly_rate).powf(periods);
    // Rates too small to move `growth` off 1.0 amortize like a zero rate.
    if growth - 1.0 <= 0.0 {
        return round_to(principal / periods, 2);
    }
    round_to(principal * (monthly_rate * growth) / (growth - 1.0), 2)
}

pub fn dscr(monthly_cash_flow: f64, total_monthly_payment: f64) -> f64 {
    if total_monthly_payment == 0.0 {
        return 0.0;
    }
    round_to(monthly_cash_flow / total_monthly_payment, 2)
}

pub fn debt_to_revenue(total_debt: f64, annual_revenue: f64) -> f64 {
    if annual_revenue == 0.0 {
        return 0.0;
    }
    round_to(total_debt / annual_revenue, 2)
}

/// Growth of months 7-12 over months 1-6; zero with fewer than twelve entries.
pub fn revenue_trend(deposits: &[f64]) -> f64 {
    if deposits.len() < TREND_WINDOW * 2 {
        return 0.0;
    }

    let first_half = deposits[..TREND_WINDOW].iter().sum::<f64>() / TREND_WINDOW as f64;
    let second_half =
        deposits[TREND_WINDOW..TREND_WINDOW * 2].iter().sum::<f64>() / TREND_WINDOW as f64;

    if first_half <= 0.0 {
        return 0.0;
    }
    (second_half - first_half) / first_half
}

/// Composite 0-100 durability score.
///
/// Weights: volatility 40, business age 30 (capped at ten years), NSF history
/// 30, plus `revenue_trend * 10`. Volatility is capped at 1.0 only, so a
/// negative value (negative-mean deposits) lifts the component past 40. The
/// sum is clamped and then truncated.
pub fn stability_score(
    revenue_volatility: f64,
    business_age_years: u32,
    nsf_count: u32,
    revenue_trend: f64,
) -> u8 {
    let volatility_component = (1.0 - revenue_volatility.min(1.0)).max(0.0) * 40.0;
    let age_component = business_age_years.min(AGE_CAP_YEARS) as f64 / AGE_CAP_YEARS as f64 * 30.0;
    let nsf_component = match nsf_count {
        0 => 30.0,
        1..=2 => 20.0,
        3..=5 => 10.0,
        _ => 0.0,
    };
    let trend_bonus = revenue_trend * 10.0;

    let total = volatility_component + age_component + nsf_component + trend_bonus;
    if total.is_nan() {
        return 0;
    }
    total.clamp(0.0, 100.0) as u8
}

/// Exact halves go to the even neighbour: `1000.125` rounds to `1000.12`.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

fn mean(series: &[f64]) -> Option<f64> {
    if series.is_empty() {
        None
    } else {
        Some(series.iter().sum::<f64>() / series.len() as f64)
    }
}
