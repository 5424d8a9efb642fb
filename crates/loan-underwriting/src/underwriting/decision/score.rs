use super::super::risk::RiskTier;

/// Composite 0-100 application strength.
///
/// Weights: risk tier 40, DSCR 30 (stepwise), stability 20, volatility 10.
pub fn underwriting_score(
    tier: RiskTier,
    dscr: f64,
    stability_score: u8,
    revenue_volatility: f64,
) -> u8 {
    let risk_component = match tier {
        RiskTier::Low => 40.0,
        RiskTier::Moderate => 25.0,
        RiskTier::High => 10.0,
    };

    let dscr_component = if dscr >= 1.75 {
        30.0
    } else if dscr >= 1.50 {
        25.0
    } else if dscr >= 1.25 {
        20.0
    } else if dscr >= 1.0 {
        10.0
    } else {
        0.0
    };

    let stability_component = f64::from(stability_score.min(100)) / 100.0 * 20.0;

    let volatility_component = if revenue_volatility.is_nan() {
        0.0
    } else {
        (1.0 - revenue_volatility.min(1.0)).max(0.0) * 10.0
    };

    let total = risk_component + dscr_component + stability_component + volatility_component;
    total.clamp(0.0, 100.0) as u8
}
