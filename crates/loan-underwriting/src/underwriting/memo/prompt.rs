use serde::{Deserialize, Serialize};

use super::super::format::{currency, percent};
use super::MemoFacts;

pub const SYSTEM_PROMPT: &str =
    "You are a senior credit analyst with 15+ years experience in small business lending.";

/// System and user messages sent to the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoPrompt {
    pub system: String,
    pub user: String,
}

const INSTRUCTIONS: &str = "\
**INSTRUCTIONS:**
Write a professional 3-paragraph credit memo:

1. **Business Overview** (2-3 sentences): Briefly describe the business, loan purpose, and key business characteristics.

2. **Financial Analysis** (3-4 sentences): Analyze the financial metrics. Discuss DSCR, revenue stability, cash flow, and any notable strengths or weaknesses. Be specific with numbers.

3. **Recommendation** (2-3 sentences): State your recommendation clearly (APPROVE, APPROVE WITH CONDITIONS, or DECLINE). Explain the reasoning. If conditional approval, list specific conditions. If decline, explain why.

Write in a professional, objective tone. Be concise but thorough. Use specific numbers from the analysis.";

pub fn build_memo_prompt(facts: &MemoFacts<'_>) -> MemoPrompt {
    let MemoFacts {
        business,
        loan,
        metrics,
        assessment,
        recommendation,
    } = *facts;

    let flags = bullet_list(
        assessment
            .flags
            .iter()
            .map(|flag| format!("[{}] {}", flag.severity.label(), flag.message)),
    );
    let signals = bullet_list(assessment.positive_signals.iter().cloned());

    let mut decision = format!("- Decision: {}\n", recommendation.decision().label());
    if !recommendation.conditions().is_empty() {
        decision.push_str("- Conditions:\n");
        decision.push_str(&nested_list(recommendation.conditions()));
    }
    if !recommendation.reasons().is_empty() {
        decision.push_str("- Reasons for Decline:\n");
        decision.push_str(&nested_list(recommendation.reasons()));
    }

    let user = format!(
        "You are a senior credit analyst at a commercial lending institution. \
         Generate a professional credit memo for the following small business loan application.\n\n\
         **BUSINESS INFORMATION:**\n\
         - Business Name: {name}\n\
         - Industry: {industry}\n\
         - Loan Amount Requested: {amount}\n\n\
         **FINANCIAL ANALYSIS:**\n\
         - Average Monthly Revenue: {revenue}\n\
         - Debt Service Coverage Ratio (DSCR): {dscr:.2}\n\
         - Revenue Volatility: {volatility}\n\
         - Business Stability Score: {stability}/100\n\n\
         **RISK ASSESSMENT:**\n\
         - Overall Risk Level: {tier}\n\n\
         Risk Flags:\n{flags}\n\
         Positive Signals:\n{signals}\n\
         **RECOMMENDATION:**\n{decision}\n{INSTRUCTIONS}",
        name = business.business_name,
        industry = business.industry,
        amount = currency(loan.loan_amount),
        revenue = currency(metrics.avg_monthly_revenue),
        dscr = metrics.dscr,
        volatility = percent(metrics.revenue_volatility),
        stability = metrics.stability_score,
        tier = assessment.tier.label(),
    );

    MemoPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}

/// `- item` lines, or a single "None identified" line when empty.
fn bullet_list(items: impl Iterator<Item = String>) -> String {
    let lines: String = items.map(|item| format!("- {item}\n")).collect();
    if lines.is_empty() {
        "- None identified\n".to_string()
    } else {
        lines
    }
}

fn nested_list(items: &[String]) -> String {
    items.iter().map(|item| format!("  * {item}\n")).collect()
}
