use super::super::format::currency;
use super::super::risk::RiskTier;
use super::MemoFacts;

/// Deterministic three-paragraph memo built only from the structured facts.
pub fn fallback_memo(facts: &MemoFacts<'_>) -> String {
    let MemoFacts {
        business,
        loan,
        metrics,
        assessment,
        recommendation,
    } = *facts;

    let coverage = if metrics.dscr >= 1.25 {
        "meets"
    } else {
        "falls below"
    };
    let outlook = if assessment.tier == RiskTier::Low {
        "Positive indicators include strong financial metrics and stable operations."
    } else {
        "Some concerns identified that require attention."
    };

    let mut memo = format!(
        "CREDIT MEMO - {name}\n\n\
         BUSINESS OVERVIEW:\n\
         {name} operates in the {industry} sector and is requesting a loan of {amount}. \
         Based on financial document analysis, the business demonstrates average monthly revenue of {revenue}.\n\n\
         FINANCIAL ANALYSIS:\n\
         The applicant's Debt Service Coverage Ratio (DSCR) of {dscr:.2} {coverage} industry standards for approval. \
         Overall risk assessment indicates {tier} risk level. {outlook}\n\n\
         RECOMMENDATION:\n\
         Based on the comprehensive analysis, the recommendation is to {decision}.",
        name = business.business_name,
        industry = business.industry,
        amount = currency(loan.loan_amount),
        revenue = currency(metrics.avg_monthly_revenue),
        dscr = metrics.dscr,
        tier = assessment.tier.label(),
        decision = recommendation.decision().label().replace('_', " "),
    );

    if !recommendation.conditions().is_empty() {
        memo.push_str("\n\nCONDITIONS:");
        for condition in recommendation.conditions() {
            memo.push_str("\n- ");
            memo.push_str(condition);
        }
    }

    if !recommendation.reasons().is_empty() {
        memo.push_str("\n\nREASONS:");
        for reason in recommendation.reasons() {
            memo.push_str("\n- ");
            memo.push_str(reason);
        }
    }

    memo
}
