use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::underwriting::domain::{
    AnalyzeRequest, BankRecord, BusinessProfile, LoanApplication, LoanRequest, TaxRecord,
};
use crate::underwriting::memo::{MemoError, MemoPrompt, TextGenerator};
use crate::underwriting::metrics::FinancialMetrics;
use crate::underwriting::risk::{RiskAssessment, RiskFlag, RiskTier};
use crate::underwriting::pipeline::UnderwritingPipeline;
use crate::underwriting::{underwriting_router, IntakeGuard};

pub(super) const REFERENCE_DEPOSITS: [f64; 12] = [
    42_000.0, 38_000.0, 51_000.0, 45_000.0, 43_000.0, 47_000.0, 46_000.0, 44_000.0, 49_000.0,
    45_000.0, 44_000.0, 46_000.0,
];

pub(super) const REFERENCE_WITHDRAWALS: [f64; 12] = [
    35_000.0, 32_000.0, 38_000.0, 36_000.0, 34_000.0, 37_000.0, 36_000.0, 35_000.0, 38_000.0,
    36_000.0, 35_000.0, 37_000.0,
];

pub(super) fn reference_bank() -> BankRecord {
    BankRecord {
        monthly_deposits: REFERENCE_DEPOSITS.to_vec(),
        monthly_withdrawals: REFERENCE_WITHDRAWALS.to_vec(),
        nsf_fees: 1,
        average_balance: Some(15_000.0),
        months_covered: Some(12),
    }
}

pub(super) fn reference_tax() -> TaxRecord {
    TaxRecord {
        gross_revenue: 540_000.0,
        total_expenses: 420_000.0,
        net_income: 120_000.0,
        tax_year: 2024,
    }
}

pub(super) fn reference_loan() -> LoanRequest {
    LoanRequest {
        loan_amount: 50_000.0,
        annual_interest_rate: 0.08,
        term_months: 60,
        business_age_years: 5,
        existing_debt: 80_000.0,
    }
}

pub(super) fn reference_application() -> LoanApplication {
    LoanApplication {
        business: BusinessProfile {
            business_name: "ABC Construction LLC".to_string(),
            industry: "Construction".to_string(),
        },
        loan: reference_loan(),
        bank: reference_bank(),
        tax: Some(reference_tax()),
    }
}

/// Same business carrying enough existing debt to trip the leverage rule.
pub(super) fn leveraged_application() -> LoanApplication {
    let mut application = reference_application();
    application.loan.existing_debt = 300_000.0;
    application
}

/// Shrinking deposits, withdrawals above deposits, and repeated NSF fees.
pub(super) fn struggling_application() -> LoanApplication {
    LoanApplication {
        business: BusinessProfile {
            business_name: "Corner Bistro".to_string(),
            industry: "Restaurant".to_string(),
        },
        loan: LoanRequest {
            loan_amount: 75_000.0,
            annual_interest_rate: 0.08,
            term_months: 60,
            business_age_years: 2,
            existing_debt: 40_000.0,
        },
        bank: BankRecord {
            monthly_deposits: vec![
                30_000.0, 29_000.0, 28_000.0, 27_000.0, 26_000.0, 25_000.0, 22_000.0, 21_000.0,
                20_000.0, 19_000.0, 18_000.0, 17_000.0,
            ],
            monthly_withdrawals: vec![30_000.0; 12],
            nsf_fees: 6,
            average_balance: None,
            months_covered: None,
        },
        tax: None,
    }
}

pub(super) fn empty_bank_application() -> LoanApplication {
    LoanApplication {
        business: BusinessProfile {
            business_name: "Fresh Start Co".to_string(),
            industry: "Retail".to_string(),
        },
        loan: LoanRequest {
            loan_amount: 50_000.0,
            annual_interest_rate: 0.08,
            term_months: 60,
            business_age_years: 3,
            existing_debt: 0.0,
        },
        bank: BankRecord {
            monthly_deposits: Vec::new(),
            monthly_withdrawals: Vec::new(),
            nsf_fees: 0,
            average_balance: None,
            months_covered: None,
        },
        tax: None,
    }
}

pub(super) fn analyze_request() -> AnalyzeRequest {
    let application = reference_application();
    AnalyzeRequest {
        business_name: application.business.business_name,
        industry: application.business.industry,
        loan_amount: application.loan.loan_amount,
        business_age_years: application.loan.business_age_years,
        annual_interest_rate: application.loan.annual_interest_rate,
        term_months: application.loan.term_months,
        bank_data: application.bank,
        tax_data: application.tax,
        existing_debt: application.loan.existing_debt,
    }
}

/// Metrics that pass every risk rule; tests perturb individual fields.
pub(super) fn healthy_metrics() -> FinancialMetrics {
    FinancialMetrics {
        avg_monthly_revenue: 45_000.0,
        revenue_volatility: 0.074,
        avg_monthly_cash_flow: 9_250.0,
        dscr: 3.51,
        debt_to_revenue: 0.24,
        annual_revenue: 540_000.0,
        net_income: 120_000.0,
        stability_score: 72,
        total_debt: 130_000.0,
        revenue_trend: 0.0301,
    }
}

pub(super) fn assessment_of(tier: RiskTier, flags: Vec<RiskFlag>) -> RiskAssessment {
    RiskAssessment {
        tier,
        flags,
        positive_signals: Vec::new(),
    }
}

/// Fake text generator replaying a queue of scripted responses.
///
/// Once the script is exhausted every call fails with a transport error.
#[derive(Default)]
pub(super) struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, MemoError>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<MemoPrompt>>,
}

impl ScriptedGenerator {
    pub(super) fn new(responses: Vec<Result<String, MemoError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub(super) fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub(super) fn failing(error: MemoError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub(super) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn prompts(&self) -> Vec<MemoPrompt> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &MemoPrompt) -> Result<String, MemoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .expect("response mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(MemoError::Transport("script exhausted".to_string())))
    }
}

pub(super) const MEMO_TIMEOUT: Duration = Duration::from_secs(5);

pub(super) fn pipeline_with(
    generator: Arc<ScriptedGenerator>,
) -> UnderwritingPipeline<ScriptedGenerator> {
    UnderwritingPipeline::with_guard(IntakeGuard::default(), generator, MEMO_TIMEOUT, 1)
}

pub(super) fn router_with(generator: Arc<ScriptedGenerator>) -> axum::Router {
    underwriting_router(Arc::new(pipeline_with(generator)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
