use loan_underwriting::config::MemoConfig;
use loan_underwriting::error::AppError;
use loan_underwriting::underwriting::{
    generator_from_config, AnalyzeRequest, BankRecord, TaxRecord, TextGenerator,
    UnderwritingPipeline,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type SharedPipeline = Arc<UnderwritingPipeline<dyn TextGenerator>>;

/// Wire the pipeline to the configured memo collaborator.
pub(crate) fn build_pipeline(config: &MemoConfig) -> Result<SharedPipeline, AppError> {
    let generator = generator_from_config(config)?;
    Ok(Arc::new(UnderwritingPipeline::new(generator, config)))
}

pub(crate) fn load_request(path: &Path) -> Result<AnalyzeRequest, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Twelve steady months for an established contractor.
pub(crate) fn sample_request() -> AnalyzeRequest {
    AnalyzeRequest {
        business_name: "ABC Construction LLC".to_string(),
        industry: "Construction".to_string(),
        loan_amount: 50_000.0,
        business_age_years: 5,
        annual_interest_rate: 0.08,
        term_months: 60,
        bank_data: BankRecord {
            monthly_deposits: vec![
                42_000.0, 38_000.0, 51_000.0, 45_000.0, 43_000.0, 47_000.0, 46_000.0, 44_000.0,
                49_000.0, 45_000.0, 44_000.0, 46_000.0,
            ],
            monthly_withdrawals: vec![
                35_000.0, 32_000.0, 38_000.0, 36_000.0, 34_000.0, 37_000.0, 36_000.0, 35_000.0,
                38_000.0, 36_000.0, 35_000.0, 37_000.0,
            ],
            nsf_fees: 1,
            average_balance: Some(15_000.0),
            months_covered: Some(12),
        },
        tax_data: Some(TaxRecord {
            gross_revenue: 540_000.0,
            total_expenses: 420_000.0,
            net_income: 120_000.0,
            tax_year: 2024,
        }),
        existing_debt: 80_000.0,
    }
}

/// A shrinking restaurant with overdrafts; exercises the decline path.
pub(crate) fn struggling_request() -> AnalyzeRequest {
    AnalyzeRequest {
        business_name: "Corner Bistro".to_string(),
        industry: "Restaurant".to_string(),
        loan_amount: 75_000.0,
        business_age_years: 2,
        annual_interest_rate: 0.08,
        term_months: 60,
        bank_data: BankRecord {
            monthly_deposits: vec![
                30_000.0, 29_000.0, 28_000.0, 27_000.0, 26_000.0, 25_000.0, 22_000.0, 21_000.0,
                20_000.0, 19_000.0, 18_000.0, 17_000.0,
            ],
            monthly_withdrawals: vec![30_000.0; 12],
            nsf_fees: 6,
            average_balance: None,
            months_covered: Some(12),
        },
        tax_data: None,
        existing_debt: 40_000.0,
    }
}
