use serde::{Deserialize, Serialize};

pub const DEFAULT_ANNUAL_INTEREST_RATE: f64 = 0.08;
pub const DEFAULT_TERM_MONTHS: u32 = 60;

/// Bank statement figures, one entry per month in statement order.
///
/// Deposit and withdrawal series are averaged independently and need not be
/// the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankRecord {
    pub monthly_deposits: Vec<f64>,
    pub monthly_withdrawals: Vec<f64>,
    /// Non-sufficient-funds incidents over the trailing twelve months.
    #[serde(default)]
    pub nsf_fees: u32,
    #[serde(default)]
    pub average_balance: Option<f64>,
    #[serde(default)]
    pub months_covered: Option<u32>,
}

/// Figures lifted from the most recent business tax filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRecord {
    pub gross_revenue: f64,
    pub total_expenses: f64,
    pub net_income: f64,
    pub tax_year: i32,
}

/// Requested loan structure together with the borrower facts that shape it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub loan_amount: f64,
    /// Decimal fraction, e.g. `0.08` for 8%.
    pub annual_interest_rate: f64,
    pub term_months: u32,
    pub business_age_years: u32,
    pub existing_debt: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub business_name: String,
    pub industry: String,
}

/// Validated application handed to the underwriting pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub business: BusinessProfile,
    pub loan: LoanRequest,
    pub bank: BankRecord,
    pub tax: Option<TaxRecord>,
}

/// Inbound payload shared by the analyze and quick-score endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub business_name: String,
    pub industry: String,
    pub loan_amount: f64,
    #[serde(default)]
    pub business_age_years: u32,
    #[serde(default = "default_interest_rate")]
    pub annual_interest_rate: f64,
    #[serde(default = "default_term_months")]
    pub term_months: u32,
    pub bank_data: BankRecord,
    #[serde(default)]
    pub tax_data: Option<TaxRecord>,
    #[serde(default)]
    pub existing_debt: f64,
}

fn default_interest_rate() -> f64 {
    DEFAULT_ANNUAL_INTEREST_RATE
}

fn default_term_months() -> u32 {
    DEFAULT_TERM_MONTHS
}
