use super::domain::{AnalyzeRequest, BusinessProfile, LoanApplication, LoanRequest};

/// Validation errors raised before an application reaches the pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("business_name must not be blank")]
    MissingBusinessName,
    #[error("loan_amount must be greater than zero (found {0})")]
    NonPositiveLoanAmount(f64),
    #[error("annual_interest_rate must be within (0, {max}] (found {found})")]
    InterestRateOutOfRange { max: f64, found: f64 },
    #[error("term_months must be greater than zero")]
    ZeroTerm,
    #[error("existing_debt must not be negative (found {0})")]
    NegativeExistingDebt(f64),
    #[error("{field} contains a non-finite amount")]
    NonFiniteAmount { field: &'static str },
}

pub const DEFAULT_MAX_INTEREST_RATE: f64 = 0.30;

/// Guard responsible for turning raw requests into `LoanApplication` instances.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    max_interest_rate: f64,
}

impl Default for IntakeGuard {
    fn default() -> Self {
        Self::with_max_interest_rate(DEFAULT_MAX_INTEREST_RATE)
    }
}

impl IntakeGuard {
    pub fn with_max_interest_rate(max_interest_rate: f64) -> Self {
        let sanitized = if max_interest_rate.is_finite() && max_interest_rate > 0.0 {
            max_interest_rate
        } else {
            DEFAULT_MAX_INTEREST_RATE
        };

        Self {
            max_interest_rate: sanitized,
        }
    }

    pub fn max_interest_rate(&self) -> f64 {
        self.max_interest_rate
    }

    /// Reject out-of-bound input; nothing is computed for a rejected request.
    pub fn application_from_request(
        &self,
        request: AnalyzeRequest,
    ) -> Result<LoanApplication, ValidationError> {
        if request.business_name.trim().is_empty() {
            return Err(ValidationError::MissingBusinessName);
        }

        ensure_finite("loan_amount", [request.loan_amount])?;
        if request.loan_amount <= 0.0 {
            return Err(ValidationError::NonPositiveLoanAmount(request.loan_amount));
        }

        let rate = request.annual_interest_rate;
        if !(rate.is_finite() && rate > 0.0 && rate <= self.max_interest_rate) {
            return Err(ValidationError::InterestRateOutOfRange {
                max: self.max_interest_rate,
                found: rate,
            });
        }

        if request.term_months == 0 {
            return Err(ValidationError::ZeroTerm);
        }

        ensure_finite("existing_debt", [request.existing_debt])?;
        if request.existing_debt < 0.0 {
            return Err(ValidationError::NegativeExistingDebt(request.existing_debt));
        }

        let bank = request.bank_data;
        ensure_finite("monthly_deposits", bank.monthly_deposits.iter().copied())?;
        ensure_finite("monthly_withdrawals", bank.monthly_withdrawals.iter().copied())?;
        ensure_finite("average_balance", bank.average_balance)?;

        if let Some(tax) = &request.tax_data {
            ensure_finite(
                "tax_data",
                [tax.gross_revenue, tax.total_expenses, tax.net_income],
            )?;
        }

        Ok(LoanApplication {
            business: BusinessProfile {
                business_name: request.business_name.trim().to_string(),
                industry: request.industry.trim().to_string(),
            },
            loan: LoanRequest {
                loan_amount: request.loan_amount,
                annual_interest_rate: rate,
                term_months: request.term_months,
                business_age_years: request.business_age_years,
                existing_debt: request.existing_debt,
            },
            bank,
            tax: request.tax_data,
        })
    }
}

fn ensure_finite(
    field: &'static str,
    values: impl IntoIterator<Item = f64>,
) -> Result<(), ValidationError> {
    if values.into_iter().all(f64::is_finite) {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteAmount { field })
    }
}
