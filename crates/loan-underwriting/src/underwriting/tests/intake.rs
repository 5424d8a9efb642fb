use super::common::*;
use crate::underwriting::domain::AnalyzeRequest;
use crate::underwriting::intake::{IntakeGuard, ValidationError, DEFAULT_MAX_INTEREST_RATE};
use serde_json::json;

#[test]
fn guard_accepts_reference_request() {
    let application = IntakeGuard::default()
        .application_from_request(analyze_request())
        .expect("reference request is valid");

    assert_eq!(application, reference_application());
}

#[test]
fn guard_trims_business_identity() {
    let mut request = analyze_request();
    request.business_name = "  ABC Construction LLC \n".to_string();
    request.industry = " Construction ".to_string();

    let application = IntakeGuard::default()
        .application_from_request(request)
        .expect("valid");

    assert_eq!(application.business.business_name, "ABC Construction LLC");
    assert_eq!(application.business.industry, "Construction");
}

#[test]
fn guard_rejects_blank_business_name() {
    let mut request = analyze_request();
    request.business_name = "   ".to_string();

    assert_eq!(
        IntakeGuard::default().application_from_request(request),
        Err(ValidationError::MissingBusinessName)
    );
}

#[test]
fn guard_rejects_non_positive_loan_amount() {
    let mut request = analyze_request();
    request.loan_amount = 0.0;

    match IntakeGuard::default().application_from_request(request) {
        Err(ValidationError::NonPositiveLoanAmount(amount)) => assert_eq!(amount, 0.0),
        other => panic!("expected loan amount rejection, got {other:?}"),
    }
}

#[test]
fn guard_bounds_interest_rate() {
    let guard = IntakeGuard::default();
    assert_eq!(guard.max_interest_rate(), DEFAULT_MAX_INTEREST_RATE);

    for rate in [0.0, -0.05, 0.31, f64::NAN] {
        let mut request = analyze_request();
        request.annual_interest_rate = rate;
        match guard.application_from_request(request) {
            Err(ValidationError::InterestRateOutOfRange { max, .. }) => assert_eq!(max, 0.30),
            other => panic!("expected rate rejection for {rate}, got {other:?}"),
        }
    }

    let mut request = analyze_request();
    request.annual_interest_rate = 0.30;
    assert!(guard.application_from_request(request).is_ok());
}

#[test]
fn guard_honors_custom_rate_ceiling() {
    let guard = IntakeGuard::with_max_interest_rate(0.10);
    let mut request = analyze_request();
    request.annual_interest_rate = 0.12;

    assert!(matches!(
        guard.application_from_request(request),
        Err(ValidationError::InterestRateOutOfRange { .. })
    ));
    assert_eq!(
        IntakeGuard::with_max_interest_rate(-1.0).max_interest_rate(),
        DEFAULT_MAX_INTEREST_RATE
    );
}

#[test]
fn guard_rejects_zero_term_and_negative_debt() {
    let mut request = analyze_request();
    request.term_months = 0;
    assert_eq!(
        IntakeGuard::default().application_from_request(request),
        Err(ValidationError::ZeroTerm)
    );

    let mut request = analyze_request();
    request.existing_debt = -1.0;
    assert_eq!(
        IntakeGuard::default().application_from_request(request),
        Err(ValidationError::NegativeExistingDebt(-1.0))
    );
}

#[test]
fn guard_rejects_non_finite_amounts() {
    let mut request = analyze_request();
    request.bank_data.monthly_deposits[3] = f64::INFINITY;
    assert_eq!(
        IntakeGuard::default().application_from_request(request),
        Err(ValidationError::NonFiniteAmount {
            field: "monthly_deposits"
        })
    );

    let mut request = analyze_request();
    if let Some(tax) = request.tax_data.as_mut() {
        tax.net_income = f64::NAN;
    }
    assert_eq!(
        IntakeGuard::default().application_from_request(request),
        Err(ValidationError::NonFiniteAmount { field: "tax_data" })
    );
}

#[test]
fn request_defaults_fill_optional_fields() {
    let request: AnalyzeRequest = serde_json::from_value(json!({
        "business_name": "Minimal LLC",
        "industry": "Services",
        "loan_amount": 25000,
        "bank_data": {
            "monthly_deposits": [10000, 11000],
            "monthly_withdrawals": [9000, 9500]
        }
    }))
    .expect("minimal payload decodes");

    assert_eq!(request.annual_interest_rate, 0.08);
    assert_eq!(request.term_months, 60);
    assert_eq!(request.business_age_years, 0);
    assert_eq!(request.existing_debt, 0.0);
    assert_eq!(request.bank_data.nsf_fees, 0);
    assert!(request.tax_data.is_none());
    assert!(IntakeGuard::default().application_from_request(request).is_ok());
}
