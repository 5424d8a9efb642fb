use crate::infra::{build_pipeline, load_request, sample_request, struggling_request};
use chrono::Utc;
use clap::Args;
use loan_underwriting::config::{AppConfig, MemoConfig};
use loan_underwriting::error::AppError;
use loan_underwriting::underwriting::format::{currency, percent};
use loan_underwriting::underwriting::{
    AnalysisResponse, PipelineMode, QuickScoreResponse, UnderwritingReport,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a JSON loan application (same shape as the /api/analyze body)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Also generate the credit memo and print the full analysis envelope
    #[arg(long)]
    pub(crate) memo: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Generate credit memos (uses the template unless OPENAI_API_KEY is set)
    #[arg(long)]
    pub(crate) memo: bool,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { input, memo } = args;

    let memo_config = memo_settings()?;
    let pipeline = build_pipeline(&memo_config)?;
    let request = load_request(&input)?;

    let mode = if memo {
        PipelineMode::Full
    } else {
        PipelineMode::ScoreOnly
    };
    let report = pipeline.analyze_request(request, mode).await?;

    let json = if memo {
        serde_json::to_string_pretty(&AnalysisResponse::from_report(report, Utc::now()))?
    } else {
        serde_json::to_string_pretty(&QuickScoreResponse::from(&report))?
    };
    println!("{json}");
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let memo_config = memo_settings()?;
    let pipeline = build_pipeline(&memo_config)?;
    let mode = if args.memo {
        PipelineMode::Full
    } else {
        PipelineMode::ScoreOnly
    };

    println!("Loan underwriting demo");
    for request in [sample_request(), struggling_request()] {
        match pipeline.analyze_request(request, mode).await {
            Ok(report) => render_report(&report),
            Err(err) => println!("\n  Application rejected: {err}"),
        }
    }

    Ok(())
}

/// Memo settings from the environment; other sections are irrelevant offline.
fn memo_settings() -> Result<MemoConfig, AppError> {
    Ok(AppConfig::load()?.memo)
}

fn render_report(report: &UnderwritingReport) {
    let metrics = &report.metrics;
    let assessment = &report.assessment;

    println!(
        "\n{} ({}) requesting {} over {} months",
        report.business.business_name,
        report.business.industry,
        currency(report.loan.loan_amount),
        report.loan.term_months
    );
    println!(
        "- Revenue {} / month | volatility {} | trend {}",
        currency(metrics.avg_monthly_revenue),
        percent(metrics.revenue_volatility),
        percent(metrics.revenue_trend)
    );
    println!(
        "- Cash flow {} / month | DSCR {:.2} | debt-to-revenue {}",
        currency(metrics.avg_monthly_cash_flow),
        metrics.dscr,
        percent(metrics.debt_to_revenue)
    );
    println!("- Stability score {}/100", metrics.stability_score);
    println!("- Risk level {}", assessment.tier.label());

    if assessment.flags.is_empty() {
        println!("  Risk flags: none");
    } else {
        println!("  Risk flags:");
        for flag in &assessment.flags {
            println!(
                "    - [{}] {}: {}",
                flag.severity.label(),
                flag.flag.label(),
                flag.message
            );
        }
    }
    if !assessment.positive_signals.is_empty() {
        println!("  Positive signals: {}", assessment.positive_signals.join(", "));
    }

    println!(
        "  Decision: {} (score {})",
        report.recommendation.decision().label(),
        report.underwriting_score
    );
    for condition in report.recommendation.conditions() {
        println!("    condition: {condition}");
    }
    for reason in report.recommendation.reasons() {
        println!("    reason: {reason}");
    }

    if let Some(memo) = &report.memo {
        println!("  Credit memo ({:?}):", memo.source);
        for line in memo.text.lines() {
            println!("    {line}");
        }
    }
}
