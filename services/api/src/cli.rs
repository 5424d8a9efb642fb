use crate::demo::{run_demo, run_score, DemoArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_underwriting::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Underwriting Service",
    about = "Score small-business loan applications over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a JSON loan application file and print the analysis
    Score(ScoreArgs),
    /// Score the built-in sample applications
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
