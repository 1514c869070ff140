use crate::commands::{run_analyze, run_chat, run_risk, AnalyzeArgs, ChatArgs, RiskArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use legal_desk::error::AppError;
use legal_desk::workflows::analysis::AnalysisMode;

#[derive(Parser, Debug)]
#[command(
    name = "Legal Desk",
    about = "Run the legal services desk or try its workflows from the command line",
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
    /// Score a business profile with the risk assessment rules
    Risk(RiskArgs),
    /// Ask the legal assistant a question, or chat line by line from stdin
    Chat(ChatArgs),
    /// Analyze a document and print progress as it happens
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the default analysis mode (simulated or remote)
    #[arg(long)]
    pub(crate) analysis_mode: Option<AnalysisMode>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Risk(args) => run_risk(args),
        Command::Chat(args) => run_chat(args).await,
        Command::Analyze(args) => run_analyze(args).await,
    }
}
