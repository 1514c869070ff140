use clap::Args;
use legal_desk::config::AppConfig;
use legal_desk::error::AppError;
use legal_desk::workflows::analysis::{
    AnalysisDesk, AnalysisMode, AnalysisPhase, DocumentUpload, HttpAnalysisBackend, Pacing,
    ProgressSnapshot, RandomIncrements, SimulationEnd,
};
use legal_desk::workflows::assistant::{ChatExchange, ChatTranscript};
use legal_desk::workflows::risk::{assess, RiskAssessment, RiskAssessmentInput};
use legal_desk::workflows::session::DeskError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Args, Debug, Default)]
pub(crate) struct RiskArgs {
    /// Business type (startup, small-business, corporation, non-profit)
    #[arg(long, default_value = "")]
    pub(crate) business_type: String,
    /// Industry (technology, healthcare, finance, retail, manufacturing)
    #[arg(long, default_value = "")]
    pub(crate) industry: String,
    /// Employee band (1-10, 11-50, 51-200, 200+)
    #[arg(long, default_value = "")]
    pub(crate) employees: String,
    /// Legal concern tag; repeat for several (contracts, compliance, ...)
    #[arg(long = "concern")]
    pub(crate) concerns: Vec<String>,
    /// Print the rendered HTML fragment instead of the text summary
    #[arg(long)]
    pub(crate) html: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ChatArgs {
    /// Ask a single question and exit; without it, questions are read from stdin
    #[arg(long)]
    pub(crate) message: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Document to analyze (PDF, DOC, or DOCX)
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Analysis path; defaults to APP_ANALYSIS_MODE
    #[arg(long)]
    pub(crate) mode: Option<AnalysisMode>,
    /// Override the remote analysis endpoint
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
}

pub(crate) fn run_risk(args: RiskArgs) -> Result<(), AppError> {
    let input = RiskAssessmentInput {
        business_type: args.business_type,
        industry: args.industry,
        employee_count: args.employees,
        concerns: args.concerns,
    };
    let assessment = assess(&input);

    if args.html {
        println!("{}", assessment.render_html());
    } else {
        print!("{}", render_risk_text(&assessment));
    }
    Ok(())
}

fn render_risk_text(assessment: &RiskAssessment) -> String {
    let mut out = format!("{}\n", assessment.summary_line());
    out.push_str("Score breakdown:\n");
    for component in &assessment.components {
        out.push_str(&format!(
            "  {:>+4}  {}\n",
            component.points, component.notes
        ));
    }
    if !assessment.risk_factors.is_empty() {
        out.push_str("Risk factors:\n");
        for factor in &assessment.risk_factors {
            out.push_str(&format!("  - {factor}\n"));
        }
    }
    out.push_str("Recommendations:\n");
    for recommendation in &assessment.recommendations {
        out.push_str(&format!("  - {recommendation}\n"));
    }
    out
}

pub(crate) async fn run_chat(args: ChatArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let delay = config.desk.chat_reply_delay;
    let mut transcript = ChatTranscript::default();

    if let Some(message) = args.message {
        if let Some(exchange) = transcript.send(&message) {
            println!("Assistant: {}", exchange.bot.text);
        }
        return Ok(());
    }

    println!("Legal assistant ready. Type a question, or 'exit' to leave.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }
        if let Some(exchange) = transcript.send(&line) {
            reply_after(delay, &exchange).await;
        }
    }
    Ok(())
}

async fn reply_after(delay: Duration, exchange: &ChatExchange) {
    tokio::time::sleep(delay).await;
    println!("Assistant: {}\n", exchange.bot.text);
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let upload = read_document(&args.file)?;
    let mode = args.mode.unwrap_or(config.desk.analysis_mode);
    let desk = AnalysisDesk::new();

    println!("Analyzing {} ({} mode)", upload.file_name, mode);
    match mode {
        AnalysisMode::Simulated => {
            let ticket = desk
                .start_simulated(&upload.candidate())
                .map_err(DeskError::from)?;
            let mut updates = desk.subscribe();
            let printer = async {
                while updates.changed().await.is_ok() {
                    let snapshot = updates.borrow_and_update().clone();
                    println!("{}", progress_line(&snapshot));
                    if snapshot.phase != AnalysisPhase::Running {
                        break;
                    }
                }
            };
            let run = desk.run_simulation(ticket, Pacing::from(&config.desk), RandomIncrements::new());
            let (end, ()) = tokio::join!(run, printer);

            if let SimulationEnd::Presented(report) = end {
                println!("\nDocument: {}", report.document);
                println!("Analysis Date: {}", report.analysis_date.format("%Y-%m-%d"));
                println!("Risk Level: {}", report.risk_level.label());
                println!("Key Findings:");
                for finding in &report.key_findings {
                    println!("  - {finding}");
                }
            }
        }
        AnalysisMode::Remote => {
            let endpoint = args
                .endpoint
                .unwrap_or_else(|| config.desk.analysis_endpoint.clone());
            let backend = HttpAnalysisBackend::new(endpoint);
            let analysis = desk
                .analyze_remote(&backend, &upload)
                .await
                .map_err(DeskError::from)?;
            println!("{}", analysis.notice());
        }
    }
    Ok(())
}

fn read_document(path: &Path) -> Result<DocumentUpload, AppError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let media_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());

    Ok(DocumentUpload {
        file_name,
        media_type,
        bytes,
    })
}

fn progress_line(snapshot: &ProgressSnapshot) -> String {
    format!(
        "[{:>5.1}%] {}",
        snapshot.progress_percent,
        snapshot.step_label.unwrap_or_default()
    )
}
