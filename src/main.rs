use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::info;

use jobmatch_client::session::SelectionError;
use jobmatch_client::utils::format_size;
use jobmatch_client::{
    AnalysisBackend, AnalysisError, AnalysisRequestState, AnalysisSession, EnvironmentConfig,
    FileValidator, JsonRenderer, Renderer, SelectionEvent, ServiceClient, TerminalRenderer,
};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "jobmatch")]
#[command(about = "Analyse a CV with the JobMatchAI backend")]
struct Cli {
    /// Backend base URL (overrides jobmatch.yaml and JOBMATCH_API_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Also write JSON logs to this file (truncated on startup)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a CV (PDF or DOCX) and show the recommendations
    Analyze {
        file: PathBuf,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check that the backend accepts a CV without analysing it
    Upload { file: PathBuf },
    /// Backend health check
    Health,
    /// List the backend's job catalogue
    Jobs,
    /// List the backend's training catalogue
    Trainings,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        None => None,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    Ok(())
}

/// Attach the user-facing line to a client error
fn describe(err: AnalysisError, port: u16) -> anyhow::Error {
    let message = err.user_message(port);
    anyhow::Error::new(err).context(message)
}

fn report_writer(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout())),
    }
}

async fn run_analyze(
    client: ServiceClient,
    file: PathBuf,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let mut session = AnalysisSession::new(client);
    let mut progress = TerminalRenderer::new(std::io::stderr());

    if let Err(err) = session.select_event(SelectionEvent::Picked(file)).await {
        progress.render(&session.view())?;
        if let SelectionError::Invalid(validation) = &err {
            eprintln!("   {}", validation.suggestion());
        }
        return Ok(ExitCode::FAILURE);
    }

    let Some(pending) = session.begin_submit() else {
        anyhow::bail!("No CV staged for analysis");
    };
    progress.render(&session.view())?;

    let outcome = session.backend().analyze(pending.file()).await;
    session.complete(pending, outcome);

    let writer = report_writer(output.as_deref())?;
    let mut renderer: Box<dyn Renderer> = match format {
        OutputFormat::Text => Box::new(TerminalRenderer::new(writer)),
        OutputFormat::Json => Box::new(JsonRenderer::new(writer)),
    };
    renderer
        .render(&session.view())
        .context("Failed to write report")?;

    if let Some(path) = &output {
        info!("Report written to {}", path.display());
    }

    Ok(match session.state() {
        AnalysisRequestState::Succeeded(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

async fn run_upload(client: &ServiceClient, file: PathBuf) -> Result<()> {
    let candidate = SelectionEvent::Picked(file).into_candidate().await?;
    let selected = FileValidator::validate_file(Some(candidate))?;

    let receipt = client
        .upload_cv(&selected)
        .await
        .map_err(|e| describe(e, client.port()))?;

    println!("✅ {}", receipt.message);
    println!("   File: {}", receipt.filename);
    println!("   Type: {}", receipt.content_type);
    println!("   Size: {}", format_size(receipt.size));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let config = EnvironmentConfig::load()
        .context("Failed to load configuration")?
        .with_backend_url(cli.backend_url);

    info!("Backend: {}", config.base_url());
    info!("Timeout: {}s", config.timeout_seconds);

    let client = ServiceClient::new(&config).context("Failed to create HTTP client")?;
    let port = client.port();

    match cli.command {
        Command::Analyze {
            file,
            format,
            output,
        } => return run_analyze(client, file, format, output).await,

        Command::Upload { file } => run_upload(&client, file).await?,

        Command::Health => {
            let health = client.health().await.map_err(|e| describe(e, port))?;
            println!("Status: {}", health.status);
            println!("Models loaded: {}", health.models_loaded);
            println!("Database connected: {}", health.database_connected);
        }

        Command::Jobs => {
            let catalog = client.list_jobs().await.map_err(|e| describe(e, port))?;
            println!("{} jobs", catalog.total);
            for job in &catalog.jobs {
                println!("{}", serde_json::to_string_pretty(job)?);
            }
        }

        Command::Trainings => {
            let catalog = client
                .list_trainings()
                .await
                .map_err(|e| describe(e, port))?;
            println!("{} trainings", catalog.total);
            for training in &catalog.trainings {
                println!("{}", serde_json::to_string_pretty(training)?);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
