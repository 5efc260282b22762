//! `career-gateway` command-line client.
//!
//! Exercises the gateway against a live (or absent) backend and prints JSON.
//! With the backend down every data command still succeeds, reporting
//! `"source": "flag_active" | "soft_failure" | "network_error"`.

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use career_gateway::analysis::segment;
use career_gateway::config::{load_config, GatewayConfig};
use career_gateway::observability::{logging, metrics};
use career_gateway::resilience::DataSource;
use career_gateway::services::types::{AnalysisRequest, AtsRequest};
use career_gateway::GatewayClient;

#[derive(Parser)]
#[command(name = "career-gateway")]
#[command(about = "Resilient client for the career-services API", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `backend.base_url`
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token attached to every request
    #[arg(short, long)]
    token: Option<String>,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    metrics_address: Option<SocketAddr>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe backend health
    Probe,
    /// List stored resumes
    Resumes,
    /// Score a resume against a job posting
    Ats {
        /// Plain-text resume
        #[arg(long)]
        resume: PathBuf,
        #[arg(long)]
        job_title: String,
        #[arg(long)]
        job_description: String,
    },
    /// AI analysis of a resume against a job posting
    Analyze {
        /// Resume document (pdf, docx or txt)
        #[arg(long)]
        resume: PathBuf,
        #[arg(long)]
        job_title: String,
        #[arg(long)]
        job_description: String,
    },
    /// Segment analysis text from a file, offline
    Segment { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
    }

    logging::init(&config.observability.log_level);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "career-gateway starting");

    if let Commands::Segment { file } = &cli.command {
        let text = std::fs::read_to_string(file)?;
        return print_json(&segment(&text));
    }

    if let Some(addr) = metrics_address(cli.metrics_address, &config) {
        metrics::init_metrics(addr);
    }

    let client = GatewayClient::connect(config).await?;
    if let Some(token) = cli.token {
        client.session().sign_in(token);
    }

    match cli.command {
        Commands::Probe => {
            let available = client.check_availability().await;
            print_json(&json!({
                "base_url": client.config().backend.base_url,
                "available": available,
                "unavailable_flag": client.flags().snapshot(),
            }))?;
        }
        Commands::Resumes => {
            let resumes = client.remote().list_resumes_sourced().await?;
            print_json(&json!({
                "source": source_label(resumes.source),
                "resumes": resumes.value,
            }))?;
        }
        Commands::Ats {
            resume,
            job_title,
            job_description,
        } => {
            let request = AtsRequest {
                resume_text: std::fs::read_to_string(&resume)?,
                job_title,
                job_description,
            };
            let report = client.remote().score_resume_sourced(request).await?;
            print_json(&json!({
                "source": source_label(report.source),
                "report": report.value,
            }))?;
        }
        Commands::Analyze {
            resume,
            job_title,
            job_description,
        } => {
            let request = AnalysisRequest {
                file_name: file_name(&resume),
                mime: mime_for(&resume).to_string(),
                file_bytes: std::fs::read(&resume)?,
                job_title,
                job_description,
            };
            let report = client.remote().analyze_match_sourced(request).await?;
            print_json(&json!({
                "source": source_label(report.source),
                "report": report.value,
            }))?;
        }
        Commands::Segment { .. } => {}
    }

    Ok(())
}

fn metrics_address(flag: Option<SocketAddr>, config: &GatewayConfig) -> Option<SocketAddr> {
    if flag.is_some() || !config.observability.metrics_enabled {
        return flag;
    }
    match config.observability.metrics_address.parse() {
        Ok(addr) => Some(addr),
        Err(_) => {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
            None
        }
    }
}

fn source_label(source: DataSource) -> &'static str {
    match source {
        DataSource::Backend => "backend",
        DataSource::Fallback(reason) => reason.as_str(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string())
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
