use std::path::PathBuf;

use clap::{Parser, Subcommand};

use clause_lens::config::{self, AnalyzerConfig, Backend};
use clause_lens::pipeline::analysis::{replay, AnalysisRequest, AnalysisResult, ContractKind};
use clause_lens::pipeline::extraction::DocumentExtractor;

#[derive(Parser, Debug)]
#[command(name = "clause-lens")]
#[command(
    version,
    about = "Classify contract clauses by risk and locate them in the source text"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a contract (PDF, TXT, MD) and analyze its clauses
    Analyze {
        /// Contract file
        file: PathBuf,

        /// Contract type: labour, tenancy or general
        #[arg(long, default_value = "general", value_parser = parse_kind)]
        kind: ContractKind,

        /// File with reference material (statutes, guidance) for the prompt
        #[arg(long, value_name = "FILE")]
        context_file: Option<PathBuf>,

        /// Completion backend: ollama or gemini (overrides CLAUSE_LENS_BACKEND)
        #[arg(long)]
        backend: Option<String>,

        /// Model name (overrides CLAUSE_LENS_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Service base URL (overrides CLAUSE_LENS_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,

        /// Pretty-print the result JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Re-run normalization and alignment on a saved model reply, offline
    Replay {
        /// Contract file the reply was produced for
        document: PathBuf,

        /// Saved raw model reply (e.g. 02-raw-response.txt from a dump)
        response: PathBuf,

        /// Pretty-print the result JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn parse_kind(value: &str) -> Result<ContractKind, String> {
    ContractKind::parse(value)
        .ok_or_else(|| format!("unknown contract kind '{value}' (expected labour, tenancy or general)"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    clause_lens::init_tracing();

    tracing::debug!(version = config::APP_VERSION, "{} starting", config::APP_NAME);

    let extractor = DocumentExtractor::default();

    let (result, pretty) = match args.command {
        Command::Analyze {
            file,
            kind,
            context_file,
            backend,
            model,
            base_url,
            pretty,
        } => {
            let mut config = AnalyzerConfig::from_env()?;
            if let Some(backend) = backend {
                config.backend = Backend::parse(&backend)?;
            }
            if model.is_some() {
                config.model = model;
            }
            if base_url.is_some() {
                config.base_url = base_url;
            }
            let analyzer = config.build_analyzer()?;

            let document = extractor.extract_path(&file)?;
            let mut request = AnalysisRequest::new(document).with_kind(kind);
            if let Some(path) = context_file {
                request = request.with_reference_context(std::fs::read_to_string(path)?);
            }

            (analyzer.analyze(&request), pretty)
        }
        Command::Replay {
            document,
            response,
            pretty,
        } => {
            let document = extractor.extract_path(&document)?;
            let raw = std::fs::read_to_string(response)?;
            (replay(&raw, &document.text), pretty)
        }
    };

    print_result(&result, pretty)
}

fn print_result(result: &AnalysisResult, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
