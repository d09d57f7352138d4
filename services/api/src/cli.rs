use std::path::PathBuf;

use crate::infra::Backends;
use crate::server;
use cadre::config::AppConfig;
use cadre::error::AppError;
use cadre::telemetry;
use cadre::workflows::decisions::{DecisionKind, DecisionService};
use cadre::workflows::documents::DocumentService;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Governorate HR Portal",
    about = "Serve and administer the governorate HR administration portal",
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
    /// Create the sample accounts when the user table is empty
    Seed,
    /// Render a stored decision to a PDF file
    Pdf(PdfArgs),
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

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Committee,
    Appointment,
}

impl From<KindArg> for DecisionKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Committee => DecisionKind::Committee,
            KindArg::Appointment => DecisionKind::Appointment,
        }
    }
}

#[derive(Args, Debug)]
struct PdfArgs {
    /// Decision type to render
    #[arg(long, value_enum, default_value = "committee")]
    kind: KindArg,
    /// Stored decision id
    #[arg(long)]
    id: i64,
    /// Destination file; defaults to the decision's download name
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Seed => run_seed(),
        Command::Pdf(args) => run_pdf(args).await,
    }
}

fn run_seed() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let backends = Backends::open(&config)?;
    let created = backends.portal(&config).accounts().seed_sample_users()?;
    println!("created {created} sample account(s)");
    Ok(())
}

async fn run_pdf(args: PdfArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let backends = Backends::open(&config)?;
    let decisions = DecisionService::new(backends.store.clone());
    let record = decisions.find(args.kind.into(), args.id)?;

    let documents = DocumentService::new(backends.renderer.clone());
    let document = documents.render_decision(Some(&record)).await?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&document.filename));
    tokio::fs::write(&output, &document.bytes).await?;

    info!(path = %output.display(), fallback = document.fallback, "wrote decision pdf");
    println!("wrote {} ({} bytes)", output.display(), document.bytes.len());
    Ok(())
}
