use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use patient_view::app::App;
use patient_view::config::ConfigLoader;
use patient_view::error::PatientViewError;
use patient_view::fetch::HttpFetcher;
use patient_view::output::JsonOutput;
use patient_view::repository::{InMemoryRepository, StaticAccessControl};
use patient_view::resolve::PatientViewRequest;

#[derive(Parser)]
#[command(name = "patient-view")]
#[command(about = "Resolve cases or patients of a cancer study into an enriched patient view")]
#[command(version, author)]
struct Cli {
    #[arg(long)]
    config: Option<String>,

    /// JSON snapshot of the clinical repository
    #[arg(long)]
    repository: PathBuf,

    /// Space-separated case ids
    #[arg(long)]
    case_id: Option<String>,

    /// Space-separated patient ids
    #[arg(long)]
    patient_id: Option<String>,

    /// Cancer study stable id
    #[arg(long)]
    study: Option<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<PatientViewError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &PatientViewError) -> u8 {
    match error {
        PatientViewError::MissingConfig
        | PatientViewError::ConfigRead(_)
        | PatientViewError::ConfigParse(_) => 2,
        PatientViewError::Repository(_)
        | PatientViewError::SnapshotRead(_)
        | PatientViewError::SnapshotParse(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::resolve(cli.config.as_deref())?;
    let repository = InMemoryRepository::load(&cli.repository)?;
    let access = StaticAccessControl::new(config.accessible_studies.iter().cloned());
    let fetcher = HttpFetcher::new(config.http_timeout)?;
    let app = App::new(repository, access, fetcher, &config);

    let request = PatientViewRequest {
        case_ids: cli.case_id,
        patient_ids: cli.patient_id,
        cancer_study_id: cli.study,
    };
    let view = app.view(&request)?;
    JsonOutput::print_view(&view).into_diagnostic()?;
    Ok(())
}
