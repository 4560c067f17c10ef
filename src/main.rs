mod cli;

use cli::{Args, Command};
use sbom_ledger::adapters::outbound::console::StderrProgressReporter;
use sbom_ledger::adapters::outbound::filesystem::{
    FileSystemReader, FileSystemRunLog, VersionedDirectoryStore,
};
use sbom_ledger::adapters::outbound::network::{CachingPackageIndexClient, HttpPackageIndexClient};
use sbom_ledger::application::dto::PublishOutcome;
use sbom_ledger::application::factories::{PresenterFactory, PresenterType};
use sbom_ledger::application::use_cases::{
    BatchRunUseCase, CatalogProject, CatalogUseCase, GenerateSbomUseCase, GenerationPipeline,
    PublishSbomUseCase,
};
use sbom_ledger::config::{self, LoadedConfig, CONFIG_FILENAME};
use sbom_ledger::ports::outbound::OutputPresenter;
use sbom_ledger::shared::error::{ExitCode, SbomError};
use sbom_ledger::shared::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let args = match Args::parse_args() {
        Ok(args) => args,
        // Help and version go to stdout with status 0; usage errors exit with 2
        Err(e) => e.exit(),
    };

    if let Err(e) = run(args).await {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        for cause in e.chain().skip(1) {
            eprintln!("\nCaused by: {}", cause);
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let reporter = StderrProgressReporter::new();

    match args.command {
        Command::Generate { project } => {
            let index_client = index_client(&config)?;
            let outcome = generate_project(&config, &project, &index_client, &reporter).await?;
            println!("{}", outcome);
        }
        Command::Batch => {
            let names = config.project_names();
            let index_client = index_client(&config)?;
            let config_ref = &config;
            let index_ref = &index_client;
            let reporter_ref = &reporter;
            let batch =
                BatchRunUseCase::new(FileSystemRunLog::new(config.logs_dir.clone()), &reporter);
            let report = batch
                .execute(&names, move |project| async move {
                    generate_project(config_ref, &project, index_ref, reporter_ref).await
                })
                .await?;

            for item in &report.items {
                match &item.result {
                    Ok(outcome) => println!("{}: {}", item.project, outcome),
                    Err(_) => println!("{}: failed", item.project),
                }
            }
            if report.failures() > 0 {
                anyhow::bail!(
                    "Batch run finished with {} failed project(s)\n\n💡 Hint: See {} for details",
                    report.failures(),
                    report.log_path.display()
                );
            }
        }
        Command::BatchStatus => {
            let batch =
                BatchRunUseCase::new(FileSystemRunLog::new(config.logs_dir.clone()), &reporter);
            print_json(&batch.status()?)?;
        }
        Command::List => print_json(&catalog(&config).list()?)?,
        Command::Projects => print_json(&catalog(&config).projects()?)?,
        Command::Show { id } => print_json(&catalog(&config).show(&id)?)?,
        Command::RawJson { id, output } => {
            let manifest = catalog(&config).raw_manifest(&id)?;
            present(&manifest, output)?;
        }
        Command::RawMarkdown { id, output } => {
            let narrative = catalog(&config).raw_narrative(&id)?;
            present(&narrative, output)?;
        }
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    match explicit {
        Some(path) => config::load_config_from_path(path),
        None => {
            let cwd = std::env::current_dir()?;
            config::discover_config(&cwd)?.ok_or_else(|| {
                SbomError::ConfigNotFound {
                    path: cwd.join(CONFIG_FILENAME),
                }
                .into()
            })
        }
    }
}

type IndexClient = CachingPackageIndexClient<HttpPackageIndexClient>;

/// One client per process, so a batch fetches each index page once
fn index_client(config: &LoadedConfig) -> Result<IndexClient> {
    Ok(CachingPackageIndexClient::new(HttpPackageIndexClient::new(
        config.fetch_timeout,
    )?))
}

/// Runs one complete generation for `name`, holding the project's lock throughout
async fn generate_project(
    config: &LoadedConfig,
    name: &str,
    index_client: &IndexClient,
    reporter: &StderrProgressReporter,
) -> Result<PublishOutcome> {
    let profile = config.profile(name)?;

    // Create adapters (Dependency Injection)
    let sources = FileSystemReader::new();
    let store = VersionedDirectoryStore::new(profile.output_dir.clone(), &profile.name);

    let pipeline = GenerationPipeline::new(
        GenerateSbomUseCase::new(sources, index_client, reporter),
        PublishSbomUseCase::new(store, reporter),
    );
    pipeline.run(profile).await
}

fn catalog(config: &LoadedConfig) -> CatalogUseCase<VersionedDirectoryStore> {
    CatalogUseCase::new(
        config
            .profiles
            .iter()
            .map(|profile| CatalogProject {
                name: profile.name.clone(),
                display_name: profile.render.title.clone(),
                store: VersionedDirectoryStore::new(profile.output_dir.clone(), &profile.name),
            })
            .collect(),
    )
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

fn present(content: &str, output: Option<PathBuf>) -> Result<()> {
    let presenter: Box<dyn OutputPresenter> =
        PresenterFactory::create(PresenterType::from_output(output));
    presenter.present(content)
}
