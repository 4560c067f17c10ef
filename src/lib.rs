//! sbom-ledger - versioned SBOM ledger for multi-source software stacks
//!
//! This library collects the dependencies of a C++/Python software stack from its
//! heterogeneous build artifacts (configure logs, build manifests, pinned
//! requirement files, a remote package index), reconciles them into one
//! dependency set, renders a CycloneDX manifest plus a Markdown report, and
//! files the pair as a new numbered version only when its content changed.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_generation`): Pure business logic, parsers and domain models
//! - **Application Layer** (`application`): Use cases, DTOs and read models
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use sbom_ledger::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let profile = ProjectProfile::new("AnalysisBase", "SBOMs/AnalysisBase");
//!
//! // Create adapters
//! let reporter = StderrProgressReporter::new();
//! let index_client = CachingPackageIndexClient::new(HttpPackageIndexClient::new(
//!     std::time::Duration::from_secs(30),
//! )?);
//! let store = VersionedDirectoryStore::new(&profile.output_dir, &profile.name);
//!
//! // Collect, render and file a new version
//! let pipeline = GenerationPipeline::new(
//!     GenerateSbomUseCase::new(FileSystemReader::new(), index_client, &reporter),
//!     PublishSbomUseCase::new(store, &reporter),
//! );
//! let outcome = pipeline.run(&profile).await?;
//! println!("{}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemRunLog, FileSystemWriter, StdoutPresenter,
        VersionedDirectoryStore,
    };
    pub use crate::adapters::outbound::formatters::{CycloneDxFormatter, MarkdownFormatter};
    pub use crate::adapters::outbound::network::{
        CachingPackageIndexClient, HttpPackageIndexClient,
    };
    pub use crate::application::dto::{ProjectProfile, PublishOutcome, SbomResponse};
    pub use crate::application::read_models::RenderOptions;
    pub use crate::application::use_cases::{
        BatchRunUseCase, CatalogUseCase, GenerateSbomUseCase, GenerationPipeline,
        PublishSbomUseCase,
    };
    pub use crate::ports::outbound::{
        OutputPresenter, PackageIndexClient, ProgressReporter, RunLog, SbomFormatter,
        SourceFiles, VersionStore,
    };
    pub use crate::sbom_generation::domain::{
        BuildInfo, Dependency, DependencySet, SbomMetadata, Signature, VersionNumber,
    };
    pub use crate::sbom_generation::policies::{ExtractionRules, NameAliases};
    pub use crate::sbom_generation::services::{Reconciler, SbomGenerator, VersionGate};
    pub use crate::shared::Result;
}
