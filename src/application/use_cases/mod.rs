mod batch_run;
mod catalog;
mod generate_sbom;
mod publish_sbom;
mod run_generation;

pub use batch_run::{BatchRunUseCase, STATUS_TAIL_LINES};
pub use catalog::{artifact_id, CatalogProject, CatalogUseCase};
pub use generate_sbom::GenerateSbomUseCase;
pub use publish_sbom::PublishSbomUseCase;
pub use run_generation::GenerationPipeline;
