use super::{GenerateSbomUseCase, PublishSbomUseCase};
use crate::application::dto::{ProjectProfile, PublishOutcome};
use crate::ports::outbound::{PackageIndexClient, ProgressReporter, SourceFiles, VersionStore};
use crate::shared::Result;

/// GenerationPipeline - one complete, exclusive generation run for a project
///
/// The store's guard is taken before any input is read and released after
/// the publish decision, so two runs for the same project never interleave.
pub struct GenerationPipeline<S, I, V, R> {
    generate: GenerateSbomUseCase<S, I, R>,
    publish: PublishSbomUseCase<V, R>,
}

impl<S, I, V, R> GenerationPipeline<S, I, V, R>
where
    S: SourceFiles,
    I: PackageIndexClient,
    V: VersionStore,
    R: ProgressReporter,
{
    pub fn new(generate: GenerateSbomUseCase<S, I, R>, publish: PublishSbomUseCase<V, R>) -> Self {
        Self { generate, publish }
    }

    pub async fn run(&self, profile: &ProjectProfile) -> Result<PublishOutcome> {
        let _guard = self.publish.lock()?;
        let response = self.generate.execute(profile).await?;
        self.publish.execute(&response, &profile.render)
    }
}
