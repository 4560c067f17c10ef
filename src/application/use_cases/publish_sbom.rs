use crate::application::dto::{PublishOutcome, SbomResponse};
use crate::application::factories::{DocumentKind, FormatterFactory};
use crate::application::read_models::{RenderOptions, SbomReadModelBuilder};
use crate::ports::outbound::{CandidateArtifacts, ProgressReporter, VersionStore};
use crate::sbom_generation::domain::Signature;
use crate::sbom_generation::parsers::parse_build_info_section;
use crate::sbom_generation::services::{GateDecision, PriorVersion, VersionGate};
use crate::shared::Result;

/// PublishSbomUseCase - renders a collection result and files it as a new version
///
/// The candidate is compared with the latest stored version by content
/// signature. An identical candidate is discarded and nothing is written.
pub struct PublishSbomUseCase<V, R> {
    store: V,
    progress_reporter: R,
}

impl<V, R> PublishSbomUseCase<V, R>
where
    V: VersionStore,
    R: ProgressReporter,
{
    pub fn new(store: V, progress_reporter: R) -> Self {
        Self {
            store,
            progress_reporter,
        }
    }

    /// Takes the store's exclusive guard; see [`VersionStore::lock`]
    pub fn lock(&self) -> Result<V::Guard> {
        self.store.lock()
    }

    pub fn execute(
        &self,
        response: &SbomResponse,
        options: &RenderOptions,
    ) -> Result<PublishOutcome> {
        let model = SbomReadModelBuilder::build(
            &response.dependencies,
            &response.metadata,
            &response.build_info,
            options,
        );

        self.progress_reporter
            .report(FormatterFactory::progress_message(DocumentKind::Manifest));
        let manifest = FormatterFactory::create(DocumentKind::Manifest).format(&model)?;
        self.progress_reporter
            .report(FormatterFactory::progress_message(DocumentKind::Narrative));
        let narrative = FormatterFactory::create(DocumentKind::Narrative).format(&model)?;

        let signature = Signature::from_manifest_str(
            &manifest,
            response.build_info.signature_entries().as_ref(),
        )?;
        let latest = self.latest_version()?;

        match VersionGate::decide(&signature, latest.as_ref()) {
            GateDecision::Duplicate { of } => {
                self.progress_reporter.report_completion(&format!(
                    "No changes since {}; nothing written",
                    of
                ));
                Ok(PublishOutcome::Duplicate { of })
            }
            GateDecision::Commit { version } => {
                let path = self
                    .store
                    .commit(version, &CandidateArtifacts { manifest, narrative })?;
                self.progress_reporter.report_completion(&format!(
                    "Created {} at {}",
                    version,
                    path.display()
                ));
                Ok(PublishOutcome::Created { version, path })
            }
        }
    }

    /// The highest stored version and its signature, if it can be read
    fn latest_version(&self) -> Result<Option<PriorVersion>> {
        let Some(number) = self.store.versions()?.into_iter().max() else {
            return Ok(None);
        };

        let signature = self
            .store
            .load(number)?
            .and_then(|stored| {
                let manifest = stored.manifest?;
                let build_info = parse_build_info_section(stored.narrative.as_deref().unwrap_or(""));
                Signature::from_manifest_str(&manifest, Some(&build_info)).ok()
            });

        if signature.is_none() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Could not read the manifest of {}; treating it as changed",
                number
            ));
        }

        Ok(Some(PriorVersion { number, signature }))
    }

    #[cfg(test)]
    fn stored_versions(&self) -> Result<Vec<crate::sbom_generation::domain::VersionNumber>> {
        self.store.versions()
    }
}
