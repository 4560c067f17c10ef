use crate::adapters::outbound::formatters::{CycloneDxFormatter, MarkdownFormatter};
use crate::ports::outbound::SbomFormatter;

/// The two documents stored in every version directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// CycloneDX JSON manifest
    Manifest,
    /// Markdown narrative report
    Narrative,
}

/// Factory for creating SBOM formatters
///
/// Keeps the choice of formatter adapter out of the use cases.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates the formatter that renders `kind`
    ///
    /// # Examples
    /// ```
    /// use sbom_ledger::application::factories::{DocumentKind, FormatterFactory};
    ///
    /// let formatter = FormatterFactory::create(DocumentKind::Manifest);
    /// ```
    pub fn create(kind: DocumentKind) -> Box<dyn SbomFormatter> {
        match kind {
            DocumentKind::Manifest => Box::new(CycloneDxFormatter::new()),
            DocumentKind::Narrative => Box::new(MarkdownFormatter::new()),
        }
    }

    /// Returns the progress message shown while rendering `kind`
    pub fn progress_message(kind: DocumentKind) -> &'static str {
        match kind {
            DocumentKind::Manifest => "📝 Rendering CycloneDX manifest...",
            DocumentKind::Narrative => "📝 Rendering Markdown report...",
        }
    }
}
