use crate::application::read_models::SbomReadModel;
use crate::shared::Result;

/// SbomFormatter port for rendering a collected dependency set
///
/// Renders must be pure: the same read model always gives the same text.
pub trait SbomFormatter {
    /// Renders the read model
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, model: &SbomReadModel) -> Result<String>;
}
