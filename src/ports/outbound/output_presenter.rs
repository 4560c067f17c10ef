use crate::shared::Result;

/// OutputPresenter port for raw document output
///
/// Used by the raw manifest and raw narrative commands to hand a stored
/// document to stdout or a file.
pub trait OutputPresenter {
    /// # Errors
    /// Returns an error if writing to the destination fails
    fn present(&self, content: &str) -> Result<()>;
}
