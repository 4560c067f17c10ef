use crate::shared::Result;
use std::path::{Path, PathBuf};

/// SourceFiles port for the text inputs of a generation run
///
/// Every path is explicit; implementations never resolve against the
/// process working directory on their own.
pub trait SourceFiles {
    /// Reads a text file
    ///
    /// # Returns
    /// `Ok(None)` when the file does not exist
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read safely
    fn read_optional(&self, path: &Path) -> Result<Option<String>>;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Appends lines to a side file, creating it if needed
    fn append_lines(&self, path: &Path, lines: &[String]) -> Result<()>;

    /// Recursively finds files named `file_name` below `root`, sorted by path
    fn find_files(&self, root: &Path, file_name: &str) -> Result<Vec<PathBuf>>;
}

impl<T: SourceFiles + ?Sized> SourceFiles for &T {
    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        (**self).read_optional(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn append_lines(&self, path: &Path, lines: &[String]) -> Result<()> {
        (**self).append_lines(path, lines)
    }

    fn find_files(&self, root: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
        (**self).find_files(root, file_name)
    }
}
