use crate::ports::outbound::SourceFiles;
use crate::shared::error::SbomError;
use crate::shared::security::{read_regular_file, validate_not_symlink};
use crate::shared::Result;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// FileSystemReader adapter for the text inputs of a run
///
/// Reads go through the symlink and size checks in `shared::security`.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceFiles for FileSystemReader {
    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        match fs::symlink_metadata(path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SbomError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()),
            Ok(_) => read_regular_file(path, "input file").map(Some),
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn append_lines(&self, path: &Path, lines: &[String]) -> Result<()> {
        if lines.is_empty() {
            return Ok(());
        }
        if path.exists() {
            validate_not_symlink(path, "append to")?;
        }

        let write_error = |e: std::io::Error| SbomError::FileWriteError {
            path: path.to_path_buf(),
            details: e.to_string(),
        };

        let needs_newline = fs::read(path)
            .map(|bytes| !bytes.is_empty() && !bytes.ends_with(b"\n"))
            .unwrap_or(false);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(write_error)?;

        let mut buffer = String::new();
        if needs_newline {
            buffer.push('\n');
        }
        for line in lines {
            buffer.push_str(line);
            buffer.push('\n');
        }
        file.write_all(buffer.as_bytes()).map_err(write_error)?;
        Ok(())
    }

    fn find_files(&self, root: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker {
            let entry = entry.map_err(|e| SbomError::FileReadError {
                path: root.to_path_buf(),
                details: e.to_string(),
            })?;
            if entry.file_type().is_file() && entry.file_name() == file_name {
                found.push(entry.into_path());
            }
        }
        found.sort();
        Ok(found)
    }
}
