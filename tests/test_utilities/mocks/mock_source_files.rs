use sbom_ledger::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory SourceFiles keyed by absolute path
#[derive(Default)]
pub struct MockSourceFiles {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MockSourceFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.write(path, content);
        self
    }

    pub fn write(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl SourceFiles for MockSourceFiles {
    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.files.lock().unwrap().get(path).cloned())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .lock()
            .unwrap()
            .keys()
            .any(|p| p != path && p.starts_with(path))
    }

    fn append_lines(&self, path: &Path, lines: &[String]) -> Result<()> {
        let mut files = self.files.lock().unwrap();
        let entry = files.entry(path.to_path_buf()).or_default();
        if !entry.is_empty() && !entry.ends_with('\n') {
            entry.push('\n');
        }
        for line in lines {
            entry.push_str(line);
            entry.push('\n');
        }
        Ok(())
    }

    fn find_files(&self, root: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.starts_with(root) && p.file_name().is_some_and(|n| n == file_name))
            .cloned()
            .collect())
    }
}
