use crate::ports::outbound::{RunLog, RunLogSnapshot};
use crate::shared::error::SbomError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const LOG_PREFIX: &str = "batch_run_";
const LOG_SUFFIX: &str = ".log";

/// FileSystemRunLog adapter: one `batch_run_<timestamp>.log` per batch run
pub struct FileSystemRunLog {
    dir: PathBuf,
}

impl FileSystemRunLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn next_log_path(&self) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let mut path = self.dir.join(format!("{}{}{}", LOG_PREFIX, stamp, LOG_SUFFIX));
        let mut n = 1;
        while path.exists() {
            path = self
                .dir
                .join(format!("{}{}_{}{}", LOG_PREFIX, stamp, n, LOG_SUFFIX));
            n += 1;
        }
        path
    }
}

impl RunLog for FileSystemRunLog {
    fn record(&self, lines: &[String]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| SbomError::FileWriteError {
            path: self.dir.clone(),
            details: e.to_string(),
        })?;

        let path = self.next_log_path();
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&path, content).map_err(|e| SbomError::FileWriteError {
            path: path.clone(),
            details: e.to_string(),
        })?;
        Ok(path)
    }

    fn latest(&self, tail_lines: usize) -> Result<Option<RunLogSnapshot>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SbomError::FileReadError {
                    path: self.dir.clone(),
                    details: e.to_string(),
                }
                .into())
            }
        };

        let newest = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                if !(name.starts_with(LOG_PREFIX) && name.ends_with(LOG_SUFFIX)) {
                    return None;
                }
                let modified = e.metadata().and_then(|m| m.modified()).ok();
                Some((modified, name, e.path()))
            })
            .max_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));

        let Some((modified, name, path)) = newest else {
            return Ok(None);
        };

        let content = read_regular_file(&path, "batch run log")?;
        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(tail_lines);

        Ok(Some(RunLogSnapshot {
            name,
            modified: modified.map(DateTime::<Utc>::from),
            tail: lines[start..].iter().map(|l| l.to_string()).collect(),
        }))
    }
}
