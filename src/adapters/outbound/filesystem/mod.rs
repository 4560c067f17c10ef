/// Filesystem adapters for file I/O operations
mod file_reader;
mod file_writer;
mod run_log;
mod version_store;

pub use file_reader::FileSystemReader;
pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use run_log::FileSystemRunLog;
pub use version_store::{StoreLock, VersionedDirectoryStore, LOCK_FILE_NAME};
