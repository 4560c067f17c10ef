use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Upper bound for any input we scrape (build logs can be large, 64 MB is plenty)
pub const MAX_INPUT_SIZE: u64 = 64 * 1024 * 1024;

/// Rejects a path that is a symbolic link.
///
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read metadata for {} operation on {}: {}",
            operation,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        return Err(SbomError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} operations on symbolic links are not allowed", operation),
            hint: "Point the configuration at the real file instead of a link".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Reads a regular file into memory after symlink, type and size checks.
///
/// # Errors
/// Returns an error if the path is a symlink, not a regular file, larger than
/// [`MAX_INPUT_SIZE`]. Invalid UTF-8 is replaced, not rejected.
pub fn read_regular_file(path: &Path, description: &str) -> Result<String> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {} metadata: {}", description, e))?;

    if metadata.is_symlink() {
        return Err(SbomError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} is a symbolic link", description),
            hint: "Symbolic links are not followed when scraping inputs".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    validate_file_size(metadata.len(), path, MAX_INPUT_SIZE)?;

    // Build logs occasionally carry stray Latin-1 bytes; keep going with replacement chars
    let bytes = fs::read(path).map_err(|e| SbomError::FileReadError {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Rejects files larger than `max_size` bytes.
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}

/// Validates a value that becomes a single path segment or URL component.
///
/// Project names, artifact ids, release identifiers and platform strings all end
/// up in directory names or URLs, so separators and traversal sequences are refused.
pub fn validate_path_segment(segment: &str, description: &str) -> Result<()> {
    if segment.is_empty() {
        anyhow::bail!("{} must not be empty", description);
    }

    if segment.contains('/') || segment.contains('\\') {
        anyhow::bail!(
            "Security: {} contains path separators which are not allowed",
            description
        );
    }

    if segment.contains("..") {
        anyhow::bail!("Security: {} contains '..' which is not allowed", description);
    }

    if segment.chars().any(|c| c.is_control() || matches!(c, '#' | '?' | '@')) {
        anyhow::bail!("Security: {} contains URL-unsafe characters", description);
    }

    Ok(())
}
