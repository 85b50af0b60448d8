//! Writing reports to disk.
//!
//! Reports only ever land inside a single output directory. A requested file
//! name is reduced to its last path component and checked by
//! [`sanitize_filename`]; anything suspicious falls back to the generated
//! default name.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Directory that receives every report.
pub const OUTPUT_DIR: &str = "output";

/// Upper bound on a report's size in bytes.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

static SAFE_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\-.]+$").expect("static pattern is valid"));

/// Errors raised while choosing a report path or writing a report.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("filename cannot be empty")]
    EmptyFilename,

    #[error("absolute paths are not allowed: {0}")]
    AbsolutePath(String),

    #[error("path traversal patterns (..) are not allowed: {0}")]
    PathTraversal(String),

    #[error("directory separators are not allowed in filename: {0}")]
    DirectorySeparator(String),

    #[error(
        "filename contains invalid characters; only letters, digits, underscore, hyphen and dot are allowed: {0}"
    )]
    InvalidCharacters(String),

    #[error("output directory '{0}' exists but is not writable")]
    NotWritable(PathBuf),

    #[error("report size ({size} bytes) exceeds the maximum of {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("cannot write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Checks that `filename` is a plain file name and returns it trimmed.
///
/// # Errors
///
/// Rejects empty names, absolute paths (`/x`, `C:x`), `..`, path separators,
/// and anything outside `[A-Za-z0-9_.-]`.
///
/// # Examples
/// ```
/// use tax_cli::output::sanitize_filename;
///
/// assert_eq!(sanitize_filename(" my_taxes.txt ").unwrap(), "my_taxes.txt");
/// assert!(sanitize_filename("../secret.txt").is_err());
/// assert!(sanitize_filename("C:report.txt").is_err());
/// ```
pub fn sanitize_filename(filename: &str) -> Result<&str, OutputError> {
    let filename = filename.trim();

    if filename.is_empty() {
        return Err(OutputError::EmptyFilename);
    }
    if filename.starts_with('/') || filename.chars().nth(1) == Some(':') {
        return Err(OutputError::AbsolutePath(filename.to_string()));
    }
    if filename.contains("..") {
        return Err(OutputError::PathTraversal(filename.to_string()));
    }
    if filename.contains(['/', '\\']) {
        return Err(OutputError::DirectorySeparator(filename.to_string()));
    }
    if !SAFE_FILENAME.is_match(filename) {
        return Err(OutputError::InvalidCharacters(filename.to_string()));
    }
    Ok(filename)
}

/// Saves rendered reports under a fixed directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(OUTPUT_DIR)
    }
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the output directory if needed and checks it is writable.
    pub fn ensure_directory(&self) -> Result<(), OutputError> {
        fs::create_dir_all(&self.dir).map_err(|source| OutputError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let metadata = fs::metadata(&self.dir).map_err(|source| OutputError::Io {
            path: self.dir.clone(),
            source,
        })?;
        if metadata.permissions().readonly() {
            return Err(OutputError::NotWritable(self.dir.clone()));
        }
        Ok(())
    }

    /// `tax_calculation_<YYYY-MM-DD_HHMMSS>.txt`, with `_1`, `_2`, ... appended
    /// when the name is already taken.
    pub fn default_path(
        &self,
        now: NaiveDateTime,
    ) -> Result<PathBuf, OutputError> {
        self.ensure_directory()?;

        let stamp = now.format("%Y-%m-%d_%H%M%S").to_string();
        let mut path = self.dir.join(format!("tax_calculation_{stamp}.txt"));
        if path.exists() {
            warn!(file = %path.display(), "report file already exists; choosing a new name");
        }

        let mut counter = 1u32;
        while path.exists() {
            path = self.dir.join(format!("tax_calculation_{stamp}_{counter}.txt"));
            counter += 1;
        }
        debug!(file = %path.display(), "generated report path");
        Ok(path)
    }

    /// Resolves a user-requested path to a sanitized file inside the output
    /// directory. Only the final component of `requested` is used.
    pub fn custom_path(
        &self,
        requested: &Path,
    ) -> Result<PathBuf, OutputError> {
        let name = requested
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = sanitize_filename(&name)?;

        self.ensure_directory()?;
        Ok(self.dir.join(name))
    }

    /// Writes `content` to `path`, refusing oversized reports.
    pub fn write(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<(), OutputError> {
        let size = content.len();
        if size > MAX_FILE_SIZE {
            return Err(OutputError::TooLarge {
                size,
                max: MAX_FILE_SIZE,
            });
        }

        fs::write(path, content).map_err(|source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(file = %path.display(), bytes = size, "report written");
        Ok(())
    }

    /// Saves report lines and returns the path written.
    ///
    /// A rejected `requested` name is logged and replaced by the default path.
    pub fn save(
        &self,
        lines: &[String],
        now: NaiveDateTime,
        requested: Option<&Path>,
    ) -> Result<PathBuf, OutputError> {
        let content = lines.join("\n");

        if let Some(requested) = requested {
            match self
                .custom_path(requested)
                .and_then(|path| self.write(&path, &content).map(|()| path))
            {
                Ok(path) => {
                    info!("results saved to custom file");
                    return Ok(path);
                }
                Err(error) => {
                    warn!(%error, "could not save to custom output file; using the default location");
                }
            }
        }

        let path = self.default_path(now)?;
        self.write(&path, &content)?;
        info!("results saved");
        Ok(path)
    }
}
