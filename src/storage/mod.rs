// src/storage/mod.rs
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::extractors::DocumentName;
use crate::utils::error::{AppError, StorageError};
use crate::utils::html_debug;

/// The two supported output formats. Each one gets its own subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputMode {
    Txt,
    Jsonl,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Txt => "txt",
            OutputMode::Jsonl => "jsonl",
        }
    }

    /// File extension, also used as the subdirectory name.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "txt" => Ok(OutputMode::Txt),
            "jsonl" => Ok(OutputMode::Jsonl),
            other => Err(AppError::UnsupportedMode(other.to_string())),
        }
    }
}

/// Parses requested mode names, keeping first-seen order and dropping repeats.
/// No names at all means both formats.
pub fn parse_modes<S: AsRef<str>>(values: &[S]) -> Result<Vec<OutputMode>, AppError> {
    if values.is_empty() {
        return Ok(vec![OutputMode::Jsonl, OutputMode::Txt]);
    }

    let mut modes = Vec::with_capacity(values.len());
    for value in values {
        let mode = value.as_ref().parse::<OutputMode>()?;
        if !modes.contains(&mode) {
            modes.push(mode);
        }
    }
    Ok(modes)
}

/// One JSON Lines record.
#[derive(Debug, Serialize)]
struct TextRecord<'a> {
    text: &'a str,
}

/// Renders cleaned lines in the given format. Blank lines are skipped and every
/// emitted line ends with a single LF.
pub fn render(lines: &[String], mode: OutputMode) -> Result<String, StorageError> {
    let mut out = String::new();
    for line in lines.iter().map(|line| line.trim()).filter(|line| !line.is_empty()) {
        match mode {
            OutputMode::Txt => out.push_str(line),
            OutputMode::Jsonl => {
                let record = serde_json::to_string(&TextRecord { text: line })
                    .map_err(|e| StorageError::SerializationError(e.to_string()))?;
                out.push_str(&record);
            }
        }
        out.push('\n');
    }
    Ok(out)
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // create_dir_all is a no-op when the directory already exists
        fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;

        Ok(Self { base_dir: base_path })
    }

    /// Destination of a document in a given mode: `<base>/<mode>/<name>.<ext>`.
    pub fn output_path(
        &self,
        name: &DocumentName,
        mode: OutputMode,
    ) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        let file_name = format!("{}.{}", name, mode.extension());
        Ok(self.base_dir.join(mode.as_str()).join(file_name))
    }

    /// Saves the cleaned lines of one document, replacing any previous file of the same name.
    pub fn save_lines(
        &self,
        name: &DocumentName,
        lines: &[String],
        mode: OutputMode,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.output_path(name, mode)?;
        let content = render(lines, mode)?;

        write_atomic(&file_path, content.as_bytes())?;
        tracing::debug!("Saved {} output to {}", mode, file_path.display());

        Ok(file_path)
    }

    /// Saves the raw page and an annotated copy under `<base>/debug/`.
    pub fn save_debug_copies(
        &self,
        name: &DocumentName,
        markup: &str,
    ) -> Result<PathBuf, AppError> {
        validate_name(name)?;
        let debug_dir = self.base_dir.join("debug");
        fs::create_dir_all(&debug_dir)?;

        let raw_path = debug_dir.join(format!("{}.raw.html", name));
        write_atomic(&raw_path, markup.as_bytes())?;

        let annotated_path = debug_dir.join(format!("{}.annotated.html", name));
        let highlights = html_debug::create_debug_html(
            markup,
            &annotated_path,
            html_debug::OPINION_DEBUG_PATTERNS,
        )?;
        tracing::debug!(
            "Annotated {} debug highlights in {}",
            highlights,
            annotated_path.display()
        );

        Ok(annotated_path)
    }
}

fn validate_name(name: &DocumentName) -> Result<(), StorageError> {
    let raw = name.as_str();
    if raw.is_empty() || raw == "." || raw == ".." || raw.contains(['/', '\\']) {
        return Err(StorageError::InvalidName(raw.to_string()));
    }
    Ok(())
}

/// Writes to a sibling temp file and renames it over `path`, so readers and concurrent
/// writers only ever see a complete file. The temp file is removed on any failure.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    let parent = path
        .parent()
        .ok_or_else(|| StorageError::InvalidName(path.display().to_string()))?;
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.persist(path).map_err(|e| StorageError::IoError(e.error))?;
    Ok(())
}
