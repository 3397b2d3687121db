// src/pipeline.rs
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};

use crate::extractors::{normalize, DocumentName, OpinionExtractor};
use crate::fetch::{DocumentSource, PageClient};
use crate::storage::{OutputMode, StorageManager};
use crate::utils::AppError;

/// Result of running one document through every stage.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub name: DocumentName,
    pub paragraphs: usize,
    pub lines: usize,
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct DocumentOutcome {
    pub source: String,
    pub result: Result<ProcessedDocument, AppError>,
}

impl DocumentOutcome {
    /// Human-readable status line for this document.
    pub fn status_line(&self) -> String {
        match &self.result {
            Ok(doc) => format!(
                "OK   {} -> {} ({} paragraphs, {} lines, {} files)",
                self.source,
                doc.name,
                doc.paragraphs,
                doc.lines,
                doc.outputs.len()
            ),
            Err(e) => format!("FAIL {}: {}", self.source, e),
        }
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
    pub skipped: Vec<String>, // Sources left unprocessed after cancellation
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn completion_notice(&self) -> String {
        let elapsed = self.finished_at - self.started_at;
        format!(
            "Processing finished at {}. Success: {}, Failures: {}, Skipped: {} ({:.1}s)",
            self.finished_at.to_rfc3339(),
            self.success_count(),
            self.failure_count(),
            self.skipped.len(),
            elapsed.num_milliseconds() as f64 / 1000.0
        )
    }
}

/// Fetch -> parse -> extract -> normalize -> name -> serialize, for one document at a time.
pub struct Pipeline {
    client: PageClient,
    extractor: OpinionExtractor,
    storage: StorageManager,
    debug: bool,
}

impl Pipeline {
    pub fn new(
        client: PageClient,
        extractor: OpinionExtractor,
        storage: StorageManager,
        debug: bool,
    ) -> Self {
        Self { client, extractor, storage, debug }
    }

    /// Processes a single source into one file per requested mode.
    pub async fn process(
        &self,
        source: &DocumentSource,
        modes: &[OutputMode],
    ) -> Result<ProcessedDocument, AppError> {
        if modes.is_empty() {
            return Err(AppError::Config("no output modes requested".to_string()));
        }

        let markup = self.client.load(source).await?;
        tracing::debug!("Fetched {} ({} bytes)", source, markup.len());

        self.process_markup(&markup, modes)
    }

    /// Everything after the fetch; synchronous since no stage waits on I/O besides the final write.
    pub fn process_markup(
        &self,
        markup: &str,
        modes: &[OutputMode],
    ) -> Result<ProcessedDocument, AppError> {
        let opinion = self.extractor.extract(markup)?;

        let lines = normalize::clean_lines(&opinion.paragraphs);
        tracing::debug!(
            "Normalized {} paragraphs into {} lines",
            opinion.paragraphs.len(),
            lines.len()
        );

        let name = DocumentName::derive(opinion.title.as_deref());

        if self.debug {
            match self.storage.save_debug_copies(&name, markup) {
                Ok(path) => tracing::info!("Created annotated debug HTML: {}", path.display()),
                Err(e) => tracing::warn!("Failed to create debug HTML for {}: {}", name, e),
            }
        }

        let mut outputs = Vec::with_capacity(modes.len());
        for mode in modes {
            outputs.push(self.storage.save_lines(&name, &lines, *mode)?);
        }

        Ok(ProcessedDocument {
            name,
            paragraphs: opinion.paragraphs.len(),
            lines: lines.len(),
            outputs,
        })
    }

    /// Runs every source in order. A failure is recorded against its source and the batch
    /// moves on; `cancel` is checked between documents.
    pub async fn run_batch(
        &self,
        sources: &[DocumentSource],
        modes: &[OutputMode],
        cancel: &AtomicBool,
    ) -> BatchReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(sources.len());
        let mut skipped = Vec::new();

        for (index, source) in sources.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                tracing::warn!("Cancelled, skipping {} remaining documents", sources.len() - index);
                skipped.extend(sources[index..].iter().map(DocumentSource::id));
                break;
            }

            tracing::info!("[{}/{}] Processing {}", index + 1, sources.len(), source);
            let outcome = DocumentOutcome {
                source: source.id(),
                result: self.process(source, modes).await,
            };

            match &outcome.result {
                Ok(_) => tracing::info!("{}", outcome.status_line()),
                Err(_) => tracing::error!("{}", outcome.status_line()),
            }
            outcomes.push(outcome);
        }

        BatchReport {
            outcomes,
            skipped,
            started_at,
            finished_at: Utc::now(),
        }
    }
}
