// src/main.rs
mod utils;
mod fetch;
mod extractors;
mod pipeline;
mod storage;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use utils::AppError;
use extractors::{ExtractorConfig, OpinionExtractor};
use fetch::{client, source, DocumentSource, PageClient};
use pipeline::Pipeline;
use storage::StorageManager;

/// Extracts clean body text from published legal-opinion pages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Opinion page URLs or local HTML files
    sources: Vec<String>,

    /// File with one URL or path per line (# starts a comment)
    #[arg(short = 'u', long)]
    url_file: Option<PathBuf>,

    /// Output root; files land in <output-dir>/<format>/
    #[arg(short, long, env = "OPINION_OUTPUT_DIR", default_value = "./output")]
    output_dir: PathBuf,

    /// Output format, "txt" or "jsonl" (repeatable; default both)
    #[arg(short, long = "format")]
    formats: Vec<String>,

    /// Timeout for each page fetch, in seconds
    #[arg(long, env = "OPINION_FETCH_TIMEOUT", default_value_t = 30)]
    timeout_secs: u64,

    /// User-Agent sent with each request
    #[arg(long, default_value = client::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Class of inline footnote callouts to excise from paragraphs
    #[arg(long, default_value = "nt")]
    marker_class: String,

    /// Sole class of the paragraph that opens the footnotes section
    #[arg(long, default_value = "b")]
    footnotes_class: String,

    /// Debug mode - save raw and annotated HTML copies of every page
    #[arg(short, long)]
    debug: bool,

    /// Debug-level logging unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(args.verbose);
    tracing::debug!("Starting with args: {:?}", args);

    // 2. Reject unknown formats before any fetch or parse work
    let modes = storage::parse_modes(&args.formats)?;
    tracing::info!(
        "Output formats: {}",
        modes.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ")
    );

    // 3. Collect sources
    let mut sources: Vec<DocumentSource> = args
        .sources
        .iter()
        .map(|s| DocumentSource::from_arg(s))
        .collect();
    if let Some(url_file) = &args.url_file {
        let listed = source::read_source_list(url_file)?;
        tracing::info!("Read {} sources from {}", listed.len(), url_file.display());
        sources.extend(listed);
    }
    if sources.is_empty() {
        return Err(AppError::Config(
            "No sources given (pass URLs/files or --url-file)".to_string(),
        ));
    }

    // 4. Build the pipeline
    let client = PageClient::new(&args.user_agent, Duration::from_secs(args.timeout_secs))?;
    let storage = StorageManager::new(&args.output_dir)?;
    let extractor = OpinionExtractor::with_config(ExtractorConfig {
        marker_class: args.marker_class.clone(),
        footnotes_header_class: args.footnotes_class.clone(),
        ..ExtractorConfig::default()
    });
    let pipeline = Pipeline::new(client, extractor, storage, args.debug);

    // 5. Ctrl-C stops the batch between documents
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, finishing current document");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    // 6. Process each document
    let report = pipeline.run_batch(&sources, &modes, &cancel).await;
    tracing::info!("{}", report.completion_notice());

    if report.success_count() == 0 && report.failure_count() > 0 {
        return Err(AppError::Processing(format!(
            "Failed to extract any of {} documents",
            report.failure_count()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["opinion_extractor", "https://a.test/1.html"]).unwrap();
        assert_eq!(args.sources, vec!["https://a.test/1.html".to_string()]);
        assert!(args.formats.is_empty());
        assert!(!args.debug);
        assert_eq!(args.user_agent, client::DEFAULT_USER_AGENT);
        assert_eq!(args.marker_class, "nt");
        assert_eq!(args.footnotes_class, "b");
    }

    #[test]
    fn test_args_repeatable_formats() {
        let argv = ["opinion_extractor", "-f", "txt", "--format", "jsonl", "page.html"];
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(storage::parse_modes(&args.formats).unwrap().len(), 2);
    }
}
