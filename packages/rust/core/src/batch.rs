//! Concurrent batch parsing: documents in, researchers and failures out.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use lattes_extract::Researcher;
use lattes_keywords::TextNormalizer;
use lattes_shared::{BatchConfig, LattesError, Result};

/// A document waiting to be parsed.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Identity used in logs and failures, usually the file name.
    pub name: String,
    /// Raw markup.
    pub html: String,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            html: html.into(),
        }
    }
}

/// Outcome of one batch run.
#[derive(Debug)]
pub struct BatchResult {
    /// Identifier of this run, for log correlation.
    pub run_id: Uuid,
    /// Parsed researchers, in input order.
    pub researchers: Vec<Researcher>,
    /// Documents that failed, with the error tagged by document name.
    pub failures: Vec<(String, LattesError)>,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl BatchResult {
    /// Documents attempted.
    pub fn total(&self) -> usize {
        self.researchers.len() + self.failures.len()
    }

    /// Whether every document parsed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Progress callback for batch runs.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each document, successful or not.
    fn document_parsed(&self, name: &str, current: usize, total: usize, ok: bool);
    /// Called when the batch completes.
    fn done(&self, result: &BatchResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn document_parsed(&self, _name: &str, _current: usize, _total: usize, _ok: bool) {}
    fn done(&self, _result: &BatchResult) {}
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// Files directly under `dir` whose extension matches, sorted by path.
pub fn collect_documents(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| LattesError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| LattesError::io(dir, e))?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    debug!(dir = %dir.display(), count = paths.len(), "collected documents");
    Ok(paths)
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse every document on blocking workers, at most `concurrency` at a time.
///
/// A failing document is recorded and skipped; the rest of the batch runs.
#[instrument(skip_all, fields(documents = docs.len(), concurrency = config.concurrency))]
pub async fn parse_documents(
    docs: Vec<SourceDocument>,
    config: &BatchConfig,
    normalizer: Arc<TextNormalizer>,
    progress: &dyn ProgressReporter,
) -> BatchResult {
    let start = Instant::now();
    let run_id = Uuid::now_v7();
    let total = docs.len();

    info!(%run_id, total, "starting batch");
    progress.phase("Parsing documents");

    let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let mut handles = Vec::with_capacity(total);

    for doc in docs {
        // The semaphore is never closed, so acquisition only waits.
        let permit = semaphore.clone().acquire_owned().await.ok();
        let normalizer = normalizer.clone();
        let name = doc.name.clone();

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            Researcher::from_html(&doc.html, &normalizer)
        });
        handles.push((name, handle));
    }

    let mut researchers = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for (i, (name, handle)) in handles.into_iter().enumerate() {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(LattesError::malformed("document", format!("worker failed: {e}"))),
        };

        match outcome {
            Ok(researcher) => {
                debug!(document = %name, researcher = %researcher.name, "parsed");
                progress.document_parsed(&name, i + 1, total, true);
                researchers.push(researcher);
            }
            Err(e) => {
                let e = e.in_document(&name);
                warn!(document = %name, error = %e, "document failed, skipping");
                progress.document_parsed(&name, i + 1, total, false);
                failures.push((name, e));
            }
        }
    }

    let result = BatchResult {
        run_id,
        researchers,
        failures,
        elapsed: start.elapsed(),
    };

    info!(
        %run_id,
        parsed = result.researchers.len(),
        failed = result.failures.len(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "batch complete"
    );
    progress.done(&result);
    result
}

/// Read every matching file under `dir` and parse it.
///
/// Only listing the directory can fail the whole call; unreadable files
/// are recorded as failures like any other document.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub async fn parse_directory(
    dir: &Path,
    config: &BatchConfig,
    normalizer: Arc<TextNormalizer>,
    progress: &dyn ProgressReporter,
) -> Result<BatchResult> {
    progress.phase("Reading documents");
    let paths = collect_documents(dir, &config.extension)?;

    let mut docs = Vec::with_capacity(paths.len());
    let mut unreadable = Vec::new();
    for path in paths {
        let name = document_name(&path);
        match tokio::fs::read_to_string(&path).await {
            Ok(html) => docs.push(SourceDocument { name, html }),
            Err(e) => {
                let e = LattesError::io(&path, e).in_document(&name);
                warn!(document = %name, error = %e, "could not read document");
                unreadable.push((name, e));
            }
        }
    }

    let mut result = parse_documents(docs, config, normalizer, progress).await;
    result.failures.extend(unreadable);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattes_shared::ErrorKind;

    fn fixture() -> String {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/html/lattes-researcher.html");
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("missing fixture {path:?}: {e}"))
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lattes-batch-test-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config(concurrency: usize) -> BatchConfig {
        BatchConfig {
            concurrency,
            ..BatchConfig::default()
        }
    }

    #[tokio::test]
    async fn keeps_input_order_and_skips_failures() {
        let good = fixture();
        let renamed = good.replace("Maria Souza Silva</h2>", "Ana Costa</h2>");
        let broken = good.replace("class=\"nome\"", "class=\"x\"");

        let docs = vec![
            SourceDocument::new("a.html", good),
            SourceDocument::new("b.html", broken),
            SourceDocument::new("c.html", renamed),
        ];
        let result = parse_documents(docs, &config(2), Arc::default(), &SilentProgress).await;

        let names: Vec<_> = result.researchers.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Maria Souza Silva", "Ana Costa"]);
        assert_eq!(result.total(), 3);
        assert!(!result.is_clean());

        let (name, err) = &result.failures[0];
        assert_eq!(name, "b.html");
        assert_eq!(err.document(), Some("b.html"));
        assert_eq!(err.kind(), ErrorKind::MissingSection);
    }

    #[tokio::test]
    async fn zero_concurrency_still_runs() {
        let docs = vec![SourceDocument::new("a.html", fixture())];
        let result = parse_documents(docs, &config(0), Arc::default(), &SilentProgress).await;
        assert_eq!(result.researchers.len(), 1);
    }

    #[tokio::test]
    async fn parses_directory_by_extension() {
        let dir = temp_dir();
        std::fs::write(dir.join("b.html"), fixture()).unwrap();
        std::fs::write(dir.join("a.HTML"), fixture()).unwrap();
        std::fs::write(dir.join("notes.txt"), "not a curriculum").unwrap();
        std::fs::create_dir_all(dir.join("nested.html")).unwrap();

        let paths = collect_documents(&dir, "html").unwrap();
        let names: Vec<_> = paths.iter().map(|p| document_name(p)).collect();
        assert_eq!(names, vec!["a.HTML", "b.html"]);

        let result = parse_directory(&dir, &config(4), Arc::default(), &SilentProgress)
            .await
            .unwrap();
        assert_eq!(result.researchers.len(), 2);
        assert!(result.is_clean());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_directory_is_io_error() {
        let dir = std::env::temp_dir().join(format!("lattes-missing-{}", Uuid::now_v7()));
        let err = parse_directory(&dir, &config(1), Arc::default(), &SilentProgress)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
