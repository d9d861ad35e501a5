use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::output::OutputWriter;
use crate::parser::{self, Declaration};
use crate::source::ArticleSource;

pub const CONCURRENCY: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Written {
    pub source: String,
    pub class_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    pub source: String,
    pub error: String,
}

/// Outcome of a batch, returned once every article has settled.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub written: Vec<Written>,
    pub failures: Vec<Failure>,
}

impl RunSummary {
    fn record(&mut self, source: String, outcome: Result<Written>) {
        match outcome {
            Ok(written) => self.written.push(written),
            Err(e) => self.failures.push(Failure { source, error: format!("{e:#}") }),
        }
    }

    pub fn print(&self) {
        println!(
            "Done: {} articles ({} written, {} failed).",
            self.total,
            self.written.len(),
            self.failures.len()
        );
        if !self.failures.is_empty() {
            eprintln!("\n--- Failures ---");
            for f in &self.failures {
                eprintln!("  {}: {}", f.source, f.error);
            }
        }
    }
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );
    Ok(pb)
}

/// Fetch, convert and write every article concurrently. One article failing
/// never stops the others.
pub async fn run_articles(
    source: Arc<dyn ArticleSource>,
    writer: Arc<dyn OutputWriter>,
    out_dir: &Path,
    urls: Vec<String>,
    concurrency: usize,
) -> Result<RunSummary> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let total = urls.len();
    let pb = progress_bar(total)?;

    let mut tasks = JoinSet::new();
    let mut task_urls = HashMap::new();

    for url in urls {
        let source = Arc::clone(&source);
        let writer = Arc::clone(&writer);
        let sem = Arc::clone(&semaphore);
        let out_dir = out_dir.to_path_buf();
        let task_url = url.clone();

        let handle = tasks.spawn(async move {
            let outcome = convert_one(&sem, source.as_ref(), writer.as_ref(), &out_dir, &url).await;
            (url, outcome)
        });
        task_urls.insert(handle.id(), task_url);
    }

    let mut summary = RunSummary { total, ..Default::default() };
    while let Some(joined) = tasks.join_next().await {
        let (url, outcome) = match joined {
            Ok(done) => done,
            // A panicked task still counts against its article.
            Err(e) => {
                let url = task_urls.remove(&e.id()).unwrap_or_default();
                (url, Err(anyhow::anyhow!("task failed: {e}")))
            }
        };
        match &outcome {
            Ok(w) => {
                debug!("{} -> {}", url, w.path.display());
                pb.inc(1);
            }
            Err(e) => {
                warn!("Article failed {}: {:#}", url, e);
                pb.suspend(|| eprintln!("failed: {url}: {e:#}"));
            }
        }
        summary.record(url, outcome);
    }

    pb.finish_and_clear();
    info!(
        "Converted {} articles ({} written, {} failed)",
        total,
        summary.written.len(),
        summary.failures.len()
    );
    Ok(summary)
}

async fn convert_one(
    sem: &Semaphore,
    source: &dyn ArticleSource,
    writer: &dyn OutputWriter,
    out_dir: &Path,
    url: &str,
) -> Result<Written> {
    let _permit = sem.acquire().await.context("worker pool closed")?;
    let html = source.fetch_article(url).await?;
    let decl = parser::process_article(&html).with_context(|| format!("Failed to parse {url}"))?;
    write_declaration(writer, out_dir, url, decl).await
}

async fn write_declaration(
    writer: &dyn OutputWriter,
    out_dir: &Path,
    source: &str,
    decl: Declaration,
) -> Result<Written> {
    let path = out_dir.join(&decl.file_name);
    writer.write(&path, &decl.content).await?;
    Ok(Written { source: source.to_string(), class_name: decl.class_name, path })
}

/// Convert HTML files already on disk. Parsing runs on the rayon pool,
/// writes happen afterwards in input order.
pub async fn convert_files(
    writer: Arc<dyn OutputWriter>,
    out_dir: &Path,
    files: &[PathBuf],
) -> Result<RunSummary> {
    let pb = progress_bar(files.len())?;

    let results: Vec<(String, Result<Declaration>)> = files
        .par_iter()
        .map(|path| {
            let label = path.display().to_string();
            let decl = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {label}"))
                .and_then(|html| {
                    parser::process_article(&html).with_context(|| format!("Failed to parse {label}"))
                });
            (label, decl)
        })
        .collect();

    let mut summary = RunSummary { total: files.len(), ..Default::default() };
    for (label, decl) in results {
        let outcome = match decl {
            Ok(decl) => write_declaration(writer.as_ref(), out_dir, &label, decl).await,
            Err(e) => Err(e),
        };
        match &outcome {
            Ok(_) => pb.inc(1),
            Err(e) => {
                warn!("File failed {}: {:#}", label, e);
                pb.suspend(|| eprintln!("failed: {label}: {e:#}"));
            }
        }
        summary.record(label, outcome);
    }

    pb.finish_and_clear();
    Ok(summary)
}

pub fn write_report(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    const GOOD_URL: &str = "https://docs.example/alert/";
    const BAD_URL: &str = "https://docs.example/notification/";

    struct MemorySource(HashMap<String, String>);

    #[async_trait]
    impl ArticleSource for MemorySource {
        async fn fetch_article_urls(&self) -> Result<Vec<String>> {
            Ok(self.0.keys().cloned().collect())
        }

        async fn fetch_article(&self, url: &str) -> Result<String> {
            self.0.get(url).cloned().with_context(|| format!("404 {url}"))
        }
    }

    #[derive(Default)]
    struct MemoryWriter(Mutex<HashMap<PathBuf, String>>);

    #[async_trait]
    impl OutputWriter for MemoryWriter {
        async fn write(&self, path: &Path, content: &str) -> Result<()> {
            self.0.lock().unwrap().insert(path.to_path_buf(), content.to_string());
            Ok(())
        }
    }

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{name}")).unwrap()
    }

    fn memory_source() -> Arc<MemorySource> {
        Arc::new(MemorySource(HashMap::from([
            (GOOD_URL.to_string(), fixture("alert.html")),
            (BAD_URL.to_string(), fixture("broken_method.html")),
        ])))
    }

    #[tokio::test]
    async fn failure_does_not_block_sibling() {
        let source = memory_source();
        let writer = Arc::new(MemoryWriter::default());
        let urls = source.fetch_article_urls().await.unwrap();

        let summary = run_articles(source, writer.clone(), Path::new("out"), urls, 2).await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.written.len(), 1);
        assert_eq!(summary.written[0].source, GOOD_URL);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].source, BAD_URL);
        assert!(summary.failures[0].error.contains("no signature code block"), "{}", summary.failures[0].error);

        let files = writer.0.lock().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files.contains_key(Path::new("out/alert.d.ts")));
        assert!(!files.keys().any(|p| p.ends_with("notification.d.ts")));
    }

    #[tokio::test]
    async fn fetch_errors_are_reported() {
        let source = memory_source();
        let writer = Arc::new(MemoryWriter::default());
        let urls = vec!["https://docs.example/missing/".to_string(), GOOD_URL.to_string()];

        let summary = run_articles(source, writer, Path::new("out"), urls, 1).await.unwrap();

        assert_eq!(summary.written.len(), 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].error.contains("404"));
    }

    struct PanickingSource;

    #[async_trait]
    impl ArticleSource for PanickingSource {
        async fn fetch_article_urls(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }

        async fn fetch_article(&self, url: &str) -> Result<String> {
            if url == BAD_URL {
                panic!("fetch blew up");
            }
            Ok(fixture("alert.html"))
        }
    }

    #[tokio::test]
    async fn panicked_task_counts_as_failure() {
        let writer = Arc::new(MemoryWriter::default());
        let urls = vec![BAD_URL.to_string(), GOOD_URL.to_string()];

        let summary = run_articles(Arc::new(PanickingSource), writer, Path::new("out"), urls, 2).await.unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.written.len() + summary.failures.len(), summary.total);
        assert_eq!(summary.written[0].source, GOOD_URL);
        assert_eq!(summary.failures[0].source, BAD_URL);
        assert!(summary.failures[0].error.contains("panic"), "{}", summary.failures[0].error);
    }

    #[tokio::test]
    async fn convert_files_writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("types");
        let files = vec![
            PathBuf::from("tests/fixtures/alert.html"),
            PathBuf::from("tests/fixtures/broken_method.html"),
        ];

        let summary = convert_files(Arc::new(crate::output::FsWriter), &out, &files).await.unwrap();

        assert_eq!(summary.written.len(), 1);
        assert_eq!(summary.failures.len(), 1);
        let dts = std::fs::read_to_string(out.join("alert.d.ts")).unwrap();
        assert!(dts.contains("export declare class Alert {"));
        assert!(!out.join("notification.d.ts").exists());

        let report = dir.path().join("report.json");
        write_report(&report, &summary).unwrap();
        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["written"][0]["class_name"], "Alert");
    }
}
