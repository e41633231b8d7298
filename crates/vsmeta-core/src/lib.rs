pub mod asset;
pub mod convert;
pub mod encode;
pub mod error;
pub mod nfo;
pub mod record;
pub mod scan;
pub mod writer;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub use error::Error;
pub use record::MovieRecord;

fn default_poster_suffix() -> String {
    "-poster.jpg".to_string()
}

fn default_fanart_suffix() -> String {
    "-fanart.jpg".to_string()
}

fn default_video_extensions() -> Vec<String> {
    [".mp4", ".mkv", ".avi", ".mov", ".wmv", ".ts", ".rmvb"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// Directories to scan for videos.
    pub roots: Vec<PathBuf>,
    /// Artwork file suffixes appended to the video's stem.
    #[serde(default = "default_poster_suffix")]
    pub poster_suffix: String,
    #[serde(default = "default_fanart_suffix")]
    pub fanart_suffix: String,
    /// Extensions that count as video files (leading dot optional,
    /// case-insensitive).
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
    /// Re-encode even when a sidecar already exists.
    #[serde(default)]
    pub overwrite: bool,
    /// Remove existing sidecars before deciding whether to convert.
    #[serde(default)]
    pub delete_vsmeta: bool,
    /// Worker threads; 0 uses the rayon default.
    #[serde(default)]
    pub threads: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            poster_suffix: default_poster_suffix(),
            fanart_suffix: default_fanart_suffix(),
            video_extensions: default_video_extensions(),
            overwrite: false,
            delete_vsmeta: false,
            threads: 0,
        }
    }
}

/// One failed work item and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Failure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessResult {
    pub total: u64,
    pub converted: u64,
    pub skipped: u64,
    pub failed: u64,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub failures: Vec<Failure>,
}

impl ProcessResult {
    /// Failure reasons aggregated into (reason, count) pairs, first
    /// occurrence first.
    pub fn failure_counts(&self) -> Vec<(String, u64)> {
        let mut counts: Vec<(String, u64)> = Vec::new();
        for f in &self.failures {
            match counts.iter_mut().find(|(reason, _)| *reason == f.reason) {
                Some((_, n)) => *n += 1,
                None => counts.push((f.reason.clone(), 1)),
            }
        }
        counts
    }
}

/// Type alias for progress callback
pub type ProgressCallback = dyn Fn(&str, u64, u64, &str) + Send + Sync;

/// Throttled progress reporter — emits at most every 200ms or on completion.
pub struct ThrottledProgress<'a> {
    inner: &'a ProgressCallback,
    last_emit: std::sync::Mutex<Instant>,
}

impl<'a> ThrottledProgress<'a> {
    pub fn new(inner: &'a ProgressCallback) -> Self {
        Self {
            inner,
            last_emit: std::sync::Mutex::new(Instant::now() - std::time::Duration::from_secs(1)),
        }
    }

    pub fn report(&self, stage: &str, current: u64, total: u64, message: &str) {
        let is_done = current + 1 >= total;
        if !is_done {
            let mut last = self.last_emit.lock().unwrap();
            if last.elapsed().as_millis() < 200 {
                return;
            }
            *last = Instant::now();
        }
        (self.inner)(stage, current, total, message);
    }
}

/// Run the full scan-and-convert pipeline with progress reporting.
///
/// Every work item is independent; failures are collected, never fatal to
/// the batch.
pub fn process(
    options: &ProcessOptions,
    progress_callback: &ProgressCallback,
) -> anyhow::Result<ProcessResult> {
    let tp = ThrottledProgress::new(progress_callback);

    // Stage 1: Scan
    let scan = scan::scan_videos(options);
    let total = scan.items.len() as u64;
    tp.report("scan", total, total, &format!("{} video files found", total));

    let mut result = ProcessResult {
        total,
        warnings: scan.warnings,
        ..ProcessResult::default()
    };
    if scan.items.is_empty() {
        return Ok(result);
    }

    // Stage 2: Convert, one worker per file
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()?;
    let counter = AtomicU64::new(0);
    let outcomes: Vec<Result<convert::Outcome, Error>> = pool.install(|| {
        scan.items
            .par_iter()
            .map(|item| {
                let outcome = convert::convert_one(item, options);
                let current = counter.fetch_add(1, Ordering::Relaxed);
                let name = item
                    .video_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("");
                tp.report("convert", current, total, name);
                outcome
            })
            .collect()
    });

    for (item, outcome) in scan.items.iter().zip(outcomes) {
        match outcome {
            Ok(convert::Outcome::Written { warnings }) => {
                result.converted += 1;
                result.warnings.extend(warnings);
            }
            Ok(convert::Outcome::Skipped) => result.skipped += 1,
            Err(e) => {
                result.failed += 1;
                result.failures.push(Failure {
                    path: item.video_path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(result)
}
