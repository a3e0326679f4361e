//! End-to-end analysis: pixel buffer → histograms → estimate → verdict.
//!
//! [`analyze`] is the pure entry point. The `*_bytes` / `*_path` helpers add
//! decoding, fingerprinting and timing around it, and [`analyze_paths`] fans a
//! batch of files out over scoped worker threads.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::buffer::PixelBuffer;
use crate::chi_square::{CategoryTerm, ChiSquareReport, estimate, top_categories};
use crate::classify::AnalysisResult;
use crate::decode::{DecodedImage, decode_bytes, open_path};
use crate::error::{Error, Result};
use crate::pairs::{PairHistograms, count_pairs};

/// Categories listed in [`ImageReport::top_categories`].
pub const REPORTED_CATEGORIES: usize = 5;

/// Everything computed for one buffer.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub histograms: PairHistograms,
    pub statistic: ChiSquareReport,
    pub result: AnalysisResult,
}

/// Per-input record produced by the file and upload paths.
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    /// File path or upload name.
    pub source: String,
    /// Hex SHA-256 of the undecoded input bytes.
    pub sha256: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
    pub statistic: ChiSquareReport,
    /// Largest per-category contributions to the statistic.
    pub top_categories: Vec<CategoryTerm>,
    pub result: AnalysisResult,
    pub elapsed_ms: f64,
}

/// Classify a pixel buffer.
pub fn analyze(pixels: &PixelBuffer) -> AnalysisResult {
    analyze_detailed(pixels).result
}

/// Classify a pixel buffer, keeping the intermediate histograms and statistic.
pub fn analyze_detailed(pixels: &PixelBuffer) -> Analysis {
    let histograms = count_pairs(pixels.as_bytes());
    let statistic = estimate(&histograms);
    log::debug!(
        "{}x{}: pairs={} df={} chi2={:.4} normalized={:.4} p={:.6}",
        pixels.width(),
        pixels.height(),
        statistic.pair_count,
        statistic.degrees_of_freedom,
        statistic.chi_squared,
        statistic.normalized,
        statistic.probability
    );
    let result = AnalysisResult::from_probability(statistic.probability);
    Analysis {
        histograms,
        statistic,
        result,
    }
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn report_for(source: String, raw: &[u8], decoded: &DecodedImage, t0: Instant) -> ImageReport {
    let analysis = analyze_detailed(&decoded.pixels);
    ImageReport {
        source,
        sha256: sha256_hex(raw),
        format: decoded.format_name().to_string(),
        width: decoded.pixels.width(),
        height: decoded.pixels.height(),
        bytes: raw.len(),
        statistic: analysis.statistic,
        top_categories: top_categories(&analysis.histograms, REPORTED_CATEGORIES),
        result: analysis.result,
        elapsed_ms: t0.elapsed().as_secs_f64() * 1000.0,
    }
}

/// Decode and analyze in-memory image bytes.
pub fn analyze_image_bytes(label: &str, bytes: &[u8]) -> Result<ImageReport> {
    let t0 = Instant::now();
    let decoded = decode_bytes(label, bytes)?;
    Ok(report_for(label.to_string(), bytes, &decoded, t0))
}

/// Read, decode and analyze one file.
pub fn analyze_path(path: &Path) -> Result<ImageReport> {
    let t0 = Instant::now();
    let (raw, decoded) = open_path(path)?;
    Ok(report_for(path.display().to_string(), &raw, &decoded, t0))
}

/// Analyze many files on up to `jobs` worker threads.
///
/// Results are returned in the same order as `paths`, one per input. A file
/// whose analysis panics yields [`Error::Panicked`].
pub fn analyze_paths(paths: &[PathBuf], jobs: usize) -> Vec<(PathBuf, Result<ImageReport>)> {
    run_batch(paths, jobs, analyze_path)
}

fn run_batch<F>(
    paths: &[PathBuf],
    jobs: usize,
    analyze_one: F,
) -> Vec<(PathBuf, Result<ImageReport>)>
where
    F: Fn(&Path) -> Result<ImageReport> + Sync,
{
    if paths.is_empty() {
        return Vec::new();
    }
    let jobs = jobs.clamp(1, paths.len());
    let next = AtomicUsize::new(0);
    let next = &next;
    let analyze_one = &analyze_one;

    let mut indexed: Vec<(usize, Result<ImageReport>)> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..jobs)
            .map(|_| {
                s.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        let Some(path) = paths.get(i) else {
                            break;
                        };
                        let outcome =
                            panic::catch_unwind(AssertUnwindSafe(|| analyze_one(path)))
                                .unwrap_or_else(|payload| {
                                    let message = panic_message(payload.as_ref());
                                    log::error!(
                                        "{}: analysis panicked: {message}",
                                        path.display()
                                    );
                                    Err(Error::Panicked {
                                        label: path.display().to_string(),
                                        message,
                                    })
                                });
                        done.push((i, outcome));
                    }
                    done
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect()
    });

    indexed.sort_by_key(|(i, _)| *i);
    indexed
        .into_iter()
        .map(|(i, r)| (paths[i].clone(), r))
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
