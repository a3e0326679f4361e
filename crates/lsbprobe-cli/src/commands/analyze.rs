use std::io::Write;
use std::path::PathBuf;

use lsbprobe_core::{ImageReport, Status, analyze_paths};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AnalyzeView {
    Summary,
    Detailed,
}

pub struct AnalyzeCommandConfig<'a> {
    pub inputs: &'a [String],
    pub jobs: usize,
    pub view: &'a str,
    pub output_path: Option<&'a str>,
}

pub fn run(cfg: AnalyzeCommandConfig<'_>) {
    let view = AnalyzeView::parse(cfg.view);
    let paths = super::collect_inputs(cfg.inputs);

    if paths.is_empty() {
        eprintln!("No input images.");
        std::process::exit(1);
    }

    // Announce before the scan so the busy line is visible for large batches.
    println!(
        "Analyzing {} image(s) on {} thread(s) (view: {})...\n",
        paths.len(),
        cfg.jobs.min(paths.len()),
        view.as_str()
    );
    let _ = std::io::stdout().flush();

    let mut reports = Vec::new();
    let mut failures: Vec<(PathBuf, String)> = Vec::new();
    let mut status_counts = [0usize; 3];

    for (path, outcome) in analyze_paths(&paths, cfg.jobs) {
        match outcome {
            Ok(report) => {
                status_counts[status_index(report.result.status)] += 1;
                match view {
                    AnalyzeView::Summary => print_summary(&report),
                    AnalyzeView::Detailed => print_detailed(&report),
                }
                reports.push(report);
            }
            Err(e) => {
                log::warn!("{}: {e}", path.display());
                eprintln!("  ✗ {e}");
                failures.push((path, e.to_string()));
            }
        }
    }

    if !reports.is_empty() {
        print_table(&reports);
    }
    println!(
        "\n{} clean, {} indeterminate, {} suspicious, {} failed",
        status_counts[0],
        status_counts[1],
        status_counts[2],
        failures.len()
    );

    if let Some(path) = cfg.output_path {
        let json = results_json(&reports, &failures);
        match serde_json::to_string_pretty(&json) {
            Ok(text) => match std::fs::write(path, text) {
                Ok(()) => println!("Results written to {path}"),
                Err(e) => eprintln!("Failed to write {path}: {e}"),
            },
            Err(e) => eprintln!("Failed to serialize results: {e}"),
        }
    }

    if reports.is_empty() {
        std::process::exit(1);
    }
}

fn status_index(status: Status) -> usize {
    match status {
        Status::Clean => 0,
        Status::Indeterminate => 1,
        Status::Suspicious => 2,
    }
}

fn status_marker(status: Status) -> &'static str {
    match status {
        Status::Clean => "✓",
        Status::Indeterminate => "?",
        Status::Suspicious => "!",
    }
}

fn print_summary(r: &ImageReport) {
    println!(
        "  {} {}  p={:.4}  [{}]",
        status_marker(r.result.status),
        r.source,
        r.result.probability,
        r.result.status
    );
}

fn print_detailed(r: &ImageReport) {
    let st = &r.statistic;
    println!("  ┌─ {} ({}, {}x{}, {} bytes)", r.source, r.format, r.width, r.height, r.bytes);
    println!("  │ SHA-256:      {}", r.sha256);
    println!(
        "  │ Pairs:        {} across {} categories",
        st.pair_count, st.degrees_of_freedom
    );
    println!(
        "  │ Chi-square:   {:.4} (normalized {:.4})",
        st.chi_squared, st.normalized
    );
    println!(
        "  │ Probability:  {:.6} [{}]",
        r.result.probability, r.result.status
    );
    if !r.top_categories.is_empty() {
        println!("  │ Top categories:");
        for t in &r.top_categories {
            println!(
                "  │   value {:>3}: {:>6}/{:<6} greater (expected {:.1}), term {:.3}",
                t.value, t.greater, t.total, t.expected, t.term
            );
        }
    }
    println!("  │ {}", r.result.message);
    println!("  └─ {:.1}ms", r.elapsed_ms);
}

fn print_table(reports: &[ImageReport]) {
    println!("\n{}", "=".repeat(72));
    println!(
        "{:<40} {:>10} {:>8} {:>12}",
        "Image", "p", "df", "Status"
    );
    println!("{}", "-".repeat(72));

    let mut sorted: Vec<&ImageReport> = reports.iter().collect();
    sorted.sort_by(|a, b| {
        b.result
            .probability
            .partial_cmp(&a.result.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for r in sorted {
        println!(
            "  {:<38} {:>10.4} {:>8} {:>12}",
            truncate(&r.source, 38),
            r.result.probability,
            r.statistic.degrees_of_freedom,
            r.result.status
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        return s.to_string();
    }
    let tail: String = s.chars().skip(count - (max - 1)).collect();
    format!("…{tail}")
}

fn results_json(reports: &[ImageReport], failures: &[(PathBuf, String)]) -> serde_json::Value {
    serde_json::json!({
        "version": lsbprobe_core::VERSION,
        "images": reports,
        "failures": failures
            .iter()
            .map(|(path, error)| serde_json::json!({
                "path": path.display().to_string(),
                "error": error,
            }))
            .collect::<Vec<_>>(),
    })
}

impl AnalyzeView {
    fn parse(s: &str) -> Self {
        match s {
            "detailed" => Self::Detailed,
            _ => Self::Summary,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Detailed => "detailed",
        }
    }
}
