use std::io::Write;
use std::path::PathBuf;

use lsbprobe_core::{CLEAN_THRESHOLD, ImageReport, SUSPICIOUS_THRESHOLD, Status, analyze_paths};

pub fn run(inputs: &[String], output_path: Option<&str>, jobs: usize) {
    let paths = super::collect_inputs(inputs);
    if paths.is_empty() {
        eprintln!("No input images.");
        std::process::exit(1);
    }

    eprintln!("🔬 Analyzing {} image(s)...", paths.len());
    let _ = std::io::stderr().flush();

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for (path, outcome) in analyze_paths(&paths, jobs) {
        match outcome {
            Ok(r) => reports.push(r),
            Err(e) => {
                log::warn!("{}: {e}", path.display());
                failures.push((path, e.to_string()));
            }
        }
    }

    if reports.is_empty() {
        eprintln!("No image could be analyzed.");
        for (path, err) in &failures {
            eprintln!("  {}: {err}", path.display());
        }
        std::process::exit(1);
    }

    let report = generate_report(&reports, &failures);

    match output_path {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &report) {
                eprintln!("Failed to write report to {path}: {e}");
                std::process::exit(1);
            }
            eprintln!("📄 Report saved to: {path}");
        }
        None => print!("{report}"),
    }
}

fn generate_report(reports: &[ImageReport], failures: &[(PathBuf, String)]) -> String {
    let mut out = String::new();
    out.push_str("# lsbprobe LSB Steganalysis Report\n\n");
    out.push_str(&format!("Generated: {}\n\n", timestamp_now()));
    out.push_str(&format!(
        "Bands: clean p <= {CLEAN_THRESHOLD}, suspicious p > {SUSPICIOUS_THRESHOLD}, otherwise indeterminate.\n\n"
    ));

    let count = |s: Status| reports.iter().filter(|r| r.result.status == s).count();
    out.push_str("## Summary\n\n");
    out.push_str(&format!(
        "- Images analyzed: {}\n- Clean: {}\n- Indeterminate: {}\n- Suspicious: {}\n- Failed: {}\n\n",
        reports.len(),
        count(Status::Clean),
        count(Status::Indeterminate),
        count(Status::Suspicious),
        failures.len()
    ));

    out.push_str("| Image | Status | p | Chi-square | df | Pairs |\n");
    out.push_str("|-------|--------|---|------------|----|-------|\n");
    for r in reports {
        out.push_str(&format!(
            "| {} | {} | {:.6} | {:.4} | {} | {} |\n",
            r.source,
            r.result.status,
            r.result.probability,
            r.statistic.chi_squared,
            r.statistic.degrees_of_freedom,
            r.statistic.pair_count
        ));
    }
    out.push('\n');

    for r in reports {
        out.push_str(&format!("## {}\n\n", r.source));
        out.push_str(&format!(
            "- Format: {} ({}x{}, {} bytes)\n- SHA-256: `{}`\n- Verdict: **{}** (p={:.6})\n- {}\n\n",
            r.format,
            r.width,
            r.height,
            r.bytes,
            r.sha256,
            r.result.status,
            r.result.probability,
            r.result.message
        ));
        if !r.top_categories.is_empty() {
            out.push_str("| Value | Greater | Total | Expected | Term |\n");
            out.push_str("|-------|---------|-------|----------|------|\n");
            for t in &r.top_categories {
                out.push_str(&format!(
                    "| {} | {} | {} | {:.1} | {:.4} |\n",
                    t.value, t.greater, t.total, t.expected, t.term
                ));
            }
            out.push('\n');
        }
        out.push_str("---\n\n");
    }

    if !failures.is_empty() {
        out.push_str("## Failures\n\n");
        for (path, err) in failures {
            out.push_str(&format!("- `{}`: {err}\n", path.display()));
        }
        out.push('\n');
    }

    out
}

fn timestamp_now() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format!("Unix timestamp: {}", dur.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsbprobe_core::{AnalysisResult, CategoryTerm, ChiSquareReport};

    fn report(source: &str, probability: f64) -> ImageReport {
        ImageReport {
            source: source.to_string(),
            sha256: "ab".repeat(32),
            format: "bmp".to_string(),
            width: 8,
            height: 8,
            bytes: 310,
            statistic: ChiSquareReport {
                chi_squared: 12.0,
                degrees_of_freedom: 3,
                normalized: 4.0,
                probability,
                pair_count: 32,
            },
            top_categories: vec![CategoryTerm {
                value: 17,
                total: 10,
                greater: 9,
                expected: 5.0,
                term: 3.2,
            }],
            result: AnalysisResult::from_probability(probability),
            elapsed_ms: 1.0,
        }
    }

    #[test]
    fn test_report_contains_each_image() {
        let reports = vec![report("one.bmp", 0.97), report("two.bmp", 0.05)];
        let md = generate_report(&reports, &[]);
        assert!(md.contains("## one.bmp"));
        assert!(md.contains("## two.bmp"));
        assert!(md.contains("- Suspicious: 1"));
        assert!(md.contains("- Clean: 1"));
        assert!(md.contains("| 17 | 9 | 10 | 5.0 | 3.2000 |"));
        assert!(!md.contains("## Failures"));
    }

    #[test]
    fn test_report_lists_failures() {
        let failures = vec![(PathBuf::from("bad.png"), "empty input: bad.png".to_string())];
        let md = generate_report(&[report("ok.bmp", 0.5)], &failures);
        assert!(md.contains("## Failures"));
        assert!(md.contains("`bad.png`: empty input"));
        assert!(md.contains("- Indeterminate: 1"));
    }
}
