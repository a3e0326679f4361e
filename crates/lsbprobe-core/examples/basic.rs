//! Basic steganalysis example.
//!
//! Decodes one image, runs the pair chi-square test on its first channel,
//! and prints the statistic and verdict.
//!
//! Run: `cargo run --example basic -- path/to/image.png`

use std::path::PathBuf;

use lsbprobe_core::analyze_path;

fn main() {
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: basic <image>");
        std::process::exit(2);
    };

    match analyze_path(&path) {
        Ok(report) => {
            println!("{} ({}x{} {})", report.source, report.width, report.height, report.format);
            println!(
                "chi2={:.4} over {} categories, normalized={:.4}",
                report.statistic.chi_squared,
                report.statistic.degrees_of_freedom,
                report.statistic.normalized
            );
            println!(
                "p={:.6} -> {}: {}",
                report.result.probability, report.result.status, report.result.message
            );
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
