//! # lsbprobe-core
//!
//! **Chi-square detection of LSB steganography in raster images.**
//!
//! Overwriting the least-significant bits of pixel values with payload data
//! disturbs how neighbouring samples relate to each other. This crate scans
//! the first channel of an RGBA buffer, counts for every predecessor value
//! how often its paired successor is larger, and compares those counts with
//! the 50/50 split expected from an untouched image.
//!
//! ## Quick Start
//!
//! ```
//! use lsbprobe_core::{PixelBuffer, Status, analyze};
//!
//! let pixels = PixelBuffer::from_rgba(2, 1, vec![100, 0, 0, 255, 101, 0, 0, 255]);
//! let result = analyze(&pixels);
//! assert!((0.0..=1.0).contains(&result.probability));
//! assert_ne!(result.status, Status::Suspicious);
//! ```
//!
//! ## Architecture
//!
//! Image bytes → [`decode`] → [`PixelBuffer`] → [`pairs::count_pairs`] →
//! [`chi_square::estimate`] → [`classify::Status`]
//!
//! Everything after decoding is a pure function of the buffer and may run on
//! any thread.

pub mod analysis;
pub mod buffer;
pub mod chi_square;
pub mod classify;
pub mod decode;
pub mod erf;
pub mod error;
pub mod pairs;

pub use analysis::{
    Analysis, ImageReport, REPORTED_CATEGORIES, analyze, analyze_detailed, analyze_image_bytes,
    analyze_path, analyze_paths, sha256_hex,
};
pub use buffer::PixelBuffer;
pub use chi_square::{
    CategoryTerm, ChiSquareReport, category_terms, estimate, lsb_probability, top_categories,
};
pub use classify::{AnalysisResult, CLEAN_THRESHOLD, SUSPICIOUS_THRESHOLD, Status};
pub use decode::{DecodedImage, decode_bytes, detect_format, open_path};
pub use erf::{chi_square_cdf_1df, erf};
pub use error::{Error, Result};
pub use pairs::{CategoryCount, PairHistograms, count_pairs};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
