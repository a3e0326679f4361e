//! Error type for the decoding boundary.
//!
//! The statistic itself never fails; everything here originates from reading
//! or decoding an image before the pixel buffer exists.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Reading an input file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The container was recognized but could not be decoded.
    #[error("failed to decode {label}: {source}")]
    Decode {
        label: String,
        #[source]
        source: image::ImageError,
    },

    /// The bytes are not PNG, BMP or JPEG.
    #[error("unsupported image format: {label}")]
    UnsupportedFormat { label: String },

    /// Analysis of one input panicked; the rest of the batch still ran.
    #[error("analysis of {label} panicked: {message}")]
    Panicked { label: String, message: String },

    /// Zero-length input.
    #[error("empty input: {label}")]
    EmptyInput { label: String },
}

pub type Result<T> = std::result::Result<T, Error>;
