//! Status bands for a tampering probability.
//!
//! Bands are half-open with the boundary belonging to the lower band:
//!
//! | probability        | status          |
//! |--------------------|-----------------|
//! | `p <= 0.10`        | `Clean`         |
//! | `0.10 < p <= 0.95` | `Indeterminate` |
//! | `p > 0.95`         | `Suspicious`    |

use serde::{Deserialize, Serialize};

/// Probabilities strictly above this are suspicious.
pub const SUSPICIOUS_THRESHOLD: f64 = 0.95;

/// Probabilities at or below this are clean.
pub const CLEAN_THRESHOLD: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Clean,
    Indeterminate,
    Suspicious,
}

impl Status {
    /// Band a probability; boundaries fall into the lower band.
    pub fn from_probability(p: f64) -> Self {
        if p > SUSPICIOUS_THRESHOLD {
            Self::Suspicious
        } else if p > CLEAN_THRESHOLD {
            Self::Indeterminate
        } else {
            Self::Clean
        }
    }

    /// Fixed human-readable verdict for this status.
    pub fn message(self) -> &'static str {
        match self {
            Self::Clean => "No significant evidence of LSB steganography.",
            Self::Indeterminate => {
                "Inconclusive: pixel pair statistics deviate moderately from a natural image."
            }
            Self::Suspicious => "High likelihood of LSB steganography.",
        }
    }

    /// Upper-case label used in tables and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "CLEAN",
            Self::Indeterminate => "INDETERMINATE",
            Self::Suspicious => "SUSPICIOUS",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Probability, message and status of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub probability: f64,
    pub message: String,
    pub status: Status,
}

impl AnalysisResult {
    pub fn from_probability(probability: f64) -> Self {
        let status = Status::from_probability(probability);
        Self {
            probability,
            message: status.message().to_string(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(Status::from_probability(0.9500), Status::Indeterminate);
        assert_eq!(Status::from_probability(0.9501), Status::Suspicious);
        assert_eq!(Status::from_probability(0.1000), Status::Clean);
        assert_eq!(Status::from_probability(0.1001), Status::Indeterminate);
    }

    #[test]
    fn test_band_extremes() {
        assert_eq!(Status::from_probability(0.0), Status::Clean);
        assert_eq!(Status::from_probability(1.0), Status::Suspicious);
        assert_eq!(Status::from_probability(0.5), Status::Indeterminate);
    }

    #[test]
    fn test_result_carries_status_message() {
        let r = AnalysisResult::from_probability(0.99);
        assert_eq!(r.status, Status::Suspicious);
        assert_eq!(r.message, Status::Suspicious.message());
        assert_eq!(r.probability, 0.99);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&AnalysisResult::from_probability(0.0)).unwrap();
        assert!(json.contains("\"status\":\"clean\""), "{json}");
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, Status::Clean);
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::Indeterminate.to_string(), "INDETERMINATE");
    }

    #[test]
    fn test_display_honours_width() {
        assert_eq!(format!("[{:>12}]", Status::Clean), "[       CLEAN]");
        assert_eq!(format!("[{:<12}]", Status::Suspicious), "[SUSPICIOUS  ]");
    }
}
