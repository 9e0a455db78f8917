use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::ScanError;
use crate::observer::Observer;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// One prediction job: where we are, what counts as visible, and the time
/// range to search. Immutable once built.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub observer: Observer,
    /// Minimum elevation counted as visible, degrees, [0, 90).
    pub elevation_mask_deg: f64,
    pub start: DateTime<Utc>,
    pub duration_days: f64,
    /// Sampling step. Smaller steps tighten AOS/LOS to within one step at
    /// linear cost in sample count.
    pub step_seconds: f64,
}

impl PredictionRequest {
    pub fn end(&self) -> DateTime<Utc> {
        self.start
            + Duration::milliseconds((self.duration_days * SECONDS_PER_DAY * 1000.0).round() as i64)
    }

    pub fn step(&self) -> Duration {
        Duration::milliseconds((self.step_seconds * 1000.0).round() as i64)
    }

    /// Rejects out-of-domain parameters before any sampling happens.
    pub fn validate(&self, max_samples: u64) -> Result<(), ScanError> {
        self.observer.validate()?;
        if !(0.0..90.0).contains(&self.elevation_mask_deg) {
            return Err(ScanError::InvalidRequest(format!(
                "elevation mask {} outside [0, 90)",
                self.elevation_mask_deg
            )));
        }
        if !(self.duration_days > 0.0) || !self.duration_days.is_finite() {
            return Err(ScanError::InvalidRequest(format!(
                "duration {} days must be positive",
                self.duration_days
            )));
        }
        // Sub-millisecond steps round to a zero chrono Duration and the
        // cursor would never advance.
        if !(self.step_seconds >= 0.001) || !self.step_seconds.is_finite() {
            return Err(ScanError::InvalidRequest(format!(
                "step {} s must be at least 0.001",
                self.step_seconds
            )));
        }
        let samples = self.duration_days * SECONDS_PER_DAY / self.step_seconds;
        if samples > max_samples as f64 {
            return Err(ScanError::InvalidRequest(format!(
                "{:.0} samples exceeds the ceiling of {}",
                samples, max_samples
            )));
        }
        Ok(())
    }
}

/// A detected visibility interval. Constructed once by the scanner when a
/// crossing pair is found, owned by the caller thereafter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassWindow {
    /// Acquisition of signal: first sampled instant at or above the mask.
    pub aos: DateTime<Utc>,
    /// Loss of signal: first instant after AOS back below the mask.
    pub los: DateTime<Utc>,
    pub duration_seconds: f64,
}

impl PassWindow {
    pub(crate) fn new(aos: DateTime<Utc>, los: DateTime<Utc>) -> Self {
        debug_assert!(aos < los);
        Self {
            aos,
            los,
            duration_seconds: (los - aos).num_milliseconds() as f64 / 1000.0,
        }
    }
}

/// Scanner policy knobs. Defaults reproduce the fixed-step behavior with no
/// refinement and open passes dropped at the scan boundary.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Emit a pass still open at scan end, truncated to `los == end`,
    /// instead of dropping it.
    pub truncate_open_pass: bool,
    /// Bisect each crossing interval down to one second. Off by default;
    /// when off, results are exactly those of the plain fixed-step scan.
    pub refine_crossings: bool,
    /// Ceiling on `duration / step`, enforced at validation time.
    pub max_samples: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            truncate_open_pass: false,
            refine_crossings: false,
            max_samples: 10_000_000,
        }
    }
}
