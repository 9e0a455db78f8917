use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::elevation::ElevationFunction;
use crate::error::ScanError;
use crate::types::{PassWindow, PredictionRequest, ScanOptions};

/// Crossing refinement stops once the bracketing interval is this small.
const REFINE_TOLERANCE_SECONDS: i64 = 1;

/// Cooperative cancellation handle, checked once per sampling step.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Fixed-step threshold scanner over an elevation signal.
///
/// Walks the requested range, sampling the elevation function at each step
/// and tracking whether the object is currently above the mask. An upward
/// crossing opens a pass, a downward crossing closes it and emits a
/// [`PassWindow`]. At most one pass is open at a time, so the emitted
/// sequence is strictly increasing in AOS and windows never overlap.
#[derive(Debug, Default)]
pub struct PassScanner {
    options: ScanOptions,
}

impl PassScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan the requested range. "No passes" is `Ok(vec![])`, never an error.
    pub fn scan<E: ElevationFunction>(
        &self,
        request: &PredictionRequest,
        elevation: &E,
    ) -> Result<Vec<PassWindow>, ScanError> {
        self.run(request, elevation, None)
    }

    /// Like [`scan`](Self::scan), aborting with [`ScanError::Cancelled`] once
    /// `cancel` fires. The check happens at step boundaries.
    pub fn scan_with_cancel<E: ElevationFunction>(
        &self,
        request: &PredictionRequest,
        elevation: &E,
        cancel: &CancelToken,
    ) -> Result<Vec<PassWindow>, ScanError> {
        self.run(request, elevation, Some(cancel))
    }

    fn run<E: ElevationFunction>(
        &self,
        request: &PredictionRequest,
        elevation: &E,
        cancel: Option<&CancelToken>,
    ) -> Result<Vec<PassWindow>, ScanError> {
        request.validate(self.options.max_samples)?;

        let end = request.end();
        let step = request.step();
        let mask = request.elevation_mask_deg;

        let mut passes = Vec::new();
        let mut pending_aos: Option<DateTime<Utc>> = None;
        let mut cursor = request.start;

        while cursor <= end {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return Err(ScanError::Cancelled);
                }
            }

            let e = sample(elevation, cursor)?;

            match pending_aos {
                None if e >= mask => {
                    let aos = if self.options.refine_crossings && cursor > request.start {
                        refine_crossing(elevation, cursor - step, cursor, mask, true)?
                    } else {
                        cursor
                    };
                    pending_aos = Some(aos);
                }
                Some(aos) if e < mask => {
                    let los = if self.options.refine_crossings {
                        refine_crossing(elevation, cursor - step, cursor, mask, false)?
                    } else {
                        cursor
                    };
                    passes.push(PassWindow::new(aos, los));
                    pending_aos = None;
                }
                _ => {}
            }

            cursor += step;
        }

        // A pass still open at the end of the range is dropped unless the
        // caller opted into truncation.
        if let Some(aos) = pending_aos {
            if self.options.truncate_open_pass && aos < end {
                passes.push(PassWindow::new(aos, end));
            } else {
                log::debug!("pass open at scan end (aos {aos}) dropped");
            }
        }

        Ok(passes)
    }
}

fn sample<E: ElevationFunction>(
    elevation: &E,
    at: DateTime<Utc>,
) -> Result<f64, ScanError> {
    elevation
        .elevation_deg(at)
        .map_err(|e| ScanError::PositionUnavailable {
            instant: at,
            message: e.message,
        })
}

/// Binary search for the mask crossing inside one sampling interval.
///
/// `before` is below the mask and `after` at or above it when `rising`, and
/// the other way around when setting. Returns the above-side endpoint for a
/// rising crossing and the below-side endpoint for a setting one, so the
/// emitted window still satisfies `elevation(aos) >= mask > elevation(los)`.
fn refine_crossing<E: ElevationFunction>(
    elevation: &E,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    mask: f64,
    rising: bool,
) -> Result<DateTime<Utc>, ScanError> {
    let mut low = before;
    let mut high = after;

    while (high - low) > Duration::seconds(REFINE_TOLERANCE_SECONDS) {
        let mid = low + (high - low) / 2;
        let above = sample(elevation, mid)? >= mask;
        if above == rising {
            high = mid;
        } else {
            low = mid;
        }
    }

    Ok(high)
}
