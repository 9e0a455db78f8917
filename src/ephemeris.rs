use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::elevation::PositionProvider;
use crate::error::{EphemerisError, PositionError};
use crate::frame::EcefKm;

/// A position source backed by precomputed ephemeris samples.
///
/// Samples are ECEF positions at strictly increasing instants; lookups
/// interpolate linearly between the bracketing samples and fail outside the
/// covered span. Built per request, keyed by the object identifier it was
/// extracted for.
#[derive(Debug)]
pub struct Ephemeris {
    object_id: String,
    points: Vec<(DateTime<Utc>, EcefKm)>,
}

impl Ephemeris {
    pub fn new(
        object_id: impl Into<String>,
        points: Vec<(DateTime<Utc>, EcefKm)>,
    ) -> Result<Self, EphemerisError> {
        let object_id = object_id.into();
        if points.len() < 2 {
            return Err(EphemerisError::TooFewSamples(object_id));
        }
        if points.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(EphemerisError::OutOfOrder(object_id));
        }
        Ok(Self { object_id, points })
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// Span of instants this ephemeris can resolve, inclusive.
    pub fn span(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.points[0].0,
            self.points[self.points.len() - 1].0,
        )
    }
}

impl PositionProvider for Ephemeris {
    fn position_at(&self, at: DateTime<Utc>) -> Result<EcefKm, PositionError> {
        let (first, last) = self.span();
        if at < first || at > last {
            return Err(PositionError::new(format!(
                "ephemeris for {} covers {} to {}",
                self.object_id, first, last
            )));
        }

        let idx = self.points.partition_point(|(t, _)| *t <= at);
        if idx == self.points.len() {
            return Ok(self.points[idx - 1].1);
        }
        let (t0, p0) = self.points[idx - 1];
        let (t1, p1) = self.points[idx];

        let whole = (t1 - t0).num_milliseconds() as f64;
        let part = (at - t0).num_milliseconds() as f64;
        let f = part / whole;
        Ok(EcefKm([
            p0.0[0] + (p1.0[0] - p0.0[0]) * f,
            p0.0[1] + (p1.0[1] - p0.0[1]) * f,
            p0.0[2] + (p1.0[2] - p0.0[2]) * f,
        ]))
    }
}

/// Load an ephemeris from a plain-text file: one record per line,
/// `<RFC 3339 instant> <x> <y> <z>` with positions in ECEF kilometers.
/// Blank lines and `#` comments are skipped. The object identifier is the
/// file stem.
pub fn load_ephemeris_file(path: &Path) -> Result<Ephemeris, EphemerisError> {
    let content = fs::read_to_string(path)?;
    let object_id = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let mut points = Vec::new();
    for (num, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(EphemerisError::InvalidRecord {
                line: num + 1,
                message: format!("expected 4 fields, got {}", fields.len()),
            });
        }

        let at: DateTime<Utc> = fields[0].parse().map_err(|e| EphemerisError::InvalidRecord {
            line: num + 1,
            message: format!("bad instant: {e}"),
        })?;
        let mut xyz = [0.0; 3];
        for (i, field) in fields[1..].iter().enumerate() {
            xyz[i] = field.parse().map_err(|e| EphemerisError::InvalidRecord {
                line: num + 1,
                message: format!("bad coordinate: {e}"),
            })?;
        }
        points.push((at, EcefKm(xyz)));
    }

    Ephemeris::new(object_id, points)
}
