use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::elevation::PositionProvider;
use crate::error::{PositionError, TleError};
use crate::frame::{teme_to_ecef, EcefKm, TemeKm};

/// A satellite position source backed by SGP4 propagation of a two-line
/// element set.
///
/// Built once per request from supplied elements; holds no process-wide
/// state and is safe to share read-only between concurrent scans.
#[derive(Debug)]
pub struct TleSatellite {
    pub name: String,
    pub norad_id: u32,
    elements: Elements,
    constants: Constants,
}

impl TleSatellite {
    /// Parse a two-line element set. Lines must carry their `"1 "` / `"2 "`
    /// prefixes; anything else is rejected before sgp4 sees it.
    pub fn from_tle(name: Option<String>, line1: &str, line2: &str) -> Result<Self, TleError> {
        let context = name.clone().unwrap_or_else(|| "unnamed".to_string());
        if !line1.starts_with("1 ") || !line2.starts_with("2 ") {
            return Err(TleError::InvalidTle {
                context,
                message: "lines must start with \"1 \" and \"2 \"".to_string(),
            });
        }
        let elements = Elements::from_tle(name, line1.as_bytes(), line2.as_bytes()).map_err(
            |e| TleError::InvalidTle {
                context: context.clone(),
                message: e.to_string(),
            },
        )?;
        Self::from_elements(elements)
    }

    pub fn from_elements(elements: Elements) -> Result<Self, TleError> {
        let name = elements
            .object_name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));
        let constants = Constants::from_elements(&elements).map_err(|e| TleError::InvalidTle {
            context: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            name,
            norad_id: elements.norad_id as u32,
            elements,
            constants,
        })
    }
}

impl PositionProvider for TleSatellite {
    fn position_at(&self, at: DateTime<Utc>) -> Result<EcefKm, PositionError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| PositionError::new(e.to_string()))?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PositionError::new(e.to_string()))?;

        let gmst =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&at.naive_utc()));

        Ok(teme_to_ecef(TemeKm(prediction.position), gmst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_LINE1: &str =
        "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
    const ISS_LINE2: &str =
        "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

    #[test]
    fn parses_named_tle() {
        let sat = TleSatellite::from_tle(Some("ISS (ZARYA)".into()), ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(sat.name, "ISS (ZARYA)");
        assert_eq!(sat.norad_id, 25544);
    }

    #[test]
    fn unnamed_tle_falls_back_to_norad_id() {
        let sat = TleSatellite::from_tle(None, ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(sat.name, "NORAD 25544");
    }

    #[test]
    fn rejects_swapped_lines() {
        let err = TleSatellite::from_tle(None, ISS_LINE2, ISS_LINE1).unwrap_err();
        assert!(matches!(err, TleError::InvalidTle { .. }));
    }

    #[test]
    fn position_near_epoch_has_leo_magnitude() {
        let sat = TleSatellite::from_tle(None, ISS_LINE1, ISS_LINE2).unwrap();
        // Epoch of the fixture: 2020 day 194.886 (2020-07-12 ~21:16 UTC).
        let at: DateTime<Utc> = "2020-07-12T21:16:00Z".parse().unwrap();
        let EcefKm([x, y, z]) = sat.position_at(at).unwrap();
        let r = (x * x + y * y + z * z).sqrt();
        assert!(r > 6500.0 && r < 7100.0, "geocentric radius {} km", r);
    }

    #[test]
    fn propagates_a_day_past_epoch() {
        let sat = TleSatellite::from_tle(None, ISS_LINE1, ISS_LINE2).unwrap();
        let at: DateTime<Utc> = "2020-07-13T21:16:00Z".parse().unwrap();
        assert!(sat.position_at(at).is_ok());
    }
}
