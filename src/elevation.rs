use chrono::{DateTime, Utc};

use crate::error::PositionError;
use crate::frame::{ecef_to_enu, EcefKm};
use crate::observer::Observer;

/// A source of positions for a moving object.
///
/// Positions are expressed in the ECEF frame in kilometers. Implementations
/// must be deterministic; an instant outside the supported span is an error,
/// never a guess.
pub trait PositionProvider {
    fn position_at(&self, at: DateTime<Utc>) -> Result<EcefKm, PositionError>;
}

impl<P: PositionProvider + ?Sized> PositionProvider for &P {
    fn position_at(&self, at: DateTime<Utc>) -> Result<EcefKm, PositionError> {
        (**self).position_at(at)
    }
}

/// Elevation of an object above an observer's local horizon, in degrees.
///
/// A pure function of time; errors propagate from the underlying position
/// source without local recovery.
pub trait ElevationFunction {
    fn elevation_deg(&self, at: DateTime<Utc>) -> Result<f64, PositionError>;
}

impl<F> ElevationFunction for F
where
    F: Fn(DateTime<Utc>) -> Result<f64, PositionError>,
{
    fn elevation_deg(&self, at: DateTime<Utc>) -> Result<f64, PositionError> {
        self(at)
    }
}

/// Elevation function for a fixed observer watching a moving object.
///
/// The observer is converted to ECEF once at construction; every sample then
/// subtracts two positions in the same frame, so the geocentric/topocentric
/// mixing trap is ruled out by the types.
pub struct TopocentricElevation<P: PositionProvider> {
    observer_ecef: EcefKm,
    lat_rad: f64,
    lon_rad: f64,
    source: P,
}

impl<P: PositionProvider> TopocentricElevation<P> {
    pub fn new(observer: &Observer, source: P) -> Self {
        Self {
            observer_ecef: observer.position_ecef_km(),
            lat_rad: observer.lat_rad(),
            lon_rad: observer.lon_rad(),
            source,
        }
    }
}

impl<P: PositionProvider> ElevationFunction for TopocentricElevation<P> {
    fn elevation_deg(&self, at: DateTime<Utc>) -> Result<f64, PositionError> {
        let position = self.source.position_at(at)?;
        let dr = self.observer_ecef.delta_to(&position);
        let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();
        if range_km == 0.0 {
            return Ok(0.0);
        }
        let (_, _, up) = ecef_to_enu(dr, self.lat_rad, self.lon_rad);
        // Rounding can push the ratio a hair past 1 at zenith; asin would
        // return NaN.
        Ok((up / range_km).clamp(-1.0, 1.0).asin().to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPosition(EcefKm);

    impl PositionProvider for FixedPosition {
        fn position_at(&self, _at: DateTime<Utc>) -> Result<EcefKm, PositionError> {
            Ok(self.0)
        }
    }

    fn any_instant() -> DateTime<Utc> {
        "2024-02-13T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn object_at_zenith_is_ninety_degrees() {
        let observer = Observer::new(0.0, 0.0, 0.0).unwrap();
        let elevation = TopocentricElevation::new(&observer, FixedPosition(EcefKm([7000.0, 0.0, 0.0])));
        let e = elevation.elevation_deg(any_instant()).unwrap();
        assert!((e - 90.0).abs() < 1e-6);
    }

    #[test]
    fn object_on_horizon_plane_is_zero_degrees() {
        let observer = Observer::new(0.0, 0.0, 0.0).unwrap();
        let site = observer.position_ecef_km();
        let elevation = TopocentricElevation::new(
            &observer,
            FixedPosition(EcefKm([site.0[0], 800.0, 0.0])),
        );
        let e = elevation.elevation_deg(any_instant()).unwrap();
        assert!(e.abs() < 1e-6);
    }

    #[test]
    fn object_below_horizon_is_negative() {
        let observer = Observer::new(0.0, 0.0, 0.0).unwrap();
        // Opposite side of the Earth.
        let elevation =
            TopocentricElevation::new(&observer, FixedPosition(EcefKm([-7000.0, 0.0, 0.0])));
        let e = elevation.elevation_deg(any_instant()).unwrap();
        assert!(e < -80.0);
    }

    #[test]
    fn source_errors_propagate() {
        struct Failing;
        impl PositionProvider for Failing {
            fn position_at(&self, _at: DateTime<Utc>) -> Result<EcefKm, PositionError> {
                Err(PositionError::new("no data for requested epoch"))
            }
        }
        let observer = Observer::new(0.0, 0.0, 0.0).unwrap();
        let elevation = TopocentricElevation::new(&observer, Failing);
        assert!(elevation.elevation_deg(any_instant()).is_err());
    }
}
