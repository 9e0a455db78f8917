use crate::error::ScanError;
use crate::frame::EcefKm;

/// Lowest altitude accepted for a ground site, meters below the ellipsoid.
pub const MIN_ALTITUDE_M: f64 = -500.0;

/// A fixed ground location in geodetic coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl Observer {
    /// Build an observer, rejecting coordinates outside their domain.
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Result<Self, ScanError> {
        let observer = Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        };
        observer.validate()?;
        Ok(observer)
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(ScanError::InvalidRequest(format!(
                "latitude {} outside [-90, 90]",
                self.latitude_deg
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err(ScanError::InvalidRequest(format!(
                "longitude {} outside [-180, 180]",
                self.longitude_deg
            )));
        }
        if !(self.altitude_m >= MIN_ALTITUDE_M) || !self.altitude_m.is_finite() {
            return Err(ScanError::InvalidRequest(format!(
                "altitude {} below {} m",
                self.altitude_m, MIN_ALTITUDE_M
            )));
        }
        Ok(())
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    /// Geodetic to ECEF conversion on the WGS-84 ellipsoid.
    pub fn position_ecef_km(&self) -> EcefKm {
        let a = 6378.137;
        let e2 = 0.00669437999014;
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        EcefKm([
            (n + alt_km) * cos_lat * lon.cos(),
            (n + alt_km) * cos_lat * lon.sin(),
            (n * (1.0 - e2) + alt_km) * sin_lat,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_coordinates() {
        assert!(Observer::new(28.5721, -80.648, 0.0).is_ok());
        assert!(Observer::new(-90.0, 180.0, MIN_ALTITUDE_M).is_ok());
    }

    #[test]
    fn rejects_out_of_domain_coordinates() {
        assert!(Observer::new(91.0, 0.0, 0.0).is_err());
        assert!(Observer::new(0.0, -181.0, 0.0).is_err());
        assert!(Observer::new(0.0, 0.0, -501.0).is_err());
        assert!(Observer::new(f64::NAN, 0.0, 0.0).is_err());
        assert!(Observer::new(0.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn ecef_on_equator_prime_meridian() {
        let observer = Observer::new(0.0, 0.0, 0.0).unwrap();
        let EcefKm([x, y, z]) = observer.position_ecef_km();
        assert!((x - 6378.137).abs() < 1e-6);
        assert!(y.abs() < 1e-9);
        assert!(z.abs() < 1e-9);
    }

    #[test]
    fn ecef_at_north_pole() {
        let observer = Observer::new(90.0, 0.0, 0.0).unwrap();
        let EcefKm([x, y, z]) = observer.position_ecef_km();
        // Polar radius of the WGS-84 ellipsoid.
        assert!((z - 6356.752).abs() < 1e-2);
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-9);
    }
}
