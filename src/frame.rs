/// Position in the true-equator mean-equinox (TEME) inertial frame, kilometers.
///
/// This is the frame SGP4 predictions come out in. It must be rotated to ECEF
/// before it can be compared with a ground station position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemeKm(pub [f64; 3]);

/// Position in the Earth-centered Earth-fixed (ECEF) frame, kilometers.
///
/// All line-of-sight arithmetic in this crate happens in ECEF. Keeping TEME
/// and ECEF as distinct types makes mixing them a compile error instead of a
/// silently wrong elevation angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EcefKm(pub [f64; 3]);

impl EcefKm {
    /// Vector from `self` to `target`, in kilometers.
    pub fn delta_to(&self, target: &EcefKm) -> [f64; 3] {
        [
            target.0[0] - self.0[0],
            target.0[1] - self.0[1],
            target.0[2] - self.0[2],
        ]
    }
}

/// Rotate a TEME position into ECEF given Greenwich mean sidereal time.
pub fn teme_to_ecef(pos: TemeKm, gmst_rad: f64) -> EcefKm {
    let cos_gmst = gmst_rad.cos();
    let sin_gmst = gmst_rad.sin();
    EcefKm([
        pos.0[0] * cos_gmst + pos.0[1] * sin_gmst,
        -pos.0[0] * sin_gmst + pos.0[1] * cos_gmst,
        pos.0[2],
    ])
}

/// Express an ECEF delta vector in the local east/north/up frame of a site
/// at the given geodetic latitude and longitude.
pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teme_to_ecef_is_identity_at_zero_sidereal_time() {
        let ecef = teme_to_ecef(TemeKm([7000.0, 100.0, -300.0]), 0.0);
        assert_eq!(ecef, EcefKm([7000.0, 100.0, -300.0]));
    }

    #[test]
    fn teme_to_ecef_quarter_turn() {
        let ecef = teme_to_ecef(TemeKm([7000.0, 0.0, 0.0]), std::f64::consts::FRAC_PI_2);
        assert!(ecef.0[0].abs() < 1e-9);
        assert!((ecef.0[1] + 7000.0).abs() < 1e-9);
        assert_eq!(ecef.0[2], 0.0);
    }

    #[test]
    fn enu_up_points_along_local_vertical() {
        // Site on the equator at the prime meridian: +x is straight up,
        // +y is east, +z is north.
        let (east, north, up) = ecef_to_enu([500.0, 0.0, 0.0], 0.0, 0.0);
        assert!((up - 500.0).abs() < 1e-9);
        assert!(east.abs() < 1e-9);
        assert!(north.abs() < 1e-9);

        let (east, north, up) = ecef_to_enu([0.0, 250.0, 0.0], 0.0, 0.0);
        assert!((east - 250.0).abs() < 1e-9);
        assert!(north.abs() < 1e-9);
        assert!(up.abs() < 1e-9);
    }
}
