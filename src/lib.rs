//! Satellite visibility window prediction.
//!
//! Given a fixed ground [`Observer`] and a moving-object
//! [`PositionProvider`] (SGP4-propagated elements or a precomputed
//! ephemeris), [`PassScanner`] walks a time range in fixed steps and reports
//! every interval where the object's elevation stays at or above a
//! configured mask, as [`PassWindow`] records with AOS/LOS instants and
//! duration.

pub mod elevation;
pub mod ephemeris;
pub mod error;
pub mod frame;
pub mod observer;
pub mod propagation;
pub mod report;
pub mod scanner;
pub mod tle;
pub mod types;

pub use elevation::{ElevationFunction, PositionProvider, TopocentricElevation};
pub use ephemeris::Ephemeris;
pub use error::{EphemerisError, PositionError, ScanError, TleError};
pub use frame::{EcefKm, TemeKm};
pub use observer::Observer;
pub use propagation::TleSatellite;
pub use scanner::{CancelToken, PassScanner};
pub use types::{PassWindow, PredictionRequest, ScanOptions};
