//! Shared settings for the calibration tools.
//! Read from environment variables, with `.env` loaded by the binaries.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::map::{CalibrationFrame, GeoPoint, MapError, SITE_MAP};
use crate::orientation::{AccelReading, AxisReadings, Orthogonalization};

/// Environment variable names.
pub const ENV_SAMPLE_LONGITUDE: &str = "MAP_SAMPLE_LONGITUDE";
pub const ENV_SAMPLE_LATITUDE: &str = "MAP_SAMPLE_LATITUDE";
pub const ENV_MAP_FRAME_JSON: &str = "MAP_FRAME_JSON";
pub const ENV_ROTATION_STRATEGY: &str = "ROTATION_STRATEGY";
pub const ENV_VIZ_X: &str = "ROTATION_VIZ_X";
pub const ENV_VIZ_Y: &str = "ROTATION_VIZ_Y";
pub const ENV_VIZ_Z: &str = "ROTATION_VIZ_Z";

/// The triangle next to first aid.
pub const SAMPLE_POINT: GeoPoint = GeoPoint::new(-2.377864785129338, 52.04165543846885);

/// Settings errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("Invalid map frame: {0}")]
    Frame(#[from] MapError),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for the map location and rotation matrix runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Longitude of the point to place on the map
    pub sample_longitude: f64,
    /// Latitude of the point to place on the map
    pub sample_latitude: f64,
    /// Map corners and image size
    pub map_frame: CalibrationFrame,
    /// Accelerometer readings, one per visualiser axis
    pub readings: AxisReadings,
    /// How the Y axis is derived
    pub strategy: Orthogonalization,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            sample_longitude: SAMPLE_POINT.longitude,
            sample_latitude: SAMPLE_POINT.latitude,
            map_frame: SITE_MAP,
            readings: AxisReadings::sample(),
            strategy: Orthogonalization::CrossProduct,
        }
    }
}

impl AppSettings {
    /// Load settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through `lookup`, starting from the defaults.
    ///
    /// Values that fail to parse are logged and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(v) = lookup(ENV_SAMPLE_LONGITUDE) {
            apply(&mut settings.sample_longitude, parse_f64(ENV_SAMPLE_LONGITUDE, &v));
        }
        if let Some(v) = lookup(ENV_SAMPLE_LATITUDE) {
            apply(&mut settings.sample_latitude, parse_f64(ENV_SAMPLE_LATITUDE, &v));
        }
        if let Some(v) = lookup(ENV_MAP_FRAME_JSON) {
            apply(
                &mut settings.map_frame,
                CalibrationFrame::from_json(&v).map_err(SettingsError::from),
            );
        }
        if let Some(v) = lookup(ENV_ROTATION_STRATEGY) {
            apply(&mut settings.strategy, Self::parse_strategy(&v));
        }
        if let Some(v) = lookup(ENV_VIZ_X) {
            apply(&mut settings.readings.viz_x, parse_reading(ENV_VIZ_X, &v));
        }
        if let Some(v) = lookup(ENV_VIZ_Y) {
            apply(&mut settings.readings.viz_y, parse_reading(ENV_VIZ_Y, &v));
        }
        if let Some(v) = lookup(ENV_VIZ_Z) {
            apply(&mut settings.readings.viz_z, parse_reading(ENV_VIZ_Z, &v));
        }

        settings
    }

    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse an orthogonalization strategy name.
    pub fn parse_strategy(value: &str) -> Result<Orthogonalization, SettingsError> {
        match value.trim().to_lowercase().as_str() {
            "cross" | "cross_product" => Ok(Orthogonalization::CrossProduct),
            "orthonormal" => Ok(Orthogonalization::Orthonormal),
            _ => Err(invalid(ENV_ROTATION_STRATEGY, value)),
        }
    }

    /// The point to place on the map.
    pub fn sample_point(&self) -> GeoPoint {
        GeoPoint::new(self.sample_longitude, self.sample_latitude)
    }
}

fn apply<T>(slot: &mut T, parsed: Result<T, SettingsError>) {
    match parsed {
        Ok(value) => *slot = value,
        Err(e) => tracing::warn!("{}, using default", e),
    }
}

fn invalid(key: &str, value: &str) -> SettingsError {
    SettingsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_f64(key: &str, value: &str) -> Result<f64, SettingsError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(key, value))
}

/// Parse a reading written as `x,y,z`.
fn parse_reading(key: &str, value: &str) -> Result<AccelReading, SettingsError> {
    let parts = value
        .split(',')
        .map(|part| parse_f64(key, part))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid(key, value))?;

    match parts.as_slice() {
        [x, y, z] => Ok(AccelReading::new(*x, *y, *z)),
        _ => Err(invalid(key, value)),
    }
}
