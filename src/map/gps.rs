//! GPS fixes as reported by the isopod to the backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mapper::{GeoPoint, MapError};

/// Timestamp format used in position reports.
const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Represents the data captured in a momentary GPS fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsFix {
    /// Longitude of the fix location in signed decimal degrees
    pub longitude: f64,
    /// Latitude of the fix location in signed decimal degrees
    pub latitude: f64,
    /// Altitude of the fix location in metres
    pub altitude: f32,
    /// The number of satellites in view at the time of the fix
    pub satellites: usize,
    /// The time, in UTC, of the fix
    pub time: DateTime<Utc>,
}

impl Default for GpsFix {
    fn default() -> Self {
        Self {
            longitude: 0.0, // Null island
            latitude: 0.0,
            altitude: 0.0,
            satellites: 0,
            time: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Wire shape of a position report. Extra fields such as battery readings
/// are ignored.
#[derive(Debug, Deserialize, Serialize)]
struct FixReport {
    long: f64,
    lat: f64,
    alt: f32,
    time: String,
    sats: usize,
}

impl GpsFix {
    /// Parse a position report body.
    pub fn from_report_json(json: &str) -> Result<Self, MapError> {
        let report: FixReport = serde_json::from_str(json)?;
        let time = NaiveDateTime::parse_from_str(&report.time, REPORT_TIME_FORMAT)?.and_utc();

        if report.sats == 0 {
            tracing::warn!(time = %report.time, "Position report has no satellites, likely a stub fix");
        }

        Ok(Self {
            longitude: report.long,
            latitude: report.lat,
            altitude: report.alt,
            satellites: report.sats,
            time,
        })
    }

    /// Serialize into the position report shape.
    pub fn to_report_json(&self) -> Result<String, MapError> {
        let report = FixReport {
            long: self.longitude,
            lat: self.latitude,
            alt: self.altitude,
            time: self.time.format(REPORT_TIME_FORMAT).to_string(),
            sats: self.satellites,
        };
        Ok(serde_json::to_string(&report)?)
    }

    /// Position of the fix as a geographic point.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    /// Link to the fix location on Google Maps.
    pub fn maps_url(&self) -> String {
        format!(
            "https://maps.google.com/?q={},{}",
            self.latitude, self.longitude
        )
    }
}
