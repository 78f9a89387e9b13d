//! Affine mapping between geographic coordinates and site map pixels.
//!
//! The site map is a static image whose bottom-left and top-right corners
//! were surveyed by GPS. Longitude grows to the right and latitude grows
//! upwards, while pixel rows grow downwards, so the Y scale is negative.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::gps::GpsFix;

/// Site map errors.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("Calibration corners share the same {axis}; the span must be non-zero")]
    DegenerateSpan { axis: &'static str },
    #[error("Invalid image size: {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },
    #[error("Non-finite value for {what}")]
    NonFinite { what: &'static str },
    #[error("Invalid fix time: {0}")]
    InvalidTime(#[from] chrono::ParseError),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A geographic position in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<(f64, f64)> for GeoPoint {
    /// Tuples are taken in `(longitude, latitude)` order.
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self::new(longitude, latitude)
    }
}

/// A position on the map image in pixels. Not clamped to the image bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for PixelPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<PixelPoint> for (f64, f64) {
    fn from(point: PixelPoint) -> Self {
        (point.x, point.y)
    }
}

// Bottom left of map is:
// Latitude:52°2'20"N Longitude:2°22'50"W
//
// Top right of map is:
// Latitude:52°2'39"N Longitude:2°22'26"W

/// Surveyed bottom-left corner of the site map.
pub const SITE_MAP_BOTTOM_LEFT: GeoPoint = GeoPoint::new(-2.380556, 52.038889);
/// Surveyed top-right corner of the site map.
pub const SITE_MAP_TOP_RIGHT: GeoPoint = GeoPoint::new(-2.374030, 52.044046);
/// Site map image width in pixels.
pub const SITE_MAP_WIDTH: u32 = 994;
/// Site map image height in pixels.
pub const SITE_MAP_HEIGHT: u32 = 1275;

/// Calibration of the site map image.
pub const SITE_MAP: CalibrationFrame = CalibrationFrame {
    bottom_left: SITE_MAP_BOTTOM_LEFT,
    top_right: SITE_MAP_TOP_RIGHT,
    width: SITE_MAP_WIDTH,
    height: SITE_MAP_HEIGHT,
};

/// Scale factors and offsets derived from a [`CalibrationFrame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapScale {
    pub x_pix_per_degree: f64,
    /// Negative for a north-up map, since pixel rows grow downwards.
    pub y_pix_per_degree: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

/// Two surveyed corners of a map image together with its size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FrameSpec", into = "FrameSpec")]
pub struct CalibrationFrame {
    bottom_left: GeoPoint,
    top_right: GeoPoint,
    width: u32,
    height: u32,
}

/// Unvalidated serialized form of a [`CalibrationFrame`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct FrameSpec {
    bottom_left: GeoPoint,
    top_right: GeoPoint,
    width: u32,
    height: u32,
}

impl TryFrom<FrameSpec> for CalibrationFrame {
    type Error = MapError;

    fn try_from(spec: FrameSpec) -> Result<Self, Self::Error> {
        CalibrationFrame::new(spec.bottom_left, spec.top_right, spec.width, spec.height)
    }
}

impl From<CalibrationFrame> for FrameSpec {
    fn from(frame: CalibrationFrame) -> Self {
        Self {
            bottom_left: frame.bottom_left,
            top_right: frame.top_right,
            width: frame.width,
            height: frame.height,
        }
    }
}

impl Default for CalibrationFrame {
    fn default() -> Self {
        SITE_MAP
    }
}

impl CalibrationFrame {
    /// Create a calibration frame, checking that the corners span a
    /// non-empty area and the image has a size.
    pub fn new(
        bottom_left: GeoPoint,
        top_right: GeoPoint,
        width: u32,
        height: u32,
    ) -> Result<Self, MapError> {
        let corners = [
            bottom_left.longitude,
            bottom_left.latitude,
            top_right.longitude,
            top_right.latitude,
        ];
        if corners.iter().any(|v| !v.is_finite()) {
            return Err(MapError::NonFinite {
                what: "calibration corner",
            });
        }
        if width == 0 || height == 0 {
            return Err(MapError::InvalidImageSize { width, height });
        }
        if top_right.longitude == bottom_left.longitude {
            return Err(MapError::DegenerateSpan { axis: "longitude" });
        }
        if bottom_left.latitude == top_right.latitude {
            return Err(MapError::DegenerateSpan { axis: "latitude" });
        }

        let frame = Self {
            bottom_left,
            top_right,
            width,
            height,
        };
        tracing::debug!(?frame, "Calibration frame accepted");
        Ok(frame)
    }

    /// Parse and validate a frame from JSON.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        // Validation errors surface as serde errors through `try_from`.
        Ok(serde_json::from_str(json)?)
    }

    pub fn bottom_left(&self) -> GeoPoint {
        self.bottom_left
    }

    pub fn top_right(&self) -> GeoPoint {
        self.top_right
    }

    /// Image size as `(width, height)` in pixels.
    pub fn image_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Compute the pixels-per-degree scale and the degree offsets.
    pub fn scale(&self) -> MapScale {
        MapScale {
            x_pix_per_degree: self.width as f64
                / (self.top_right.longitude - self.bottom_left.longitude),
            y_pix_per_degree: self.height as f64
                / (self.bottom_left.latitude - self.top_right.latitude),
            x_offset: self.bottom_left.longitude,
            y_offset: self.top_right.latitude,
        }
    }

    /// Map a geographic position to a pixel position on the image.
    pub fn to_pixel(&self, point: GeoPoint) -> PixelPoint {
        let scale = self.scale();
        PixelPoint {
            x: (point.longitude - scale.x_offset) * scale.x_pix_per_degree,
            y: (point.latitude - scale.y_offset) * scale.y_pix_per_degree,
        }
    }

    /// Map a pixel position on the image back to a geographic position.
    pub fn to_geo(&self, pixel: PixelPoint) -> GeoPoint {
        let scale = self.scale();
        GeoPoint {
            longitude: pixel.x / scale.x_pix_per_degree + scale.x_offset,
            latitude: pixel.y / scale.y_pix_per_degree + scale.y_offset,
        }
    }

    /// Whether a pixel lies within `[0, width) x [0, height)`.
    pub fn contains(&self, pixel: PixelPoint) -> bool {
        pixel.x >= 0.0
            && pixel.x < self.width as f64
            && pixel.y >= 0.0
            && pixel.y < self.height as f64
    }

    /// Map the position of a GPS fix onto the image.
    pub fn locate_fix(&self, fix: &GpsFix) -> PixelPoint {
        self.to_pixel(fix.position())
    }
}

/// Convert a longitude/latitude pair into site map pixels.
pub fn latlong_to_pix(longitude: f64, latitude: f64) -> (f64, f64) {
    SITE_MAP.to_pixel(GeoPoint::new(longitude, latitude)).into()
}
