//! Site map module for converting GPS positions to map pixels.

mod gps;
mod mapper;

pub use gps::GpsFix;
pub use mapper::{
    latlong_to_pix, CalibrationFrame, GeoPoint, MapError, MapScale, PixelPoint, SITE_MAP,
    SITE_MAP_BOTTOM_LEFT, SITE_MAP_HEIGHT, SITE_MAP_TOP_RIGHT, SITE_MAP_WIDTH,
};
