//! Place a GPS position on the site map.
//!
//! Prints the pixel position of the configured sample point, by default the
//! triangle next to first aid.
//!
//! Run with: cargo run --bin map_location

use isopod_calibration::AppSettings;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout only carries the result
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let settings = AppSettings::from_env();
    let point = settings.sample_point();
    let frame = settings.map_frame;
    let (width, height) = frame.image_size();
    tracing::info!(
        longitude = point.longitude,
        latitude = point.latitude,
        width,
        height,
        "Mapping sample point"
    );

    let pixel = frame.to_pixel(point);
    if !frame.contains(pixel) {
        tracing::warn!(x = pixel.x, y = pixel.y, "Point lies outside the map image");
    }

    println!("({}, {})", pixel.x, pixel.y);
    Ok(())
}
