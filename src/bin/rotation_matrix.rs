//! Turn accelerometer readings taken with each visualiser axis pointing
//! down into the visualiser's isometry rotation matrix.
//!
//! Run with: cargo run --bin rotation_matrix

use isopod_calibration::AppSettings;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let settings = AppSettings::from_env();
    let readings = settings.readings;
    tracing::info!(
        strategy = ?settings.strategy,
        xz_angle = readings.xz_angle_degrees(),
        "Building rotation matrix"
    );

    let rotation = readings.try_build(settings.strategy)?;

    let [_, y_norm, _] = rotation.column_norms();
    tracing::info!(
        y_norm,
        orthogonality_error = rotation.orthogonality_error(),
        determinant = rotation.determinant(),
        "Rotation matrix built"
    );

    println!("{}", rotation);
    Ok(())
}
