//! Orientation module for calibrating the IMU against the visualiser axes.

mod builder;
mod readings;

pub use builder::{
    build_rotation_matrix, Axis, OrientationError, Orthogonalization, RotationMatrix,
};
pub use readings::{AccelReading, AxisReadings, SAMPLE_VIZ_X, SAMPLE_VIZ_Y, SAMPLE_VIZ_Z};
