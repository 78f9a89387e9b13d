//! Raw accelerometer readings used for calibration.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::builder::{OrientationError, Orthogonalization, RotationMatrix};

/// Reading with the visualiser X axis pointing down.
pub const SAMPLE_VIZ_X: [f64; 3] = [0.36152446, 8.118738, -5.5521536];
/// Reading with the visualiser Y axis pointing down.
pub const SAMPLE_VIZ_Y: [f64; 3] = [-9.85214, -0.21787235, -0.20829555];
/// Reading with the visualiser Z axis pointing down.
pub const SAMPLE_VIZ_Z: [f64; 3] = [0.320823, -5.303157, -8.616732];

/// A single accelerometer sample in m/s/s, in the sensor frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccelReading {
    pub xa: f64,
    pub ya: f64,
    pub za: f64,
}

impl AccelReading {
    pub fn new(xa: f64, ya: f64, za: f64) -> Self {
        Self { xa, ya, za }
    }

    /// Calculate the magnitude of the total acceleration in m/s/s
    pub fn magnitude(&self) -> f64 {
        self.to_vector().norm()
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.xa, self.ya, self.za)
    }
}

impl From<[f64; 3]> for AccelReading {
    fn from([xa, ya, za]: [f64; 3]) -> Self {
        Self::new(xa, ya, za)
    }
}

impl From<Vector3<f64>> for AccelReading {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Three accelerometer readings, each taken with one visualiser axis
/// pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisReadings {
    pub viz_x: AccelReading,
    pub viz_y: AccelReading,
    pub viz_z: AccelReading,
}

impl Default for AxisReadings {
    fn default() -> Self {
        Self::sample()
    }
}

impl AxisReadings {
    pub fn new(viz_x: AccelReading, viz_y: AccelReading, viz_z: AccelReading) -> Self {
        Self {
            viz_x,
            viz_y,
            viz_z,
        }
    }

    /// Readings captured on the isopod during calibration.
    pub fn sample() -> Self {
        Self::new(
            SAMPLE_VIZ_X.into(),
            SAMPLE_VIZ_Y.into(),
            SAMPLE_VIZ_Z.into(),
        )
    }

    /// Build the rotation matrix without checking for degenerate readings.
    pub fn build(&self, strategy: Orthogonalization) -> RotationMatrix {
        RotationMatrix::from_axes(&self.viz_x.to_vector(), &self.viz_z.to_vector(), strategy)
    }

    /// Build the rotation matrix, rejecting zero-length or parallel readings.
    pub fn try_build(&self, strategy: Orthogonalization) -> Result<RotationMatrix, OrientationError> {
        RotationMatrix::try_from_axes(&self.viz_x.to_vector(), &self.viz_z.to_vector(), strategy)
    }

    /// Angle between the X and Z readings in degrees. 90 means the
    /// cross product needs no renormalization.
    pub fn xz_angle_degrees(&self) -> f64 {
        self.viz_x
            .to_vector()
            .angle(&self.viz_z.to_vector())
            .to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::build_rotation_matrix;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sample_matches_free_function() {
        let readings = AxisReadings::sample();
        let rot = build_rotation_matrix(
            &readings.viz_x.to_vector(),
            &readings.viz_y.to_vector(),
            &readings.viz_z.to_vector(),
        );
        assert_eq!(readings.build(Orthogonalization::CrossProduct), rot);
        assert_eq!(
            readings.try_build(Orthogonalization::CrossProduct).unwrap(),
            rot
        );
    }

    #[test]
    fn test_sample_orthonormal() {
        let rot = AxisReadings::sample()
            .try_build(Orthogonalization::Orthonormal)
            .unwrap();
        assert!(rot.is_orthonormal(1e-6));
    }

    #[test]
    fn test_sample_readings_near_gravity() {
        let readings = AxisReadings::sample();
        for reading in [readings.viz_x, readings.viz_y, readings.viz_z] {
            assert_abs_diff_eq!(reading.magnitude(), 9.81, epsilon = 0.5);
        }
    }

    #[test]
    fn test_xz_angle() {
        // cos(angle) is about 0.0492 for the sample readings
        let angle = AxisReadings::sample().xz_angle_degrees();
        assert_abs_diff_eq!(angle, 87.18, epsilon = 0.01);
    }

    #[test]
    fn test_reading_conversions() {
        let reading = AccelReading::from([3.0, 4.0, 12.0]);
        assert_eq!(reading.magnitude(), 13.0);
        assert_eq!(AccelReading::from(reading.to_vector()), reading);
    }

    #[test]
    fn test_try_build_rejects_zero_reading() {
        let readings = AxisReadings::new(
            AccelReading::default(),
            SAMPLE_VIZ_Y.into(),
            SAMPLE_VIZ_Z.into(),
        );
        assert!(readings.try_build(Orthogonalization::CrossProduct).is_err());
    }

    #[test]
    fn test_readings_from_json() {
        let json = r#"{
            "viz_x": {"xa": 0.0, "ya": 9.8, "za": 0.0},
            "viz_y": {"xa": 9.8, "ya": 0.0, "za": 0.0},
            "viz_z": {"xa": 0.0, "ya": 0.0, "za": 9.8}
        }"#;
        let readings: AxisReadings = serde_json::from_str(json).unwrap();
        let rot = readings.try_build(Orthogonalization::CrossProduct).unwrap();
        assert!(rot.is_orthonormal(1e-12));
    }
}
