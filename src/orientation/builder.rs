//! Rotation matrix construction from per-axis accelerometer readings.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Below this magnitude the cross product of the X and Z axes is treated as
/// zero, meaning the two readings were (anti)parallel.
const PARALLEL_THRESHOLD: f64 = 1e-9;

/// One of the three visualiser axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Rotation matrix builder errors.
#[derive(Error, Debug, PartialEq)]
pub enum OrientationError {
    #[error("Reading for the {0} axis has zero or non-finite length")]
    ZeroLengthAxis(Axis),
    #[error("X and Z axis readings are parallel; no Y axis can be derived")]
    ParallelAxes,
}

/// How the measured axes are forced to be perpendicular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orthogonalization {
    /// Replace Y with `x × z` and keep X and Z as measured. The new Y is
    /// not renormalized, so the result is only orthonormal when the X and Z
    /// readings were already perpendicular.
    #[default]
    CrossProduct,
    /// As `CrossProduct`, then normalize Y and rebuild Z as `y × x`.
    Orthonormal,
}

impl Orthogonalization {
    /// Assemble the matrix columns from unit X and Z axes.
    fn assemble(self, x: Vector3<f64>, z: Vector3<f64>) -> Matrix3<f64> {
        // Best option found by trial and error
        let new_y = x.cross(&z);
        match self {
            Orthogonalization::CrossProduct => Matrix3::from_columns(&[x, new_y, z]),
            Orthogonalization::Orthonormal => {
                let y = new_y.normalize();
                let z = y.cross(&x);
                Matrix3::from_columns(&[x, y, z])
            }
        }
    }
}

/// A 3x3 matrix whose columns are the visualiser X, Y and Z axes expressed
/// in the sensor frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationMatrix(Matrix3<f64>);

impl RotationMatrix {
    /// Build from the three axis readings using the given strategy.
    ///
    /// Degenerate inputs are not checked: a zero reading yields NaN columns
    /// and parallel X/Z readings yield a zero Y column. Use
    /// [`RotationMatrix::try_from_axes`] to reject them.
    pub fn from_axes(
        viz_x: &Vector3<f64>,
        viz_z: &Vector3<f64>,
        strategy: Orthogonalization,
    ) -> Self {
        Self(strategy.assemble(viz_x / viz_x.norm(), viz_z / viz_z.norm()))
    }

    /// Checked form of [`RotationMatrix::from_axes`].
    pub fn try_from_axes(
        viz_x: &Vector3<f64>,
        viz_z: &Vector3<f64>,
        strategy: Orthogonalization,
    ) -> Result<Self, OrientationError> {
        let x = unit(viz_x, Axis::X)?;
        let z = unit(viz_z, Axis::Z)?;

        let sin_angle = x.cross(&z).norm();
        if sin_angle < PARALLEL_THRESHOLD {
            return Err(OrientationError::ParallelAxes);
        }

        tracing::debug!(?strategy, sin_angle, cos_angle = x.dot(&z), "Building rotation matrix");
        Ok(Self(strategy.assemble(x, z)))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    pub fn into_inner(self) -> Matrix3<f64> {
        self.0
    }

    /// Column `index` (0 = X, 1 = Y, 2 = Z). Panics if `index > 2`.
    pub fn column(&self, index: usize) -> Vector3<f64> {
        self.0.column(index).into_owned()
    }

    /// Euclidean length of each column.
    pub fn column_norms(&self) -> [f64; 3] {
        [0, 1, 2].map(|i| self.0.column(i).norm())
    }

    /// Largest absolute dot product between any two distinct columns.
    pub fn orthogonality_error(&self) -> f64 {
        let (x, y, z) = (self.column(0), self.column(1), self.column(2));
        x.dot(&y).abs().max(x.dot(&z).abs()).max(y.dot(&z).abs())
    }

    /// Whether all columns are unit length and pairwise perpendicular
    /// within `tolerance`.
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        self.column_norms()
            .iter()
            .all(|norm| (norm - 1.0).abs() <= tolerance)
            && self.orthogonality_error() <= tolerance
    }

    /// `[x | x × z | z]` has a negative determinant, so these matrices
    /// include a reflection.
    pub fn determinant(&self) -> f64 {
        self.0.determinant()
    }

    /// Transform a vector by this matrix.
    pub fn apply(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.0 * vector
    }
}

impl fmt::Display for RotationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            let open = if row == 0 { "[[" } else { " [" };
            let close = if row == 2 { "]]" } else { "]\n" };
            write!(
                f,
                "{}{:>12.8} {:>12.8} {:>12.8}{}",
                open,
                self.0[(row, 0)],
                self.0[(row, 1)],
                self.0[(row, 2)],
                close
            )?;
        }
        Ok(())
    }
}

fn unit(vector: &Vector3<f64>, axis: Axis) -> Result<Vector3<f64>, OrientationError> {
    let norm = vector.norm();
    if !norm.is_finite() || norm < f64::EPSILON {
        return Err(OrientationError::ZeroLengthAxis(axis));
    }
    Ok(vector / norm)
}

/// Build the visualiser rotation matrix from raw readings taken with each
/// visualiser axis pointing down in turn.
///
/// The measured `viz_y` is discarded and replaced with the cross product of
/// the normalized X and Z readings.
pub fn build_rotation_matrix(
    viz_x: &Vector3<f64>,
    _viz_y: &Vector3<f64>,
    viz_z: &Vector3<f64>,
) -> RotationMatrix {
    RotationMatrix::from_axes(viz_x, viz_z, Orthogonalization::CrossProduct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn sample() -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        (
            Vector3::new(0.36152446, 8.118738, -5.5521536),
            Vector3::new(-9.85214, -0.21787235, -0.20829555),
            Vector3::new(0.320823, -5.303157, -8.616732),
        )
    }

    #[test]
    fn test_sample_columns() {
        let (x, y, z) = sample();
        let rot = build_rotation_matrix(&x, &y, &z);

        let expected_x = Vector3::new(0.03673167712617565, 0.824881566486575, -0.5641109688404867);
        let expected_y =
            Vector3::new(-0.9976671739896504, 0.01338809432546273, -0.04538538994825643);
        let expected_z =
            Vector3::new(0.03169258407313656, -0.523873753052439, -0.8512061271968848);
        assert_relative_eq!(rot.column(0), expected_x, epsilon = 1e-12);
        assert_relative_eq!(rot.column(1), expected_y, epsilon = 1e-12);
        assert_relative_eq!(rot.column(2), expected_z, epsilon = 1e-12);
    }

    #[test]
    fn test_measured_y_is_ignored() {
        let (x, y, z) = sample();
        let a = build_rotation_matrix(&x, &y, &z);
        let b = build_rotation_matrix(&x, &Vector3::zeros(), &z);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cross_product_y_is_not_renormalized() {
        let (x, y, z) = sample();
        let rot = build_rotation_matrix(&x, &y, &z);
        let [nx, ny, nz] = rot.column_norms();

        assert_abs_diff_eq!(nx, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(nz, 1.0, epsilon = 1e-12);
        // |x × z| is the sine of the angle between the readings
        assert_abs_diff_eq!(ny, 0.9987886987480977, epsilon = 1e-9);
        assert_abs_diff_eq!(rot.orthogonality_error(), 0.049205032802364934, epsilon = 1e-9);
        assert!(!rot.is_orthonormal(1e-6));
    }

    #[test]
    fn test_orthonormal_strategy() {
        let (x, _, z) = sample();
        let rot = RotationMatrix::try_from_axes(&x, &z, Orthogonalization::Orthonormal).unwrap();

        for norm in rot.column_norms() {
            assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-6);
        }
        assert!(rot.orthogonality_error() < 1e-6);
        assert!(rot.is_orthonormal(1e-6));
        assert_abs_diff_eq!(rot.determinant(), -1.0, epsilon = 1e-9);

        // X is kept exactly as measured
        assert_relative_eq!(rot.column(0), x.normalize(), epsilon = 1e-15);
    }

    #[test]
    fn test_strategies_agree_on_perpendicular_input() {
        let x = Vector3::new(0.0, 9.81, 0.0);
        let z = Vector3::new(0.0, 0.0, -9.81);
        let cross = RotationMatrix::from_axes(&x, &z, Orthogonalization::CrossProduct);
        let ortho = RotationMatrix::from_axes(&x, &z, Orthogonalization::Orthonormal);
        assert_relative_eq!(*cross.matrix(), *ortho.matrix(), epsilon = 1e-12);
        assert!(cross.is_orthonormal(1e-12));
    }

    #[test]
    fn test_deterministic() {
        let (x, y, z) = sample();
        let first = build_rotation_matrix(&x, &y, &z);
        for _ in 0..10 {
            assert_eq!(build_rotation_matrix(&x, &y, &z), first);
        }
    }

    #[test]
    fn test_try_from_axes_rejects_zero_reading() {
        let (x, _, z) = sample();
        let result =
            RotationMatrix::try_from_axes(&Vector3::zeros(), &z, Orthogonalization::CrossProduct);
        assert_eq!(result, Err(OrientationError::ZeroLengthAxis(Axis::X)));

        let result =
            RotationMatrix::try_from_axes(&x, &Vector3::zeros(), Orthogonalization::CrossProduct);
        assert_eq!(result, Err(OrientationError::ZeroLengthAxis(Axis::Z)));

        let nan = Vector3::new(f64::NAN, 0.0, 1.0);
        let result = RotationMatrix::try_from_axes(&nan, &z, Orthogonalization::Orthonormal);
        assert_eq!(result, Err(OrientationError::ZeroLengthAxis(Axis::X)));
    }

    #[test]
    fn test_try_from_axes_rejects_parallel_readings() {
        let x = Vector3::new(1.0, 2.0, 3.0);
        let z = x * -4.0;
        let result = RotationMatrix::try_from_axes(&x, &z, Orthogonalization::CrossProduct);
        assert_eq!(result, Err(OrientationError::ParallelAxes));
    }

    #[test]
    fn test_unchecked_parallel_readings_give_zero_y() {
        let x = Vector3::new(1.0, 2.0, 3.0);
        let rot = RotationMatrix::from_axes(&x, &(x * 2.0), Orthogonalization::CrossProduct);
        assert_abs_diff_eq!(rot.column_norms()[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_apply() {
        let (x, y, z) = sample();
        let rot = build_rotation_matrix(&x, &y, &z);
        let basis_y = rot.apply(&Vector3::y());
        assert_relative_eq!(basis_y, rot.column(1), epsilon = 1e-15);
    }

    #[test]
    fn test_display_rows() {
        let rot = RotationMatrix::from_axes(
            &Vector3::x(),
            &Vector3::z(),
            Orthogonalization::CrossProduct,
        );
        let text = rot.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[["));
        assert!(lines[2].ends_with("]]"));
        // x × z = -y
        assert!(lines[1].contains("-1.00000000"));
    }

    #[test]
    fn test_axis_display() {
        assert_eq!(
            OrientationError::ZeroLengthAxis(Axis::Z).to_string(),
            "Reading for the z axis has zero or non-finite length"
        );
    }
}
