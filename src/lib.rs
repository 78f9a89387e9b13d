// Copyright 2025 ModerRAS
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Isopod Calibration
//!
//! Calibration helpers for the isopod installation.
//!
//! Two independent pieces live here:
//!
//! - [`map`] converts GPS longitude/latitude into pixel positions on the
//!   static site map, using an affine transform fixed by two surveyed corners.
//! - [`orientation`] turns three accelerometer readings, each taken with one
//!   visualiser axis pointing down, into the rotation matrix the visualiser
//!   applies to incoming IMU data.
//!
//! ## Map Example
//!
//! ```rust
//! use isopod_calibration::map::{latlong_to_pix, SITE_MAP};
//!
//! // The triangle next to first aid
//! let (x, y) = latlong_to_pix(-2.377864785129338, 52.04165543846885);
//! assert!((x - 409.9092).abs() < 1e-3);
//! assert!((y - 591.0347).abs() < 1e-3);
//! assert!(SITE_MAP.contains((x, y).into()));
//! ```
//!
//! ## Rotation Example
//!
//! ```rust
//! use isopod_calibration::orientation::{AxisReadings, Orthogonalization};
//!
//! let readings = AxisReadings::sample();
//! let rotation = readings.try_build(Orthogonalization::Orthonormal)?;
//! assert!(rotation.is_orthonormal(1e-9));
//! # Ok::<(), isopod_calibration::orientation::OrientationError>(())
//! ```

pub mod map;
pub mod orientation;
pub mod settings;

pub use map::{
    latlong_to_pix, CalibrationFrame, GeoPoint, GpsFix, MapError, MapScale, PixelPoint, SITE_MAP,
};
pub use orientation::{
    build_rotation_matrix, AccelReading, Axis, AxisReadings, OrientationError, Orthogonalization,
    RotationMatrix,
};
pub use settings::{AppSettings, SettingsError};
