// Copyright 2024 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! # Interpot
//!
//! Spherical gravitational potentials interpolated from a radial force law.
//!
//! A force law 𝐹(𝑟), given either as a plain function or as an existing potential
//! model, is sampled once on a radial grid. Potential, force and second radial
//! derivative are then evaluated from cubic splines inside the grid and from a
//! matched point-mass potential outside it.
//!
//! ```
//! use interpot::{analytic::Hernquist, InterpConfig, InterpSphericalPotential};
//!
//! let hernquist = Hernquist::new(1.0, 1.0);
//! let model = InterpSphericalPotential::from_field(&hernquist, InterpConfig::default())?;
//! let forces = model.radial_force(vec![0.1, 1.0, 10.0, 100.0], 0.0);
//! assert_eq!(forces.len(), 4);
//! # Ok::<(), interpot::Error>(())
//! ```
//!
//! Internal units have G = 1. [`ScaleFactors`] carry the length and velocity
//! scales for conversion to physical units.

#[cfg(test)]
extern crate approx;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serializer};

pub mod analytic;
mod error;
mod grid;
pub mod interp;
mod radii;
pub mod source;
mod spherical;
pub mod spline;
mod units;

pub use error::{Error, Result, ScaleKind};
pub use grid::{GridSpacing, RadialGrid, MIN_GRID_POINTS};
pub use interp::{InterpConfig, InterpSphericalPotential, PointMassTail, ValidationResult};
pub use radii::Radii;
pub use source::{Combined, FieldList, ForceSource, RadialForceField};
pub use spherical::SphericalPotential;
pub use units::{
    ScaleFactors, DEFAULT_LENGTH_SCALE, DEFAULT_VELOCITY_SCALE, SCALE_TOLERANCE,
};

/// Transform x^2 --> x when serializing
#[cfg(feature = "serde")]
fn sqrt_serialize<S>(x: &f64, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_f64(x.sqrt())
}

/// Transform x --> x^2 when deserializing
#[cfg(feature = "serde")]
fn square_deserialize<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(f64::deserialize(deserializer)?.powi(2))
}
