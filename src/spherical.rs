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

//! ## Spherical potentials
//!
//! Potentials that depend on the distance from the centre only, Φ(𝑟).
//! Units are internal (G = 1); use [`ScaleFactors`] to convert.

use crate::ScaleFactors;
use std::f64::consts::PI;
use std::fmt::Debug;

/// Potential, force and curvature of a spherically symmetric mass distribution.
///
/// Only the first three methods are required; the remaining quantities follow
/// from them.
pub trait SphericalPotential: Debug {
    /// Potential at distance 𝑟 from the centre, Φ(𝑟)
    fn spherical_potential(&self, r: f64) -> f64;

    /// Radial force, 𝐹(𝑟) = -dΦ/d𝑟 (negative when attractive)
    fn spherical_radial_force(&self, r: f64) -> f64;

    /// Second radial derivative of the potential, d²Φ/d𝑟²
    fn spherical_r2deriv(&self, r: f64) -> f64;

    /// Length and velocity scales of this potential
    fn scale_factors(&self) -> ScaleFactors {
        ScaleFactors::default()
    }

    /// Limit of Φ(𝑟) for 𝑟 → ∞
    fn potential_at_infinity(&self) -> f64 {
        0.0
    }

    /// Mass inside 𝑟 as implied by Gauss' law, 𝑀(<𝑟) = -𝑟²𝐹(𝑟)
    fn enclosed_mass(&self, r: f64) -> f64 {
        -r * r * self.spherical_radial_force(r)
    }

    /// Circular velocity, 𝑣꜀ = √(-𝑟𝐹(𝑟)); zero where the force is repulsive
    fn circular_velocity(&self, r: f64) -> f64 {
        (-r * self.spherical_radial_force(r)).max(0.0).sqrt()
    }

    /// Mass density from Poisson's equation, ρ = (Φ'' + 2Φ'/𝑟) / 4π
    fn density(&self, r: f64) -> f64 {
        (self.spherical_r2deriv(r) - 2.0 * self.spherical_radial_force(r) / r) / (4.0 * PI)
    }

    /// Velocity needed to escape to infinity, √(2(Φ(∞) - Φ(𝑟)))
    fn escape_velocity(&self, r: f64) -> f64 {
        (2.0 * (self.potential_at_infinity() - self.spherical_potential(r)))
            .max(0.0)
            .sqrt()
    }
}
