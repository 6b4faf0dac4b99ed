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

//! Closed-form spherical potentials.
//!
//! These serve as force sources for interpolation and as references when
//! checking interpolation accuracy. All use G = 1 and an amplitude `amp`
//! equal to the total mass.

use crate::{ScaleFactors, SphericalPotential};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Point mass (Kepler) potential
///
/// $$ \Phi(r) = -\frac{A}{r} $$
///
/// # Examples
/// ```
/// use interpot::{analytic::Kepler, SphericalPotential};
/// let kepler = Kepler::new(2.0);
/// assert_eq!(kepler.spherical_potential(4.0), -0.5);
/// assert_eq!(kepler.enclosed_mass(4.0), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct Kepler {
    /// Mass, 𝐴
    amp: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    scale: ScaleFactors,
}

impl Kepler {
    pub fn new(amp: f64) -> Self {
        Self {
            amp,
            scale: ScaleFactors::default(),
        }
    }

    pub fn with_scale_factors(mut self, scale: ScaleFactors) -> Self {
        self.scale = scale;
        self
    }
}

impl SphericalPotential for Kepler {
    #[inline]
    fn spherical_potential(&self, r: f64) -> f64 {
        -self.amp / r
    }
    #[inline]
    fn spherical_radial_force(&self, r: f64) -> f64 {
        -self.amp / (r * r)
    }
    #[inline]
    fn spherical_r2deriv(&self, r: f64) -> f64 {
        -2.0 * self.amp / (r * r * r)
    }
    fn scale_factors(&self) -> ScaleFactors {
        self.scale
    }
}

/// Plummer sphere
///
/// $$ \Phi(r) = -\frac{A}{\sqrt{r^2 + b^2}} $$
///
/// See H. C. Plummer, [MNRAS 71, 460 (1911)](https://doi.org/10.1093/mnras/71.5.460).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct Plummer {
    /// Mass, 𝐴
    amp: f64,
    /// Squared softening length, 𝑏²
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "b",
            serialize_with = "crate::sqrt_serialize",
            deserialize_with = "crate::square_deserialize"
        )
    )]
    b_squared: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    scale: ScaleFactors,
}

impl Plummer {
    pub fn new(amp: f64, b: f64) -> Self {
        Self {
            amp,
            b_squared: b * b,
            scale: ScaleFactors::default(),
        }
    }

    pub fn with_scale_factors(mut self, scale: ScaleFactors) -> Self {
        self.scale = scale;
        self
    }
}

impl SphericalPotential for Plummer {
    #[inline]
    fn spherical_potential(&self, r: f64) -> f64 {
        -self.amp / (r * r + self.b_squared).sqrt()
    }
    #[inline]
    fn spherical_radial_force(&self, r: f64) -> f64 {
        -self.amp * r / (r * r + self.b_squared).powf(1.5)
    }
    #[inline]
    fn spherical_r2deriv(&self, r: f64) -> f64 {
        let s = r * r + self.b_squared;
        self.amp * (self.b_squared - 2.0 * r * r) / s.powf(2.5)
    }
    fn scale_factors(&self) -> ScaleFactors {
        self.scale
    }
}

/// Hernquist profile
///
/// $$ \Phi(r) = -\frac{A}{r + a} $$
///
/// See L. Hernquist, [ApJ 356, 359 (1990)](https://doi.org/10.1086/168845).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct Hernquist {
    /// Mass, 𝐴
    amp: f64,
    /// Scale radius, 𝑎
    a: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    scale: ScaleFactors,
}

impl Hernquist {
    pub fn new(amp: f64, a: f64) -> Self {
        Self {
            amp,
            a,
            scale: ScaleFactors::default(),
        }
    }

    pub fn with_scale_factors(mut self, scale: ScaleFactors) -> Self {
        self.scale = scale;
        self
    }
}

impl SphericalPotential for Hernquist {
    #[inline]
    fn spherical_potential(&self, r: f64) -> f64 {
        -self.amp / (r + self.a)
    }
    #[inline]
    fn spherical_radial_force(&self, r: f64) -> f64 {
        -self.amp / (r + self.a).powi(2)
    }
    #[inline]
    fn spherical_r2deriv(&self, r: f64) -> f64 {
        -2.0 * self.amp / (r + self.a).powi(3)
    }
    fn scale_factors(&self) -> ScaleFactors {
        self.scale
    }
}
