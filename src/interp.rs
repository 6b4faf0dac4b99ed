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

//! Spherical potential interpolated from a radial force law
//!
//! Provides [`InterpSphericalPotential`] which samples a force law once on a
//! [`RadialGrid`] and afterwards evaluates potential, force and curvature from
//! splines, without calling the force law again.
//!
//! # Design
//!
//! - **Force spline**: cubic interpolant through the force samples, exact at the knots
//! - **Potential spline**: antiderivative of the force spline, Φ(𝑟) = Φ₀ - ∫𝐹 d𝑟
//! - **Curvature spline**: derivative of the force spline, Φ''(𝑟) = -𝐹'(𝑟)
//! - **Point-mass tail**: beyond the outer grid edge, the mass enclosed there is
//!   treated as a point mass, matched to the interior in Φ and 𝐹
//!
//! The model is immutable after construction and evaluation never fails.
//!
//! # Example
//!
//! ```
//! use interpot::{ForceSource, InterpConfig, InterpSphericalPotential};
//!
//! // Point mass with unit mass; anchor Φ at the inner grid edge
//! let config = InterpConfig::default().with_phi0(-1.0 / 0.01);
//! let kepler = InterpSphericalPotential::new(ForceSource::function(|r| -1.0 / (r * r)), config)?;
//!
//! assert!((kepler.total_mass() - 1.0).abs() < 1e-10);
//! let phi = kepler.potential([0.5, 2.0, 40.0], 0.0);
//! assert!((phi[0] + 2.0).abs() < 1e-3);
//! assert!((phi[2] + 0.025).abs() < 1e-3);
//! # Ok::<(), interpot::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::source::{ForceSource, RadialForceField};
use crate::spline::Spline;
use crate::{RadialGrid, Radii, ScaleFactors, SphericalPotential};
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for building an interpolated potential
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct InterpConfig {
    /// Radii where the force law is sampled (default: 101 geometric points, 0.01 to 20)
    #[cfg_attr(feature = "serde", serde(default))]
    pub grid: RadialGrid,
    /// Potential at the inner grid edge; only used for plain force functions (default: 0)
    #[cfg_attr(feature = "serde", serde(default))]
    pub phi0: Option<f64>,
    /// Requested scale factors; set factors of a potential model source take over
    #[cfg_attr(feature = "serde", serde(default))]
    pub scale: ScaleFactors,
}

impl InterpConfig {
    pub fn with_grid(mut self, grid: RadialGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_phi0(mut self, phi0: f64) -> Self {
        self.phi0 = Some(phi0);
        self
    }

    pub fn with_scale_factors(mut self, scale: ScaleFactors) -> Self {
        self.scale = scale;
        self
    }
}

/// Point-mass continuation of the potential beyond the outer grid edge.
///
/// All mass is assumed to sit inside `r_max`. The offset `phi_max` makes Φ
/// continuous at `r_max`; the force is continuous by construction of the mass.
/// The curvature in general jumps at `r_max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMassTail {
    r_max: f64,
    total_mass: f64,
    phi_max: f64,
}

impl PointMassTail {
    /// Match a point mass to the interior force and potential at `r_max`
    pub fn matched(r_max: f64, force_at_r_max: f64, potential_at_r_max: f64) -> Self {
        let total_mass = -r_max * r_max * force_at_r_max;
        Self {
            r_max,
            total_mass,
            phi_max: potential_at_r_max + total_mass / r_max,
        }
    }

    /// True if `r` belongs to the tail; the tail owns `r_max` itself
    #[inline(always)]
    pub fn contains(&self, r: f64) -> bool {
        r >= self.r_max
    }

    #[inline]
    pub fn potential(&self, r: f64) -> f64 {
        -self.total_mass / r + self.phi_max
    }

    #[inline]
    pub fn radial_force(&self, r: f64) -> f64 {
        -self.total_mass / (r * r)
    }

    #[inline]
    pub fn r2deriv(&self, r: f64) -> f64 {
        -2.0 * self.total_mass / (r * r * r)
    }

    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    /// Potential offset of the tail, equal to Φ(∞)
    pub fn phi_max(&self) -> f64 {
        self.phi_max
    }
}

/// A spherical potential interpolated from a radial force law.
///
/// See the [module documentation](self) for the construction scheme.
#[derive(Clone, Debug)]
pub struct InterpSphericalPotential {
    grid: RadialGrid,
    force_spline: Spline,
    /// Antiderivative of the force; zero at the inner grid edge
    potential_spline: Spline,
    /// Derivative of the force
    r2deriv_spline: Spline,
    /// Interior potential offset, Φ(𝑟) = Φ₀ - ∫𝐹 d𝑟
    phi0: f64,
    tail: PointMassTail,
    scale: ScaleFactors,
}

impl InterpSphericalPotential {
    /// Sample `source` on the configured grid and build the splines.
    ///
    /// Fails if a potential model source has scale factors that disagree with
    /// `config.scale`, or if the source cannot be evaluated on the grid.
    pub fn new(source: ForceSource<'_>, config: InterpConfig) -> Result<Self> {
        let InterpConfig { grid, phi0, scale } = config;
        let resolved = source.resolve(&grid, phi0, &scale)?;
        let samples = resolved.sample(&grid)?;

        let force_spline = Spline::interpolate_cubic(grid.as_slice(), &samples)?;
        let potential_spline = force_spline.antiderivative();
        let r2deriv_spline = force_spline.derivative();
        tracing::debug!(
            n_points = grid.len(),
            r_min = grid.r_min(),
            r_max = grid.r_max(),
            "built force, potential and curvature splines"
        );

        let phi0 = resolved.phi0() + potential_spline.eval(grid.r_min());
        let r_max = grid.r_max();
        let tail = PointMassTail::matched(
            r_max,
            force_spline.eval(r_max),
            -potential_spline.eval(r_max) + phi0,
        );

        if tail.total_mass() < 0.0 {
            tracing::warn!(
                total_mass = tail.total_mass(),
                r_max,
                "negative enclosed mass; force is repulsive at the outer grid edge"
            );
        }
        tracing::info!(
            r_max,
            total_mass = tail.total_mass(),
            phi0,
            "interpolated spherical potential ready"
        );

        Ok(Self {
            grid,
            force_spline,
            potential_spline,
            r2deriv_spline,
            phi0,
            tail,
            scale: resolved.scale_factors(),
        })
    }

    /// Interpolate a plain radial force function
    pub fn from_function(force: impl Fn(f64) -> f64, config: InterpConfig) -> Result<Self> {
        Self::new(ForceSource::function(force), config)
    }

    /// Interpolate an existing potential model
    pub fn from_field(field: &dyn RadialForceField, config: InterpConfig) -> Result<Self> {
        Self::new(ForceSource::field(field), config)
    }

    /// Potential at `r`; the time `_t` is accepted for interface uniformity and ignored
    pub fn potential<R: Radii>(&self, r: R, _t: f64) -> R::Output {
        r.map_radii(|r| self.potential_at(r))
    }

    /// Radial force, 𝐹 = -dΦ/d𝑟, at `r`; `_t` is ignored
    pub fn radial_force<R: Radii>(&self, r: R, _t: f64) -> R::Output {
        r.map_radii(|r| self.radial_force_at(r))
    }

    /// Second radial derivative, d²Φ/d𝑟², at `r`; `_t` is ignored
    pub fn second_radial_derivative<R: Radii>(&self, r: R, _t: f64) -> R::Output {
        r.map_radii(|r| self.r2deriv_at(r))
    }

    #[inline]
    fn potential_at(&self, r: f64) -> f64 {
        if self.tail.contains(r) {
            self.tail.potential(r)
        } else {
            -self.potential_spline.eval(r) + self.phi0
        }
    }

    #[inline]
    fn radial_force_at(&self, r: f64) -> f64 {
        if self.tail.contains(r) {
            self.tail.radial_force(r)
        } else {
            self.force_spline.eval(r)
        }
    }

    #[inline]
    fn r2deriv_at(&self, r: f64) -> f64 {
        if self.tail.contains(r) {
            self.tail.r2deriv(r)
        } else {
            -self.r2deriv_spline.eval(r)
        }
    }

    /// Potential at the inner grid edge
    pub fn phi0(&self) -> f64 {
        self.phi0
    }

    /// Outer grid edge where the point-mass tail takes over
    pub fn r_max(&self) -> f64 {
        self.tail.r_max
    }

    /// Mass enclosed within `r_max`, estimated from the force there
    pub fn total_mass(&self) -> f64 {
        self.tail.total_mass()
    }

    /// Potential offset of the point-mass tail
    pub fn phi_max(&self) -> f64 {
        self.tail.phi_max()
    }

    pub fn tail(&self) -> &PointMassTail {
        &self.tail
    }

    pub fn grid(&self) -> &RadialGrid {
        &self.grid
    }

    /// Scale factors of the model, inherited from a potential model source where set
    pub fn scale_factors(&self) -> ScaleFactors {
        self.scale
    }

    /// Compare against a reference model at radii between the knots.
    ///
    /// Each grid interval is probed at `samples_per_interval` evenly spaced interior
    /// radii, so the knots themselves are never sampled whatever the grid spacing.
    /// Errors are relative where the reference magnitude exceeds 0.01, absolute otherwise.
    pub fn validate(
        &self,
        reference: &dyn RadialForceField,
        samples_per_interval: usize,
    ) -> Result<ValidationResult> {
        let r_min = self.grid.r_min();
        let mut result = ValidationResult {
            max_potential_error: 0.0,
            max_force_error: 0.0,
            worst_r_potential: r_min,
            worst_r_force: r_min,
        };

        let radii = self.grid.iter().tuple_windows().flat_map(|(lo, hi)| {
            (0..samples_per_interval)
                .map(move |j| lo + (hi - lo) * (j as f64 + 0.5) / samples_per_interval as f64)
        });

        for r in radii {
            let source_error = |source| Error::Source { radius: r, source };
            let phi_exact = reference.potential_value(r, 0.0).map_err(source_error)?;
            let f_exact = reference.radial_force(r, 0.0).map_err(source_error)?;

            let phi_err = error_measure(self.potential_at(r), phi_exact);
            let f_err = error_measure(self.radial_force_at(r), f_exact);

            if phi_err > result.max_potential_error {
                result.max_potential_error = phi_err;
                result.worst_r_potential = r;
            }
            if f_err > result.max_force_error {
                result.max_force_error = f_err;
                result.worst_r_force = r;
            }
        }
        Ok(result)
    }
}

fn error_measure(approx: f64, exact: f64) -> f64 {
    if exact.abs() > 0.01 {
        ((approx - exact) / exact).abs()
    } else {
        (approx - exact).abs()
    }
}

impl SphericalPotential for InterpSphericalPotential {
    #[inline]
    fn spherical_potential(&self, r: f64) -> f64 {
        self.potential_at(r)
    }
    #[inline]
    fn spherical_radial_force(&self, r: f64) -> f64 {
        self.radial_force_at(r)
    }
    #[inline]
    fn spherical_r2deriv(&self, r: f64) -> f64 {
        self.r2deriv_at(r)
    }
    fn scale_factors(&self) -> ScaleFactors {
        self.scale
    }
    fn potential_at_infinity(&self) -> f64 {
        self.tail.phi_max()
    }
}

/// Results from validating an interpolated potential against a reference.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub max_potential_error: f64,
    pub max_force_error: f64,
    pub worst_r_potential: f64,
    pub worst_r_force: f64,
}
