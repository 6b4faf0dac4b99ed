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

//! # Force sources
//!
//! An interpolated potential is built from either a plain function 𝐹(𝑟) or from
//! an existing potential model (or a sum of models) that can report its radial
//! force, potential value and scale factors. [`ForceSource`] tags which of the
//! two is given, so a failing model is reported as such rather than mistaken
//! for a plain function.

use crate::error::{Error, Result};
use crate::{RadialGrid, ScaleFactors, SphericalPotential};
use dyn_clone::DynClone;
use std::fmt::{self, Debug};

/// Potential model that can be sampled in the 𝑧 = 0 plane.
///
/// Coordinates are cylindrical, (𝑅, 𝑧). Spherical models get this trait for free
/// through [`SphericalPotential`].
pub trait RadialForceField: Debug + DynClone + Send + Sync {
    /// Cylindrical radial force, 𝐹ᵣ(𝑅, 𝑧)
    fn radial_force(&self, r: f64, z: f64) -> anyhow::Result<f64>;

    /// Potential value, Φ(𝑅, 𝑧)
    fn potential_value(&self, r: f64, z: f64) -> anyhow::Result<f64>;

    /// Length and velocity scales of the model
    fn scale_factors(&self) -> ScaleFactors;
}

dyn_clone::clone_trait_object!(RadialForceField);

/// All spherical potentials can be sampled as force fields
impl<T: SphericalPotential + Clone + Send + Sync> RadialForceField for T {
    fn radial_force(&self, r: f64, z: f64) -> anyhow::Result<f64> {
        let distance = r.hypot(z);
        Ok(self.spherical_radial_force(distance) * r / distance)
    }
    fn potential_value(&self, r: f64, z: f64) -> anyhow::Result<f64> {
        Ok(self.spherical_potential(r.hypot(z)))
    }
    fn scale_factors(&self) -> ScaleFactors {
        SphericalPotential::scale_factors(self)
    }
}

/// Scale factors shared by two fields, or an error if a set factor differs
fn merge_scales(a: &ScaleFactors, b: &ScaleFactors) -> Result<ScaleFactors> {
    a.check_compatible(b)?;
    Ok(a.inherit(b))
}

/// Sum of two force fields
#[derive(Clone, Debug)]
pub struct Combined<T, U> {
    first: T,
    second: U,
    scale: ScaleFactors,
}

impl<T: RadialForceField, U: RadialForceField> Combined<T, U> {
    /// Combine two fields; fails if their set scale factors differ
    pub fn new(first: T, second: U) -> Result<Self> {
        let scale = merge_scales(&first.scale_factors(), &second.scale_factors())?;
        Ok(Self {
            first,
            second,
            scale,
        })
    }
}

impl<T: RadialForceField + Clone, U: RadialForceField + Clone> RadialForceField
    for Combined<T, U>
{
    #[inline]
    fn radial_force(&self, r: f64, z: f64) -> anyhow::Result<f64> {
        Ok(self.first.radial_force(r, z)? + self.second.radial_force(r, z)?)
    }
    #[inline]
    fn potential_value(&self, r: f64, z: f64) -> anyhow::Result<f64> {
        Ok(self.first.potential_value(r, z)? + self.second.potential_value(r, z)?)
    }
    fn scale_factors(&self) -> ScaleFactors {
        self.scale
    }
}

/// Sum of an arbitrary number of force fields
#[derive(Clone, Debug, Default)]
pub struct FieldList {
    fields: Vec<Box<dyn RadialForceField>>,
    scale: ScaleFactors,
}

impl FieldList {
    pub fn new(fields: Vec<Box<dyn RadialForceField>>) -> Result<Self> {
        let mut list = Self::default();
        for field in fields {
            list.push(field)?;
        }
        Ok(list)
    }

    /// Append a field; fails if its set scale factors differ from the list's
    pub fn push(&mut self, field: Box<dyn RadialForceField>) -> Result<()> {
        self.scale = merge_scales(&self.scale, &field.scale_factors())?;
        self.fields.push(field);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl RadialForceField for FieldList {
    fn radial_force(&self, r: f64, z: f64) -> anyhow::Result<f64> {
        self.fields.iter().map(|f| f.radial_force(r, z)).sum()
    }
    fn potential_value(&self, r: f64, z: f64) -> anyhow::Result<f64> {
        self.fields.iter().map(|f| f.potential_value(r, z)).sum()
    }
    fn scale_factors(&self) -> ScaleFactors {
        self.scale
    }
}

/// What an interpolated potential is built from
pub enum ForceSource<'a> {
    /// Radial force as a plain function of radius
    Function(Box<dyn Fn(f64) -> f64 + 'a>),
    /// Existing potential model, sampled at 𝑧 = 0
    Field(&'a dyn RadialForceField),
}

impl<'a> ForceSource<'a> {
    pub fn function(force: impl Fn(f64) -> f64 + 'a) -> Self {
        Self::Function(Box::new(force))
    }

    pub fn field(field: &'a dyn RadialForceField) -> Self {
        Self::Field(field)
    }

    /// Determine the zero-point and scale factors of the potential to build.
    ///
    /// - For a function, the zero-point is `phi0` (default 0) and `scale` is used as is.
    /// - For a field, the zero-point is the field's potential at the inner grid edge,
    ///   `phi0` is ignored, and the field's set scale factors are adopted after
    ///   checking that they agree with `scale`.
    pub fn resolve(
        self,
        grid: &RadialGrid,
        phi0: Option<f64>,
        scale: &ScaleFactors,
    ) -> Result<ResolvedSource<'a>> {
        match self {
            Self::Function(_) => {
                let phi0 = phi0.unwrap_or(0.0);
                tracing::debug!(phi0, "resolved plain force function");
                Ok(ResolvedSource {
                    source: self,
                    phi0,
                    scale: *scale,
                })
            }
            Self::Field(field) => {
                let field_scale = field.scale_factors();
                scale.check_compatible(&field_scale)?;
                if phi0.is_some() {
                    tracing::warn!("zero-point ignored; it is taken from the potential model");
                }
                let r_min = grid.r_min();
                let phi0 = field
                    .potential_value(r_min, 0.0)
                    .map_err(|source| Error::Source {
                        radius: r_min,
                        source,
                    })?;
                let scale = scale.inherit(&field_scale);
                tracing::debug!(phi0, ?scale, "resolved potential model");
                Ok(ResolvedSource {
                    source: self,
                    phi0,
                    scale,
                })
            }
        }
    }
}

impl Debug for ForceSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => write!(f, "ForceSource::Function"),
            Self::Field(field) => f.debug_tuple("ForceSource::Field").field(field).finish(),
        }
    }
}

/// Force source with its zero-point and scale factors settled
#[derive(Debug)]
pub struct ResolvedSource<'a> {
    source: ForceSource<'a>,
    phi0: f64,
    scale: ScaleFactors,
}

impl ResolvedSource<'_> {
    /// Potential at the inner edge of the grid
    pub fn phi0(&self) -> f64 {
        self.phi0
    }

    pub fn scale_factors(&self) -> ScaleFactors {
        self.scale
    }

    /// Radial force at `r`; non-finite forces are reported as errors
    pub fn force_at(&self, r: f64) -> Result<f64> {
        let force = match &self.source {
            ForceSource::Function(force) => force(r),
            ForceSource::Field(field) => field
                .radial_force(r, 0.0)
                .map_err(|source| Error::Source { radius: r, source })?,
        };
        if force.is_finite() {
            Ok(force)
        } else {
            Err(Error::Source {
                radius: r,
                source: anyhow::anyhow!("radial force is {}", force),
            })
        }
    }

    /// Radial force at every grid point
    pub fn sample(&self, grid: &RadialGrid) -> Result<Vec<f64>> {
        grid.iter().map(|r| self.force_at(*r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::{Hernquist, Kepler, Plummer};
    use approx::assert_relative_eq;

    /// Model whose force evaluation always fails
    #[derive(Clone, Debug)]
    struct Broken;

    impl RadialForceField for Broken {
        fn radial_force(&self, _r: f64, _z: f64) -> anyhow::Result<f64> {
            anyhow::bail!("density table not loaded")
        }
        fn potential_value(&self, _r: f64, _z: f64) -> anyhow::Result<f64> {
            Ok(-1.0)
        }
        fn scale_factors(&self) -> ScaleFactors {
            ScaleFactors::default()
        }
    }

    #[test]
    fn test_function_default_phi0() {
        let grid = RadialGrid::default();
        let resolved = ForceSource::function(|r| -1.0 / (r * r))
            .resolve(&grid, None, &ScaleFactors::default())
            .unwrap();
        assert_eq!(resolved.phi0(), 0.0);
        assert_relative_eq!(resolved.force_at(2.0).unwrap(), -0.25);

        let resolved = ForceSource::function(|r| -1.0 / (r * r))
            .resolve(&grid, Some(-3.0), &ScaleFactors::new(10.0, 200.0))
            .unwrap();
        assert_eq!(resolved.phi0(), -3.0);
        assert_eq!(resolved.scale_factors(), ScaleFactors::new(10.0, 200.0));
    }

    #[test]
    fn test_field_phi0_from_model() {
        let grid = RadialGrid::default();
        let kepler = Kepler::new(2.0);
        let resolved = ForceSource::field(&kepler)
            .resolve(&grid, Some(123.0), &ScaleFactors::default())
            .unwrap();
        assert_relative_eq!(resolved.phi0(), -2.0 / grid.r_min());
        let samples = resolved.sample(&grid).unwrap();
        assert_eq!(samples.len(), grid.len());
        assert_relative_eq!(samples[100], -2.0 / 400.0, max_relative = 1e-12);
    }

    #[test]
    fn test_field_scales_are_inherited() {
        let grid = RadialGrid::default();
        let kepler = Kepler::new(1.0).with_scale_factors(ScaleFactors::default().with_length(9.0));
        let target = ScaleFactors::default().with_velocity(240.0);
        let resolved = ForceSource::field(&kepler)
            .resolve(&grid, None, &target)
            .unwrap();
        assert_eq!(resolved.scale_factors(), ScaleFactors::new(9.0, 240.0));
    }

    #[test]
    fn test_field_incompatible_scales() {
        let grid = RadialGrid::default();
        let kepler = Kepler::new(1.0).with_scale_factors(ScaleFactors::default().with_length(8.0));
        let target = ScaleFactors::default().with_length(10.0);
        let result = ForceSource::field(&kepler).resolve(&grid, None, &target);
        assert!(matches!(result, Err(Error::IncompatibleScales { .. })));
    }

    #[test]
    fn test_broken_field_is_not_treated_as_function() {
        let grid = RadialGrid::default();
        let broken = Broken;
        let resolved = ForceSource::field(&broken)
            .resolve(&grid, None, &ScaleFactors::default())
            .unwrap();
        let err = resolved.sample(&grid).unwrap_err();
        assert!(matches!(err, Error::Source { .. }));
        assert!(err.to_string().contains("density table not loaded"));
    }

    #[test]
    fn test_non_finite_force_is_rejected() {
        let grid = RadialGrid::default();
        let resolved = ForceSource::function(|r| if r > 1.0 { f64::NAN } else { -1.0 })
            .resolve(&grid, None, &ScaleFactors::default())
            .unwrap();
        assert!(matches!(
            resolved.sample(&grid),
            Err(Error::Source { radius, .. }) if radius > 1.0
        ));
    }

    #[test]
    fn test_combined_sums() {
        let combined = Combined::new(Kepler::new(1.0), Plummer::new(2.0, 0.5)).unwrap();
        let r = 1.3;
        let expected = Kepler::new(1.0).spherical_radial_force(r)
            + Plummer::new(2.0, 0.5).spherical_radial_force(r);
        assert_relative_eq!(combined.radial_force(r, 0.0).unwrap(), expected);
        let expected = Kepler::new(1.0).spherical_potential(r)
            + Plummer::new(2.0, 0.5).spherical_potential(r);
        assert_relative_eq!(combined.potential_value(r, 0.0).unwrap(), expected);
    }

    #[test]
    fn test_combined_rejects_mixed_scales() {
        let a = Kepler::new(1.0).with_scale_factors(ScaleFactors::default().with_length(8.0));
        let b = Plummer::new(1.0, 1.0).with_scale_factors(ScaleFactors::default().with_length(10.0));
        assert!(Combined::new(a, b).is_err());
    }

    #[test]
    fn test_field_list() {
        let fields: Vec<Box<dyn RadialForceField>> = vec![
            Box::new(Kepler::new(0.5)),
            Box::new(Hernquist::new(1.0, 2.0).with_scale_factors(ScaleFactors::new(8.0, 220.0))),
        ];
        let mut list = FieldList::new(fields).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.scale_factors(), ScaleFactors::new(8.0, 220.0));

        let r = 3.0;
        let expected = -0.5 / (r * r) - 1.0 / ((r + 2.0) * (r + 2.0));
        assert_relative_eq!(list.radial_force(r, 0.0).unwrap(), expected);

        let mismatched = Plummer::new(1.0, 1.0).with_scale_factors(ScaleFactors::new(8.0, 230.0));
        assert!(list.push(Box::new(mismatched)).is_err());
        assert_eq!(list.len(), 2);

        list.push(Box::new(Broken)).unwrap();
        assert!(list.radial_force(r, 0.0).is_err());
    }

    #[test]
    fn test_off_plane_force_is_cylindrical() {
        let kepler = Kepler::new(1.0);
        let (r, z) = (3.0, 4.0);
        assert_relative_eq!(kepler.radial_force(r, z).unwrap(), -1.0 / 25.0 * 3.0 / 5.0);
        assert_relative_eq!(kepler.potential_value(r, z).unwrap(), -0.2);
    }
}
