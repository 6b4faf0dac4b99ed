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

//! Length and velocity scales for converting internal units to physical units.

use crate::error::{Error, Result, ScaleKind};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length scale used when none is set (kpc)
pub const DEFAULT_LENGTH_SCALE: f64 = 8.0;
/// Velocity scale used when none is set (km/s)
pub const DEFAULT_VELOCITY_SCALE: f64 = 220.0;

/// Relative tolerance below which two set scale factors are considered equal
pub const SCALE_TOLERANCE: f64 = 1e-10;

/// Distance and velocity normalization of a potential.
///
/// A factor that is `None` is *not set*: it evaluates to the library default
/// but never conflicts with a set factor on another potential.
///
/// # Examples
/// ```
/// use interpot::ScaleFactors;
/// let scale = ScaleFactors::default().with_length(8.0);
/// assert!(scale.is_length_set());
/// assert!(!scale.is_velocity_set());
/// assert_eq!(scale.velocity(), 220.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct ScaleFactors {
    #[cfg_attr(feature = "serde", serde(rename = "ro", default))]
    length: Option<f64>,
    #[cfg_attr(feature = "serde", serde(rename = "vo", default))]
    velocity: Option<f64>,
}

impl ScaleFactors {
    /// Scale factors with both length and velocity set
    pub const fn new(length: f64, velocity: f64) -> Self {
        Self {
            length: Some(length),
            velocity: Some(velocity),
        }
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub const fn is_length_set(&self) -> bool {
        self.length.is_some()
    }

    pub const fn is_velocity_set(&self) -> bool {
        self.velocity.is_some()
    }

    /// Length scale, falling back to [`DEFAULT_LENGTH_SCALE`]
    pub fn length(&self) -> f64 {
        self.length.unwrap_or(DEFAULT_LENGTH_SCALE)
    }

    /// Velocity scale, falling back to [`DEFAULT_VELOCITY_SCALE`]
    pub fn velocity(&self) -> f64 {
        self.velocity.unwrap_or(DEFAULT_VELOCITY_SCALE)
    }

    /// Physical value of one internal potential unit, (km/s)²
    pub fn potential_unit(&self) -> f64 {
        self.velocity().powi(2)
    }

    /// Physical value of one internal force unit, (km/s)²/kpc
    pub fn force_unit(&self) -> f64 {
        self.velocity().powi(2) / self.length()
    }

    /// Check that `source` can be interpolated into a potential with these factors.
    ///
    /// Only factors set on both sides are compared, relative to the source's value.
    pub fn check_compatible(&self, source: &ScaleFactors) -> Result<()> {
        check_factor(ScaleKind::Length, source.length, self.length)?;
        check_factor(ScaleKind::Velocity, source.velocity, self.velocity)
    }

    /// Factors of a potential built from `source`: set factors of the source take
    /// over, the remaining ones are kept.
    ///
    /// Call [`ScaleFactors::check_compatible`] first; merging does not validate.
    pub fn inherit(&self, source: &ScaleFactors) -> Self {
        Self {
            length: source.length.or(self.length),
            velocity: source.velocity.or(self.velocity),
        }
    }
}

fn check_factor(kind: ScaleKind, source: Option<f64>, target: Option<f64>) -> Result<()> {
    match (source, target) {
        (Some(source_value), Some(target_value))
            if ((source_value - target_value) / source_value).abs() >= SCALE_TOLERANCE =>
        {
            Err(Error::IncompatibleScales {
                kind,
                source_value,
                target_value,
            })
        }
        _ => Ok(()),
    }
}
