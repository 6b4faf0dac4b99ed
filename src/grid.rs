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

//! Radial sampling grids.

use crate::error::{Error, Result};
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest number of knots that carries a cubic interpolant
pub const MIN_GRID_POINTS: usize = 4;

/// Spacing strategy for generated grids.
///
/// Steep force laws (e.g. near a point mass) need denser sampling at small radii,
/// which is what the geometric spacing provides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum GridSpacing {
    /// Constant ratio between neighbouring radii (default)
    #[default]
    Geometric,
    /// Constant difference between neighbouring radii
    Linear,
}

/// Strictly increasing, positive radii on which the force law is sampled.
///
/// # Examples
/// ```
/// use interpot::RadialGrid;
/// let grid = RadialGrid::default();
/// assert_eq!(grid.len(), 101);
/// assert_eq!(grid.r_min(), 0.01);
/// assert!((grid.r_max() - 20.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RadialGrid {
    radii: Vec<f64>,
}

impl RadialGrid {
    /// Validate and wrap a user supplied sequence of radii
    pub fn new(radii: Vec<f64>) -> Result<Self> {
        if radii.len() < MIN_GRID_POINTS {
            return Err(Error::InvalidGrid(format!(
                "{} points given, at least {} needed",
                radii.len(),
                MIN_GRID_POINTS
            )));
        }
        if let Some(r) = radii.iter().find(|r| !r.is_finite() || **r <= 0.0) {
            return Err(Error::InvalidGrid(format!(
                "radius {} is not finite and positive",
                r
            )));
        }
        if let Some((i, _)) = radii
            .iter()
            .tuple_windows()
            .find_position(|(a, b)| b <= a)
        {
            return Err(Error::InvalidGrid(format!(
                "radii not strictly increasing at index {}",
                i + 1
            )));
        }
        Ok(Self { radii })
    }

    /// `n` geometrically spaced radii from `start` to `stop`, both included
    pub fn geometric(start: f64, stop: f64, n: usize) -> Result<Self> {
        Self::from_spacing(GridSpacing::Geometric, start, stop, n)
    }

    /// `n` evenly spaced radii from `start` to `stop`, both included
    pub fn linear(start: f64, stop: f64, n: usize) -> Result<Self> {
        Self::from_spacing(GridSpacing::Linear, start, stop, n)
    }

    pub fn from_spacing(spacing: GridSpacing, start: f64, stop: f64, n: usize) -> Result<Self> {
        if n < 2 {
            return Err(Error::InvalidGrid(format!("cannot space {} points", n)));
        }
        let last = (n - 1) as f64;
        let mut radii: Vec<f64> = match spacing {
            GridSpacing::Geometric => {
                if start <= 0.0 || stop <= 0.0 {
                    return Err(Error::InvalidGrid(
                        "geometric spacing needs positive end points".into(),
                    ));
                }
                let (log_start, log_stop) = (start.ln(), stop.ln());
                (0..n)
                    .map(|i| (log_start + (log_stop - log_start) * i as f64 / last).exp())
                    .collect()
            }
            GridSpacing::Linear => (0..n)
                .map(|i| start + (stop - start) * i as f64 / last)
                .collect(),
        };
        // pin end points against rounding in exp/ln
        radii[0] = start;
        radii[n - 1] = stop;
        Self::new(radii)
    }

    /// Inner edge of the grid
    #[inline]
    pub fn r_min(&self) -> f64 {
        self.radii[0]
    }

    /// Outer edge of the grid; beyond this the potential is extrapolated
    #[inline]
    pub fn r_max(&self) -> f64 {
        self.radii[self.radii.len() - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    /// Always false; a grid holds at least [`MIN_GRID_POINTS`] radii
    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.radii
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.radii.iter()
    }
}

impl Default for RadialGrid {
    /// 101 geometrically spaced radii from 0.01 to 20
    fn default() -> Self {
        let (start, stop, n) = (0.01_f64, 20.0_f64, 101);
        let ratio = (stop / start).ln() / (n - 1) as f64;
        let mut radii: Vec<f64> = (0..n).map(|i| start * (ratio * i as f64).exp()).collect();
        radii[n - 1] = stop;
        Self { radii }
    }
}

impl AsRef<[f64]> for RadialGrid {
    fn as_ref(&self) -> &[f64] {
        &self.radii
    }
}

impl TryFrom<Vec<f64>> for RadialGrid {
    type Error = Error;
    fn try_from(radii: Vec<f64>) -> Result<Self> {
        Self::new(radii)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for RadialGrid {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let radii = Vec::<f64>::deserialize(deserializer)?;
        Self::new(radii).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_grid() {
        let grid = RadialGrid::default();
        assert_eq!(grid.len(), 101);
        assert_eq!(grid.r_min(), 0.01);
        assert_eq!(grid.r_max(), 20.0);
        let explicit = RadialGrid::geometric(0.01, 20.0, 101).unwrap();
        for (a, b) in grid.iter().zip(explicit.iter()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_geometric_constant_ratio() {
        let grid = RadialGrid::geometric(1.0, 1000.0, 4).unwrap();
        let r = grid.as_slice();
        assert_relative_eq!(r[1], 10.0, max_relative = 1e-12);
        assert_relative_eq!(r[2], 100.0, max_relative = 1e-12);
        assert_eq!(r[3], 1000.0);
    }

    #[test]
    fn test_linear() {
        let grid = RadialGrid::linear(1.0, 4.0, 4).unwrap();
        assert_eq!(grid.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_too_few_points() {
        assert!(matches!(
            RadialGrid::new(vec![1.0, 2.0, 3.0]),
            Err(Error::InvalidGrid(_))
        ));
        assert!(RadialGrid::linear(1.0, 2.0, 3).is_err());
    }

    #[test]
    fn test_not_increasing() {
        let err = RadialGrid::new(vec![1.0, 2.0, 2.0, 3.0]).unwrap_err();
        assert!(err.to_string().contains("index 2"));
        assert!(RadialGrid::new(vec![4.0, 3.0, 2.0, 1.0]).is_err());
    }

    #[test]
    fn test_non_positive_or_nan() {
        assert!(RadialGrid::new(vec![0.0, 1.0, 2.0, 3.0]).is_err());
        assert!(RadialGrid::new(vec![1.0, f64::NAN, 2.0, 3.0]).is_err());
        assert!(RadialGrid::geometric(0.0, 1.0, 10).is_err());
    }
}
