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

//! Piecewise polynomial splines
//!
//! [`Spline::interpolate_cubic`] fits a C² cubic through tabulated samples using
//! *not-a-knot* end conditions, i.e. the third derivative is continuous across the
//! second and the second-to-last knot. Cubics are therefore reproduced exactly.
//!
//! The fitted spline is stored as one polynomial per knot interval,
//! ```text
//! S(x) = c[0] + c[1]·t + c[2]·t² + … ,  t = x - xᵢ
//! ```
//! which makes [`Spline::derivative`] and [`Spline::antiderivative`] exact
//! coefficient transforms. The antiderivative vanishes at the first knot.
//!
//! Outside `[x₀, xₙ₋₁]` the first or last polynomial piece is simply continued;
//! callers that need a physically meaningful extension must handle it themselves.
//!
//! # Example
//!
//! ```
//! use interpot::spline::Spline;
//! let x = [0.0, 1.0, 2.0, 3.0, 4.0];
//! let y: Vec<f64> = x.iter().map(|x| x * x * x).collect();
//! let spline = Spline::interpolate_cubic(&x, &y).unwrap();
//! assert!((spline.eval(2.5) - 15.625).abs() < 1e-12);
//! assert!((spline.derivative().eval(2.5) - 18.75).abs() < 1e-12);
//! assert!((spline.antiderivative().eval(2.0) - 4.0).abs() < 1e-12);
//! ```

use crate::error::{Error, Result};
use crate::grid::MIN_GRID_POINTS;
use itertools::Itertools;
use std::fmt::{self, Debug};

/// Piecewise polynomial on a set of knots
#[derive(Clone, PartialEq)]
pub struct Spline {
    /// Knots x₀ < x₁ < … < xₙ₋₁
    knots: Vec<f64>,
    /// Polynomial coefficients, `order` per interval, lowest power first
    coeffs: Vec<f64>,
    /// Number of coefficients per interval (degree + 1)
    order: usize,
}

impl Spline {
    /// Interpolating cubic spline through `(x, y)` with not-a-knot end conditions.
    ///
    /// `x` must be strictly increasing and hold at least four points.
    pub fn interpolate_cubic(x: &[f64], y: &[f64]) -> Result<Self> {
        let n = x.len();
        if n != y.len() {
            return Err(Error::InvalidGrid(format!(
                "{} knots but {} values",
                n,
                y.len()
            )));
        }
        if n < MIN_GRID_POINTS {
            return Err(Error::InvalidGrid(format!(
                "{} knots given, at least {} needed for a cubic",
                n, MIN_GRID_POINTS
            )));
        }
        if x.iter().tuple_windows().any(|(a, b)| b <= a) {
            return Err(Error::InvalidGrid("knots not strictly increasing".into()));
        }
        if let Some((i, value)) = y.iter().find_position(|value| !value.is_finite()) {
            return Err(Error::InvalidGrid(format!(
                "value {} at knot {} is not finite",
                value, i
            )));
        }

        let h: Vec<f64> = x.iter().tuple_windows().map(|(a, b)| b - a).collect();
        let slopes: Vec<f64> = y
            .iter()
            .tuple_windows()
            .zip(&h)
            .map(|((y0, y1), h)| (y1 - y0) / h)
            .collect();

        let moments = not_a_knot_moments(&h, &slopes).ok_or_else(|| {
            Error::InvalidGrid("spline moments are not finite; check knot spacing and values".into())
        })?;

        let mut coeffs = Vec::with_capacity(4 * (n - 1));
        for i in 0..n - 1 {
            let (m0, m1) = (moments[i], moments[i + 1]);
            coeffs.extend_from_slice(&[
                y[i],
                slopes[i] - h[i] * (2.0 * m0 + m1) / 6.0,
                0.5 * m0,
                (m1 - m0) / (6.0 * h[i]),
            ]);
        }

        Ok(Self {
            knots: x.to_vec(),
            coeffs,
            order: 4,
        })
    }

    /// Polynomial degree of each piece
    pub fn degree(&self) -> usize {
        self.order - 1
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Interval `[x₀, xₙ₋₁]` on which the spline is defined
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Coefficients of the piece starting at knot `i`
    #[inline]
    fn piece(&self, i: usize) -> &[f64] {
        &self.coeffs[i * self.order..(i + 1) * self.order]
    }

    /// Index of the interval holding `x`, clamped to the first and last piece
    #[inline]
    fn interval(&self, x: f64) -> usize {
        let n_intervals = self.knots.len() - 1;
        self.knots
            .partition_point(|knot| *knot <= x)
            .saturating_sub(1)
            .min(n_intervals - 1)
    }

    /// Evaluate the spline at `x`
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        let i = self.interval(x);
        horner(self.piece(i), x - self.knots[i])
    }

    /// Spline of the first derivative, one degree lower
    pub fn derivative(&self) -> Self {
        if self.order == 1 {
            return Self {
                knots: self.knots.clone(),
                coeffs: vec![0.0; self.knots.len() - 1],
                order: 1,
            };
        }
        let coeffs = self
            .coeffs
            .chunks_exact(self.order)
            .flat_map(|c| c.iter().enumerate().skip(1).map(|(k, ck)| k as f64 * ck))
            .collect();
        Self {
            knots: self.knots.clone(),
            coeffs,
            order: self.order - 1,
        }
    }

    /// Spline of the indefinite integral, one degree higher.
    ///
    /// The integration constant is chosen such that the result is zero at the first
    /// knot; the pieces join continuously.
    pub fn antiderivative(&self) -> Self {
        let order = self.order + 1;
        let mut coeffs = Vec::with_capacity(order * (self.knots.len() - 1));
        let mut accumulated = 0.0;
        for (i, c) in self.coeffs.chunks_exact(self.order).enumerate() {
            let start = coeffs.len();
            coeffs.push(accumulated);
            coeffs.extend(c.iter().enumerate().map(|(k, ck)| ck / (k + 1) as f64));
            let width = self.knots[i + 1] - self.knots[i];
            accumulated = horner(&coeffs[start..], width);
        }
        Self {
            knots: self.knots.clone(),
            coeffs,
            order,
        }
    }
}

/// Second derivatives M at the knots of a not-a-knot cubic spline.
///
/// The end conditions (M₁ - M₀)/h₀ = (M₂ - M₁)/h₁ and its mirror at the last knot
/// are used to eliminate M₀ and Mₙ₋₁ from the first and last continuity rows.
/// The remaining n - 2 unknowns form a diagonally dominant tridiagonal system,
/// solved with a forward sweep and back substitution. Returns `None` if the
/// result is not finite.
fn not_a_knot_moments(h: &[f64], slopes: &[f64]) -> Option<Vec<f64>> {
    let n = h.len() + 1;
    let m = n - 2;

    // rows i = 1..n-1 of the continuity equations, stored from index 0
    let mut sub = vec![0.0; m];
    let mut diag = vec![0.0; m];
    let mut sup = vec![0.0; m];
    let mut rhs = vec![0.0; m];
    for k in 0..m {
        let i = k + 1;
        sub[k] = h[i - 1];
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        sup[k] = h[i];
        rhs[k] = 6.0 * (slopes[i] - slopes[i - 1]);
    }

    // M₀ = ((h₀ + h₁)M₁ - h₀M₂) / h₁
    let (h0, h1) = (h[0], h[1]);
    diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
    sup[0] = (h1 - h0) * (h1 + h0) / h1;

    // Mₙ₋₁ = ((a + b)Mₙ₋₂ - bMₙ₋₃) / a
    let (a, b) = (h[n - 3], h[n - 2]);
    sub[m - 1] = (a - b) * (a + b) / a;
    diag[m - 1] = (a + b) * (2.0 * a + b) / a;

    // forward sweep
    for k in 1..m {
        let w = sub[k] / diag[k - 1];
        diag[k] -= w * sup[k - 1];
        rhs[k] -= w * rhs[k - 1];
    }

    // back substitution
    let mut moments = vec![0.0; n];
    moments[m] = rhs[m - 1] / diag[m - 1];
    for k in (0..m - 1).rev() {
        moments[k + 1] = (rhs[k] - sup[k] * moments[k + 2]) / diag[k];
    }

    moments[0] = ((h0 + h1) * moments[1] - h0 * moments[2]) / h1;
    moments[n - 1] = ((a + b) * moments[n - 2] - b * moments[n - 3]) / a;

    moments.iter().all(|m| m.is_finite()).then_some(moments)
}

/// Horner's method for `c[0] + c[1]·t + c[2]·t² + …`
#[inline(always)]
fn horner(c: &[f64], t: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, ck| acc * t + ck)
}

impl Debug for Spline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spline")
            .field("n_knots", &self.knots.len())
            .field("domain", &self.domain())
            .field("degree", &self.degree())
            .finish()
    }
}
