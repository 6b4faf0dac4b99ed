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

//! Elementwise evaluation over collections of radii.
//!
//! The output has the same shape as the input: a scalar gives a scalar, an array
//! gives an array of equal length, and a matrix gives a matrix of equal dimensions.
//!
//! # Examples
//! ```
//! use interpot::Radii;
//! assert_eq!(2.0.map_radii(|r| r * r), 4.0);
//! assert_eq!([1.0, 2.0].map_radii(|r| -r), [-1.0, -2.0]);
//! let m = nalgebra::Matrix2x3::repeat(3.0);
//! assert_eq!((&m).map_radii(|r| r + 1.0), nalgebra::Matrix2x3::repeat(4.0));
//! ```

use nalgebra::{allocator::Allocator, storage::RawStorage, DefaultAllocator, Dim, Matrix, OMatrix};

/// One or more radii that can be mapped elementwise, preserving shape
pub trait Radii {
    type Output;

    /// Apply `f` to every radius
    fn map_radii(self, f: impl Fn(f64) -> f64) -> Self::Output;
}

impl Radii for f64 {
    type Output = f64;
    #[inline]
    fn map_radii(self, f: impl Fn(f64) -> f64) -> f64 {
        f(self)
    }
}

impl Radii for &[f64] {
    type Output = Vec<f64>;
    fn map_radii(self, f: impl Fn(f64) -> f64) -> Vec<f64> {
        self.iter().map(|r| f(*r)).collect()
    }
}

impl Radii for &Vec<f64> {
    type Output = Vec<f64>;
    fn map_radii(self, f: impl Fn(f64) -> f64) -> Vec<f64> {
        self.as_slice().map_radii(f)
    }
}

/// Consumes the vector and reuses its buffer
impl Radii for Vec<f64> {
    type Output = Vec<f64>;
    fn map_radii(mut self, f: impl Fn(f64) -> f64) -> Vec<f64> {
        self.iter_mut().for_each(|r| *r = f(*r));
        self
    }
}

impl<const N: usize> Radii for [f64; N] {
    type Output = [f64; N];
    fn map_radii(self, f: impl Fn(f64) -> f64) -> [f64; N] {
        self.map(f)
    }
}

impl<const N: usize> Radii for &[f64; N] {
    type Output = [f64; N];
    fn map_radii(self, f: impl Fn(f64) -> f64) -> [f64; N] {
        (*self).map(f)
    }
}

/// Vectors and matrices of any (static or dynamic) dimension
impl<R: Dim, C: Dim, S: RawStorage<f64, R, C>> Radii for &Matrix<f64, R, C, S>
where
    DefaultAllocator: Allocator<R, C>,
{
    type Output = OMatrix<f64, R, C>;
    fn map_radii(self, f: impl Fn(f64) -> f64) -> Self::Output {
        self.map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{DMatrix, DVector};

    #[test]
    fn test_shapes_are_preserved() {
        let square = |r: f64| r * r;
        assert_eq!(3.0.map_radii(square), 9.0);

        let slice: &[f64] = &[1.0, 2.0, 3.0];
        assert_eq!(slice.map_radii(square), vec![1.0, 4.0, 9.0]);

        let vec = vec![0.5, 4.0];
        assert_eq!((&vec).map_radii(square), vec![0.25, 16.0]);
        assert_eq!(vec.map_radii(square), vec![0.25, 16.0]);

        assert_eq!((&[2.0, 3.0]).map_radii(square), [4.0, 9.0]);

        let matrix = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mapped = (&matrix).map_radii(square);
        assert_eq!(mapped.shape(), (2, 3));
        assert_eq!(mapped[(1, 2)], 36.0);

        let column = DVector::from_vec(vec![2.0; 7]);
        assert_eq!((&column).map_radii(square).len(), 7);
    }

    #[test]
    fn test_empty_input() {
        let empty: &[f64] = &[];
        assert!(empty.map_radii(|r| r).is_empty());
    }
}
