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

//! Errors raised while building an interpolated potential.
//!
//! All failures happen at construction; evaluation of a finished model is total.

/// Which of the two scale factors a compatibility check refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    /// Distance scale
    Length,
    /// Velocity scale
    Velocity,
}

impl std::fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Length => write!(f, "length"),
            Self::Velocity => write!(f, "velocity"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The radial grid cannot carry a cubic interpolant
    #[error("invalid radial grid: {0}")]
    InvalidGrid(String),

    /// Scale factors of a composite source disagree with the requested ones
    #[error(
        "{kind} scale {source_value} of the interpolated source is incompatible with {target_value} \
         requested for the interpolated potential"
    )]
    IncompatibleScales {
        kind: ScaleKind,
        source_value: f64,
        target_value: f64,
    },

    /// A composite source failed while being sampled
    #[error("force source failed at r = {radius}: {source}")]
    Source {
        radius: f64,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
