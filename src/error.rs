// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types used across the crate.
//!
//! An undefined modularity score is not an error; it is reported as
//! [`Score::Undefined`](crate::community::Score::Undefined).

use thiserror::Error;

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the evaluator, the reducer and the Louvain driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Resolution was zero, negative or not finite.
    #[error("resolution must be a finite positive number, got {0}")]
    InvalidResolution(f64),

    /// Zero Louvain restarts were requested.
    #[error("at least one Louvain iteration is required")]
    InvalidIterations,

    /// The graph has no nodes.
    #[error("graph has no nodes")]
    EmptyGraph,

    /// An edge weight was negative or not finite.
    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight {
        /// Tail of the offending edge.
        from: usize,
        /// Head of the offending edge.
        to: usize,
        /// The rejected weight.
        weight: f64,
    },

    /// A neighbor was reported for a node that is not in the graph.
    #[error("node {0} is not part of the graph")]
    UnknownNode(usize),

    /// A partition did not cover the graph exactly once.
    #[error("invalid partition: {0}")]
    InvalidPartition(String),

    /// Any other out of range parameter.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

/// Reject resolutions that are not strictly positive and finite.
#[inline]
pub(crate) fn check_resolution(resolution: f64) -> Result<()> {
    if resolution.is_finite() && resolution > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidResolution(resolution))
    }
}
