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

//! Serializable run settings.
//!
//! Missing fields take their default, so a partial JSON or YAML document is
//! a valid configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::community::{
    build_rng, resolution_profile, run_louvain, run_louvain_par, Hierarchy, Interval,
};
use crate::error::{check_resolution, Error, Result};
use crate::graph::WeightedGraph;

/// Settings for a Louvain run with restarts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LouvainConfig {
    /// Resolution γ. Higher values lead to more, smaller communities.
    pub resolution: f64,
    /// Number of restarts; the best root is kept.
    pub iterations: usize,
    /// Seed for reproducible runs. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Spread restarts over the rayon pool.
    pub parallel: bool,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        LouvainConfig {
            resolution: 1.0,
            iterations: 1,
            seed: None,
            parallel: false,
        }
    }
}

impl LouvainConfig {
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set a random seed for deterministic results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_resolution(self.resolution)?;
        if self.iterations == 0 {
            return Err(Error::InvalidIterations);
        }
        Ok(())
    }

    /// Run Louvain on `graph` with these settings.
    ///
    /// Sequential runs share one RNG stream seeded from `seed`; parallel runs
    /// derive one stream per restart from it. The two modes give different,
    /// individually reproducible results for the same seed.
    pub fn run<G>(&self, graph: &G) -> Result<Hierarchy>
    where
        G: WeightedGraph + ?Sized,
    {
        self.validate()?;
        log::debug!("louvain: {:?}", self);
        if self.parallel {
            let seed = self.seed.unwrap_or_else(rand::random);
            run_louvain_par(graph, self.resolution, seed, self.iterations)
        } else {
            let mut rng = build_rng(self.seed);
            run_louvain(graph, self.resolution, &mut rng, self.iterations)
        }
    }
}

/// Settings for a resolution profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Smallest resolution sampled.
    pub low: f64,
    /// Largest resolution sampled.
    pub high: f64,
    /// Ranges no wider than this are not split further. Measured in
    /// `ln(γ)` when `log_scale` is set.
    pub grain: f64,
    /// Bisect geometrically instead of arithmetically.
    pub log_scale: bool,
    /// Louvain restarts per sampled resolution.
    pub effort: usize,
    pub seed: Option<u64>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        ProfileConfig {
            low: 0.1,
            high: 10.0,
            grain: 1e-3,
            log_scale: true,
            effort: 10,
            seed: None,
        }
    }
}

impl ProfileConfig {
    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    pub fn with_grain(mut self, grain: f64) -> Self {
        self.grain = grain;
        self
    }

    pub fn with_log_scale(mut self, log_scale: bool) -> Self {
        self.log_scale = log_scale;
        self
    }

    pub fn with_effort(mut self, effort: usize) -> Self {
        self.effort = effort;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.low.is_finite() && self.low > 0.0) {
            return Err(invalid(
                "low",
                format!("must be finite and positive, got {}", self.low),
            ));
        }
        if !(self.high.is_finite() && self.high > self.low) {
            return Err(invalid(
                "high",
                format!("must be finite and above low ({}), got {}", self.low, self.high),
            ));
        }
        if !(self.grain.is_finite() && self.grain > 0.0) {
            return Err(invalid(
                "grain",
                format!("must be finite and positive, got {}", self.grain),
            ));
        }
        self.restarts()?;
        Ok(())
    }

    /// Louvain restarts per sampled resolution.
    pub(crate) fn restarts(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.effort).ok_or_else(|| {
            invalid("effort", "at least one run per resolution is required".into())
        })
    }

    /// Profile `graph` with an RNG built from `seed`.
    pub fn run<G>(&self, graph: &G) -> Result<Vec<Interval>>
    where
        G: WeightedGraph + ?Sized,
    {
        let mut rng = build_rng(self.seed);
        resolution_profile(graph, self, &mut rng)
    }
}

fn invalid(name: &'static str, message: String) -> Error {
    Error::InvalidParameter { name, message }
}
