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

//! Resolution profiles: how the best partition changes with γ.

use std::num::NonZeroUsize;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::common::canonical_order;
use super::louvain::best_hierarchy;
use super::modularity::Score;
use super::reduce::ReducedGraph;
use crate::config::ProfileConfig;
use crate::error::Result;
use crate::graph::WeightedGraph;

/// A resolution range over which Louvain settles on one partition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
    /// Root score of the partition at `low`.
    pub score: Score,
    /// Communities found at `low`, members sorted, ordered by smallest member.
    pub communities: Vec<Vec<usize>>,
}

/// Partition found at one resolution.
#[derive(Clone)]
struct Sample {
    resolution: f64,
    score: Score,
    communities: Vec<Vec<usize>>,
}

/// Sample the best Louvain partition across `[config.low, config.high]`.
///
/// Both ends of the range are optimized with `config.effort` restarts. A
/// range whose ends disagree is split at its midpoint (geometric when
/// `config.log_scale`) until the ends agree or the range is no wider than
/// `config.grain`; with `log_scale` the width is measured as `ln(high/low)`.
/// Neighboring ranges with the same communities are merged.
///
/// # Returns
/// * Contiguous intervals covering `[config.low, config.high]` in order
/// * `Error::InvalidParameter` for an empty range or a non-positive grain
pub fn resolution_profile<G, R>(
    graph: &G,
    config: &ProfileConfig,
    rng: &mut R,
) -> Result<Vec<Interval>>
where
    G: WeightedGraph + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    let effort = config.restarts()?;
    let base = ReducedGraph::from_graph(graph)?;
    let mut profiler = Profiler {
        base: &base,
        config,
        effort,
        rng,
        intervals: Vec::new(),
    };

    let low = profiler.sample(config.low);
    let high = profiler.sample(config.high);
    profiler.bisect(low, high);
    Ok(merge_equal(profiler.intervals))
}

struct Profiler<'a, R: ?Sized> {
    base: &'a ReducedGraph,
    config: &'a ProfileConfig,
    effort: NonZeroUsize,
    rng: &'a mut R,
    intervals: Vec<Interval>,
}

impl<R: Rng + ?Sized> Profiler<'_, R> {
    fn sample(&mut self, resolution: f64) -> Sample {
        let hierarchy = best_hierarchy(self.base, resolution, self.rng, self.effort);
        let root = hierarchy.root();
        let sample = Sample {
            resolution,
            score: hierarchy.score(root),
            communities: canonical_order(hierarchy.communities(root)),
        };
        log::debug!(
            "resolution {resolution}: {} communities, score {}",
            sample.communities.len(),
            sample.score
        );
        sample
    }

    /// Emit intervals for `[low, high]` from left to right.
    fn bisect(&mut self, low: Sample, high: Sample) {
        if low.communities == high.communities || self.width(&low, &high) <= self.config.grain {
            self.intervals.push(Interval {
                low: low.resolution,
                high: high.resolution,
                score: low.score,
                communities: low.communities,
            });
            return;
        }

        let mid = self.sample(self.midpoint(&low, &high));
        self.bisect(low, mid.clone());
        self.bisect(mid, high);
    }

    fn width(&self, low: &Sample, high: &Sample) -> f64 {
        if self.config.log_scale {
            (high.resolution / low.resolution).ln()
        } else {
            high.resolution - low.resolution
        }
    }

    fn midpoint(&self, low: &Sample, high: &Sample) -> f64 {
        if self.config.log_scale {
            (low.resolution * high.resolution).sqrt()
        } else {
            0.5 * (low.resolution + high.resolution)
        }
    }
}

/// Join neighbors that found the same communities.
fn merge_equal(intervals: Vec<Interval>) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if last.communities == interval.communities => last.high = interval.high,
            _ => merged.push(interval),
        }
    }
    merged
}
