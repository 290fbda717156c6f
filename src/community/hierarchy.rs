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

//! The levels produced by one Louvain run.
//!
//! Levels live in a single arena. Level 0 is the base, one aggregate per
//! original node; every further level is the reduction of the one below it,
//! and the last level is the root. Each level records the ids of its finer
//! and coarser neighbors so the hierarchy can be walked in both directions
//! without back pointers.

use std::fmt;

use super::common::group_by_labels;
use super::modularity::{singleton_score, Score};
use super::reduce::ReducedGraph;
use crate::error::{check_resolution, Result};

/// Position of a level in a [`Hierarchy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(usize);

impl LevelId {
    /// Distance from the base level.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {}", self.0)
    }
}

#[derive(Clone, Debug)]
struct Level {
    graph: ReducedGraph,
    finer: Option<LevelId>,
    coarser: Option<LevelId>,
}

/// Multilevel community structure of a graph.
#[derive(Clone, Debug)]
pub struct Hierarchy {
    levels: Vec<Level>,
    resolution: f64,
}

impl Hierarchy {
    /// A hierarchy holding only `base`.
    pub(crate) fn new(base: ReducedGraph, resolution: f64) -> Self {
        Hierarchy {
            levels: vec![Level {
                graph: base,
                finer: None,
                coarser: None,
            }],
            resolution,
        }
    }

    /// Stack `graph` on top of the current root. `graph` must be a reduction
    /// of the current root.
    pub(crate) fn push(&mut self, graph: ReducedGraph) -> LevelId {
        let below = self.root();
        let id = LevelId(self.levels.len());
        self.levels[below.0].coarser = Some(id);
        self.levels.push(Level {
            graph,
            finer: Some(below),
            coarser: None,
        });
        id
    }

    /// The coarsest level.
    #[inline]
    pub fn root(&self) -> LevelId {
        LevelId(self.levels.len() - 1)
    }

    /// The finest level, one aggregate per original node.
    #[inline]
    pub fn base(&self) -> LevelId {
        LevelId(0)
    }

    /// Number of levels, at least one.
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; a hierarchy has at least its base level.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level ids from the root down to the base, the order in which
    /// communities are expanded.
    pub fn levels(&self) -> impl DoubleEndedIterator<Item = LevelId> + ExactSizeIterator {
        (0..self.levels.len()).rev().map(LevelId)
    }

    /// Aggregated graph of a level.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this hierarchy.
    #[inline]
    pub fn level(&self, id: LevelId) -> &ReducedGraph {
        &self.levels[id.0].graph
    }

    /// The level this one was reduced from; `None` at the base.
    #[inline]
    pub fn finer(&self, id: LevelId) -> Option<LevelId> {
        self.levels[id.0].finer
    }

    /// The level built from this one; `None` at the root.
    #[inline]
    pub fn coarser(&self, id: LevelId) -> Option<LevelId> {
        self.levels[id.0].coarser
    }

    /// Resolution the hierarchy was optimized for.
    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Original nodes grouped by the aggregates of `id`.
    ///
    /// Community `i` of the result holds the sorted original node ids that
    /// aggregate node `i` of the level stands for. At the base every
    /// community is a single node.
    pub fn communities(&self, id: LevelId) -> Vec<Vec<usize>> {
        let labels = self.base_labels(id);
        let base = self.level(self.base());
        group_by_labels(&labels, self.level(id).node_count())
            .into_iter()
            .map(|comm| comm.into_iter().flat_map(|i| base.members(i).iter().copied()).collect())
            .collect()
    }

    /// `(node, community)` pairs for every original node, ordered by node
    /// id. Community indices are the aggregate indices of `id`.
    pub fn membership(&self, id: LevelId) -> Vec<(usize, usize)> {
        let labels = self.base_labels(id);
        let base = self.level(self.base());
        labels
            .into_iter()
            .enumerate()
            .flat_map(|(i, comm)| base.members(i).iter().map(move |&node| (node, comm)))
            .collect()
    }

    /// Modularity of the grouping `id` represents, at the hierarchy's
    /// resolution.
    pub fn score(&self, id: LevelId) -> Score {
        singleton_score(self.level(id), self.resolution)
    }

    /// Modularity of the grouping `id` represents at another resolution.
    pub fn score_at(&self, id: LevelId, resolution: f64) -> Result<Score> {
        check_resolution(resolution)?;
        Ok(singleton_score(self.level(id), resolution))
    }

    /// Aggregate of `id` containing each base node.
    fn base_labels(&self, id: LevelId) -> Vec<usize> {
        let mut labels: Vec<usize> = (0..self.level(id).node_count()).collect();
        let mut current = id;
        while let Some(finer) = self.finer(current) {
            let graph = self.level(current);
            let mut expanded = vec![0; self.level(finer).node_count()];
            for (aggregate, &label) in labels.iter().enumerate() {
                for &member in graph.members(aggregate) {
                    expanded[member] = label;
                }
            }
            labels = expanded;
            current = finer;
        }
        labels
    }
}
