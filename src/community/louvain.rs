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
// https://arxiv.org/abs/0803.0476

use std::num::NonZeroUsize;

use rand::Rng;
use rayon::prelude::*;

use super::common::restart_rng;
use super::hierarchy::Hierarchy;
use super::local_move::LocalMover;
use super::modularity::Score;
use super::reduce::ReducedGraph;
use crate::error::{check_resolution, Error, Result};
use crate::graph::WeightedGraph;

// ========================
// Single run
// ========================

/// Run the complete Louvain algorithm once.
///
/// # Arguments
/// * `graph` - The input graph
/// * `resolution` - Resolution parameter for modularity
/// * `rng` - Source of randomness for node order and tie breaking
///
/// # Returns
/// * `Hierarchy` - Every level built, from the graph itself up to the level
///   where no move improved modularity
pub fn louvain<G, R>(graph: &G, resolution: f64, rng: &mut R) -> Result<Hierarchy>
where
    G: WeightedGraph + ?Sized,
    R: Rng + ?Sized,
{
    check_resolution(resolution)?;
    let base = ReducedGraph::from_graph(graph)?;
    Ok(louvain_from_base(base, resolution, rng))
}

/// Alternate local moving and reduction starting from `base`.
pub(crate) fn louvain_from_base<R>(base: ReducedGraph, resolution: f64, rng: &mut R) -> Hierarchy
where
    R: Rng + ?Sized,
{
    let mut hierarchy = Hierarchy::new(base, resolution);
    loop {
        let current = hierarchy.level(hierarchy.root());
        let moves = LocalMover::new(current, resolution).run(rng);
        if !moves.changed {
            break;
        }

        let reduced = current.reduce(&moves.membership);
        let (before, after) = (current.node_count(), reduced.node_count());
        if after == before {
            break;
        }
        let id = hierarchy.push(reduced);
        log::debug!(
            "{id}: {before} -> {after} nodes after {} sweeps",
            moves.sweeps
        );
    }
    hierarchy
}

// ========================
// Restarts
// ========================

/// Run Louvain `iterations` times and keep the hierarchy whose root scores
/// highest.
///
/// Runs draw from `rng` one after another. Ties keep the earlier run. A
/// graph without edge weight has an undefined score on every run, so the
/// first run is returned without trying further.
///
/// # Returns
/// * `Error::InvalidIterations` if `iterations` is zero
pub fn run_louvain<G, R>(
    graph: &G,
    resolution: f64,
    rng: &mut R,
    iterations: usize,
) -> Result<Hierarchy>
where
    G: WeightedGraph + ?Sized,
    R: Rng + ?Sized,
{
    check_resolution(resolution)?;
    let iterations = restarts(iterations)?;
    let base = ReducedGraph::from_graph(graph)?;
    Ok(best_hierarchy(&base, resolution, rng, iterations))
}

/// Sequential restarts from an already built base level.
pub(crate) fn best_hierarchy<R>(
    base: &ReducedGraph,
    resolution: f64,
    rng: &mut R,
    iterations: NonZeroUsize,
) -> Hierarchy
where
    R: Rng + ?Sized,
{
    let mut best = BestRun::new(louvain_from_base(base.clone(), resolution, rng));
    for restart in 1..iterations.get() {
        if best.is_final() {
            break;
        }
        best.offer(restart, louvain_from_base(base.clone(), resolution, rng));
    }
    best.hierarchy
}

/// Like [`run_louvain`] with the restarts spread over the rayon pool.
///
/// Restart `i` draws from its own stream, `restart_rng(seed, i)`, and the
/// winner is picked in restart order, so the result depends on `seed` and
/// `iterations` only.
pub fn run_louvain_par<G>(
    graph: &G,
    resolution: f64,
    seed: u64,
    iterations: usize,
) -> Result<Hierarchy>
where
    G: WeightedGraph + ?Sized,
{
    check_resolution(resolution)?;
    let iterations = restarts(iterations)?;
    let base = ReducedGraph::from_graph(graph)?;
    // Every run on a graph without edge weight scores undefined.
    let iterations = if base.total_weight() > 0.0 {
        iterations.get()
    } else {
        1
    };

    let run = |restart: usize| {
        let mut rng = restart_rng(seed, restart as u64);
        louvain_from_base(base.clone(), resolution, &mut rng)
    };
    let (first, rest): (Hierarchy, Vec<Hierarchy>) = rayon::join(
        || run(0),
        || (1..iterations).into_par_iter().map(&run).collect(),
    );

    let mut best = BestRun::new(first);
    for (restart, hierarchy) in (1..).zip(rest) {
        best.offer(restart, hierarchy);
    }
    Ok(best.hierarchy)
}

fn restarts(iterations: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(iterations).ok_or(Error::InvalidIterations)
}

/// Best hierarchy seen so far across restarts.
struct BestRun {
    hierarchy: Hierarchy,
    score: Score,
}

impl BestRun {
    fn new(first: Hierarchy) -> Self {
        let score = root_score(0, &first);
        BestRun {
            hierarchy: first,
            score,
        }
    }

    /// Keep `run` if its root beats the kept one.
    fn offer(&mut self, restart: usize, run: Hierarchy) {
        let score = root_score(restart, &run);
        if score.is_better_than(self.score) {
            self.hierarchy = run;
            self.score = score;
        }
    }

    /// An undefined root means the graph has no edge weight; further
    /// restarts on it cannot do better.
    fn is_final(&self) -> bool {
        !self.score.is_defined()
    }
}

fn root_score(restart: usize, run: &Hierarchy) -> Score {
    let score = run.score(run.root());
    log::debug!(
        "restart {restart}: {} levels, root score {score}",
        run.len()
    );
    score
}
