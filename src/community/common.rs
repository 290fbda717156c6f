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

//! Common utilities for the community detection modules.
//!
//! Randomness is always injected: every routine that shuffles or breaks
//! ties takes the caller's RNG, so a fixed seed reproduces a run exactly.

use rand::prelude::*;
use rand_pcg::Pcg64;

// ============================================================================
// RNG Utilities
// ============================================================================

/// RNG used when the crate builds its own random stream.
pub type CommunityRng = Pcg64;

/// Build RNG from optional seed.
///
/// If seed is provided, creates a deterministic RNG seeded with that value.
/// Otherwise, creates an RNG seeded from the operating system's entropy source.
#[inline]
pub fn build_rng(seed: Option<u64>) -> CommunityRng {
    match seed {
        Some(s) => Pcg64::seed_from_u64(s),
        None => Pcg64::from_os_rng(),
    }
}

/// Independent stream for one Louvain restart.
///
/// The state is drawn from a generator seeded with `seed`; the restart index
/// selects the PCG stream, so restarts never share a sequence and the stream
/// of restart `i` does not depend on how many other restarts run.
#[inline]
pub fn restart_rng(seed: u64, restart: u64) -> CommunityRng {
    let mut master = Pcg64::seed_from_u64(seed);
    let state: u128 = master.random();
    Pcg64::new(state, u128::from(restart))
}

/// Shuffle a slice of node indices in-place using the provided RNG.
#[inline]
pub(crate) fn shuffle_nodes<R: Rng + ?Sized>(rng: &mut R, nodes: &mut [usize]) {
    nodes.shuffle(rng);
}

/// Choose a random element from a slice of candidates.
///
/// A single candidate is returned without drawing from the RNG.
///
/// # Panics
/// Panics in debug mode if candidates is empty.
#[inline]
pub(crate) fn choose_random<R: Rng + ?Sized>(rng: &mut R, candidates: &[usize]) -> usize {
    debug_assert!(!candidates.is_empty());
    if candidates.len() == 1 {
        return candidates[0];
    }
    let idx = rng.random_range(0..candidates.len());
    candidates[idx]
}

// ============================================================================
// Label/Community Grouping
// ============================================================================

/// Group nodes by their labels into communities.
///
/// `labels[i]` is the community of node `i` and labels are contiguous in
/// `0..count`. Community `c` of the result holds its nodes in ascending order.
#[inline]
pub(crate) fn group_by_labels(labels: &[usize], count: usize) -> Vec<Vec<usize>> {
    let mut comms: Vec<Vec<usize>> = vec![Vec::new(); count];
    for (node, &label) in labels.iter().enumerate() {
        comms[label].push(node);
    }
    comms
}

/// Sort communities by their minimum node for an order that does not depend
/// on how the communities were numbered.
#[inline]
pub(crate) fn canonical_order(mut communities: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    for comm in &mut communities {
        comm.sort_unstable();
    }
    communities.sort_by_key(|comm| comm.first().copied().unwrap_or(usize::MAX));
    communities
}
