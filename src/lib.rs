// Licensed under the Apache License, Version 2.0 (the "License"); you may
// not use this file except in compliance with the License. You may obtain
// a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations
// under the License.

//! Hierarchical Louvain community detection for weighted graphs.
//!
//! The crate scores partitions by modularity and builds multilevel
//! community hierarchies with the Louvain method, for directed and
//! undirected graphs alike. Graphs are read through the [`WeightedGraph`]
//! trait, which petgraph's [`Graph`](petgraph::graph::Graph) implements.
//!
//! ```
//! use louvain_hierarchy::community::{build_rng, run_louvain};
//! use petgraph::graph::UnGraph;
//!
//! let g = UnGraph::<(), f64>::from_edges([
//!     (0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0),
//!     (3, 4, 1.0), (4, 5, 1.0), (5, 3, 1.0),
//!     (2, 3, 1.0),
//! ]);
//! let mut rng = build_rng(Some(1));
//! let hierarchy = run_louvain(&g, 1.0, &mut rng, 5)?;
//! assert_eq!(
//!     hierarchy.communities(hierarchy.root()),
//!     vec![vec![0, 1, 2], vec![3, 4, 5]]
//! );
//! # Ok::<(), louvain_hierarchy::Error>(())
//! ```
//!
//! Randomness is always supplied by the caller. The same seed gives the
//! same hierarchy.

pub mod community;
pub mod config;
pub mod error;
pub mod graph;

pub use community::{run_louvain, run_louvain_par, Hierarchy, Score};
pub use config::{LouvainConfig, ProfileConfig};
pub use error::{Error, Result};
pub use graph::{Orientation, WeightedGraph};
