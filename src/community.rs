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

//! Louvain community detection and modularity scoring.

mod common;
mod hierarchy;
mod local_move;
mod louvain;
mod modularity;
mod profile;
mod reduce;

pub use common::{build_rng, restart_rng, CommunityRng};
pub use hierarchy::{Hierarchy, LevelId};
pub use louvain::{louvain, run_louvain, run_louvain_par};
pub use modularity::{modularity, Score};
pub use profile::{resolution_profile, Interval};
pub use reduce::ReducedGraph;
