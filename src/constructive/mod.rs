//! Constructive heuristics for initial facility sets.
//!
//! - [`randomized_greedy`] — GRASP construction over a restricted candidate list

mod randomized_greedy;

pub use randomized_greedy::{randomized_greedy, rcl_size};
