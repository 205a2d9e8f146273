//! Greedy Randomized Adaptive Search Procedure for facility placement.
//!
//! Each round builds a facility set with [`randomized_greedy`] and
//! refines it with swap local search; the best set by the evaluator is
//! kept. Rounds stop after the configured count or once
//! `early_stopping_rounds` consecutive rounds bring no strict improvement.
//!
//! Randomness is confined to the candidate-list pick, so a fixed seed
//! reproduces a run exactly.

mod config;

pub use config::GraspConfig;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constructive::randomized_greedy;
use crate::error::Result;
use crate::local_search::SwapSearch;
use crate::models::{Placement, PlacementProblem};
use crate::strategy::PlacementSolver;

const STRATEGY: &str = "grasp";

/// GRASP solver.
///
/// # Examples
///
/// ```
/// use u_facility::models::{GraphBuilder, Node, Objective, PlacementProblem};
/// use u_facility::distance::DistanceOracle;
/// use u_facility::grasp::{Grasp, GraspConfig};
/// use u_facility::strategy::PlacementSolver;
///
/// let mut builder = GraphBuilder::new();
/// for id in 0..8 {
///     builder.add_node(Node::new(id, 45.0, 7.0 + id as f64 * 0.1).unwrap());
/// }
/// for id in 0..7 {
///     builder.add_edge(id, id + 1, Some(1.0));
/// }
/// let graph = builder.build().unwrap();
/// let oracle = DistanceOracle::build(&graph).unwrap();
/// let problem = PlacementProblem::new(&graph, &oracle, 2, Objective::Average).unwrap();
///
/// let grasp = Grasp::new(GraspConfig::default().with_iterations(20));
/// let placement = grasp.solve(&problem).unwrap();
/// assert_eq!(placement.facilities().len(), 2);
/// assert!(placement.is_feasible());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grasp {
    config: GraspConfig,
}

impl Grasp {
    pub fn new(config: GraspConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GraspConfig {
        &self.config
    }

    /// Runs with a caller-supplied random source instead of the configured seed.
    pub fn solve_with_rng<R: Rng>(
        &self,
        problem: &PlacementProblem<'_>,
        rng: &mut R,
    ) -> Result<Placement> {
        self.solve_with_stats(problem, rng).map(|(placement, _)| placement)
    }

    /// Like [`solve_with_rng`](Self::solve_with_rng), also reporting how the
    /// run went.
    pub fn solve_with_stats<R: Rng>(
        &self,
        problem: &PlacementProblem<'_>,
        rng: &mut R,
    ) -> Result<(Placement, GraspStats)> {
        self.config.validate()?;
        let oracle = problem.oracle();
        let evaluator = problem.evaluator();
        let search = SwapSearch::new(oracle, problem.objective());
        let k = problem.effective_budget();
        info!(
            nodes = problem.num_nodes(),
            facilities = k,
            alpha = self.config.alpha,
            iterations = self.config.iterations,
            "grasp start"
        );

        let mut stats = GraspStats::default();
        // First round's set, reported if no round is feasible.
        let mut first: Option<Vec<usize>> = None;
        let mut best: Option<Vec<usize>> = None;
        let mut best_value = f64::INFINITY;
        let mut stale_rounds = 0;

        for iteration in 0..self.config.iterations {
            let mut facilities = randomized_greedy(oracle, k, self.config.alpha, rng);
            let moves = search.improve(&mut facilities, self.config.max_local_search_moves);
            let value = evaluator.value_at(&facilities);
            stats.rounds += 1;
            stats.local_search_moves += moves;

            if value < best_value {
                debug!(iteration, value, moves, "grasp improved");
                best_value = value;
                best = Some(facilities);
                stats.best_round = iteration;
                stale_rounds = 0;
            } else {
                if first.is_none() {
                    first = Some(facilities);
                }
                stale_rounds += 1;
            }

            if self.config.early_stopping_rounds > 0
                && stale_rounds >= self.config.early_stopping_rounds
            {
                debug!(iteration, "grasp stopped early");
                stats.stopped_early = true;
                break;
            }
        }

        let facilities = best.or(first).unwrap_or_default();
        let placement = problem.placement_at(&facilities, STRATEGY);
        info!(value = placement.value(), rounds = stats.rounds, "grasp done");
        Ok((placement, stats))
    }
}

/// Counters from one GRASP run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraspStats {
    /// Construction + local search rounds executed.
    pub rounds: usize,
    /// Round (0-based) that produced the reported set.
    pub best_round: usize,
    /// Swaps applied over all local searches.
    pub local_search_moves: usize,
    /// Whether the run ended on the stale-round limit.
    pub stopped_early: bool,
}

impl PlacementSolver for Grasp {
    fn name(&self) -> &str {
        STRATEGY
    }

    fn solve(&self, problem: &PlacementProblem<'_>) -> Result<Placement> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.solve_with_rng(problem, &mut rng)
    }
}
