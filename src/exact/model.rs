//! Row-oriented MIP formulations handed to HiGHS.
//!
//! Costs are service distances `d(i, j)` from facility `i` to node `j`.
//! Unreachable pairs get a finite penalty larger than any feasible total so
//! the model stays well-formed.

use std::time::Instant;

use highs::{Col, HighsModelStatus, RowProblem, Sense, SolvedModel};
use tracing::debug;

use crate::distance::DistanceOracle;
use crate::error::{Error, Result};

/// Finite cost matrix over the oracle, row-major by facility.
pub(crate) struct CostMatrix {
    costs: Vec<f64>,
    size: usize,
}

impl CostMatrix {
    pub(crate) fn new(oracle: &DistanceOracle) -> Self {
        let size = oracle.len();
        let mut costs = Vec::with_capacity(size * size);
        let mut finite_total = 0.0;
        for i in 0..size {
            for j in 0..size {
                let d = oracle.distance_at(i, j);
                if d.is_finite() {
                    finite_total += d;
                }
                costs.push(d);
            }
        }
        let penalty = 1.0 + finite_total;
        for c in costs.iter_mut().filter(|c| !c.is_finite()) {
            *c = penalty;
        }
        Self { costs, size }
    }

    pub(crate) fn get(&self, i: usize, j: usize) -> f64 {
        self.costs[i * self.size + j]
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }
}

/// Facility-selection program minimizing the mean service cost.
pub(crate) struct AssignmentModel {
    pub(crate) problem: RowProblem,
    pub(crate) facility_cols: Vec<Col>,
}

/// x_i, y_ij binary; y_ij <= x_i; sum_i y_ij = 1; sum_i x_i <= budget.
///
/// With `exclusive`, y_ij + y_ji + x_i + x_j <= 2 for i < j.
pub(crate) fn assignment_model(costs: &CostMatrix, budget: usize, exclusive: bool) -> AssignmentModel {
    let n = costs.size();
    let scale = 1.0 / n as f64;
    let mut pb = RowProblem::new();

    let x: Vec<Col> = (0..n).map(|_| pb.add_integer_column(0.0, 0.0..=1.0)).collect();
    let y: Vec<Col> = (0..n * n)
        .map(|k| pb.add_integer_column(scale * costs.get(k / n, k % n), 0.0..=1.0))
        .collect();

    for i in 0..n {
        for j in 0..n {
            pb.add_row(..=0.0, vec![(y[i * n + j], 1.0), (x[i], -1.0)]);
        }
    }
    for j in 0..n {
        let terms: Vec<(Col, f64)> = (0..n).map(|i| (y[i * n + j], 1.0)).collect();
        pb.add_row(1.0..=1.0, terms);
    }
    let terms: Vec<(Col, f64)> = x.iter().map(|&c| (c, 1.0)).collect();
    pb.add_row(..=budget as f64, terms);

    if exclusive {
        for i in 0..n {
            for j in (i + 1)..n {
                let terms = vec![
                    (y[i * n + j], 1.0),
                    (y[j * n + i], 1.0),
                    (x[i], 1.0),
                    (x[j], 1.0),
                ];
                pb.add_row(..=2.0, terms);
            }
        }
    }

    AssignmentModel {
        problem: pb,
        facility_cols: x,
    }
}

/// Worst-case program over a fixed facility set: minimize z subject to
/// z >= d(i, j) * y_ij and sum_i y_ij = 1.
pub(crate) fn bottleneck_model(costs: &CostMatrix, facilities: &[usize]) -> RowProblem {
    let n = costs.size();
    let mut pb = RowProblem::new();
    let z = pb.add_column(1.0, 0.0..);
    let y: Vec<Vec<Col>> = facilities
        .iter()
        .map(|_| (0..n).map(|_| pb.add_integer_column(0.0, 0.0..=1.0)).collect())
        .collect();

    for j in 0..n {
        let terms: Vec<(Col, f64)> = y.iter().map(|row| (row[j], 1.0)).collect();
        pb.add_row(1.0..=1.0, terms);
    }
    for (row, &i) in y.iter().zip(facilities) {
        for j in 0..n {
            pb.add_row(0.0.., vec![(z, 1.0), (row[j], -costs.get(i, j))]);
        }
    }
    pb
}

/// Wall-clock budget shared by every engine pass of one solve.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    limit: Option<f64>,
    start: Instant,
}

impl Deadline {
    pub(crate) fn start(limit: Option<f64>) -> Self {
        Self {
            limit,
            start: Instant::now(),
        }
    }

    pub(crate) fn limit(&self) -> Option<f64> {
        self.limit
    }

    /// Seconds left for the next pass; `None` when unlimited.
    pub(crate) fn remaining(&self) -> Result<Option<f64>> {
        let Some(limit) = self.limit else {
            return Ok(None);
        };
        let left = limit - self.start.elapsed().as_secs_f64();
        if left <= 0.0 {
            return Err(Error::SolverTimeLimit { seconds: limit });
        }
        Ok(Some(left))
    }
}

/// Solves a minimization within what is left of `deadline`, mapping engine
/// outcomes onto crate errors.
pub(crate) fn minimise(problem: RowProblem, deadline: &Deadline, pass: &str) -> Result<SolvedModel> {
    let remaining = deadline.remaining()?;
    let mut model = problem.optimise(Sense::Minimise);
    model.make_quiet();
    if let Some(seconds) = remaining {
        model.set_option("time_limit", seconds);
    }
    let solved = model
        .try_solve()
        .map_err(|status| Error::solver(format!("{pass}: HiGHS returned {status:?}")))?;
    let status = solved.status();
    debug!(pass, ?status, ?remaining, "engine finished");
    check_status(status, deadline.limit(), pass)?;
    Ok(solved)
}

pub(crate) fn check_status(status: HighsModelStatus, time_limit: Option<f64>, pass: &str) -> Result<()> {
    match status {
        HighsModelStatus::Optimal | HighsModelStatus::ModelEmpty => Ok(()),
        HighsModelStatus::Infeasible => Err(Error::SolverInfeasible),
        HighsModelStatus::ReachedTimeLimit => Err(Error::SolverTimeLimit {
            seconds: time_limit.unwrap_or(f64::INFINITY),
        }),
        other => Err(Error::solver(format!("{pass}: model status {other:?}"))),
    }
}
