use std::time::Instant;

use tracing::info_span;

use crate::assembly;
use crate::config::constant::MIN_MATRIX_BUILD_CONCURRENCY;
use crate::construct;
use crate::cost::{CostEstimator, SolveContext};
use crate::domain::{Problem, Solution};
use crate::error::SolverError;
use crate::geo::Point;
use crate::matrix::CostMatrix;

/// Builds the cost matrix, runs sequential construction, and assembles the
/// public solution, timing the whole call with a wall clock that feeds
/// `Metrics::wall_clock_solve_time`. Cancellation is checked at every
/// vehicle and request boundary inside `construct`, and before the matrix
/// build itself starts.
pub fn solve(
    problem: &Problem,
    estimator: &dyn CostEstimator,
    ctx: &SolveContext,
) -> Result<Solution, SolverError> {
    let start = Instant::now();
    ctx.check()?;

    if problem.requests.is_empty() {
        return assembly::assemble(
            construct::ConstructionResult {
                assigned: Vec::new(),
                unassigned: Vec::new(),
            },
            &CostMatrix::empty(),
            start.elapsed(),
        );
    }

    let asset_points: Vec<Point> = problem.fleet.iter().map(|a| a.location).collect();
    let request_points: Vec<Point> = problem
        .requests
        .iter()
        .flat_map(|r| [r.pick_up, r.drop_off])
        .collect();

    let concurrency = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(MIN_MATRIX_BUILD_CONCURRENCY);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency)
        .build()
        .map_err(|e| SolverError::AlgorithmFailed(e.to_string()))?;

    let matrix = {
        let _span = info_span!("matrix_build", concurrency).entered();
        pool.install(|| CostMatrix::build(&asset_points, &request_points, estimator, ctx))?
    };

    let construction = {
        let _span = info_span!(
            "construct",
            fleet_size = problem.fleet.len(),
            request_count = problem.requests.len()
        )
        .entered();
        construct::construct(problem, &matrix, ctx)?
    };

    let wall_clock = start.elapsed();
    assembly::assemble(construction, &matrix, wall_clock)
}
