use std::collections::HashMap;

use rayon::prelude::*;

use crate::cost::{Cost, CostEstimator, SolveContext};
use crate::error::SolverError;
use crate::geo::Point;

/// A dense pairwise travel-cost table over the union of asset depots and
/// request pick-up/drop-off points. Built once per solve and never
/// mutated afterward — every lookup during construction and hill-climbing
/// goes through `get`, never back to the estimator.
pub struct CostMatrix {
    points: Vec<Point>,
    costs: HashMap<(Point, Point), Cost>,
}

impl CostMatrix {
    /// An empty matrix with no points and no entries, for the zero-request
    /// short-circuit in `solver::solve` where there is nothing to assemble
    /// and no reason to impose the asset/request preconditions of `build`.
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            costs: HashMap::new(),
        }
    }

    /// Fans out `points.len()^2` lookups across rayon's global thread pool
    /// (sized to at least `MIN_MATRIX_BUILD_CONCURRENCY` by the caller's
    /// pool construction), collecting rather than short-circuiting on
    /// failure so a single unreachable pair doesn't hide the rest. Any
    /// failures are reported together as `MatrixBuildFailed`.
    pub fn build(
        assets: &[Point],
        requests: &[Point],
        estimator: &dyn CostEstimator,
        ctx: &SolveContext,
    ) -> Result<Self, SolverError> {
        if assets.is_empty() {
            return Err(SolverError::InvalidInput("at least one asset is required"));
        }
        if requests.is_empty() {
            return Err(SolverError::InvalidInput(
                "at least one request is required",
            ));
        }

        let mut points: Vec<Point> = Vec::with_capacity(assets.len() + requests.len());
        points.extend_from_slice(assets);
        points.extend_from_slice(requests);
        points.dedup_by(|a, b| a == b);
        points.sort_by(|a, b| a.lat.total_cmp(&b.lat).then(a.lon.total_cmp(&b.lon)));
        points.dedup();

        let pairs: Vec<(Point, Point)> = points
            .iter()
            .flat_map(|&from| points.iter().map(move |&to| (from, to)))
            .collect();

        let results: Vec<Result<((Point, Point), Cost), SolverError>> = pairs
            .par_iter()
            .map(|&(from, to)| {
                ctx.check()?;
                estimator.cost(ctx, from, to).map(|c| ((from, to), c))
            })
            .collect();

        let mut costs = HashMap::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok((pair, cost)) => {
                    costs.insert(pair, cost);
                }
                Err(e) => failures.push(e),
            }
        }

        if !failures.is_empty() {
            return Err(SolverError::MatrixBuildFailed(failures));
        }

        Ok(Self { points, costs })
    }

    /// Looks up the precomputed cost between two points already present
    /// in the matrix. Never calls the estimator.
    pub fn get(&self, from: Point, to: Point) -> Result<Cost, SolverError> {
        self.costs
            .get(&(from, to))
            .copied()
            .ok_or(SolverError::PointOutsideMatrix)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}
