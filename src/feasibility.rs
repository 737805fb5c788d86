use crate::config::constant::{
    COST_WEIGHT_CAPACITY_VIOLATIONS, COST_WEIGHT_DURATION, COST_WEIGHT_TIME_WINDOW_VIOLATIONS,
};
use crate::domain::Route;
use crate::error::SolverError;
use crate::matrix::CostMatrix;
use crate::route_estimator;

/// Count of positions at which the running load exceeds `capacity`. A
/// route that never exceeds capacity scores 0.
pub fn capacity_violations(route: &Route, capacity: u32) -> u32 {
    let mut running_load: i64 = 0;
    let mut violations = 0;
    for stop in route.stops() {
        running_load += stop.load_delta;
        if running_load > capacity as i64 {
            violations += 1;
        }
    }
    violations
}

/// Count of non-start stops whose cumulative elapsed time since leaving
/// the depot exceeds their `service_deadline`. Elapsed time accumulates
/// leg by leg through the matrix, so an early violation compounds into
/// every later stop's arrival time — the reference's cumulative-from-depot
/// semantics.
pub fn time_window_violations(route: &Route, matrix: &CostMatrix) -> Result<u32, SolverError> {
    let points = route.points();
    let estimation = route_estimator::estimate(&points, matrix)?;

    let mut violations = 0;
    let mut elapsed = std::time::Duration::ZERO;
    for (leg, stop) in estimation.legs.iter().zip(route.stops().iter().skip(1)) {
        elapsed += leg.duration;
        if elapsed > stop.service_deadline {
            violations += 1;
        }
    }
    Ok(violations)
}

/// The weighted cost function F(r) = w1*D + w2*TWV + w3*CV, with `D` in
/// minutes and TWV/CV as violation *counts* (not violation magnitude),
/// per the literature weights (0.201, 0.7, 0.0992). Deliberately left
/// un-normalized: the reference's `normalize`/`smallest`/`biggest` scaling
/// is an acknowledged defect of the original, not reproduced here (see
/// DESIGN.md).
pub fn cost(route: &Route, capacity: u32, matrix: &CostMatrix) -> Result<f64, SolverError> {
    let points = route.points();
    let estimation = route_estimator::estimate(&points, matrix)?;
    let duration_minutes = estimation.total_duration.as_secs_f64() / 60.0;
    let twv = time_window_violations(route, matrix)?;
    let cv = capacity_violations(route, capacity);

    Ok(COST_WEIGHT_DURATION * duration_minutes
        + COST_WEIGHT_TIME_WINDOW_VIOLATIONS * twv as f64
        + COST_WEIGHT_CAPACITY_VIOLATIONS * cv as f64)
}

/// A route is feasible when it violates neither capacity nor time windows.
pub fn is_feasible(route: &Route, capacity: u32, matrix: &CostMatrix) -> Result<bool, SolverError> {
    Ok(capacity_violations(route, capacity) == 0 && time_window_violations(route, matrix)? == 0)
}
