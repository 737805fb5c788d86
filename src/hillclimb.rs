use crate::domain::Route;
use crate::error::SolverError;
use crate::feasibility;
use crate::matrix::CostMatrix;

/// Local search over a single route: a single O(n^2) pass that swaps two
/// interior stops (never the Start stop at index 0) when doing so both
/// keeps every pick-up ahead of its drop-off and strictly lowers the
/// weighted cost. Candidate swaps are tried on a scratch clone and only
/// committed to `route` once both checks pass, so a rejected swap never
/// mutates the route in place. Bounded by O(n^2) swap trials per call — no
/// restart once the double loop finishes.
///
/// Candidates are limited to pairs whose `service_deadline`s are out of
/// order — a stop with a later deadline sitting ahead of one with an
/// earlier deadline is exactly the shape a swap can improve.
pub fn improve(route: &mut Route, capacity: u32, matrix: &CostMatrix) -> Result<(), SolverError> {
    let len = route.len();
    for i in 1..len {
        for j in (i + 1)..len {
            if route.stops()[i].service_deadline <= route.stops()[j].service_deadline {
                continue;
            }
            if !route.swap_keeps_precedence(i, j) {
                continue;
            }

            let current_cost = feasibility::cost(route, capacity, matrix)?;
            let mut candidate = route.clone();
            candidate.swap(i, j);
            let candidate_cost = feasibility::cost(&candidate, capacity, matrix)?;

            if candidate_cost < current_cost {
                *route = candidate;
            }
        }
    }
    Ok(())
}
