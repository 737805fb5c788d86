use std::time::Duration;

use crate::cost::SolveContext;
use crate::domain::{Asset, Constraints, Problem, Request, Route, Stop};
use crate::error::SolverError;
use crate::feasibility;
use crate::hillclimb;
use crate::matrix::CostMatrix;

/// One vehicle's finished route together with the requests it carries,
/// in the order they were committed.
pub struct AssignedRoute {
    pub asset: Asset,
    pub route: Route,
    pub requests: Vec<Request>,
}

pub struct ConstructionResult {
    pub assigned: Vec<AssignedRoute>,
    pub unassigned: Vec<Request>,
}

/// Cumulative-from-depot deadlines: a request's drop-off deadline is
/// measured from the vehicle leaving the depot, not from its own
/// pick-up, so it stacks with whatever else that vehicle does first
/// (matching `feasibility`'s elapsed-time accounting).
fn compute_deadlines(
    request: &Request,
    asset: &Asset,
    matrix: &CostMatrix,
    constraints: &Constraints,
) -> Result<(Duration, Duration), SolverError> {
    let to_pickup = matrix.get(asset.location, request.pick_up)?.duration;
    let pickup_to_dropoff = matrix.get(request.pick_up, request.drop_off)?.duration;

    let factor = constraints.max_journey_time_factor;
    let pick_up_deadline = to_pickup.mul_f64(factor);
    let drop_off_deadline = (to_pickup + pickup_to_dropoff).mul_f64(factor);

    Ok((pick_up_deadline, drop_off_deadline))
}

/// The sequential construction heuristic (Hosny & Mumford, 2012): vehicles
/// are tried largest-capacity first, and before each vehicle's pass,
/// pending requests are re-sorted farthest-drop-off-from-that-vehicle's-
/// depot-first. Each request is tentatively appended, the route is locally
/// improved, and the request is kept only if the improved route is
/// feasible; otherwise it rolls back to the next vehicle.
pub fn construct(
    problem: &Problem,
    matrix: &CostMatrix,
    ctx: &SolveContext,
) -> Result<ConstructionResult, SolverError> {
    let mut vehicles = problem.fleet.clone();
    vehicles.sort_by(|a, b| b.capacity.cmp(&a.capacity));

    let mut pending: Vec<Request> = problem.requests.clone();

    let mut assigned = Vec::new();

    for asset in vehicles {
        ctx.check()?;

        let mut keyed: Vec<(f64, Request)> = pending
            .drain(..)
            .map(|r| {
                let key = matrix
                    .get(asset.location, r.drop_off)
                    .map(|c| c.distance_m)
                    .unwrap_or(0.0);
                (key, r)
            })
            .collect();
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
        pending = keyed.into_iter().map(|(_, r)| r).collect();

        let mut route = Route::new(asset.asset_id.clone(), asset.location);
        let mut carried = Vec::new();
        let mut still_pending = Vec::new();

        for mut request in pending.drain(..) {
            ctx.check()?;

            let (pick_up_deadline, drop_off_deadline) =
                compute_deadlines(&request, &asset, matrix, &problem.constraints)?;
            request.pick_up_deadline = pick_up_deadline;
            request.drop_off_deadline = drop_off_deadline;

            route.push(Stop::pick_up(&request));
            route.push(Stop::drop_off(&request));

            hillclimb::improve(&mut route, asset.capacity, matrix)?;

            if feasibility::is_feasible(&route, asset.capacity, matrix)? {
                carried.push(request);
            } else {
                route.remove_by_ref(&request.request_id);
                still_pending.push(request);
            }
        }

        pending = still_pending;
        if !carried.is_empty() {
            assigned.push(AssignedRoute {
                asset,
                route,
                requests: carried,
            });
        }
    }

    Ok(ConstructionResult {
        assigned,
        unassigned: pending,
    })
}
