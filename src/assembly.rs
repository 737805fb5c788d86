use std::time::Duration;

use crate::construct::{AssignedRoute, ConstructionResult};
use crate::domain::{Metrics, Solution, SolutionRoute, Waypoint};
use crate::error::SolverError;
use crate::matrix::CostMatrix;
use crate::route_estimator;

/// Collapses a route's stop-by-stop walk into public waypoints: a run of
/// consecutive stops sharing one point (e.g. two pick-ups at the same
/// curb) becomes a single waypoint carrying every activity at that stop.
fn assemble_route(assigned: AssignedRoute, matrix: &CostMatrix) -> Result<SolutionRoute, SolverError> {
    let stops = assigned.route.stops();
    let mut waypoints: Vec<Waypoint> = Vec::new();
    let mut running_load: i64 = 0;

    for stop in stops {
        running_load += stop.load_delta;
        match waypoints.last_mut() {
            Some(last) if last.location == stop.point => {
                last.load_after = running_load;
                last.activities.push((stop.activity, stop.r#ref.clone()));
            }
            _ => waypoints.push(Waypoint {
                location: stop.point,
                load_after: running_load,
                activities: vec![(stop.activity, stop.r#ref.clone())],
            }),
        }
    }

    let points = assigned.route.points();
    let estimation = route_estimator::estimate(&points, matrix)?;

    Ok(SolutionRoute {
        asset: assigned.asset,
        requests: assigned.requests,
        waypoints,
        duration: estimation.total_duration,
        distance: estimation.total_distance,
    })
}

/// Turns a construction result into the public `Solution`, rolling up
/// per-route totals into the aggregate `Metrics`.
pub fn assemble(
    construction: ConstructionResult,
    matrix: &CostMatrix,
    wall_clock_solve_time: Duration,
) -> Result<Solution, SolverError> {
    let num_unassigned = construction.unassigned.len();
    let mut routes = Vec::with_capacity(construction.assigned.len());
    let mut total_duration = Duration::ZERO;
    let mut total_distance = 0.0;
    let mut num_requests_assigned = 0;

    for assigned in construction.assigned {
        num_requests_assigned += assigned.requests.len();
        let route = assemble_route(assigned, matrix)?;
        total_duration += route.duration;
        total_distance += route.distance;
        routes.push(route);
    }

    let metrics = Metrics {
        num_assets_used: routes.len(),
        num_requests_assigned,
        num_unassigned,
        total_duration,
        total_distance,
        wall_clock_solve_time,
    };

    Ok(Solution {
        metrics,
        routes,
        unassigned: construction.unassigned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{HaversineEstimator, SolveContext};
    use crate::domain::{Asset, Request, Route, Stop};
    use crate::geo::Point;

    #[test]
    fn consecutive_stops_at_the_same_point_collapse_into_one_waypoint() {
        let estimator = HaversineEstimator::new(80.0);
        let ctx = SolveContext::new();
        let depot = Point::new(0.0, 0.0);
        let shared = Point::new(1.0, 1.0);
        let dropoff = Point::new(2.0, 2.0);
        let matrix = CostMatrix::build(&[depot], &[shared, dropoff], &estimator, &ctx).unwrap();

        let asset = Asset {
            asset_id: "v1".into(),
            location: depot,
            capacity: 10,
        };
        let mut route = Route::new(asset.asset_id.clone(), depot);
        let r1 = Request::new("r1", shared, dropoff, 1);
        let r2 = Request::new("r2", shared, dropoff, 1);
        route.push(Stop::pick_up(&r1));
        route.push(Stop::pick_up(&r2));
        route.push(Stop::drop_off(&r1));
        route.push(Stop::drop_off(&r2));

        let assigned = AssignedRoute {
            asset,
            route,
            requests: vec![r1, r2],
        };
        let solution_route = assemble_route(assigned, &matrix).unwrap();

        // Start@depot, PickUp+PickUp@shared, DropOff+DropOff@dropoff = 3 waypoints.
        assert_eq!(solution_route.waypoints.len(), 3);
        assert_eq!(solution_route.waypoints[1].activities.len(), 2);
        assert_eq!(solution_route.waypoints[2].activities.len(), 2);
    }

    #[test]
    fn metrics_roll_up_across_routes_and_unassigned() {
        let construction = ConstructionResult {
            assigned: Vec::new(),
            unassigned: vec![Request::new(
                "r1",
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                1,
            )],
        };
        let estimator = HaversineEstimator::new(80.0);
        let ctx = SolveContext::new();
        let matrix = CostMatrix::build(
            &[Point::new(0.0, 0.0)],
            &[Point::new(1.0, 1.0)],
            &estimator,
            &ctx,
        )
        .unwrap();

        let solution = assemble(construction, &matrix, Duration::from_millis(5)).unwrap();
        assert_eq!(solution.metrics.num_assets_used, 0);
        assert_eq!(solution.metrics.num_unassigned, 1);
        assert_eq!(solution.metrics.wall_clock_solve_time, Duration::from_millis(5));
    }
}
