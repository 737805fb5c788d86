use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geo::Point;

/// A vehicle: depot location and capacity, immutable during solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub asset_id: String,
    pub location: Point,
    pub capacity: u32,
}

/// Multiplier applied to direct travel time to compute per-request
/// deadlines; smaller is stricter, must be >= 1.0.
#[derive(Debug, Clone, Copy)]
pub struct Constraints {
    pub max_journey_time_factor: f64,
}

/// A transport order. `pick_up_deadline`/`drop_off_deadline` are derived
/// state: the caller supplies only load and the two points, and the
/// solver populates the deadlines once a vehicle considers the request
/// (see `construct::compute_deadlines`).
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub request_id: String,
    pub pick_up: Point,
    pub drop_off: Point,
    pub load: u32,
    pub pick_up_deadline: Duration,
    pub drop_off_deadline: Duration,
}

impl Request {
    pub fn new(request_id: impl Into<String>, pick_up: Point, drop_off: Point, load: u32) -> Self {
        Self {
            request_id: request_id.into(),
            pick_up,
            drop_off,
            load,
            pick_up_deadline: Duration::ZERO,
            drop_off_deadline: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Problem {
    pub fleet: Vec<Asset>,
    pub requests: Vec<Request>,
    pub constraints: Constraints,
}

/// Wire-exact activity-type enumeration (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    Start,
    PickUp,
    DropOff,
}

/// An atomic route event: start at depot, pick up, or drop off.
/// `ref` carries the owning request's id (or the asset's id for Start)
/// rather than a back-pointer, so the route buffer never aliases the
/// request table (spec.md §9, "re-architected source patterns").
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub r#ref: String,
    pub point: Point,
    pub service_deadline: Duration,
    pub load_delta: i64,
    pub activity: ActivityType,
}

impl Stop {
    pub fn start(asset_ref: impl Into<String>, point: Point) -> Self {
        Self {
            r#ref: asset_ref.into(),
            point,
            service_deadline: Duration::ZERO,
            load_delta: 0,
            activity: ActivityType::Start,
        }
    }

    pub fn pick_up(request: &Request) -> Self {
        Self {
            r#ref: request.request_id.clone(),
            point: request.pick_up,
            service_deadline: request.pick_up_deadline,
            load_delta: request.load as i64,
            activity: ActivityType::PickUp,
        }
    }

    pub fn drop_off(request: &Request) -> Self {
        Self {
            r#ref: request.request_id.clone(),
            point: request.drop_off,
            service_deadline: request.drop_off_deadline,
            load_delta: -(request.load as i64),
            activity: ActivityType::DropOff,
        }
    }
}

/// The mutable per-vehicle route buffer. Position 0 is always a Start
/// stop at the vehicle's depot. Owned end to end — never shared with the
/// request table, so swaps and removals never alias other state.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    stops: Vec<Stop>,
}

impl Route {
    pub fn new(asset_ref: impl Into<String>, depot: Point) -> Self {
        Self {
            stops: vec![Stop::start(asset_ref, depot)],
        }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn push(&mut self, stop: Stop) {
        self.stops.push(stop);
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        self.stops.swap(i, j);
    }

    /// All points visited, in order, including repeats.
    pub fn points(&self) -> Vec<Point> {
        self.stops.iter().map(|s| s.point).collect()
    }

    /// Removes every stop whose ref equals `request_id`, i.e. the rollback
    /// of a tentative insertion (spec.md §4.4 step 2c). Never touches the
    /// Start stop, whose ref is the asset id.
    pub fn remove_by_ref(&mut self, request_id: &str) {
        self.stops.retain(|s| s.r#ref != request_id);
    }

    /// The running load just before position `i` would be inserted, i.e.
    /// sum of `load_delta` over `[0, i)`. Used by the hill-climbing
    /// precedence guard.
    fn position_of_pickup(&self, request_id: &str) -> Option<usize> {
        self.stops
            .iter()
            .position(|s| s.r#ref == request_id && s.activity == ActivityType::PickUp)
    }

    fn position_of_dropoff(&self, request_id: &str) -> Option<usize> {
        self.stops
            .iter()
            .position(|s| s.r#ref == request_id && s.activity == ActivityType::DropOff)
    }

    /// True if, for every request with both a PickUp and a DropOff present,
    /// the PickUp occurs strictly before the DropOff. Used as the swap
    /// guard in the hill-climbing improver (spec.md §4.5 caveat).
    pub fn swap_keeps_precedence(&self, i: usize, j: usize) -> bool {
        let mut candidate = self.clone();
        candidate.swap(i, j);
        candidate.stops.iter().enumerate().all(|(_, stop)| {
            if stop.activity != ActivityType::PickUp {
                return true;
            }
            match (
                candidate.position_of_pickup(&stop.r#ref),
                candidate.position_of_dropoff(&stop.r#ref),
            ) {
                (Some(p), Some(d)) => p < d,
                _ => true,
            }
        })
    }
}

/// A collapsed, public-facing point carrying one or more activities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    pub location: Point,
    pub load_after: i64,
    pub activities: Vec<(ActivityType, String)>,
}

#[derive(Debug, Clone)]
pub struct SolutionRoute {
    pub asset: Asset,
    pub requests: Vec<Request>,
    pub waypoints: Vec<Waypoint>,
    pub duration: Duration,
    pub distance: f64,
}

#[derive(Debug, Clone)]
pub struct Metrics {
    pub num_assets_used: usize,
    pub num_requests_assigned: usize,
    pub num_unassigned: usize,
    pub total_duration: Duration,
    pub total_distance: f64,
    pub wall_clock_solve_time: Duration,
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub metrics: Metrics,
    pub routes: Vec<SolutionRoute>,
    pub unassigned: Vec<Request>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(id: &str, load: u32) -> Request {
        Request::new(id, Point::new(0.0, 0.0), Point::new(1.0, 1.0), load)
    }

    #[test]
    fn new_route_starts_with_start_stop_at_depot() {
        let depot = Point::new(43.3475, -8.206389);
        let route = Route::new("v1", depot);
        assert_eq!(route.len(), 1);
        assert_eq!(route.stops()[0].activity, ActivityType::Start);
        assert_eq!(route.stops()[0].point, depot);
    }

    #[test]
    fn remove_by_ref_drops_both_pickup_and_dropoff() {
        let depot = Point::new(0.0, 0.0);
        let mut route = Route::new("v1", depot);
        let r = req("r1", 3);
        route.push(Stop::pick_up(&r));
        route.push(Stop::drop_off(&r));
        assert_eq!(route.len(), 3);
        route.remove_by_ref("r1");
        assert_eq!(route.len(), 1);
    }

    #[test]
    fn swap_keeps_precedence_rejects_inversion() {
        let depot = Point::new(0.0, 0.0);
        let mut route = Route::new("v1", depot);
        let r = req("r1", 1);
        route.push(Stop::pick_up(&r));
        route.push(Stop::drop_off(&r));
        // Swapping positions 1 and 2 would place DropOff before PickUp.
        assert!(!route.swap_keeps_precedence(1, 2));
    }

    #[test]
    fn swap_keeps_precedence_allows_unrelated_swap() {
        let depot = Point::new(0.0, 0.0);
        let mut route = Route::new("v1", depot);
        let r1 = req("r1", 1);
        let r2 = req("r2", 1);
        route.push(Stop::pick_up(&r1));
        route.push(Stop::pick_up(&r2));
        route.push(Stop::drop_off(&r1));
        route.push(Stop::drop_off(&r2));
        // Swapping the two pickups (positions 1, 2) keeps both orderings valid.
        assert!(route.swap_keeps_precedence(1, 2));
    }
}
