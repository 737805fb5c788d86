use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Asset, Constraints, Problem, Request, Solution};
use crate::error::SolverError;
use crate::geo::Point;

/// Wire shape for a vehicle. Deliberately thinner than `Asset` would need
/// to be internally — there's nothing server-computed on an asset, so the
/// two happen to carry the same fields, but they stay separate types so a
/// wire format change never forces a domain type change.
#[derive(Debug, Deserialize)]
pub struct AssetDto {
    pub asset_id: String,
    pub location: Point,
    pub capacity: u32,
}

impl From<AssetDto> for Asset {
    fn from(dto: AssetDto) -> Self {
        Asset {
            asset_id: dto.asset_id,
            location: dto.location,
            capacity: dto.capacity,
        }
    }
}

/// Wire shape for a request. Notably omits `pick_up_deadline` and
/// `drop_off_deadline` — those are derived by the solver, never supplied
/// by a caller.
#[derive(Debug, Deserialize)]
pub struct RequestDto {
    pub request_id: String,
    pub pick_up: Point,
    pub drop_off: Point,
    pub load: u32,
}

impl From<RequestDto> for Request {
    fn from(dto: RequestDto) -> Self {
        Request::new(dto.request_id, dto.pick_up, dto.drop_off, dto.load)
    }
}

#[derive(Debug, Deserialize)]
pub struct ConstraintsDto {
    pub max_journey_time_factor: f64,
}

impl From<ConstraintsDto> for Constraints {
    fn from(dto: ConstraintsDto) -> Self {
        Constraints {
            max_journey_time_factor: dto.max_journey_time_factor,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProblemRequestDto {
    pub fleet: Vec<AssetDto>,
    pub requests: Vec<RequestDto>,
    pub constraints: ConstraintsDto,
}

impl TryFrom<ProblemRequestDto> for Problem {
    type Error = SolverError;

    fn try_from(dto: ProblemRequestDto) -> Result<Self, Self::Error> {
        if dto.fleet.is_empty() {
            return Err(SolverError::InvalidInput("at least one asset is required"));
        }
        if dto.requests.is_empty() {
            return Err(SolverError::InvalidInput(
                "at least one request is required",
            ));
        }
        if dto.constraints.max_journey_time_factor < 1.0 {
            return Err(SolverError::InvalidInput(
                "max_journey_time_factor must be >= 1.0",
            ));
        }

        Ok(Problem {
            fleet: dto.fleet.into_iter().map(Asset::from).collect(),
            requests: dto.requests.into_iter().map(Request::from).collect(),
            constraints: dto.constraints.into(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SolutionRouteDto {
    pub asset_id: String,
    pub request_ids: Vec<String>,
    pub waypoints: Vec<crate::domain::Waypoint>,
    pub duration_nanos: u128,
    pub distance_m: f64,
}

#[derive(Debug, Serialize)]
pub struct MetricsDto {
    pub num_assets_used: usize,
    pub num_requests_assigned: usize,
    pub num_unassigned: usize,
    pub total_duration_nanos: u128,
    pub total_distance_m: f64,
    pub wall_clock_solve_time_nanos: u128,
}

#[derive(Debug, Serialize)]
pub struct SolutionDto {
    pub metrics: MetricsDto,
    pub routes: Vec<SolutionRouteDto>,
    pub unassigned_request_ids: Vec<String>,
}

impl From<Solution> for SolutionDto {
    fn from(solution: Solution) -> Self {
        SolutionDto {
            metrics: MetricsDto {
                num_assets_used: solution.metrics.num_assets_used,
                num_requests_assigned: solution.metrics.num_requests_assigned,
                num_unassigned: solution.metrics.num_unassigned,
                total_duration_nanos: solution.metrics.total_duration.as_nanos(),
                total_distance_m: solution.metrics.total_distance,
                wall_clock_solve_time_nanos: solution
                    .metrics
                    .wall_clock_solve_time
                    .as_nanos(),
            },
            routes: solution
                .routes
                .into_iter()
                .map(|r| SolutionRouteDto {
                    asset_id: r.asset.asset_id,
                    request_ids: r.requests.into_iter().map(|req| req.request_id).collect(),
                    waypoints: r.waypoints,
                    duration_nanos: r.duration.as_nanos(),
                    distance_m: r.distance,
                })
                .collect(),
            unassigned_request_ids: solution
                .unassigned
                .into_iter()
                .map(|r| r.request_id)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProblemAcceptedDto {
    pub problem_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ErrorDto {
    pub error: String,
}
