use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::cost::{CostEstimator, SolveContext};
use crate::domain::Problem;
use crate::error::SolverError;
use crate::repository::InMemoryRepository;
use crate::solver;

use super::dto::{ErrorDto, ProblemAcceptedDto, ProblemRequestDto, SolutionDto};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<InMemoryRepository>,
    pub estimator: Arc<dyn CostEstimator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/problem", post(solve_sync))
        .route("/api/v1/problem-long", post(solve_async))
        .route("/api/v1/problem/{problem_id}", get(get_solution))
        .route("/status", get(status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn status() -> &'static str {
    "ok"
}

impl IntoResponse for SolverError {
    fn into_response(self) -> Response {
        let status = match &self {
            SolverError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SolverError::PointOutsideMatrix => StatusCode::BAD_REQUEST,
            SolverError::NotFound => StatusCode::NOT_FOUND,
            SolverError::AlreadyExists => StatusCode::CONFLICT,
            SolverError::InProcess => StatusCode::CONFLICT,
            SolverError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            SolverError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            SolverError::MatrixBuildFailed(_) => StatusCode::BAD_GATEWAY,
            SolverError::AlgorithmFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorDto {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Solves a problem inline and returns the finished solution. The CPU-
/// and possibly-blocking-IO-bound solve runs on the blocking thread pool
/// so it never stalls the async runtime that's also serving other
/// requests.
async fn solve_sync(
    State(state): State<AppState>,
    Json(dto): Json<ProblemRequestDto>,
) -> Result<Json<SolutionDto>, SolverError> {
    let problem: Problem = dto.try_into()?;
    let estimator = state.estimator.clone();

    let solution = tokio::task::spawn_blocking(move || {
        let ctx = SolveContext::new();
        solver::solve(&problem, estimator.as_ref(), &ctx)
    })
    .await
    .map_err(|e| SolverError::AlgorithmFailed(e.to_string()))??;

    Ok(Json(solution.into()))
}

/// Accepts a problem for background solving and immediately returns its
/// id. The solve itself runs on a detached task; its outcome lands in the
/// repository for later retrieval via `GET /api/v1/problem/{problem_id}`.
async fn solve_async(
    State(state): State<AppState>,
    Json(dto): Json<ProblemRequestDto>,
) -> Result<(StatusCode, Json<ProblemAcceptedDto>), SolverError> {
    let problem: Problem = dto.try_into()?;
    let problem_id = Uuid::new_v4();
    state.repository.add_problem(problem_id)?;

    let repository = state.repository.clone();
    let estimator = state.estimator.clone();
    tokio::spawn(async move {
        let outcome = tokio::task::spawn_blocking(move || {
            let ctx = SolveContext::new();
            solver::solve(&problem, estimator.as_ref(), &ctx)
        })
        .await;

        match outcome {
            Ok(Ok(solution)) => {
                info!(problem_id = %problem_id, "solve finished");
                let _ = repository.set_solution(problem_id, solution);
            }
            Ok(Err(e)) => {
                error!(problem_id = %problem_id, error = %e, "solve failed");
                let _ = repository.set_error(problem_id, &e);
            }
            Err(join_err) => {
                let e = SolverError::AlgorithmFailed(join_err.to_string());
                error!(problem_id = %problem_id, error = %e, "solve task panicked");
                let _ = repository.set_error(problem_id, &e);
            }
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(ProblemAcceptedDto { problem_id }),
    ))
}

async fn get_solution(
    State(state): State<AppState>,
    Path(problem_id): Path<Uuid>,
) -> Result<Json<SolutionDto>, SolverError> {
    let solution = state.repository.get_solution_by_problem_id(problem_id)?;
    Ok(Json(solution.into()))
}
