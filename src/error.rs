use thiserror::Error;

/// Every failure kind the solver core and its external collaborators can
/// surface. Propagated with `?`, never swallowed; see DESIGN.md for the
/// propagation policy per call site.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("upstream travel-cost provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("cost matrix build failed: {0:?}")]
    MatrixBuildFailed(Vec<SolverError>),

    #[error("solve cancelled")]
    Cancelled,

    #[error("internal invariant violated during construction: {0}")]
    AlgorithmFailed(String),

    #[error("point outside matrix domain")]
    PointOutsideMatrix,

    #[error("problem not found")]
    NotFound,

    #[error("problem already exists")]
    AlreadyExists,

    #[error("solution is still being processed")]
    InProcess,
}
