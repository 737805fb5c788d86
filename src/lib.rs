pub mod assembly;
pub mod config;
pub mod construct;
pub mod cost;
pub mod domain;
pub mod error;
pub mod feasibility;
pub mod geo;
pub mod hillclimb;
pub mod http;
pub mod matrix;
pub mod repository;
pub mod route_estimator;
pub mod solver;

pub use cost::{CostEstimator, HaversineEstimator, MapServiceEstimator, SolveContext};
pub use domain::{Asset, Constraints, Problem, Request, Solution};
pub use error::SolverError;
pub use geo::Point;
pub use solver::solve;
