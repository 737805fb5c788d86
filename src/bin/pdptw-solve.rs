use std::error::Error;

use colored::*;
use tracing::{info, span, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pdptw_solver::{Asset, Constraints, HaversineEstimator, Point, Problem, Request, SolveContext};

#[tokio::main]
#[tracing::instrument(name = "PDPTW Solver", level = "info")]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .compact(),
        )
        .init();

    let problem = sample_problem();
    info!(
        "Solving a problem with {} vehicles and {} requests",
        problem.fleet.len(),
        problem.requests.len()
    );

    let estimator = HaversineEstimator::new(80.0);
    let ctx = SolveContext::new();

    let solution = {
        let span = span!(Level::INFO, "solve");
        let _guard = span.enter();
        pdptw_solver::solve(&problem, &estimator, &ctx)?
    };

    println!(
        "{}",
        format!(
            "Assigned {}/{} requests across {} vehicles",
            solution.metrics.num_requests_assigned,
            solution.metrics.num_requests_assigned + solution.metrics.num_unassigned,
            solution.metrics.num_assets_used
        )
        .green()
    );

    for route in &solution.routes {
        println!(
            "vehicle {}: {:.0}m, {:.1}s, {} waypoints",
            route.asset.asset_id,
            route.distance,
            route.duration.as_secs_f64(),
            route.waypoints.len()
        );
    }

    if !solution.unassigned.is_empty() {
        println!(
            "{}",
            format!("{} requests left unassigned", solution.unassigned.len()).red()
        );
    }

    Ok(())
}

/// A small hand-built instance around A Coruna, Spain: two vehicles,
/// three requests, generous deadlines so the constructor has room to work.
fn sample_problem() -> Problem {
    let depot = Point::new(43.3623, -8.4115);

    Problem {
        fleet: vec![
            Asset {
                asset_id: "van-1".into(),
                location: depot,
                capacity: 6,
            },
            Asset {
                asset_id: "van-2".into(),
                location: depot,
                capacity: 4,
            },
        ],
        requests: vec![
            Request::new(
                "req-1",
                Point::new(43.3475, -8.206389),
                Point::new(43.360872, -8.408308),
                2,
            ),
            Request::new(
                "req-2",
                Point::new(43.450218, -7.853109),
                Point::new(43.5, -8.0),
                3,
            ),
            Request::new(
                "req-3",
                Point::new(43.2, -8.5),
                Point::new(43.3, -8.3),
                2,
            ),
        ],
        constraints: Constraints {
            max_journey_time_factor: 3.0,
        },
    }
}
