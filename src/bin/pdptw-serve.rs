use std::sync::Arc;

use tracing::{error, info};

use pdptw_solver::cost::CostEstimator;
use pdptw_solver::http::{router, AppState};
use pdptw_solver::repository::InMemoryRepository;
use pdptw_solver::{config::RuntimeConfig, HaversineEstimator, MapServiceEstimator};

const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let config = RuntimeConfig::from_env();
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let use_map_service = std::env::var("USE_MAP_SERVICE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let estimator: Arc<dyn CostEstimator> = if use_map_service {
        info!(base_url = %config.map_service_base_url, "using remote map service for travel costs");
        Arc::new(MapServiceEstimator::new(
            config.map_service_base_url.clone(),
            tokio::runtime::Handle::current(),
        ))
    } else {
        info!(velocity_kmh = config.haversine_velocity_kmh, "using haversine estimator for travel costs");
        Arc::new(HaversineEstimator::new(config.haversine_velocity_kmh))
    };

    let state = AppState {
        repository: Arc::new(InMemoryRepository::new()),
        estimator,
    };

    let app = router(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind port {port}: {err}");
            std::process::exit(1);
        }
    };

    info!("listening on port {port}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("server error: {err}");
    }
}
