/// Fixed literature constants and runtime defaults, grouped the way the
/// reference crate's `config::constant` module groups them.
pub mod constant {
    /// Weights from Hosny & Mumford's cost function F(r) = w1*D + w2*TWV + w3*CV.
    /// The heavy weight on TWV steers local search toward time-feasible routes.
    pub const COST_WEIGHT_DURATION: f64 = 0.201;
    pub const COST_WEIGHT_TIME_WINDOW_VIOLATIONS: f64 = 0.7;
    pub const COST_WEIGHT_CAPACITY_VIOLATIONS: f64 = 0.0992;

    /// Default constant velocity for the haversine estimator, in km/h.
    pub const DEFAULT_VELOCITY_KMH: f64 = 80.0;

    /// Floor on concurrent outstanding cost lookups during matrix build.
    pub const MIN_MATRIX_BUILD_CONCURRENCY: usize = 16;
}

/// Runtime-tunable values read from the environment, following the
/// reference's `dotenv` + `std::env::var` + logged-fallback idiom.
pub struct RuntimeConfig {
    pub map_service_base_url: String,
    pub haversine_velocity_kmh: f64,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let map_service_base_url = std::env::var("MAP_SERVICE_BASE_URL").unwrap_or_else(|_| {
            tracing::warn!("MAP_SERVICE_BASE_URL not set, using default");
            "https://router.project-osrm.org/table/v1/driving".to_string()
        });

        let haversine_velocity_kmh = std::env::var("HAVERSINE_VELOCITY_KMH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(constant::DEFAULT_VELOCITY_KMH);

        Self {
            map_service_base_url,
            haversine_velocity_kmh,
        }
    }
}
