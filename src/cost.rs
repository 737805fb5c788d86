use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use geo::{HaversineDistance, Point as GeoPoint};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::error::SolverError;
use crate::geo::Point;

/// Travel cost between two points: distance in meters, duration in
/// nanoseconds on the wire (held here as a `Duration`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub distance_m: f64,
    pub duration: Duration,
}

impl Cost {
    pub const ZERO: Cost = Cost {
        distance_m: 0.0,
        duration: Duration::ZERO,
    };
}

/// Ambient cancellation carried through every solver call, per the
/// suspension-points model in spec.md §5.
#[derive(Clone, Default)]
pub struct SolveContext {
    cancelled: Arc<AtomicBool>,
}

impl SolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), SolverError> {
        if self.is_cancelled() {
            Err(SolverError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// `cost(from, to) -> (distance, duration) | failure`, as spec.md §4.1.
/// Every implementation must satisfy `cost(p, p) == Cost::ZERO` exactly.
pub trait CostEstimator: Send + Sync {
    fn cost(&self, ctx: &SolveContext, from: Point, to: Point) -> Result<Cost, SolverError>;
}

/// Great-circle distance times a constant velocity. Never fails. Uses the
/// `geo` crate's `HaversineDistance`, the same way `butterfly-route`'s
/// `geo::haversine_distance` wraps it, rather than hand-rolling the trig.
pub struct HaversineEstimator {
    pub velocity_kmh: f64,
}

impl HaversineEstimator {
    pub fn new(velocity_kmh: f64) -> Self {
        Self { velocity_kmh }
    }
}

impl CostEstimator for HaversineEstimator {
    fn cost(&self, _ctx: &SolveContext, from: Point, to: Point) -> Result<Cost, SolverError> {
        if from == to {
            return Ok(Cost::ZERO);
        }

        let p1 = GeoPoint::new(from.lon, from.lat);
        let p2 = GeoPoint::new(to.lon, to.lat);
        let meters = p1.haversine_distance(&p2);

        let km = meters / 1000.0;
        let duration = Duration::from_secs_f64(km / self.velocity_kmh * 3600.0);

        Ok(Cost {
            distance_m: meters.round(),
            duration,
        })
    }
}

/// Performs a remote lookup against an external travel-time service and
/// memoizes the result, grounded on `osrm.rs`'s `create_dm_osrm` for the
/// table-endpoint URL shape and `get_onemap_token`'s check-DB-then-fetch-
/// then-store pattern for the cache. The matrix build fans out many of
/// these concurrently, so the memo table is a `RwLock`-guarded map rather
/// than the reference's `SqlitePool` row — read-checked before any
/// request, write-populated after.
pub struct MapServiceEstimator {
    client: reqwest::Client,
    base_url: String,
    runtime: tokio::runtime::Handle,
    cache: RwLock<HashMap<(Point, Point), Cost>>,
}

impl MapServiceEstimator {
    pub fn new(base_url: String, runtime: tokio::runtime::Handle) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            runtime,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn cached(&self, from: Point, to: Point) -> Option<Cost> {
        self.cache.read().unwrap().get(&(from, to)).copied()
    }

    async fn fetch(&self, from: Point, to: Point) -> Result<Cost, SolverError> {
        let url = format!(
            "{}/{},{};{},{}?annotations=distance,duration",
            self.base_url, from.lon, from.lat, to.lon, to.lat
        );
        trace!("MapServiceEstimator: GET {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| SolverError::UpstreamUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            error!("map service returned HTTP {}", status);
            return Err(SolverError::UpstreamUnavailable(format!(
                "HTTP {status}"
            )));
        }

        let body: TableResponse = resp
            .json()
            .await
            .map_err(|e| SolverError::UpstreamUnavailable(e.to_string()))?;

        let distance_m = body
            .distances
            .first()
            .and_then(|row| row.get(1))
            .copied()
            .ok_or_else(|| SolverError::UpstreamUnavailable("missing distances".into()))?;
        let duration_s = body
            .durations
            .first()
            .and_then(|row| row.get(1))
            .copied()
            .ok_or_else(|| SolverError::UpstreamUnavailable("missing durations".into()))?;

        Ok(Cost {
            distance_m,
            duration: Duration::from_secs_f64(duration_s.max(0.0)),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TableResponse {
    distances: Vec<Vec<f64>>,
    durations: Vec<Vec<f64>>,
}

impl CostEstimator for MapServiceEstimator {
    fn cost(&self, ctx: &SolveContext, from: Point, to: Point) -> Result<Cost, SolverError> {
        if from == to {
            return Ok(Cost::ZERO);
        }
        ctx.check()?;

        if let Some(c) = self.cached(from, to) {
            debug!("MapServiceEstimator: cache hit for {} -> {}", from, to);
            return Ok(c);
        }

        let result = self.runtime.block_on(self.fetch(from, to))?;
        self.cache.write().unwrap().insert((from, to), result);
        Ok(result)
    }
}
