use std::time::Duration;

use crate::error::SolverError;
use crate::geo::Point;
use crate::matrix::CostMatrix;

/// One leg of a walked route: the cost of moving from one consecutive
/// point to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub from: Point,
    pub to: Point,
    pub distance_m: f64,
    pub duration: Duration,
}

/// The accumulated cost of walking an ordered list of points through a
/// cost matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimation {
    pub legs: Vec<Leg>,
    pub total_distance: f64,
    pub total_duration: Duration,
}

impl Estimation {
    fn empty() -> Self {
        Self {
            legs: Vec::new(),
            total_distance: 0.0,
            total_duration: Duration::ZERO,
        }
    }
}

/// Walks consecutive pairs in `points`, summing each leg's matrix cost.
/// Zero or one point yields a zero-cost estimation with no legs.
pub fn estimate(points: &[Point], matrix: &CostMatrix) -> Result<Estimation, SolverError> {
    if points.len() < 2 {
        return Ok(Estimation::empty());
    }

    let mut legs = Vec::with_capacity(points.len() - 1);
    let mut total_distance = 0.0;
    let mut total_duration = Duration::ZERO;

    for pair in points.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let cost = matrix.get(from, to)?;
        total_distance += cost.distance_m;
        total_duration += cost.duration;
        legs.push(Leg {
            from,
            to,
            distance_m: cost.distance_m,
            duration: cost.duration,
        });
    }

    Ok(Estimation {
        legs,
        total_distance,
        total_duration,
    })
}
