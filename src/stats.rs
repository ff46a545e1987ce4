use serde::Serialize;

use crate::models::CostConfig;
use crate::state::{Customer, CustomerId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub created: usize,
    pub served: usize,
    pub abandoned: usize,
    pub min_service_secs: u64,
    pub max_service_secs: u64,
    pub min_wait_secs: u64,
    pub max_wait_secs: u64,
    pub box_cost: u64,
    pub abandonment_cost: u64,
    pub total_cost: u64,
}

impl Statistics {
    /// Served share of everyone who came in, as a percentage.
    pub fn efficiency_pct(&self) -> f64 {
        (self.served as f64 / self.created.max(1) as f64) * 100.0
    }
}

/// Recomputes every figure from the terminal collections. Nothing is
/// cached, so this is safe to call mid-run for live metrics.
pub fn aggregate(
    customers: &[Customer],
    served: &[CustomerId],
    abandoned: &[CustomerId],
    box_count: u32,
    costs: &CostConfig,
) -> Statistics {
    let mut min_service_secs = 0;
    let mut max_service_secs = 0;
    for &id in served {
        let duration = customers[id].service_secs();
        if duration == 0 {
            continue;
        }
        if min_service_secs == 0 || duration < min_service_secs {
            min_service_secs = duration;
        }
        max_service_secs = max_service_secs.max(duration);
    }

    let mut min_wait_secs = 0;
    let mut max_wait_secs = 0;
    for &id in served.iter().chain(abandoned) {
        let wait = customers[id].wait_secs();
        if wait == 0 {
            continue;
        }
        if min_wait_secs == 0 || wait < min_wait_secs {
            min_wait_secs = wait;
        }
        max_wait_secs = max_wait_secs.max(wait);
    }

    let box_cost = box_count as u64 * costs.per_box;
    let abandonment_cost = abandoned.len() as u64 * costs.per_abandonment;

    Statistics {
        created: customers.len(),
        served: served.len(),
        abandoned: abandoned.len(),
        min_service_secs,
        max_service_secs,
        min_wait_secs,
        max_wait_secs,
        box_cost,
        abandonment_cost,
        total_cost: box_cost + abandonment_cost,
    }
}
