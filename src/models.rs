use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SimConfig {
    pub boxes: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    #[serde(default = "default_arrival_probability")]
    pub arrival_probability: f64,
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
    #[serde(default = "default_overtime_cap_secs")]
    pub overtime_cap_secs: u64,
    #[serde(default)]
    pub service: ServiceTimeConfig,
    #[serde(default)]
    pub costs: CostConfig,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimConfig {
    pub fn with_boxes(boxes: u32) -> Self {
        Self {
            boxes,
            window_secs: default_window_secs(),
            arrival_probability: default_arrival_probability(),
            max_wait_secs: default_max_wait_secs(),
            overtime_cap_secs: default_overtime_cap_secs(),
            service: ServiceTimeConfig::default(),
            costs: CostConfig::default(),
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServiceTimeConfig {
    pub mean_secs: u64,
    pub stddev_secs: u64,
    pub floor_secs: u64,
}

impl Default for ServiceTimeConfig {
    fn default() -> Self {
        Self {
            mean_secs: 10 * 60,
            stddev_secs: 5 * 60,
            floor_secs: 30,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CostConfig {
    pub per_box: u64,
    pub per_abandonment: u64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            per_box: 1_000,
            per_abandonment: 10_000,
        }
    }
}

fn default_window_secs() -> u64 {
    4 * 3600
}

fn default_arrival_probability() -> f64 {
    1.0 / 144.0
}

fn default_max_wait_secs() -> u64 {
    30 * 60
}

fn default_overtime_cap_secs() -> u64 {
    3 * 3600
}
