use serde::{Deserialize, Serialize};

/// A droplet hardware size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub slug: String,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub transfer: f64,
    #[serde(default)]
    pub price_monthly: f64,
    #[serde(default)]
    pub price_hourly: f64,
    #[serde(default)]
    pub memory: u64,
    #[serde(default)]
    pub vcpus: u32,
    #[serde(default)]
    pub disk: u64,
    #[serde(default)]
    pub regions: Vec<String>,
}
