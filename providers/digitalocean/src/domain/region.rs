use serde::{Deserialize, Serialize};

/// A datacenter region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub features: Vec<String>,
}
