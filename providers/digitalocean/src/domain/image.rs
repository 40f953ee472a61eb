use chrono::{DateTime, Utc};
use nimbus_id::ImageId;
use serde::{Deserialize, Serialize};

/// A distribution image, application image, snapshot or backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub name: String,
    #[serde(default)]
    pub distribution: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub min_disk_size: Option<u32>,
    #[serde(default)]
    pub size_gigabytes: Option<f64>,
}
