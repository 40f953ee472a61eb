use chrono::{DateTime, Utc};
use nimbus_id::{ActionId, DropletId, ImageId, KeyId, ResourceRef};
use serde::{Deserialize, Serialize};

use super::{Image, Region, Size};

/// Power state reported for a droplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropletStatus {
    New,
    Active,
    Off,
    Archive,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for DropletStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropletStatus::New => write!(f, "new"),
            DropletStatus::Active => write!(f, "active"),
            DropletStatus::Off => write!(f, "off"),
            DropletStatus::Archive => write!(f, "archive"),
            DropletStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// A virtual machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Droplet {
    pub id: DropletId,
    pub name: String,
    #[serde(default)]
    pub memory: u64,
    #[serde(default)]
    pub vcpus: u32,
    #[serde(default)]
    pub disk: u64,
    #[serde(default)]
    pub locked: bool,
    pub status: DropletStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub backup_ids: Vec<ImageId>,
    #[serde(default)]
    pub snapshot_ids: Vec<ImageId>,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub size_slug: Option<String>,
    #[serde(default)]
    pub size: Option<Size>,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub networks: Networks,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Droplet {
    /// First public IPv4 address, if any.
    pub fn public_ipv4(&self) -> Option<&str> {
        self.networks.first(&self.networks.v4, NetworkType::Public)
    }

    /// First private IPv4 address, if any.
    pub fn private_ipv4(&self) -> Option<&str> {
        self.networks.first(&self.networks.v4, NetworkType::Private)
    }

    /// First public IPv6 address, if any.
    pub fn public_ipv6(&self) -> Option<&str> {
        self.networks.first(&self.networks.v6, NetworkType::Public)
    }

    pub fn region_slug(&self) -> Option<&str> {
        self.region.as_ref().map(|r| r.slug.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    Public,
    Private,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAddress {
    pub ip_address: String,
    #[serde(default)]
    pub netmask: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(rename = "type")]
    pub kind: NetworkType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Networks {
    #[serde(default)]
    pub v4: Vec<NetworkAddress>,
    #[serde(default)]
    pub v6: Vec<NetworkAddress>,
}

impl Networks {
    fn first<'a>(&self, addresses: &'a [NetworkAddress], kind: NetworkType) -> Option<&'a str> {
        addresses
            .iter()
            .find(|a| a.kind == kind)
            .map(|a| a.ip_address.as_str())
    }
}

/// Body of `POST /droplets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropletSpec {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: ResourceRef<ImageId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ssh_keys: Vec<ResourceRef<KeyId>>,
    pub backups: bool,
    pub ipv6: bool,
    pub private_networking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl DropletSpec {
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        size: impl Into<String>,
        image: ResourceRef<ImageId>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            size: size.into(),
            image,
            ssh_keys: Vec::new(),
            backups: false,
            ipv6: false,
            private_networking: false,
            user_data: None,
            tags: Vec::new(),
        }
    }
}

/// Link to an action started by a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLink {
    pub id: ActionId,
    pub rel: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLinks {
    #[serde(default)]
    pub actions: Vec<ActionLink>,
}

/// Response of `POST /droplets`: the new droplet and its create action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropletCreated {
    pub droplet: Droplet,
    #[serde(default)]
    pub links: CreateLinks,
}
