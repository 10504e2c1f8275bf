//! Offline provider backed by a JSON inventory snapshot.
//!
//! An inventory holds per-region records in the provider's own JSON shape,
//! an optional allow-list of credential profiles, and optional injected
//! faults that make upcoming calls fail with a client error. Faults let the
//! retry behaviour be exercised end to end without a live account.

mod client;
mod select;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use crate::cloud::{
    AvailabilityZone, CacheCluster, Certificate, ClientError, CloudApi, DbInstance, Image,
    InstanceProfile, Provider, Queue, Reservation, RouteTable, SecurityGroup, ServerCertificate,
    Service, Stream, Subnet, Table, User, Vpc,
};

use client::InventoryClient;

/// Operation name checked for faults when a client is acquired.
pub const CONNECT_OPERATION: &str = "Connect";

/// Records visible in one region.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RegionInventory {
    pub vpcs: Vec<Vpc>,
    pub subnets: Vec<Subnet>,
    pub security_groups: Vec<SecurityGroup>,
    pub reservations: Vec<Reservation>,
    pub route_tables: Vec<RouteTable>,
    pub availability_zones: Vec<AvailabilityZone>,
    pub images: Vec<Image>,
    pub users: Vec<User>,
    pub instance_profiles: Vec<InstanceProfile>,
    pub server_certificates: Vec<ServerCertificate>,
    pub queues: Vec<Queue>,
    pub tables: Vec<Table>,
    pub streams: Vec<Stream>,
    pub certificates: Vec<Certificate>,
    pub cache_clusters: Vec<CacheCluster>,
    pub db_instances: Vec<DbInstance>,
}

/// A scripted failure for the next `times` calls of `operation`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Fault {
    /// Operation name, e.g. `DescribeVpcs`, or [`CONNECT_OPERATION`].
    pub operation: String,
    /// Response code; `None` simulates a malformed error payload.
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default = "one")]
    pub times: u32,
}

impl Fault {
    pub fn new(operation: impl Into<String>, code: impl Into<String>, times: u32) -> Self {
        Self {
            operation: operation.into(),
            code: Some(code.into()),
            message: String::new(),
            times,
        }
    }

    fn to_error(&self) -> ClientError {
        let message = if self.message.is_empty() {
            format!("injected fault for {}", self.operation)
        } else {
            self.message.clone()
        };
        match &self.code {
            Some(code) => ClientError::new(&self.operation, code, message),
            None => ClientError::without_code(&self.operation, message),
        }
    }
}

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct InventoryFile {
    #[serde(default)]
    account_id: String,
    #[serde(default)]
    profiles: Vec<String>,
    #[serde(default)]
    regions: BTreeMap<String, RegionInventory>,
    #[serde(default)]
    faults: Vec<Fault>,
}

/// Snapshot-backed [`Provider`].
#[derive(Debug, Default)]
pub struct Inventory {
    account_id: String,
    profiles: Vec<String>,
    regions: BTreeMap<String, RegionInventory>,
    faults: Mutex<Vec<Fault>>,
}

impl Inventory {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Self::default()
        }
    }

    /// Parse an inventory from JSON text.
    pub fn from_json_str(data: &str) -> Result<Self> {
        let file: InventoryFile =
            serde_json::from_str(data).context("failed to parse inventory JSON")?;
        Ok(Self {
            account_id: file.account_id,
            profiles: file.profiles,
            regions: file.regions,
            faults: Mutex::new(file.faults),
        })
    }

    /// Load an inventory file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read inventory {}", path.display()))?;
        let inv = Self::from_json_str(&data)
            .with_context(|| format!("invalid inventory {}", path.display()))?;
        tracing::debug!(
            "loaded inventory {} ({} regions)",
            path.display(),
            inv.regions.len()
        );
        Ok(inv)
    }

    pub fn with_region(mut self, region: impl Into<String>, records: RegionInventory) -> Self {
        self.regions.insert(region.into(), records);
        self
    }

    pub fn with_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles = profiles.into_iter().map(Into::into).collect();
        self
    }

    /// Queue a fault; it fires before any matching call is served.
    pub fn push_fault(&self, fault: Fault) {
        self.lock_faults().push(fault);
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn region(&self, name: &str) -> Option<&RegionInventory> {
        self.regions.get(name)
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    fn lock_faults(&self) -> std::sync::MutexGuard<'_, Vec<Fault>> {
        self.faults
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Consume one pending fault for `operation`, if any.
    pub(crate) fn take_fault(&self, operation: &str) -> Option<ClientError> {
        let mut faults = self.lock_faults();
        let idx = faults
            .iter()
            .position(|f| f.operation == operation && f.times > 0)?;
        let err = faults[idx].to_error();
        faults[idx].times -= 1;
        if faults[idx].times == 0 {
            faults.remove(idx);
        }
        tracing::debug!("inventory fault fired: {}", err);
        Some(err)
    }
}

impl Provider for Inventory {
    fn client(
        &self,
        region: &str,
        service: Service,
        profile: Option<&str>,
    ) -> Result<Box<dyn CloudApi + '_>, ClientError> {
        if let Some(err) = self.take_fault(CONNECT_OPERATION) {
            return Err(err);
        }
        if let Some(name) = profile {
            if !self.profiles.is_empty() && !self.profiles.iter().any(|p| p == name) {
                return Err(ClientError::new(
                    CONNECT_OPERATION,
                    "ProfileNotFound",
                    format!("The config profile ({name}) could not be found"),
                ));
            }
        }
        let records = self.regions.get(region).ok_or_else(|| {
            ClientError::new(
                CONNECT_OPERATION,
                "UnknownRegion",
                format!("Region {region} is not present in the inventory"),
            )
        })?;
        tracing::debug!("inventory client region={} service={}", region, service);
        Ok(Box::new(InventoryClient::new(self, records, service)))
    }
}
