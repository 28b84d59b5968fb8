//! One-shot discovery of sibling services in a namespace.
//! Used by: bin/discover, console.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use crate::config::{validate_namespace, DiscoveryConfig};
use crate::error::{Error, Result};

pub mod cluster;

/// Every namespace's `default` service fronting the API server.
pub const RESERVED_SERVICE_NAME: &str = "kubernetes";
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// A service as returned by the cluster, before filtering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceRecord {
    pub name: String,
    pub namespace: String,
    pub cluster_ip: String,
    pub ports: Vec<PortRecord>,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortRecord {
    pub name: String,
    pub port: i32,
    pub protocol: String,
    pub target_port: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortInfo {
    pub name: String,
    pub port: i32,
    pub protocol: String,
    pub target_port: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredService {
    pub name: String,
    pub namespace: String,
    #[serde(rename = "clusterIP")]
    pub cluster_ip: String,
    pub ports: Vec<PortInfo>,
    pub labels: BTreeMap<String, String>,
}

impl From<ServiceRecord> for DiscoveredService {
    fn from(record: ServiceRecord) -> Self {
        Self {
            name: record.name,
            namespace: record.namespace,
            cluster_ip: record.cluster_ip,
            ports: record
                .ports
                .into_iter()
                .map(|p| PortInfo {
                    name: p.name,
                    port: p.port,
                    protocol: p.protocol,
                    target_port: p.target_port,
                })
                .collect(),
            labels: record.labels,
        }
    }
}

/// Result of a pass together with the inputs that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryReport {
    pub namespace: String,
    pub label_selector: String,
    pub services: Vec<DiscoveredService>,
}

/// Enumerates services in a namespace.
pub trait ServiceLister {
    fn list_services(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> impl Future<Output = Result<Vec<ServiceRecord>>> + Send;
}

pub async fn discover<L: ServiceLister>(
    lister: &L,
    namespace: &str,
    label_selector: &str,
    self_name: &str,
) -> Result<Vec<DiscoveredService>> {
    validate_namespace(namespace)?;
    if label_selector.is_empty() {
        tracing::info!("no label selector set, discovering all services except '{RESERVED_SERVICE_NAME}'");
    }
    tracing::info!(namespace, label_selector, "discovering services");

    let records = tokio::time::timeout(DISCOVERY_TIMEOUT, lister.list_services(namespace, label_selector))
        .await
        .map_err(|_| Error::DiscoveryTimeout(DISCOVERY_TIMEOUT))??;

    Ok(filter_services(records, self_name))
}

pub async fn discover_with_config<L: ServiceLister>(
    lister: &L,
    config: &DiscoveryConfig,
) -> Result<DiscoveryReport> {
    let services = discover(lister, &config.namespace, &config.label_selector, &config.self_name).await?;
    Ok(DiscoveryReport {
        namespace: config.namespace.clone(),
        label_selector: config.label_selector.clone(),
        services,
    })
}

fn filter_services(records: Vec<ServiceRecord>, self_name: &str) -> Vec<DiscoveredService> {
    records
        .into_iter()
        .filter(|svc| {
            if svc.name == RESERVED_SERVICE_NAME {
                return false;
            }
            if !self_name.is_empty() && svc.name == self_name {
                tracing::debug!(service = %svc.name, "skipping self");
                return false;
            }
            tracing::info!(
                service = %svc.name,
                namespace = %svc.namespace,
                cluster_ip = %svc.cluster_ip,
                "found service"
            );
            true
        })
        .map(DiscoveredService::from)
        .collect()
}
