//! Kubernetes-backed service listing.
//! Used by: bin/discover.

use k8s_openapi::api::core::v1::{Service, ServicePort};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::{Api, ListParams};
use kube::{Client, Config};

use super::{PortRecord, ServiceLister, ServiceRecord};
use crate::error::{Error, Result};

pub struct KubeServiceLister {
    client: Client,
}

impl KubeServiceLister {
    /// Resolves credentials from the pod's service account. Fails outside a
    /// cluster.
    pub fn in_cluster() -> Result<Self> {
        let config = Config::incluster().map_err(|e| Error::Credentials(e.to_string()))?;
        tracing::info!(cluster_url = %config.cluster_url, "using in-cluster kubernetes config");
        let client = Client::try_from(config).map_err(|e| Error::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl ServiceLister for KubeServiceLister {
    async fn list_services(&self, namespace: &str, label_selector: &str) -> Result<Vec<ServiceRecord>> {
        let services: Api<Service> = Api::namespaced(self.client.clone(), namespace);

        let mut params = ListParams::default();
        if !label_selector.is_empty() {
            params = params.labels(label_selector);
        }

        let list = services.list(&params).await.map_err(|e| Error::Listing {
            namespace: namespace.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(list.items.into_iter().map(ServiceRecord::from).collect())
    }
}

impl From<Service> for ServiceRecord {
    fn from(service: Service) -> Self {
        let metadata = service.metadata;
        let spec = service.spec.unwrap_or_default();
        Self {
            name: metadata.name.unwrap_or_default(),
            namespace: metadata.namespace.unwrap_or_default(),
            cluster_ip: spec.cluster_ip.unwrap_or_default(),
            ports: spec
                .ports
                .unwrap_or_default()
                .into_iter()
                .map(PortRecord::from)
                .collect(),
            labels: metadata.labels.unwrap_or_default(),
        }
    }
}

impl From<ServicePort> for PortRecord {
    fn from(port: ServicePort) -> Self {
        Self {
            name: port.name.unwrap_or_default(),
            port: port.port,
            protocol: port.protocol.unwrap_or_default(),
            target_port: numeric_target_port(port.target_port.as_ref()),
        }
    }
}

/// Named target ports resolve per pod, so only numeric ones are carried.
fn numeric_target_port(target: Option<&IntOrString>) -> i32 {
    match target {
        Some(IntOrString::Int(port)) => *port,
        _ => 0,
    }
}
