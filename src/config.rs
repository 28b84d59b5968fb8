//! Environment-driven configuration for the metrics server and discovery pass.
//! Used by: main, bin/discover.

use crate::error::{Error, Result};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const MAX_NAMESPACE_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub pod_name: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = lookup("BIND_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let pod_name = lookup("MY_POD_NAME").unwrap_or_default();
        if pod_name.is_empty() {
            tracing::warn!("MY_POD_NAME not set, kubernetes_pod_name will be empty");
        }
        Self { bind_addr, pod_name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    pub namespace: String,
    /// Empty matches every service in the namespace.
    pub label_selector: String,
    /// Empty disables self-exclusion.
    pub self_name: String,
}

impl DiscoveryConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let namespace = lookup("NAMESPACE")
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingConfig("NAMESPACE"))?;
        validate_namespace(&namespace)?;

        Ok(Self {
            namespace,
            label_selector: lookup("DISCOVER_SERVICE_LABEL_SELECTOR").unwrap_or_default(),
            self_name: lookup("SERVICE_NAME").unwrap_or_default(),
        })
    }
}

/// Namespaces are RFC 1123 labels.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    let bytes = namespace.as_bytes();
    let valid_char = |b: &u8| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-';
    let alnum = |b: &u8| b.is_ascii_lowercase() || b.is_ascii_digit();

    let ok = !bytes.is_empty()
        && bytes.len() <= MAX_NAMESPACE_LEN
        && bytes.iter().all(valid_char)
        && bytes.first().is_some_and(alnum)
        && bytes.last().is_some_and(alnum);

    if ok {
        Ok(())
    } else {
        Err(Error::InvalidNamespace(namespace.to_owned()))
    }
}
