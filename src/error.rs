//! Unified error types for podpulse.
//! Used by: config, collector, discovery, binaries.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    #[error("invalid namespace: {0:?}")]
    InvalidNamespace(String),

    #[error("sample unavailable: {0}")]
    Sampling(String),

    #[error("cluster credentials unavailable: {0}")]
    Credentials(String),

    #[error("failed to create cluster client: {0}")]
    Client(String),

    #[error("failed to list services in namespace {namespace}: {reason}")]
    Listing { namespace: String, reason: String },

    #[error("service discovery timed out after {0:?}")]
    DiscoveryTimeout(Duration),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the failure happened while talking to the cluster rather than
    /// while reading local configuration.
    pub fn is_discovery_failure(&self) -> bool {
        matches!(self, Error::Listing { .. } | Error::DiscoveryTimeout(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_error_names_namespace() {
        let err = Error::Listing {
            namespace: "shop".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to list services in namespace shop: connection refused"
        );
    }

    #[test]
    fn timeout_and_listing_are_discovery_failures() {
        assert!(Error::DiscoveryTimeout(Duration::from_secs(30)).is_discovery_failure());
        assert!(Error::Listing { namespace: "a".into(), reason: "b".into() }.is_discovery_failure());
        assert!(!Error::Credentials("no token".into()).is_discovery_failure());
        assert!(!Error::MissingConfig("NAMESPACE").is_discovery_failure());
    }

    #[test]
    fn error_messages_are_descriptive() {
        assert_eq!(
            Error::MissingConfig("NAMESPACE").to_string(),
            "missing required configuration: NAMESPACE"
        );
        assert_eq!(
            Error::InvalidNamespace("Bad_NS".into()).to_string(),
            "invalid namespace: \"Bad_NS\""
        );
    }
}
