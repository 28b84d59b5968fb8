//! One-shot discovery of sibling services, printed as a report.
//! Exit code: 0 on success (including no results), 1 on discovery failure,
//! 2 on configuration or credential failure.

use std::process::ExitCode;

use podpulse::config::DiscoveryConfig;
use podpulse::discovery::cluster::KubeServiceLister;
use podpulse::discovery::{discover_with_config, DiscoveryReport};
use podpulse::error::Result;
use podpulse::{console, logging};

async fn run() -> Result<DiscoveryReport> {
    let config = DiscoveryConfig::from_env()?;
    tracing::info!(namespace = %config.namespace, "operating in namespace");

    let lister = KubeServiceLister::in_cluster()?;
    discover_with_config(&lister, &config).await
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run().await {
        Ok(report) => {
            console::print_discovery_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "service discovery failed");
            console::log_discovery_failure(&e.to_string());
            if e.is_discovery_failure() {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}
