//! podpulse metrics server.
//! Used by: binary entrypoint.

use podpulse::collector::{Collector, SysinfoSampler, COLLECT_INTERVAL};
use podpulse::config::ServerConfig;
use podpulse::{console, logging, server, state};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = ServerConfig::from_env();
    let state = state::build_state(&config.pod_name);

    let collector = Collector::new(SysinfoSampler::new(), state.snapshots.clone());
    let _collector = collector.start(COLLECT_INTERVAL).await;
    tracing::info!(pod = %state.snapshots.pod_identity(), "background metrics collector started");

    console::print_banner();
    console::print_startup(&config.bind_addr, &config.pod_name);

    server::run(state, &config.bind_addr).await?;
    Ok(())
}
