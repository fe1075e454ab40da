//! Traffic simulation viewer client.
//!
//! Connects to the simulation server's `/ws/traffic` endpoint, keeps a
//! rolling merged view of the streamed state, and composes the layer
//! stack once per frame. Rendering proper is the mapping library's job;
//! this binary reports the composed stack through tracing.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod connection;
mod session;

use config::ClientConfig;
use session::SimClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::from_env();
    info!("connecting to {}", config.ws_url);

    let mut client = SimClient::new(config);
    if let Err(err) = client.run().await {
        error!("session failed: {err}");
        std::process::exit(1);
    }
}
