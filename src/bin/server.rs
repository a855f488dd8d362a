use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use pushgate::config::ServerConfig;
use pushgate::core::push::PushService;
use pushgate::core::registry::create_registry;
use pushgate::routes::routes;

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    // Load config from the environment
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration: host={}, port={}", config.host, config.port);

    // Create the shared registry and the push service on top of it
    let registry = create_registry();
    let push_service = Arc::new(PushService::new(registry));

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Starting Push Gate server on {}", addr);

    warp::serve(routes(push_service, config)).run(addr).await;
}
