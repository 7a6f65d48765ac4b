use anyhow::Result;
use dotenvy::dotenv;
use env_logger::Env;
use log::{error, info};

use playbot::app::App;
use playbot::config::Config;
use playbot::http_server::start_http_server;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str())).init();

    info!("🚀 Starting Slack /play HTTP server...");
    info!("✅ Configuration loaded");

    let port = config.port;
    let app = App::new(&config);
    info!("✅ Slack app initialized");

    info!("🌐 Starting HTTP server on port {}", port);
    if let Err(e) = start_http_server(app, port).await {
        error!("❌ HTTP server failed: {}", e);
        return Err(e);
    }

    Ok(())
}
