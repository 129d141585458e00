use anyhow::Result;
use clap::Parser;
use eventgenie::models::Config;
use eventgenie::planner::EventPlanner;
use eventgenie::server;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "eventgenie")]
#[command(about = "Serve AI-generated event plans and flyers over HTTP")]
struct CliArgs {
    /// Address to bind (overrides BIND_ADDR).
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides PORT).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventgenie=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting eventgenie");

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let planner = EventPlanner::from_config(&config);

    if let Err(e) = server::run_serve(&config, planner).await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
