//! WikiDP — differentially private Wikipedia top-article pageviews.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use wikidp_core::WikidpConfig;
use wikidp_pageviews::PageviewsClient;
use wikidp_server::{build_router, AppState};

fn resolve_config_path() -> PathBuf {
    std::env::var("WIKIDP_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = WikidpConfig::load(&resolve_config_path());

    if args.len() > 1 {
        match args[1].as_str() {
            "config" | "--config" => {
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("WikiDP — differentially private top-article pageviews");
                println!();
                println!("Usage: wikidp [command]");
                println!();
                println!("Commands:");
                println!("  (none)     Start the server");
                println!("  config     Print the resolved configuration");
                println!("  help       Show this help message");
                println!();
                println!("Environment: WIKIDP_CONFIG, PORT, WIKIDP_UPSTREAM_URL, WIKIDP_USER_AGENT,");
                println!("             WIKIDP_RESULT_LIMIT, WIKIDP_TIMEOUT_SECS, WIKIDP_NOISE_SEED");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'wikidp help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    if config.noise_seed.is_some() {
        info!("Noise seed is fixed; every release is reproducible");
    }

    let client = PageviewsClient::new(&config)
        .map_err(|e| anyhow::anyhow!("Failed to build pageviews client: {}", e))?;
    let port = config.port;

    let state = Arc::new(AppState::new(config, Arc::new(client)));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("WikiDP server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
