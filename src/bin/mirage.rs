use std::net::SocketAddr;

use mirage_gateway::server::{Server, ServerConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mirage_gateway=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut builder = ServerConfig::builder();
    if let Ok(addr) = std::env::var("MIRAGE_ADDR") {
        builder = builder.addr(addr.parse::<SocketAddr>()?);
    }
    if std::env::var("MIRAGE_DISABLE_CORS").is_ok() {
        builder = builder.cors(false);
    }
    if let Ok(budget) = std::env::var("MIRAGE_STORE_BUDGET_BYTES") {
        builder = builder.store_budget_bytes(budget.parse::<u64>()?);
    }

    let server = Server::new(builder.build())?;
    server.run().await?;
    Ok(())
}
