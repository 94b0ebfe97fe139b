//! Stop-and-frisk dashboard server binary
//!
//! Run with: `cargo run --bin dashboard-server`

use nbh_dashboard::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing is initialized in run_server(); RUST_LOG controls the level:
    //   RUST_LOG=debug cargo run --bin dashboard-server
    let config = ServerConfig::from_env();

    println!("Starting stop-and-frisk dashboard...");
    println!("   Host: {}", config.host);
    println!("   Port: {}", config.port);
    println!("   Data: {}", config.source);
    match config.refresh_interval {
        Some(every) => println!("   Refresh: every {}s", every.as_secs()),
        None => println!("   Refresh: disabled"),
    }
    println!();
    println!("Available endpoints:");
    println!("  GET  /                      - Dashboard page");
    println!("  GET  /health                - Health check");
    println!("  GET  /api/neighborhoods     - Selection options");
    println!("  POST /api/figures           - All three figures");
    println!("  POST /api/figures/:chart    - One figure (monthly, race, time-of-day)");
    println!();

    run_server(config).await?;

    Ok(())
}
