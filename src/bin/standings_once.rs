//! One-shot fetch: prints the current standings snapshot as JSON to stdout.
//! Uses the same configuration as the service (config file + env, `.env` honoured).

use medal_standings::{fetch_standings, SourceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = SourceConfig::load()?;
    let snapshot = fetch_standings(&cfg).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
