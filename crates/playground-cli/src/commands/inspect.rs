use anyhow::Result;

use super::host::Host;

pub fn run(input: &str) -> Result<()> {
    let host = Host::open(input);
    tracing::info!(seeded_from = ?host.store.seeded_from(), "Session loaded");
    println!("{}", serde_json::to_string_pretty(&host.store.snapshot())?);
    Ok(())
}
