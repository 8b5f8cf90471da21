use anyhow::Result;
use playground_application::Toolbar;

use super::host::Host;

pub fn run(url: &str) -> Result<()> {
    let host = Host::open(url);
    Toolbar::new(host.store.clone(), host.address_bar.as_ref()).reset();
    println!("{}", host.store.share_url()?);
    Ok(())
}
