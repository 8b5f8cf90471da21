use anyhow::{Context, Result};
use playground_core::dependency::VersionKey;
use std::fs;

use super::host::Host;

/// Splits `PATH=LOCAL_FILE`.
pub fn parse_file_arg(arg: &str) -> Result<(&str, &str)> {
    match arg.split_once('=') {
        Some((path, local)) if !path.is_empty() && !local.is_empty() => Ok((path, local)),
        _ => anyhow::bail!("Invalid --file '{}', expected PATH=LOCAL_FILE", arg),
    }
}

pub fn run(
    base_url: &str,
    files: &[String],
    react: Option<String>,
    antd: Option<String>,
    typescript: Option<String>,
) -> Result<()> {
    let host = Host::open(base_url);
    let store = &host.store;

    for (key, version) in [
        (VersionKey::React, react),
        (VersionKey::Antd, antd),
        (VersionKey::Typescript, typescript),
    ] {
        if let Some(version) = version {
            store.set_version(key, &version);
        }
    }

    for arg in files {
        let (path, local) = parse_file_arg(arg)?;
        let content =
            fs::read_to_string(local).with_context(|| format!("Failed to read {}", local))?;
        store.update_file(path, content);
    }

    println!("{}", store.share_url()?);
    Ok(())
}
