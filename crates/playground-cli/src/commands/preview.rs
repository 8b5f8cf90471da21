use anyhow::{Context, Result};
use playground_execution::{PreviewCompiler, PreviewFrame};
use std::fs;
use std::path::Path;

use super::host::Host;

pub fn run(input: &str, output: Option<&Path>, frame: bool) -> Result<()> {
    let host = Host::open(input);
    let session = host.store.session();

    let document = PreviewCompiler::new(host.resolver.clone())?
        .compile(session.entry_source(), session.import_map())?;
    let rendered = if frame {
        PreviewFrame::default().markup(&document)
    } else {
        document.html
    };

    match output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Preview written");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
