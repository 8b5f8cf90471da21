use anyhow::Result;
use clap::{Parser, Subcommand};
use playground_core::dependency::VersionKey;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Page URL used when a bare token is given.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5173/";

#[derive(Parser)]
#[command(name = "playground")]
#[command(about = "Antd Playground CLI - build, inspect and preview shareable playground links", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a shareable link from local files
    Share {
        /// File to include, as PATH=LOCAL_FILE (repeatable)
        #[arg(long = "file", value_name = "PATH=LOCAL_FILE")]
        files: Vec<String>,

        #[arg(long)]
        react: Option<String>,

        #[arg(long)]
        antd: Option<String>,

        #[arg(long)]
        typescript: Option<String>,

        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Print the session stored in a link as JSON
    Inspect {
        /// Playground URL or bare token
        input: String,
    },
    /// Generate the preview document of a link
    Preview {
        /// Playground URL or bare token
        input: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit sandboxed iframe markup instead of the bare document
        #[arg(long)]
        frame: bool,
    },
    /// Print the link of the session with its template files restored
    Reset {
        /// Playground URL
        url: String,
    },
    /// List the supported versions of a dependency
    Versions {
        #[arg(value_parser = parse_version_key)]
        key: VersionKey,
    },
    /// Show or change the CDN provider
    Cdn {
        /// jsdelivr, jsdelivr-fastly or unpkg
        provider: Option<String>,
    },
}

fn parse_version_key(raw: &str) -> Result<VersionKey, String> {
    raw.parse()
        .map_err(|_| format!("unknown dependency '{}', expected react, antd or typescript", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Share {
            files,
            react,
            antd,
            typescript,
            base_url,
        } => commands::share::run(&base_url, &files, react, antd, typescript)?,
        Commands::Inspect { input } => commands::inspect::run(&input)?,
        Commands::Preview {
            input,
            output,
            frame,
        } => commands::preview::run(&input, output.as_deref(), frame)?,
        Commands::Reset { url } => commands::reset::run(&url)?,
        Commands::Versions { key } => commands::versions::run(key).await?,
        Commands::Cdn { provider } => commands::cdn::run(provider.as_deref())?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_share() {
        let cli = Cli::try_parse_from([
            "playground",
            "share",
            "--file",
            "App.tsx=./App.tsx",
            "--file",
            "util.ts=./util.ts",
            "--antd",
            "5.0.0",
        ])
        .unwrap();

        match cli.command {
            Commands::Share {
                files,
                antd,
                react,
                base_url,
                ..
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(antd.as_deref(), Some("5.0.0"));
                assert_eq!(react, None);
                assert_eq!(base_url, DEFAULT_BASE_URL);
            }
            _ => panic!("expected share"),
        }
    }

    #[test]
    fn test_parse_versions_key() {
        let cli = Cli::try_parse_from(["playground", "versions", "antd"]).unwrap();
        assert!(matches!(cli.command, Commands::Versions { key: VersionKey::Antd }));
        assert!(Cli::try_parse_from(["playground", "versions", "vue"]).is_err());
    }
}
