//! Command-line client for the file service.

use anyhow::Context;
use clap::{Parser, Subcommand};
use filebay_client::WsClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filebay", version, about = "Talk to a filebay server")]
struct Cli {
    /// WebSocket URL of the server.
    #[arg(long, short, default_value = "ws://127.0.0.1:9330")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a server directory (the base directory by default).
    Ls {
        /// Relative server path to list.
        path: Option<String>,
    },
    /// Copy a file; prefix the remote side with `remote:`.
    ///
    /// Examples: `filebay cp report.pdf remote:docs` or
    /// `filebay cp remote:docs/report.pdf .`
    Cp {
        source: String,
        dest: String,
    },
    /// Remove server files or directories.
    Rm {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = WsClient::connect(&cli.server)
        .await
        .with_context(|| format!("cannot reach server at {}", cli.server))?;

    let output = match &cli.command {
        Command::Ls { path } => filebay_client::list(&client, path.as_deref()).await?,
        Command::Cp { source, dest } => filebay_client::copy(&client, source, dest).await?,
        Command::Rm { paths } => filebay_client::remove(&client, paths).await?,
    };

    if !output.is_empty() {
        println!("{output}");
    }

    client.close().await;
    Ok(())
}
