//! # Trolley Shell
//!
//! A terminal front end for one cart session.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging, to stderr)
//! 2. Load configuration (file, then `TROLLEY_*` overrides)
//! 3. Open the SQLite store & run migrations
//! 4. Build the inventory client (HTTP, or the demo catalog with `--offline`)
//! 5. Open the cart session (hydrates the stored cart)
//! 6. Read commands until `quit` or EOF
//! 7. Flush pending snapshot writes & close the pool
//!
//! ## State Management
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin ──► Command::from_str ──► execute(&session, cmd)                 │
//! │                                        │                                │
//! │                         ┌──────────────┴──────────────┐                 │
//! │                         ▼                             ▼                 │
//! │               Ok: render cart ──► stdout   Err: ConsoleSink ──► stderr  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod console;
pub mod demo;
pub mod error;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trolley_inventory::{HttpInventoryClient, InventoryClient};
use trolley_session::CartSession;
use trolley_store::{Database, DbConfig};

use commands::{execute, Command, Outcome};
use config::AppConfig;
use console::ConsoleSink;
pub use error::{ShellError, ShellResult};

const PROMPT: &[u8] = b"trolley> ";

/// Trolley: shopping cart shell backed by a remote inventory service
#[derive(Parser, Debug, Default)]
#[command(name = "trolley")]
#[command(about = "Shopping cart shell backed by a remote inventory service")]
pub struct Args {
    /// Config file (default: platform config directory, or TROLLEY_CONFIG)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use the built-in demo catalog instead of the inventory service
    #[arg(long)]
    pub offline: bool,

    /// Keep the cart in an in-memory database (nothing survives exit)
    #[arg(long)]
    pub ephemeral: bool,
}

/// Sets up the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise `info,trolley=debug,sqlx=warn`. Logs go
/// to stderr so they never interleave with cart output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,trolley=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the shell on stdin/stdout.
pub async fn run(args: Args) -> ShellResult<()> {
    info!("Starting Trolley shell");

    let config = AppConfig::load(args.config.clone())?;
    let db = open_database(&config, args.ephemeral).await?;
    let inventory = build_inventory(&config, args.offline)?;

    let session = CartSession::builder(inventory)
        .store(Arc::new(db.kv()))
        .cart_key(config.storage.cart_key.clone())
        .sink(Arc::new(ConsoleSink))
        .open()
        .await;

    info!(session = %session.id(), "Cart session ready");

    let result = repl(&session, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await;

    session.flush().await;
    db.close().await;
    info!("Trolley shell stopped");

    result
}

async fn open_database(config: &AppConfig, ephemeral: bool) -> ShellResult<Database> {
    if ephemeral {
        return Ok(Database::new(DbConfig::in_memory()).await?);
    }

    let path = config.storage.resolve_database_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    Ok(Database::new(DbConfig::new(path)).await?)
}

fn build_inventory(config: &AppConfig, offline: bool) -> ShellResult<Arc<dyn InventoryClient>> {
    if offline {
        info!("Offline mode: using the demo catalog");
        return Ok(Arc::new(demo::demo_inventory()));
    }

    let client = HttpInventoryClient::new(&config.inventory)?;
    info!(base_url = %client.base_url(), "Using inventory service");
    Ok(Arc::new(client))
}

/// Reads commands from `input` until `quit` or EOF.
pub async fn repl<R, W>(session: &CartSession, input: R, mut output: W) -> ShellResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    output.write_all(PROMPT).await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            let reply = match line.parse::<Command>() {
                Ok(command) => match execute(session, command).await {
                    Outcome::Quit => break,
                    Outcome::Continue(reply) => reply,
                },
                Err(e) => Some(e.to_string()),
            };

            if let Some(text) = reply {
                output.write_all(text.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
        }

        output.write_all(PROMPT).await?;
        output.flush().await?;
    }

    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trolley_core::ProductId;
    use trolley_session::RecordingSink;

    async fn offline_session() -> CartSession {
        CartSession::builder(Arc::new(demo::demo_inventory()))
            .sink(Arc::new(RecordingSink::new()))
            .open()
            .await
    }

    #[tokio::test]
    async fn test_repl_script() {
        let session = offline_session().await;
        let script = b"add 1\nadd 1\nbogus\n\nset 1 3\nremove 2\nshow\nquit\nadd 2\n";
        let mut output = Vec::new();

        repl(&session, &script[..], &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Unknown command 'bogus'"));
        assert!(text.contains("x3"));

        // Lines after `quit` are not executed.
        assert!(session.cart().get(ProductId::new(2)).is_none());
        assert_eq!(session.cart().get(ProductId::new(1)).map(|i| i.amount), Some(3));
    }

    #[tokio::test]
    async fn test_repl_stops_at_eof() {
        let session = offline_session().await;
        let mut output = Vec::new();

        repl(&session, &b"add 4\n"[..], &mut output).await.unwrap();

        assert_eq!(session.cart().total_amount(), 1);
    }

    #[tokio::test]
    async fn test_offline_inventory() {
        let inventory = build_inventory(&AppConfig::default(), true).unwrap();
        let stock = inventory.stock(ProductId::new(1)).await.unwrap();
        assert!(stock.is_some());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["trolley", "--offline", "-c", "/tmp/t.toml"]);
        assert!(args.offline);
        assert!(!args.ephemeral);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/t.toml")));
    }
}
