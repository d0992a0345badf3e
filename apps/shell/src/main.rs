//! # Trolley Shell Entry Point
//!
//! The setup lives in `lib.rs` so it can be tested.

use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    trolley_shell::init_tracing();

    let args = trolley_shell::Args::parse();
    trolley_shell::run(args).await?;

    Ok(())
}
