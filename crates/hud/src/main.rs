use clap::Parser;
use controlroom_client::HostClient;
use controlroom_hud::{parse_event, HudRuntime, JsonLineSink};
use controlroom_panel::DisplayState;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;

/// Headless HUD harness: host messages in as JSON lines on stdin, visual
/// commands out as JSON lines on stdout.
#[derive(Debug, Parser)]
#[command(name = "controlroom-hud")]
struct Args {
    /// Base URL of the host's callback endpoints.
    #[arg(long, default_value = "http://127.0.0.1:39333")]
    base_url: String,

    /// Sector card id present in the markup. Repeatable.
    #[arg(long = "sector")]
    sectors: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let state = DisplayState::with_cards(args.sectors);
    let port = Arc::new(HostClient::new(args.base_url)?);
    let runtime = HudRuntime::spawn(state, JsonLineSink::stdout(), port);
    let handle = runtime.handle();

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_event(&line) {
            Ok(event) => handle.send(event),
            Err(e) => tracing::warn!("skipping line: {e}"),
        }
    }

    runtime.dispose().await;
    Ok(())
}
