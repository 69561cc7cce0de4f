//! Bot entry point.
//!
//! Plays the demo runs against a simulated game, printing lifecycle events
//! as JSON lines on stdout. Ctrl-C stops the bot.
//!
//! ```bash
//! BOT_NAME=sorc BOT_TICK_MS=20 RUST_LOG=debug cargo run -p bot-client
//! ```

use std::sync::Arc;

use anyhow::Result;
use bot_client::{POTION_THRESHOLD, PotionHook, SimulatedGame, demo_runs, logging};
use runtime::{Bot, BotConfig, BotEvent};
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = BotConfig::from_env();
    let _guard = logging::setup_logging(&config.name)?;

    let game = Arc::new(SimulatedGame::demo());
    let bot = Bot::new(config, game.clone())
        .with_input(game.clone())
        .with_hook(PotionHook::new(POTION_THRESHOLD));
    let mut events = bot.events().subscribe();

    let running = bot.start(demo_runs());
    let handle = running.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping");
            handle.stop();
        }
    });

    let join = running.join();
    tokio::pin!(join);
    let result = loop {
        tokio::select! {
            result = &mut join => break result,
            event = events.recv() => print_event(event)?,
        }
    };
    while let Ok(event) = events.try_recv() {
        print_event(Ok(event))?;
    }

    match &result {
        Ok(()) => tracing::info!(keys = game.pressed_keys().len(), "bot done"),
        Err(err) => tracing::error!(error = %err, "bot failed"),
    }
    Ok(result?)
}

fn print_event(event: Result<BotEvent, RecvError>) -> Result<()> {
    match event {
        Ok(event) => println!("{}", serde_json::to_string(&event)?),
        Err(RecvError::Lagged(missed)) => tracing::warn!(missed, "event printer lagging"),
        Err(RecvError::Closed) => {}
    }
    Ok(())
}
