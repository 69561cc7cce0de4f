//! Bot configuration read from the process environment.
use std::{env, time::Duration};

/// Timings used by [`crate::Status::pause_if_not_priority`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PauseConfig {
    /// Sleep between priority checks while paused.
    pub poll_interval: Duration,
    /// Extra sleep while the loading screen is shown.
    pub loading_screen_delay: Duration,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            loading_screen_delay: Duration::from_millis(5),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotConfig {
    pub name: String,
    /// Delay between two polls of the main loop.
    pub tick_interval: Duration,
    /// World-state refresh period.
    pub refresh_interval: Duration,
    /// High-priority hook period.
    pub hook_interval: Duration,
    pub max_game_length: Duration,
    pub pause: PauseConfig,
    pub event_buffer: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "bot".to_string(),
            tick_interval: Duration::from_millis(30),
            refresh_interval: Duration::from_millis(10),
            hook_interval: Duration::from_millis(100),
            max_game_length: Duration::from_secs(1200),
            pause: PauseConfig::default(),
            event_buffer: 64,
        }
    }
}

impl BotConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BOT_NAME` - Name shown in logs and events (default: bot)
    /// - `BOT_TICK_MS` - Main loop tick (default: 30)
    /// - `BOT_REFRESH_MS` - World-state refresh period (default: 10)
    /// - `BOT_HOOK_MS` - High-priority hook period (default: 100)
    /// - `BOT_MAX_GAME_LENGTH_SECS` - Game length limit (default: 1200)
    /// - `BOT_PAUSE_POLL_MS` - Pause check period (default: 10)
    /// - `BOT_LOADING_SCREEN_DELAY_MS` - Loading screen sleep (default: 5)
    /// - `BOT_EVENT_BUFFER` - Event channel capacity (default: 64)
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(name) = env::var("BOT_NAME").ok().filter(|name| !name.trim().is_empty()) {
            config.name = name;
        }
        if let Some(ms) = read_env::<u64>("BOT_TICK_MS") {
            config.tick_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64>("BOT_REFRESH_MS") {
            config.refresh_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64>("BOT_HOOK_MS") {
            config.hook_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(secs) = read_env::<u64>("BOT_MAX_GAME_LENGTH_SECS") {
            config.max_game_length = Duration::from_secs(secs);
        }
        if let Some(ms) = read_env::<u64>("BOT_PAUSE_POLL_MS") {
            config.pause.poll_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64>("BOT_LOADING_SCREEN_DELAY_MS") {
            config.pause.loading_screen_delay = Duration::from_millis(ms);
        }
        if let Some(size) = read_env::<usize>("BOT_EVENT_BUFFER") {
            config.event_buffer = size.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
