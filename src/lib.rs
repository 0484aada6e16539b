pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{QueryArgs, ServeArgs};

pub use app::bot::{BotOutcome, MenuBot};
pub use app::{build_bot, build_bot_with_clock, HttpMenuBot};
pub use config::{load_sites, Settings};
pub use core::{engine::MenuEngine, menu_store::MenuStoreBuilder, token_cache::TokenCache};
pub use domain::model::{ChatMessage, MenuQuery, MenuStore, SiteConfig, WeekdayIndex};
pub use utils::error::{MenuError, Result};
