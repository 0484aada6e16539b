pub mod bot;
pub mod webhook;

use crate::adapters::activity::ActivitySender;
use crate::adapters::auth::OAuthTokenSource;
use crate::adapters::clock::SystemClock;
use crate::adapters::html::PathSelectorEngine;
use crate::adapters::http::HttpFetcher;
use crate::config::settings::Settings;
use crate::core::engine::MenuEngine;
use crate::core::menu_store::MenuStoreBuilder;
use crate::core::token_cache::TokenCache;
use crate::domain::model::SiteConfig;
use crate::domain::ports::Clock;
use crate::utils::error::Result;
use bot::MenuBot;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub use bot::BotOutcome;

const API_REQUEST_TIMEOUT_SECS: u64 = 30;

pub type HttpMenuBot = MenuBot<HttpFetcher, PathSelectorEngine>;

pub fn build_bot(settings: &Settings, sites: Vec<SiteConfig>) -> Result<Arc<HttpMenuBot>> {
    build_bot_with_clock(settings, sites, Arc::new(SystemClock))
}

/// 組裝完整的 bot：抓取、解析、token 快取與回覆
pub fn build_bot_with_clock(
    settings: &Settings,
    sites: Vec<SiteConfig>,
    clock: Arc<dyn Clock>,
) -> Result<Arc<HttpMenuBot>> {
    let fetch_timeout = settings.fetch.timeout();
    let fetcher = HttpFetcher::new(fetch_timeout, settings.fetch.user_agent())?;
    let builder = MenuStoreBuilder::new(fetcher, PathSelectorEngine, fetch_timeout);
    let engine = MenuEngine::new(builder, sites, Arc::clone(&clock));

    let client = Client::builder()
        .timeout(Duration::from_secs(API_REQUEST_TIMEOUT_SECS))
        .build()?;
    let source = OAuthTokenSource::new(client.clone(), settings.auth.clone());
    let tokens = Arc::new(TokenCache::new(Arc::new(source), clock));
    let sender = ActivitySender::new(client, settings.api.clone(), tokens);

    Ok(Arc::new(MenuBot::new(engine, Arc::new(sender))))
}
