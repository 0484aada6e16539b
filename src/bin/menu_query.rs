use anyhow::Context;
use clap::Parser;
use menu_bot::adapters::clock::SystemClock;
use menu_bot::adapters::html::PathSelectorEngine;
use menu_bot::adapters::http::HttpFetcher;
use menu_bot::config::settings::FetchSettings;
use menu_bot::utils::logger;
use menu_bot::{load_sites, MenuEngine, MenuStoreBuilder, QueryArgs, Settings};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_SITES_FILE: &str = "sites.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = QueryArgs::parse();
    logger::init_cli_logger(args.verbose);

    // 有設定檔時沿用其網站清單與抓取設定，命令列參數優先
    let (sites_file, fetch) = match &args.config {
        Some(path) => {
            let settings = Settings::from_file(path)
                .with_context(|| format!("failed to load settings file '{}'", path))?;
            (settings.sites_file, settings.fetch)
        }
        None => (DEFAULT_SITES_FILE.to_string(), FetchSettings::default()),
    };
    let sites_file = args.sites.unwrap_or(sites_file);
    let timeout = args
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| fetch.timeout());

    let sites = load_sites(&sites_file)
        .with_context(|| format!("failed to load sites file '{}'", sites_file))?;

    let fetcher = HttpFetcher::new(timeout, fetch.user_agent())?;
    let builder = MenuStoreBuilder::new(fetcher, PathSelectorEngine, timeout);
    let engine = MenuEngine::new(builder, sites, Arc::new(SystemClock));

    print!("{}", engine.answer(args.tomorrow).await);
    Ok(())
}
