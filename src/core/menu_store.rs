use crate::core::extractor::extract;
use crate::domain::model::{MenuStore, SiteConfig};
use crate::domain::ports::{DocumentFetcher, SelectorEngine};
use crate::utils::error::{MenuError, Result};
use futures::future::join_all;
use std::time::Duration;

/// Fetches every configured site and extracts its weekday menus into a fresh store.
pub struct MenuStoreBuilder<F, E> {
    fetcher: F,
    engine: E,
    fetch_timeout: Duration,
}

impl<F: DocumentFetcher, E: SelectorEngine> MenuStoreBuilder<F, E> {
    pub fn new(fetcher: F, engine: E, fetch_timeout: Duration) -> Self {
        Self {
            fetcher,
            engine,
            fetch_timeout,
        }
    }

    /// Never fails: a site that cannot be fetched, or a weekday whose selector
    /// does not compile, is logged and left out of the store.
    pub async fn build(&self, sites: &[SiteConfig]) -> MenuStore {
        let fetches = sites
            .iter()
            .filter(|site| site.has_any_selector())
            .map(|site| async move { (site, self.fetch_site(site).await) });

        let documents = join_all(fetches).await;

        let mut store = MenuStore::new();
        for (site, document) in documents {
            match document {
                Ok(html) => self.populate(&mut store, site, &html),
                Err(e) => {
                    tracing::warn!("⚠️ Skipping site '{}': {}", site.name, e);
                }
            }
        }

        tracing::debug!("Menu store built with {} buckets", store.bucket_count());
        store
    }

    async fn fetch_site(&self, site: &SiteConfig) -> Result<String> {
        tracing::debug!("Fetching menu page for '{}' from {}", site.name, site.url);
        match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(&site.url)).await {
            Ok(result) => result,
            Err(_) => Err(MenuError::FetchError {
                url: site.url.clone(),
                message: format!("timed out after {:?}", self.fetch_timeout),
            }),
        }
    }

    // The parsed document stays inside this synchronous call.
    fn populate(&self, store: &mut MenuStore, site: &SiteConfig, html: &str) {
        let document = self.engine.parse(html);

        for (day, selector) in site.selectors() {
            match extract(&self.engine, &document, selector) {
                Ok(entries) => {
                    tracing::debug!(
                        "Site '{}' weekday {}: {} entries",
                        site.name,
                        day,
                        entries.len()
                    );
                    store.append(&site.name, day, entries);
                }
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Skipping weekday {} of site '{}': {}",
                        day,
                        site.name,
                        e
                    );
                }
            }
        }
    }
}
