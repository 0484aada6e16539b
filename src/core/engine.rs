use crate::core::menu_store::MenuStoreBuilder;
use crate::core::render::render;
use crate::domain::model::SiteConfig;
use crate::domain::ports::{Clock, DocumentFetcher, SelectorEngine};
use std::sync::Arc;

/// Answers one menu query: fresh store, then today's or tomorrow's text.
pub struct MenuEngine<F, E> {
    builder: MenuStoreBuilder<F, E>,
    sites: Vec<SiteConfig>,
    clock: Arc<dyn Clock>,
}

impl<F: DocumentFetcher, E: SelectorEngine> MenuEngine<F, E> {
    pub fn new(builder: MenuStoreBuilder<F, E>, sites: Vec<SiteConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            builder,
            sites,
            clock,
        }
    }

    pub async fn answer(&self, want_tomorrow: bool) -> String {
        let today = self.clock.now().date_naive();
        tracing::info!(
            "🍽️ Building menu from {} sites (tomorrow: {})",
            self.sites.len(),
            want_tomorrow
        );

        let store = self.builder.build(&self.sites).await;
        render(&store, &self.sites, want_tomorrow, today)
    }
}
