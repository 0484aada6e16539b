use crate::core::engine::MenuEngine;
use crate::domain::model::{ChatMessage, MenuQuery};
use crate::domain::ports::{DocumentFetcher, ReplySender, SelectorEngine};
use crate::utils::error::Result;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotOutcome {
    /// Not a menu query; nothing was sent.
    Ignored,
    Replied,
}

pub struct MenuBot<F, E> {
    engine: MenuEngine<F, E>,
    sender: Arc<dyn ReplySender>,
}

impl<F: DocumentFetcher, E: SelectorEngine> MenuBot<F, E> {
    pub fn new(engine: MenuEngine<F, E>, sender: Arc<dyn ReplySender>) -> Self {
        Self { engine, sender }
    }

    /// Answers menu queries. Scraping problems only shrink the answer; a
    /// missing token or a rejected send is returned as an error.
    pub async fn handle(&self, message: &ChatMessage) -> Result<BotOutcome> {
        let Some(query) = MenuQuery::parse(&message.text) else {
            tracing::debug!("Ignoring non-menu message {}", message.id);
            return Ok(BotOutcome::Ignored);
        };

        tracing::info!(
            "💬 Menu query from '{}' in conversation {}",
            message.from.name,
            message.conversation.id
        );
        let answer = self.engine.answer(query.want_tomorrow).await;
        self.sender.send_reply(message, &answer).await?;
        Ok(BotOutcome::Replied)
    }
}
