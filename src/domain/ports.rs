use crate::domain::model::{ChatMessage, TokenGrant};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};

/// Retrieves the raw HTML of a site.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Parses markup and evaluates selector expressions against it.
///
/// Documents are not required to be `Send`; callers parse and query
/// without holding a document across an `.await`.
pub trait SelectorEngine: Send + Sync {
    type Document;

    fn parse(&self, html: &str) -> Self::Document;

    /// Text (or attribute) values of every match, in document order, untrimmed.
    fn query(&self, document: &Self::Document, expr: &str) -> Result<Vec<String>>;
}

/// The auth endpoint behind the token cache.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<TokenGrant>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send_reply(&self, inbound: &ChatMessage, text: &str) -> Result<()>;
}
