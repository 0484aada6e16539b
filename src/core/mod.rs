pub mod engine;
pub mod extractor;
pub mod menu_store;
pub mod render;
pub mod token_cache;

pub use crate::domain::model::{MenuStore, SiteConfig, WeekdayIndex};
pub use crate::domain::ports::{Clock, DocumentFetcher, ReplySender, SelectorEngine, TokenSource};
pub use crate::utils::error::Result;
