use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Day of week as used by site selectors and the renderer. 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekdayIndex(u8);

impl WeekdayIndex {
    pub const COUNT: usize = 7;

    pub fn new(index: usize) -> Option<Self> {
        (index < Self::COUNT).then_some(Self(index as u8))
    }

    pub fn from_date<D: Datelike>(date: &D) -> Self {
        Self(date.weekday().num_days_from_sunday() as u8)
    }

    pub fn next(self) -> Self {
        Self((self.0 + 1) % Self::COUNT as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = WeekdayIndex> {
        (0..Self::COUNT as u8).map(WeekdayIndex)
    }
}

impl fmt::Display for WeekdayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub url: String,
    #[serde(
        rename = "dayPaths",
        alias = "DayPaths",
        alias = "day_paths",
        alias = "day_selectors"
    )]
    pub day_selectors: [String; WeekdayIndex::COUNT],
}

impl SiteConfig {
    /// Selector for `day`, or `None` when the site publishes nothing that day.
    pub fn selector_for(&self, day: WeekdayIndex) -> Option<&str> {
        let selector = self.day_selectors[day.index()].as_str();
        (!selector.is_empty()).then_some(selector)
    }

    pub fn selectors(&self) -> impl Iterator<Item = (WeekdayIndex, &str)> + '_ {
        WeekdayIndex::all().filter_map(move |day| self.selector_for(day).map(|s| (day, s)))
    }

    pub fn has_any_selector(&self) -> bool {
        self.selectors().next().is_some()
    }
}

pub type MenuEntry = String;

/// Extracted entries keyed by `(site name, weekday)`. Rebuilt for every query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuStore {
    buckets: HashMap<(String, WeekdayIndex), Vec<MenuEntry>>,
}

impl MenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends in order; an empty batch leaves the bucket untouched.
    pub fn append<I>(&mut self, site: &str, day: WeekdayIndex, entries: I)
    where
        I: IntoIterator<Item = MenuEntry>,
    {
        let mut entries = entries.into_iter().peekable();
        if entries.peek().is_none() {
            return;
        }
        self.buckets
            .entry((site.to_string(), day))
            .or_default()
            .extend(entries);
    }

    pub fn entries(&self, site: &str, day: WeekdayIndex) -> &[MenuEntry] {
        self.buckets
            .get(&(site.to_string(), day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, site: &str, day: WeekdayIndex) -> bool {
        self.buckets.contains_key(&(site.to_string(), day))
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken {
    pub token: String,
    pub expires_at: DateTime<Local>,
}

impl BearerToken {
    pub fn is_valid_at(&self, now: DateTime<Local>) -> bool {
        now < self.expires_at
    }
}

/// Response body of the client-credentials token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub ext_expires_in: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Inbound chat activity as posted to the webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub from: Address,
    #[serde(default, alias = "recipient")]
    pub to: Address,
    #[serde(default)]
    pub conversation: Address,
}

/// Outbound reply activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "channelId")]
    pub channel_id: String,
    pub from: Address,
    pub to: Address,
    pub text: String,
}

impl Activity {
    /// Reply to `inbound`: sender and recipient swap places.
    pub fn reply_to(inbound: &ChatMessage, channel_id: &str, text: &str) -> Self {
        Self {
            kind: "message".to_string(),
            channel_id: channel_id.to_string(),
            from: inbound.to.clone(),
            to: inbound.from.clone(),
            text: text.to_string(),
        }
    }
}

const MENU_KEYWORD: &str = "menu";
const TOMORROW_KEYWORD: &str = "tomorrow";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuQuery {
    pub want_tomorrow: bool,
}

impl MenuQuery {
    pub fn parse(text: &str) -> Option<Self> {
        let lowered = text.trim_start().to_lowercase();
        if !lowered.starts_with(MENU_KEYWORD) {
            return None;
        }
        Some(Self {
            want_tomorrow: lowered.contains(TOMORROW_KEYWORD),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn site(selectors: [&str; 7]) -> SiteConfig {
        SiteConfig {
            name: "Canteen".to_string(),
            url: "http://example.com".to_string(),
            day_selectors: selectors.map(str::to_string),
        }
    }

    #[test]
    fn test_weekday_from_date_counts_from_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        assert_eq!(WeekdayIndex::from_date(&sunday).index(), 0);
        assert_eq!(WeekdayIndex::from_date(&monday).index(), 1);
        assert_eq!(WeekdayIndex::from_date(&saturday).index(), 6);
    }

    #[test]
    fn test_weekday_next_wraps() {
        assert_eq!(WeekdayIndex::new(6).unwrap().next(), WeekdayIndex::new(0).unwrap());
        assert_eq!(WeekdayIndex::new(2).unwrap().next().index(), 3);
        assert!(WeekdayIndex::new(7).is_none());
    }

    #[test]
    fn test_site_selectors_skip_empty() {
        let site = site(["", "//item", "", "", "//li", "", ""]);
        let days: Vec<usize> = site.selectors().map(|(d, _)| d.index()).collect();
        assert_eq!(days, vec![1, 4]);
        assert!(site.selector_for(WeekdayIndex::new(0).unwrap()).is_none());
        assert!(site.has_any_selector());
        assert!(!self::site([""; 7]).has_any_selector());
    }

    #[test]
    fn test_site_config_from_json_requires_seven_paths() {
        let json = r#"{"name":"A","url":"http://a","dayPaths":["","//x","","","","",""]}"#;
        let site: SiteConfig = serde_json::from_str(json).unwrap();
        assert_eq!(site.day_selectors[1], "//x");

        let short = r#"{"name":"A","url":"http://a","dayPaths":["","//x"]}"#;
        assert!(serde_json::from_str::<SiteConfig>(short).is_err());
    }

    #[test]
    fn test_menu_store_append_keeps_order_and_skips_empty() {
        let mut store = MenuStore::new();
        let monday = WeekdayIndex::new(1).unwrap();
        store.append("A", monday, vec!["soup".to_string()]);
        store.append("A", monday, vec!["salad".to_string(), "soup".to_string()]);
        store.append("B", monday, Vec::new());

        assert_eq!(store.entries("A", monday), ["soup", "salad", "soup"]);
        assert!(!store.contains("B", monday));
        assert!(store.entries("B", monday).is_empty());
        assert_eq!(store.bucket_count(), 1);
    }

    #[test]
    fn test_menu_query_parse() {
        assert_eq!(MenuQuery::parse("menu"), Some(MenuQuery { want_tomorrow: false }));
        assert_eq!(
            MenuQuery::parse("  Menu for TOMORROW please"),
            Some(MenuQuery { want_tomorrow: true })
        );
        assert_eq!(MenuQuery::parse("what is the menu"), None);
        assert_eq!(MenuQuery::parse(""), None);
    }

    #[test]
    fn test_chat_message_accepts_recipient_alias() {
        let json = r#"{
            "type": "message",
            "text": "menu",
            "from": {"id": "user-1", "name": "User"},
            "recipient": {"id": "bot-1", "name": "Bot"},
            "conversation": {"id": "conv-1"}
        }"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.to.id, "bot-1");
        assert_eq!(msg.conversation.id, "conv-1");
        assert!(msg.timestamp.is_empty());

        let reply = Activity::reply_to(&msg, "skype", "hello");
        assert_eq!(reply.from.id, "bot-1");
        assert_eq!(reply.to.id, "user-1");
        assert_eq!(reply.kind, "message");
    }
}
