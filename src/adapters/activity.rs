use crate::config::settings::ApiSettings;
use crate::core::token_cache::TokenCache;
use crate::domain::model::{Activity, ChatMessage};
use crate::domain::ports::ReplySender;
use crate::utils::error::{MenuError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;

pub const CONVERSATION_ID_PLACEHOLDER: &str = "<conversationId>";

/// Posts reply activities to the messaging API.
pub struct ActivitySender {
    client: Client,
    settings: ApiSettings,
    tokens: Arc<TokenCache>,
}

impl ActivitySender {
    pub fn new(client: Client, settings: ApiSettings, tokens: Arc<TokenCache>) -> Self {
        Self {
            client,
            settings,
            tokens,
        }
    }

    pub fn activity_url(&self, conversation_id: &str) -> String {
        format!("{}{}", self.settings.url, self.settings.activity_endpoint)
            .replacen(CONVERSATION_ID_PLACEHOLDER, conversation_id, 1)
    }

    async fn post(&self, url: &str, body: &[u8], token: &str) -> Result<Response> {
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json;charset=utf-8")
            .body(body.to_vec())
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl ReplySender for ActivitySender {
    async fn send_reply(&self, inbound: &ChatMessage, text: &str) -> Result<()> {
        let url = self.activity_url(&inbound.conversation.id);
        let activity = Activity::reply_to(inbound, &self.settings.channel_id, text);
        let body = serde_json::to_vec(&activity)?;

        let token = self.tokens.get_token().await?;
        tracing::debug!("Sending reply to {}", url);
        let mut response = self.post(&url, &body, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("⚠️ Messaging API rejected the token, refreshing and retrying once");
            let token = self.tokens.refresh().await?;
            response = self.post(&url, &body, &token).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MenuError::SendError {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!("📨 Reply delivered to conversation {}", inbound.conversation.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Address, TokenGrant};
    use crate::domain::ports::{Clock, TokenSource};
    use chrono::{DateTime, Local};
    use httpmock::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SystemNow;

    impl Clock for SystemNow {
        fn now(&self) -> DateTime<Local> {
            Local::now()
        }
    }

    #[derive(Default)]
    struct SequenceSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TokenSource for SequenceSource {
        async fn fetch_token(&self) -> Result<TokenGrant> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(TokenGrant {
                access_token: format!("token-{}", n),
                expires_in: 3600,
                token_type: None,
                ext_expires_in: None,
            })
        }
    }

    fn inbound() -> ChatMessage {
        ChatMessage {
            kind: "message".to_string(),
            text: "menu".to_string(),
            from: Address {
                id: "user-1".to_string(),
                name: "User".to_string(),
            },
            to: Address {
                id: "bot-1".to_string(),
                name: "Bot".to_string(),
            },
            conversation: Address {
                id: "conv-1".to_string(),
                name: String::new(),
            },
            ..Default::default()
        }
    }

    struct RejectingSource;

    #[async_trait]
    impl TokenSource for RejectingSource {
        async fn fetch_token(&self) -> Result<TokenGrant> {
            Err(MenuError::AuthError {
                message: "auth endpoint returned 401: invalid_client".to_string(),
            })
        }
    }

    fn sender(base_url: String, source: Arc<dyn TokenSource>) -> ActivitySender {
        let settings = ApiSettings {
            url: base_url,
            activity_endpoint: "/v3/conversations/<conversationId>/activities".to_string(),
            channel_id: "skype".to_string(),
        };
        let tokens = Arc::new(TokenCache::new(source, Arc::new(SystemNow)));
        ActivitySender::new(Client::new(), settings, tokens)
    }

    #[test]
    fn test_activity_url_substitutes_conversation() {
        let sender = sender(
            "https://api.example.com".to_string(),
            Arc::new(SequenceSource::default()),
        );
        assert_eq!(
            sender.activity_url("29:abc"),
            "https://api.example.com/v3/conversations/29:abc/activities"
        );
    }

    #[tokio::test]
    async fn test_send_reply_posts_swapped_activity_with_bearer() {
        let server = MockServer::start();
        let api = server.mock(|when, then| {
            when.method(POST)
                .path("/v3/conversations/conv-1/activities")
                .header("authorization", "Bearer token-1")
                .json_body(serde_json::json!({
                    "type": "message",
                    "channelId": "skype",
                    "from": {"id": "bot-1", "name": "Bot"},
                    "to": {"id": "user-1", "name": "User"},
                    "text": "No menus today.\n"
                }));
            then.status(201);
        });

        let source = Arc::new(SequenceSource::default());
        sender(server.base_url(), source.clone())
            .send_reply(&inbound(), "No menus today.\n")
            .await
            .unwrap();

        api.assert();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_triggers_single_refresh_and_retry() {
        let server = MockServer::start();
        let rejected = server.mock(|when, then| {
            when.method(POST)
                .path("/v3/conversations/conv-1/activities")
                .header("authorization", "Bearer token-1");
            then.status(401);
        });
        let accepted = server.mock(|when, then| {
            when.method(POST)
                .path("/v3/conversations/conv-1/activities")
                .header("authorization", "Bearer token-2");
            then.status(200);
        });

        let source = Arc::new(SequenceSource::default());
        sender(server.base_url(), source.clone())
            .send_reply(&inbound(), "hi")
            .await
            .unwrap();

        rejected.assert();
        accepted.assert();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_server_error_is_send_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v3/conversations/conv-1/activities");
            then.status(500).body("boom");
        });

        let err = sender(server.base_url(), Arc::new(SequenceSource::default()))
            .send_reply(&inbound(), "hi")
            .await
            .unwrap_err();

        match err {
            MenuError::SendError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_reply_is_sent_without_a_token() {
        let server = MockServer::start();
        let api = server.mock(|when, then| {
            when.method(POST).path("/v3/conversations/conv-1/activities");
            then.status(201);
        });

        let err = sender(server.base_url(), Arc::new(RejectingSource))
            .send_reply(&inbound(), "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, MenuError::AuthError { .. }));
        assert_eq!(api.hits(), 0);
    }
}
