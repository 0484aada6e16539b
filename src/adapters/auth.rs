use crate::config::settings::AuthSettings;
use crate::domain::model::TokenGrant;
use crate::domain::ports::TokenSource;
use crate::utils::error::{MenuError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// OAuth2 client-credentials grant against the bot auth endpoint.
pub struct OAuthTokenSource {
    client: Client,
    settings: AuthSettings,
}

impl OAuthTokenSource {
    pub fn new(client: Client, settings: AuthSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl TokenSource for OAuthTokenSource {
    async fn fetch_token(&self) -> Result<TokenGrant> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("scope", self.settings.scope.as_str()),
        ];

        tracing::debug!("Requesting token from {}", self.settings.url);
        let response = self
            .client
            .post(&self.settings.url)
            .form(&form)
            .send()
            .await
            .map_err(|e| MenuError::AuthError {
                message: format!("auth endpoint unreachable: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MenuError::AuthError {
                message: format!("auth endpoint returned {}: {}", status.as_u16(), body),
            });
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| MenuError::AuthError {
                message: format!("malformed token response: {}", e),
            })
    }
}
