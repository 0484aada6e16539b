//! Process-wide bearer token with lazy, single-flight refresh.
//!
//! A valid token is served with a single atomic load. When the token is missing or
//! expired, the first caller installs a shared refresh future under the
//! `inflight` mutex; everyone arriving before it completes awaits the same
//! future and gets the same outcome, success or failure. The future itself
//! publishes the new token and clears the slot, so a cancelled caller cannot
//! leave the cache stuck.

use crate::domain::model::{BearerToken, TokenGrant};
use crate::domain::ports::{Clock, TokenSource};
use crate::utils::error::{MenuError, Result};
use arc_swap::ArcSwapOption;
use chrono::{DateTime, Duration, Local};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type RefreshFuture = Shared<BoxFuture<'static, std::result::Result<BearerToken, String>>>;

struct Inflight {
    id: u64,
    future: RefreshFuture,
}

pub struct TokenCache {
    source: Arc<dyn TokenSource>,
    clock: Arc<dyn Clock>,
    current: Arc<ArcSwapOption<BearerToken>>,
    inflight: Arc<Mutex<Option<Inflight>>>,
    next_id: AtomicU64,
}

impl TokenCache {
    pub fn new(source: Arc<dyn TokenSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            current: Arc::new(ArcSwapOption::empty()),
            inflight: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(0),
        }
    }

    /// Cached token while it is valid, otherwise the result of a (shared) refresh.
    pub async fn get_token(&self) -> Result<String> {
        if let Some(token) = self.valid_token() {
            return Ok(token);
        }
        self.refresh_shared(false).await
    }

    /// Forces a new token, e.g. after the messaging API answered 401.
    /// Joins a refresh that is already running instead of starting another.
    pub async fn refresh(&self) -> Result<String> {
        self.refresh_shared(true).await
    }

    pub fn is_valid(&self) -> bool {
        self.valid_token().is_some()
    }

    pub fn expires_at(&self) -> Option<DateTime<Local>> {
        self.current.load_full().map(|token| token.expires_at)
    }

    fn valid_token(&self) -> Option<String> {
        let now = self.clock.now();
        let current = self.current.load();
        (*current)
            .as_ref()
            .filter(|token| token.is_valid_at(now))
            .map(|token| token.token.clone())
    }

    async fn refresh_shared(&self, force: bool) -> Result<String> {
        let future = {
            let mut slot = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(inflight) => {
                    tracing::debug!("Joining in-flight token refresh #{}", inflight.id);
                    inflight.future.clone()
                }
                None => {
                    // Another caller may have finished a refresh since our fast-path check.
                    if !force {
                        if let Some(token) = self.valid_token() {
                            return Ok(token);
                        }
                    }
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let future = self.start_refresh(id);
                    *slot = Some(Inflight {
                        id,
                        future: future.clone(),
                    });
                    future
                }
            }
        };

        future
            .await
            .map(|token| token.token)
            .map_err(|message| MenuError::AuthError { message })
    }

    fn start_refresh(&self, id: u64) -> RefreshFuture {
        let source = Arc::clone(&self.source);
        let clock = Arc::clone(&self.clock);
        let current = Arc::clone(&self.current);
        let inflight = Arc::clone(&self.inflight);

        async move {
            tracing::info!("🔑 Refreshing bearer token");
            let outcome = match source.fetch_token().await {
                Ok(grant) => bearer_from_grant(grant, clock.now()),
                Err(e) => Err(e.to_string()),
            };

            {
                let mut slot = inflight.lock().unwrap_or_else(PoisonError::into_inner);
                current.store(outcome.as_ref().ok().cloned().map(Arc::new));
                if slot.as_ref().map(|i| i.id) == Some(id) {
                    *slot = None;
                }
            }

            match &outcome {
                Ok(token) => tracing::info!("✅ Bearer token valid until {}", token.expires_at),
                Err(message) => tracing::error!("❌ Bearer token refresh failed: {}", message),
            }
            outcome
        }
        .boxed()
        .shared()
    }
}

fn bearer_from_grant(
    grant: TokenGrant,
    fetched_at: DateTime<Local>,
) -> std::result::Result<BearerToken, String> {
    if grant.access_token.trim().is_empty() {
        return Err("auth endpoint returned an empty access token".to_string());
    }
    let lifetime = Duration::try_seconds(grant.expires_in.max(0))
        .ok_or_else(|| format!("token lifetime out of range: {}", grant.expires_in))?;
    Ok(BearerToken {
        token: grant.access_token,
        expires_at: fetched_at + lifetime,
    })
}
