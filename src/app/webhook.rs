use crate::app::bot::{BotOutcome, MenuBot};
use crate::domain::model::ChatMessage;
use crate::domain::ports::{DocumentFetcher, SelectorEngine};
use crate::utils::error::{MenuError, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn router<F, E>(bot: Arc<MenuBot<F, E>>, endpoint: &str) -> Router
where
    F: DocumentFetcher + 'static,
    E: SelectorEngine + 'static,
{
    Router::new()
        .route(endpoint, post(receive_activity::<F, E>))
        .route("/health", get(health))
        .with_state(bot)
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app).await.map_err(MenuError::IoError)
}

async fn health() -> &'static str {
    "ok"
}

/// Acknowledges with 201 right away; the answer is produced and sent on a
/// separate task.
async fn receive_activity<F, E>(State(bot): State<Arc<MenuBot<F, E>>>, body: Bytes) -> StatusCode
where
    F: DocumentFetcher + 'static,
    E: SelectorEngine + 'static,
{
    let message: ChatMessage = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            let err = MenuError::PayloadError {
                message: e.to_string(),
            };
            tracing::warn!("⚠️ {}", err);
            return StatusCode::BAD_REQUEST;
        }
    };

    tracing::debug!(
        "Received {} activity {} from {}",
        message.kind,
        message.id,
        message.from.id
    );

    tokio::spawn(async move {
        match bot.handle(&message).await {
            Ok(BotOutcome::Replied) => {}
            Ok(BotOutcome::Ignored) => {}
            Err(e) if e.is_recoverable() => {
                tracing::warn!(
                    "⚠️ Reply to message {} not delivered: {} (Category: {:?})",
                    message.id,
                    e,
                    e.category()
                );
            }
            Err(e) => {
                tracing::error!(
                    "❌ Failed to answer message {}: {} (Category: {:?}, Severity: {:?})",
                    message.id,
                    e,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            }
        }
    });

    StatusCode::CREATED
}
