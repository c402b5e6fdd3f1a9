//! Chat route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use super::PageChrome;
use crate::middleware::RequireAuth;
use crate::navigation::Route;
use crate::services::chat::{ChatError, ChatMessage};
use crate::state::AppState;

/// Chat message form data.
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub message: String,
}

/// Chat page template.
#[derive(Template, WebTemplate)]
#[template(path = "chat.html")]
pub struct ChatTemplate {
    pub chrome: PageChrome,
    pub messages: Vec<ChatMessage>,
    pub typing: bool,
}

/// Display the conversation.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, _auth: RequireAuth) -> impl IntoResponse {
    ChatTemplate {
        chrome: PageChrome::take(&state, Some(Route::Chat)),
        messages: state.chat().messages(),
        typing: state.chat().is_typing(),
    }
}

/// Post a message. Blank messages are ignored.
#[instrument(skip_all)]
pub async fn send(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Form(form): Form<MessageForm>,
) -> Redirect {
    match state.chat().send(&form.message) {
        Ok(_reply) => {}
        Err(ChatError::EmptyMessage) => tracing::debug!("ignoring blank chat message"),
    }
    Redirect::to(Route::Chat.path())
}
