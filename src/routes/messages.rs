use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{ConversationQuery, SendMessageRequest};
use crate::routes::{current_dancer, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/messages/threads", web::get().to(threads))
        .route("/messages", web::get().to(conversation))
        .route("/messages", web::post().to(send_message));
}

/// GET /api/v1/messages?with={dancer_id}
///
/// Returns the conversation oldest first and marks the caller's unread messages as read.
async fn conversation(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ConversationQuery>,
) -> Result<HttpResponse, ApiError> {
    let messages = match state.store.find_by_subject(&user.subject).await? {
        Some(dancer) => state.store.conversation(dancer.id, query.with).await?,
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(messages))
}

/// POST /api/v1/messages
async fn send_message(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Message content is required".to_string()));
    }

    let sender = current_dancer(&state, &user).await?;

    if sender.id == req.receiver_id {
        return Err(ApiError::Validation("Cannot message yourself".to_string()));
    }

    if state.store.find_dancer(req.receiver_id).await?.is_none() {
        return Err(ApiError::NotFound("Recipient not found".to_string()));
    }

    let message = state.store.send_message(sender.id, req.receiver_id, content).await?;

    Ok(HttpResponse::Created().json(message))
}

/// GET /api/v1/messages/threads
async fn threads(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let threads = match state.store.find_by_subject(&user.subject).await? {
        Some(dancer) => state.store.threads(dancer.id).await?,
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(threads))
}
