use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{CreatePartnerRequest, CreateReviewRequest, RequestStatus, RespondPartnerRequest};
use crate::routes::{current_dancer, AppState};

/// Configure partner request and teacher review routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/partner-requests", web::post().to(send_request))
        .route("/partner-requests", web::get().to(incoming_requests))
        .route("/partner-requests/{request_id}", web::patch().to(respond_to_request))
        .route("/teachers/{teacher_id}/reviews", web::post().to(review_teacher));
}

/// Send a partner request
///
/// POST /api/v1/partner-requests
async fn send_request(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreatePartnerRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let sender = current_dancer(&state, &user).await?;

    if sender.id == req.to_dancer_id {
        return Err(ApiError::Validation("Cannot send a request to yourself".to_string()));
    }

    if state.store.find_dancer(req.to_dancer_id).await?.is_none() {
        return Err(ApiError::NotFound("Recipient not found".to_string()));
    }

    let message = req.message.as_deref().map(str::trim).filter(|m| !m.is_empty());
    let request = state
        .store
        .create_partner_request(sender.id, req.to_dancer_id, message)
        .await?;

    tracing::info!("Partner request {} sent from {} to {}", request.id, sender.id, req.to_dancer_id);

    Ok(HttpResponse::Created().json(request))
}

/// Pending requests addressed to the caller, newest first
///
/// GET /api/v1/partner-requests
async fn incoming_requests(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let requests = match state.store.find_by_subject(&user.subject).await? {
        Some(dancer) => state.store.incoming_requests(dancer.id).await?,
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(requests))
}

/// Accept or decline a request; only its recipient may answer
///
/// PATCH /api/v1/partner-requests/{request_id}
async fn respond_to_request(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<RespondPartnerRequest>,
) -> Result<HttpResponse, ApiError> {
    let request_id = path.into_inner();

    if req.status == RequestStatus::Pending {
        return Err(ApiError::Validation("Invalid status".to_string()));
    }

    let recipient = current_dancer(&state, &user).await?;

    let request = state
        .store
        .find_partner_request(request_id)
        .await?
        .filter(|request| request.to_dancer_id == recipient.id)
        .ok_or_else(|| ApiError::NotFound("Not found".to_string()))?;

    let updated = state.store.set_request_status(request.id, req.status).await?;

    tracing::info!("Partner request {} marked {}", updated.id, updated.status.as_str());

    Ok(HttpResponse::Ok().json(updated))
}

/// Review a teacher; requires an accepted request from the caller to that teacher
///
/// POST /api/v1/teachers/{teacher_id}/reviews
async fn review_teacher(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let teacher_id = path.into_inner();
    let reviewer = current_dancer(&state, &user).await?;

    let body = req.body.trim();
    if body.is_empty() {
        return Err(ApiError::Validation("Review body is required".to_string()));
    }

    if !state.store.has_accepted_partnership(reviewer.id, teacher_id).await? {
        return Err(ApiError::Forbidden(
            "Only confirmed Pro-Am partners can leave reviews".to_string(),
        ));
    }

    let review = state
        .store
        .upsert_review(teacher_id, reviewer.id, req.rating, body)
        .await?;

    Ok(HttpResponse::Created().json(review))
}
