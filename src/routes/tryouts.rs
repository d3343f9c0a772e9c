use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{CreateTryoutRequest, Tryout, UpdateTryoutRequest};
use crate::routes::{current_dancer, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/tryouts", web::get().to(list_tryouts))
        .route("/tryouts", web::post().to(propose_tryout))
        .route("/tryouts/{tryout_id}", web::patch().to(update_tryout));
}

/// Proposed and confirmed tryouts the caller takes part in, soonest first
///
/// GET /api/v1/tryouts
async fn list_tryouts(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let dancer = current_dancer(&state, &user).await?;
    let tryouts = state.store.active_tryouts(dancer.id).await?;

    Ok(HttpResponse::Ok().json(tryouts))
}

/// POST /api/v1/tryouts
async fn propose_tryout(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateTryoutRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    if req.location_text.trim().is_empty() {
        return Err(ApiError::Validation("Location is required".to_string()));
    }

    let requester = current_dancer(&state, &user).await?;

    if requester.id == req.recipient_id {
        return Err(ApiError::Validation("Cannot schedule a tryout with yourself".to_string()));
    }

    if state.store.find_dancer(req.recipient_id).await?.is_none() {
        return Err(ApiError::NotFound("Recipient not found".to_string()));
    }

    let tryout = state.store.create_tryout(requester.id, &req).await?;

    tracing::info!("Tryout {} proposed: {} -> {}", tryout.id, requester.id, req.recipient_id);

    Ok(HttpResponse::Created().json(tryout))
}

/// Change status, time, place or notes; the caller becomes the latest proposer
///
/// PATCH /api/v1/tryouts/{tryout_id}
async fn update_tryout(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateTryoutRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let tryout_id = path.into_inner();
    let dancer = current_dancer(&state, &user).await?;

    let tryout = state
        .store
        .find_tryout(tryout_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tryout not found".to_string()))?;

    check_change(&tryout, dancer.id, &req)?;

    let updated = state.store.update_tryout(tryout.id, dancer.id, &req).await?;

    tracing::info!("Tryout {} now {} (changed by {})", updated.id, updated.status.as_str(), dancer.id);

    Ok(HttpResponse::Ok().json(updated))
}

/// Only participants may change a tryout, and only along the lifecycle
fn check_change(tryout: &Tryout, dancer_id: Uuid, update: &UpdateTryoutRequest) -> Result<(), ApiError> {
    if !tryout.involves(dancer_id) {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    match update.status {
        Some(next) if !tryout.status.can_transition_to(next) => Err(ApiError::Validation(format!(
            "Cannot transition from {} to {}",
            tryout.status.as_str(),
            next.as_str()
        ))),
        _ => Ok(()),
    }
}
