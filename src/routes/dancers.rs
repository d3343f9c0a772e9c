use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{
    ClaimRequest, ClaimResponse, SearchQuery, SearchResponse, SuccessResponse,
    UpdateProfileRequest, UpsertStyleRequest,
};
use crate::routes::{current_dancer, AppState};
use crate::services::postgres::page_count;

/// Configure profile, style, search and claim routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/dancers/search", web::get().to(search))
        .route("/dancers/me", web::get().to(get_me))
        .route("/dancers/me", web::patch().to(update_me))
        .route("/dancers/me/styles", web::post().to(upsert_style))
        .route("/dancers/me/styles/{style_id}", web::delete().to(delete_style))
        .route("/dancers/{dancer_id}", web::get().to(get_dancer))
        .route("/claim", web::post().to(claim_profile));
}

/// Directory search
///
/// GET /api/v1/dancers/search?q=&style=&level=&state=&status=&teachers=&unclaimed=&page=
async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let (dancers, total) = state.store.search(&query).await?;

    tracing::debug!("Search page {} returned {} of {} dancers", query.page, dancers.len(), total);

    Ok(HttpResponse::Ok().json(SearchResponse {
        dancers: dancers.into_iter().map(|d| d.into_public()).collect(),
        total,
        page: query.page,
        total_pages: page_count(total),
    }))
}

/// The caller's profile, created on first access
///
/// GET /api/v1/dancers/me
async fn get_me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let dancer = state
        .store
        .find_or_create_by_subject(
            &user.subject,
            user.email.as_deref(),
            user.first_name.as_deref(),
            user.last_name.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(dancer))
}

/// Update whitelisted fields of the caller's own profile
///
/// PATCH /api/v1/dancers/me
async fn update_me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let dancer = current_dancer(&state, &user).await?;
    let updated = state.store.update_profile(dancer.id, &req).await?;

    tracing::info!("Profile {} updated", dancer.id);

    Ok(HttpResponse::Ok().json(updated))
}

/// Public profile
///
/// GET /api/v1/dancers/{dancer_id}
async fn get_dancer(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let dancer_id = path.into_inner();

    let dancer = state
        .store
        .find_dancer(dancer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(HttpResponse::Ok().json(dancer.into_public()))
}

/// Add a style or update the level of one already listed
///
/// POST /api/v1/dancers/me/styles
async fn upsert_style(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpsertStyleRequest>,
) -> Result<HttpResponse, ApiError> {
    let dancer = current_dancer(&state, &user).await?;
    let entry = state.store.upsert_style(dancer.id, &req).await?;

    tracing::debug!("Dancer {} lists {} at {}", dancer.id, req.style.as_str(), req.level.as_str());

    Ok(HttpResponse::Ok().json(entry))
}

/// Remove one of the caller's own style entries
///
/// DELETE /api/v1/dancers/me/styles/{style_id}
async fn delete_style(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let style_id = path.into_inner();
    let dancer = current_dancer(&state, &user).await?;

    if !state.store.delete_style(dancer.id, style_id).await? {
        return Err(ApiError::NotFound("Not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}

/// Claim a seeded profile, verified by NDCA id when the profile has one
///
/// POST /api/v1/claim
async fn claim_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<ClaimRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let target = state
        .store
        .find_dancer(req.dancer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    if target.is_claimed {
        return Err(ApiError::Conflict("This profile has already been claimed".to_string()));
    }

    if let Some(expected) = target.ndca_id.as_deref() {
        let provided = req.ndca_id.as_deref().map(str::trim);
        if provided != Some(expected.trim()) {
            return Err(ApiError::Validation("NDCA ID does not match our records".to_string()));
        }
    }

    if state.store.find_by_subject(&user.subject).await?.is_some() {
        return Err(ApiError::Conflict(
            "You already have a profile. Contact support to merge.".to_string(),
        ));
    }

    let dancer = state
        .store
        .claim(target.id, &user.subject, user.email.as_deref())
        .await?;

    tracing::info!("Profile {} ({}) claimed by {}", dancer.id, dancer.name(), user.subject);

    Ok(HttpResponse::Ok().json(ClaimResponse { success: true, dancer }))
}
