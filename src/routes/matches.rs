use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::{HealthResponse, MatchesResponse, ScorePairRequest};
use crate::routes::{current_dancer, AppState};

/// Configure health and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches", web::get().to(my_matches))
        .route("/matches/score", web::post().to(score_pair));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score an explicit pair without touching the store
///
/// POST /api/v1/matches/score
///
/// Request body:
/// ```json
/// {
///   "viewer": { "partnershipTypes": ["PRO_AM"], "danceStyles": [{ "style": "WALTZ", "level": "GOLD" }] },
///   "candidate": { "isTeacher": true, "openToProAm": true, "danceStyles": [...] }
/// }
/// ```
async fn score_pair(
    state: web::Data<AppState>,
    req: web::Json<ScorePairRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let result = state.matcher.score_pair(&req.viewer, &req.candidate);

    tracing::debug!("Scored pair: {} ({:?})", result.score, result.mode);

    Ok(HttpResponse::Ok().json(result))
}

/// Ranked partner and Pro-Am teacher matches for the caller
///
/// GET /api/v1/matches
async fn my_matches(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let viewer = current_dancer(&state, &user).await?;

    let candidates = state
        .store
        .list_candidates(viewer.id, i64::from(state.candidate_pool))
        .await?;

    let lists = state.matcher.rank(&viewer, candidates);

    tracing::info!(
        "Returning {} partner and {} teacher matches for {} (from {} candidates)",
        lists.partners.len(),
        lists.teachers.len(),
        viewer.id,
        lists.total_candidates
    );

    Ok(HttpResponse::Ok().json(MatchesResponse {
        partner_matches: lists.partners,
        pro_am_matches: lists.teachers,
        total_candidates: lists.total_candidates,
    }))
}
