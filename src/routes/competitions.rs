use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::models::CreateCompetitionResultRequest;
use crate::routes::{current_dancer, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/competitions", web::get().to(list_results))
        .route("/competitions", web::post().to(add_result));
}

/// GET /api/v1/competitions
///
/// The caller's results, most recent first. Empty when the caller has no profile yet.
async fn list_results(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let results = match state.store.find_by_subject(&user.subject).await? {
        Some(dancer) => state.store.competition_results(dancer.id).await?,
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(results))
}

/// POST /api/v1/competitions
async fn add_result(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateCompetitionResultRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    if req.competition_name.trim().is_empty() {
        return Err(ApiError::Validation("Competition name is required".to_string()));
    }

    if let (Some(placement), Some(total)) = (req.placement, req.total_competitors) {
        if placement > total {
            return Err(ApiError::Validation(
                "Placement cannot exceed the number of competitors".to_string(),
            ));
        }
    }

    let dancer = current_dancer(&state, &user).await?;
    let result = state.store.add_competition_result(dancer.id, &req).await?;

    tracing::debug!("Dancer {} recorded a result at {}", dancer.id, result.competition_name);

    Ok(HttpResponse::Created().json(result))
}
