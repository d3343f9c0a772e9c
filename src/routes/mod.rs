// Route exports
pub mod competitions;
pub mod dancers;
pub mod matches;
pub mod messages;
pub mod partners;
pub mod tryouts;

use actix_web::web;
use std::sync::Arc;

use crate::auth::{AuthenticatedUser, JwtVerifier};
use crate::core::Matcher;
use crate::error::ApiError;
use crate::models::Dancer;
use crate::services::ProfileStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: ProfileStore,
    pub matcher: Matcher,
    pub verifier: Arc<JwtVerifier>,
    pub candidate_pool: u32,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(dancers::configure)
            .configure(partners::configure)
            .configure(messages::configure)
            .configure(tryouts::configure)
            .configure(competitions::configure),
    );
}

/// Profile linked to the caller's account
pub(crate) async fn current_dancer(
    state: &AppState,
    user: &AuthenticatedUser,
) -> Result<Dancer, ApiError> {
    state
        .store
        .find_by_subject(&user.subject)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
}
