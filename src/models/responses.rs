use serde::{Deserialize, Serialize};
use crate::models::domain::{Dancer, ScoredMatch};

/// Ranked match lists for the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesResponse {
    pub partner_matches: Vec<ScoredMatch>,
    pub pro_am_matches: Vec<ScoredMatch>,
    pub total_candidates: usize,
}

/// One page of directory search results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub dancers: Vec<Dancer>,
    pub total: i64,
    pub page: u32,
    pub total_pages: i64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub success: bool,
    pub dancer: Dancer,
}
