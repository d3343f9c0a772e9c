use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::domain::{
    BudgetRange, CompetitionFrequency, DanceLevel, DanceStyleKind, Dancer, LessonRates,
    PartnerStatus, PartnershipType, RequestStatus, ResultSource, TravelWillingness, TryoutStatus,
};

/// Score an explicit (viewer, candidate) pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScorePairRequest {
    #[validate(custom(function = "one_entry_per_style"))]
    pub viewer: Dancer,
    #[validate(custom(function = "one_entry_per_style"))]
    pub candidate: Dancer,
}

/// A dancer lists each style at most once
fn one_entry_per_style(dancer: &Dancer) -> Result<(), ValidationError> {
    match dancer.duplicate_style() {
        Some(style) => {
            let mut error = ValidationError::new("duplicate_style");
            error.message = Some(format!("{} is listed more than once", style.as_str()).into());
            Err(error)
        }
        None => Ok(()),
    }
}

/// Directory search filters
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub q: Option<String>,
    pub style: Option<DanceStyleKind>,
    pub level: Option<DanceLevel>,
    #[validate(length(max = 64))]
    pub state: Option<String>,
    pub status: Option<PartnerStatus>,
    #[serde(default)]
    pub teachers: bool,
    #[serde(default)]
    pub unclaimed: bool,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Partial update of the caller's own profile
///
/// Absent fields are left untouched. For the nullable enums, an explicit `null`
/// clears the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
    #[validate(length(max = 4000))]
    pub bio: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 64))]
    pub state: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(length(max = 200))]
    pub studio_name: Option<String>,
    #[validate(length(max = 32))]
    pub ndca_id: Option<String>,
    pub is_teacher: Option<bool>,
    pub open_to_pro_am: Option<bool>,
    pub partner_status: Option<PartnerStatus>,
    #[serde(alias = "partnershipType")]
    pub partnership_types: Option<Vec<PartnershipType>>,
    #[serde(default, deserialize_with = "nullable")]
    pub competition_frequency: Option<Option<CompetitionFrequency>>,
    #[serde(default, deserialize_with = "nullable")]
    pub budget_range: Option<Option<BudgetRange>>,
    #[serde(default, deserialize_with = "nullable")]
    pub travel_willingness: Option<Option<TravelWillingness>>,
    #[validate(length(max = 4000))]
    pub teacher_bio: Option<String>,
    #[validate(length(max = 200))]
    pub studio_address: Option<String>,
    #[validate(length(max = 100))]
    pub studio_city: Option<String>,
    #[validate(length(max = 64))]
    pub studio_state: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub lesson_rates: Option<Option<LessonRates>>,
}

/// Distinguish an explicit `null` (Some(None)) from an absent field (None)
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Add or update one dance style on the caller's profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertStyleRequest {
    pub style: DanceStyleKind,
    pub level: DanceLevel,
    #[serde(default)]
    pub is_competing: bool,
    #[serde(default)]
    pub wants_to_compete: bool,
}

/// Claim a seeded profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub dancer_id: Uuid,
    #[validate(length(max = 32))]
    pub ndca_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartnerRequest {
    pub to_dancer_id: Uuid,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondPartnerRequest {
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(min = 1, max = 4000))]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
}

/// Conversation lookup: `GET /messages?with={dancerId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationQuery {
    pub with: Uuid,
}

/// Propose a tryout to another dancer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTryoutRequest {
    pub recipient_id: Uuid,
    pub datetime: DateTime<Utc>,
    #[validate(length(min = 1, max = 200))]
    pub location_text: String,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Move a tryout along its lifecycle and/or change its details
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTryoutRequest {
    pub status: Option<TryoutStatus>,
    pub datetime: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 200))]
    pub location_text: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

/// Record a competition placement on the caller's profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompetitionResultRequest {
    #[validate(length(min = 1, max = 200))]
    pub competition_name: String,
    pub competition_date: NaiveDate,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 200))]
    pub partner_name: Option<String>,
    pub style: DanceStyleKind,
    pub level: DanceLevel,
    #[validate(range(min = 1))]
    pub placement: Option<i32>,
    #[validate(range(min = 1))]
    pub total_competitors: Option<i32>,
    #[serde(default)]
    pub source: ResultSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let update: UpdateProfileRequest = serde_json::from_value(serde_json::json!({
            "budgetRange": null,
            "competitionFrequency": "RARELY"
        }))
        .unwrap();

        assert_eq!(update.budget_range, Some(None));
        assert_eq!(
            update.competition_frequency,
            Some(Some(CompetitionFrequency::Rarely))
        );
        assert_eq!(update.travel_willingness, None);
    }

    #[test]
    fn test_review_rating_range() {
        let review = CreateReviewRequest { rating: 6, body: "Great coach".to_string() };
        assert!(review.validate().is_err());

        let review = CreateReviewRequest { rating: 5, body: "Great coach".to_string() };
        assert!(review.validate().is_ok());
    }

    #[test]
    fn test_search_query_defaults_to_first_page() {
        let query: SearchQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.page, 1);
        assert!(!query.teachers);
    }

    #[test]
    fn test_score_pair_rejects_repeated_style() {
        let request: ScorePairRequest = serde_json::from_value(serde_json::json!({
            "viewer": { "danceStyles": [{ "style": "WALTZ", "level": "GOLD" }] },
            "candidate": { "danceStyles": [
                { "style": "WALTZ", "level": "GOLD" },
                { "style": "WALTZ", "level": "GOLD" }
            ] }
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("candidate"));
        assert!(!errors.field_errors().contains_key("viewer"));
    }

    #[test]
    fn test_competition_result_defaults_to_manual_source() {
        let request: CreateCompetitionResultRequest = serde_json::from_value(serde_json::json!({
            "competitionName": "Ohio Star Ball",
            "competitionDate": "2024-11-15",
            "style": "WALTZ",
            "level": "GOLD",
            "placement": 2,
            "totalCompetitors": 8
        }))
        .unwrap();

        assert_eq!(request.source, ResultSource::Manual);
        assert!(request.validate().is_ok());

        let request = CreateCompetitionResultRequest { placement: Some(0), ..request };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_tryout_update_notes_can_be_cleared() {
        let update: UpdateTryoutRequest =
            serde_json::from_value(serde_json::json!({ "notes": null })).unwrap();
        assert_eq!(update.notes, Some(None));
        assert_eq!(update.status, None);
    }
}
