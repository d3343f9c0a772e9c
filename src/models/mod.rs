// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BudgetRange, CompetitionFrequency, CompetitionResult, DanceCategory, DanceLevel,
    DanceStyleEntry, DanceStyleKind, Dancer, DancerSummary, LessonRates, MatchMode, MatchResult,
    Message, MessageThread, PackageRate, PartnerRequest, PartnerStatus, PartnershipType,
    RequestStatus, ResultSource, ScoredMatch, TeacherReview, TravelWillingness, Tryout,
    TryoutStatus, UnknownCode,
};
pub use requests::{
    ClaimRequest, ConversationQuery, CreateCompetitionResultRequest, CreatePartnerRequest,
    CreateReviewRequest, CreateTryoutRequest, RespondPartnerRequest, ScorePairRequest,
    SearchQuery, SendMessageRequest, UpdateProfileRequest, UpdateTryoutRequest,
    UpsertStyleRequest,
};
pub use responses::{
    ClaimResponse, ErrorResponse, HealthResponse, MatchesResponse, SearchResponse, SuccessResponse,
};
