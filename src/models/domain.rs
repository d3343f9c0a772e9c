use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error returned when a stored or submitted code does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code: {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: String,
}

/// Dance category a style is judged under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DanceCategory {
    Standard,
    Smooth,
    Rhythm,
    Latin,
}

impl DanceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DanceCategory::Standard => "STANDARD",
            DanceCategory::Smooth => "SMOOTH",
            DanceCategory::Rhythm => "RHYTHM",
            DanceCategory::Latin => "LATIN",
        }
    }
}

/// Ballroom, Latin, rhythm and standard dances a profile can list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DanceStyleKind {
    Waltz,
    Tango,
    Foxtrot,
    VienneseWaltz,
    Quickstep,
    ChaCha,
    Samba,
    Rumba,
    PasoDoble,
    Jive,
    Bolero,
    Mambo,
    WestCoastSwing,
}

impl DanceStyleKind {
    pub const ALL: [DanceStyleKind; 13] = [
        DanceStyleKind::Waltz,
        DanceStyleKind::Tango,
        DanceStyleKind::Foxtrot,
        DanceStyleKind::VienneseWaltz,
        DanceStyleKind::Quickstep,
        DanceStyleKind::ChaCha,
        DanceStyleKind::Samba,
        DanceStyleKind::Rumba,
        DanceStyleKind::PasoDoble,
        DanceStyleKind::Jive,
        DanceStyleKind::Bolero,
        DanceStyleKind::Mambo,
        DanceStyleKind::WestCoastSwing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DanceStyleKind::Waltz => "WALTZ",
            DanceStyleKind::Tango => "TANGO",
            DanceStyleKind::Foxtrot => "FOXTROT",
            DanceStyleKind::VienneseWaltz => "VIENNESE_WALTZ",
            DanceStyleKind::Quickstep => "QUICKSTEP",
            DanceStyleKind::ChaCha => "CHA_CHA",
            DanceStyleKind::Samba => "SAMBA",
            DanceStyleKind::Rumba => "RUMBA",
            DanceStyleKind::PasoDoble => "PASO_DOBLE",
            DanceStyleKind::Jive => "JIVE",
            DanceStyleKind::Bolero => "BOLERO",
            DanceStyleKind::Mambo => "MAMBO",
            DanceStyleKind::WestCoastSwing => "WEST_COAST_SWING",
        }
    }

    /// Human-readable name used in match reasons
    pub fn label(&self) -> &'static str {
        match self {
            DanceStyleKind::Waltz => "Waltz",
            DanceStyleKind::Tango => "Tango",
            DanceStyleKind::Foxtrot => "Foxtrot",
            DanceStyleKind::VienneseWaltz => "Viennese Waltz",
            DanceStyleKind::Quickstep => "Quickstep",
            DanceStyleKind::ChaCha => "Cha Cha",
            DanceStyleKind::Samba => "Samba",
            DanceStyleKind::Rumba => "Rumba",
            DanceStyleKind::PasoDoble => "Paso Doble",
            DanceStyleKind::Jive => "Jive",
            DanceStyleKind::Bolero => "Bolero",
            DanceStyleKind::Mambo => "Mambo",
            DanceStyleKind::WestCoastSwing => "West Coast Swing",
        }
    }

    pub fn category(&self) -> DanceCategory {
        match self {
            DanceStyleKind::Waltz
            | DanceStyleKind::Tango
            | DanceStyleKind::VienneseWaltz
            | DanceStyleKind::Quickstep => DanceCategory::Standard,
            DanceStyleKind::Foxtrot => DanceCategory::Smooth,
            DanceStyleKind::ChaCha
            | DanceStyleKind::Rumba
            | DanceStyleKind::Bolero
            | DanceStyleKind::Mambo
            | DanceStyleKind::WestCoastSwing => DanceCategory::Rhythm,
            DanceStyleKind::Samba | DanceStyleKind::PasoDoble | DanceStyleKind::Jive => {
                DanceCategory::Latin
            }
        }
    }
}

impl FromStr for DanceStyleKind {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| UnknownCode { kind: "dance style", code: s.to_string() })
    }
}

impl fmt::Display for DanceStyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Proficiency level, ordered from newcomer to championship
///
/// Any code outside the known set deserializes into `Unrecognized`, which has no
/// position in the ordering and never earns proximity credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DanceLevel {
    Newcomer,
    Bronze,
    Silver,
    Gold,
    Novice,
    PreChamp,
    Championship,
    #[serde(other)]
    Unrecognized,
}

impl DanceLevel {
    /// The fixed total order used for proximity computation
    pub const ORDER: [DanceLevel; 7] = [
        DanceLevel::Newcomer,
        DanceLevel::Bronze,
        DanceLevel::Silver,
        DanceLevel::Gold,
        DanceLevel::Novice,
        DanceLevel::PreChamp,
        DanceLevel::Championship,
    ];

    pub fn ordinal(&self) -> Option<usize> {
        Self::ORDER.iter().position(|level| level == self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DanceLevel::Newcomer => "NEWCOMER",
            DanceLevel::Bronze => "BRONZE",
            DanceLevel::Silver => "SILVER",
            DanceLevel::Gold => "GOLD",
            DanceLevel::Novice => "NOVICE",
            DanceLevel::PreChamp => "PRE_CHAMP",
            DanceLevel::Championship => "CHAMPIONSHIP",
            DanceLevel::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Parse a stored level code; unknown codes map to `Unrecognized`
    pub fn from_code(code: &str) -> Self {
        Self::ORDER
            .into_iter()
            .find(|level| level.as_str() == code)
            .unwrap_or(DanceLevel::Unrecognized)
    }
}

/// Competitions entered per year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetitionFrequency {
    Rarely,
    OneToThree,
    FourToSix,
    SevenPlus,
}

impl CompetitionFrequency {
    pub const ORDER: [CompetitionFrequency; 4] = [
        CompetitionFrequency::Rarely,
        CompetitionFrequency::OneToThree,
        CompetitionFrequency::FourToSix,
        CompetitionFrequency::SevenPlus,
    ];

    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionFrequency::Rarely => "RARELY",
            CompetitionFrequency::OneToThree => "ONE_TO_THREE",
            CompetitionFrequency::FourToSix => "FOUR_TO_SIX",
            CompetitionFrequency::SevenPlus => "SEVEN_PLUS",
        }
    }
}

impl FromStr for CompetitionFrequency {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownCode { kind: "competition frequency", code: s.to_string() })
    }
}

/// Spending tier for lessons, coaching and competitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetRange {
    Budget,
    Moderate,
    Competitive,
    Unlimited,
}

impl BudgetRange {
    pub const ORDER: [BudgetRange; 4] = [
        BudgetRange::Budget,
        BudgetRange::Moderate,
        BudgetRange::Competitive,
        BudgetRange::Unlimited,
    ];

    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetRange::Budget => "BUDGET",
            BudgetRange::Moderate => "MODERATE",
            BudgetRange::Competitive => "COMPETITIVE",
            BudgetRange::Unlimited => "UNLIMITED",
        }
    }
}

impl FromStr for BudgetRange {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| UnknownCode { kind: "budget range", code: s.to_string() })
    }
}

/// How far a teacher is willing to travel for a Pro-Am student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelWillingness {
    LocalOnly,
    Regional,
    National,
    International,
}

impl TravelWillingness {
    pub const ALL: [TravelWillingness; 4] = [
        TravelWillingness::LocalOnly,
        TravelWillingness::Regional,
        TravelWillingness::National,
        TravelWillingness::International,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelWillingness::LocalOnly => "LOCAL_ONLY",
            TravelWillingness::Regional => "REGIONAL",
            TravelWillingness::National => "NATIONAL",
            TravelWillingness::International => "INTERNATIONAL",
        }
    }
}

impl FromStr for TravelWillingness {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownCode { kind: "travel willingness", code: s.to_string() })
    }
}

/// Kind of partnership a dancer is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnershipType {
    AmateurAmateur,
    ProAm,
    PracticeOnly,
}

impl PartnershipType {
    pub const ALL: [PartnershipType; 3] = [
        PartnershipType::AmateurAmateur,
        PartnershipType::ProAm,
        PartnershipType::PracticeOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartnershipType::AmateurAmateur => "AMATEUR_AMATEUR",
            PartnershipType::ProAm => "PRO_AM",
            PartnershipType::PracticeOnly => "PRACTICE_ONLY",
        }
    }
}

impl FromStr for PartnershipType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownCode { kind: "partnership type", code: s.to_string() })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnerStatus {
    HasPartner,
    Looking,
    #[default]
    OpenToInquiries,
}

impl PartnerStatus {
    pub const ALL: [PartnerStatus; 3] = [
        PartnerStatus::HasPartner,
        PartnerStatus::Looking,
        PartnerStatus::OpenToInquiries,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartnerStatus::HasPartner => "HAS_PARTNER",
            PartnerStatus::Looking => "LOOKING",
            PartnerStatus::OpenToInquiries => "OPEN_TO_INQUIRIES",
        }
    }
}

impl FromStr for PartnerStatus {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownCode { kind: "partner status", code: s.to_string() })
    }
}

/// One style a dancer lists, at most one entry per style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DanceStyleEntry {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default)]
    pub dancer_id: Uuid,
    pub style: DanceStyleKind,
    pub level: DanceLevel,
    #[serde(default)]
    pub is_competing: bool,
    #[serde(default)]
    pub wants_to_compete: bool,
}

impl DanceStyleEntry {
    pub fn new(style: DanceStyleKind, level: DanceLevel) -> Self {
        Self {
            id: Uuid::new_v4(),
            dancer_id: Uuid::nil(),
            style,
            level,
            is_competing: false,
            wants_to_compete: false,
        }
    }
}

/// Dancer profile with its dance styles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dancer {
    #[serde(default)]
    pub id: Uuid,
    #[serde(default, skip_serializing)]
    pub external_user_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub studio_name: Option<String>,
    #[serde(default)]
    pub ndca_id: Option<String>,
    #[serde(default)]
    pub is_claimed: bool,
    #[serde(default)]
    pub is_teacher: bool,
    #[serde(default)]
    pub open_to_pro_am: bool,
    #[serde(default)]
    pub partner_status: PartnerStatus,
    #[serde(default, alias = "partnershipType")]
    pub partnership_types: Vec<PartnershipType>,
    #[serde(default)]
    pub competition_frequency: Option<CompetitionFrequency>,
    #[serde(default)]
    pub budget_range: Option<BudgetRange>,
    #[serde(default)]
    pub travel_willingness: Option<TravelWillingness>,
    #[serde(default)]
    pub teacher_bio: Option<String>,
    #[serde(default)]
    pub studio_address: Option<String>,
    #[serde(default)]
    pub studio_city: Option<String>,
    #[serde(default)]
    pub studio_state: Option<String>,
    #[serde(default)]
    pub lesson_rates: Option<LessonRates>,
    #[serde(default)]
    pub dance_styles: Vec<DanceStyleEntry>,
    #[serde(default)]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Dancer {
    /// Display name, falling back to first and last name
    pub fn name(&self) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{} {}", self.first_name, self.last_name).trim().to_string(),
        }
    }

    /// City if present and non-empty
    pub fn city(&self) -> Option<&str> {
        non_empty(&self.city)
    }

    /// State if present and non-empty
    pub fn state(&self) -> Option<&str> {
        non_empty(&self.state)
    }

    pub fn seeks(&self, partnership: PartnershipType) -> bool {
        self.partnership_types.contains(&partnership)
    }

    /// Teacher who accepts Pro-Am students
    pub fn is_pro_am_teacher(&self) -> bool {
        self.is_teacher && self.open_to_pro_am
    }

    /// First style listed more than once, if any
    pub fn duplicate_style(&self) -> Option<DanceStyleKind> {
        let mut seen = std::collections::HashSet::new();
        self.dance_styles
            .iter()
            .map(|entry| entry.style)
            .find(|style| !seen.insert(*style))
    }

    /// Profile as shown to other dancers: lesson rates only when the teacher publishes them
    pub fn into_public(mut self) -> Self {
        if !self.lesson_rates.as_ref().is_some_and(|rates| rates.rates_public) {
            self.lesson_rates = None;
        }
        self
    }
}

/// A package of private lessons sold together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRate {
    pub sessions: u32,
    pub price: f64,
    #[serde(default)]
    pub description: String,
}

/// Teacher rate card, stored as a JSON document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRates {
    #[serde(default)]
    pub private_lesson_per_hour: Option<f64>,
    #[serde(default)]
    pub package_rates: Vec<PackageRate>,
    #[serde(default)]
    pub pro_am_comp_rate: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub rates_public: bool,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Which scoring mode produced a match result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Amateur,
    Proam,
}

/// Compatibility assessment of one candidate for one viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u8,
    pub reasons: Vec<String>,
    pub mode: MatchMode,
}

/// Candidate with its match result, ready for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMatch {
    pub dancer: Dancer,
    pub score: u8,
    pub reasons: Vec<String>,
    pub mode: MatchMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Accepted => "ACCEPTED",
            RequestStatus::Declined => "DECLINED",
        }
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(RequestStatus::Pending),
            "ACCEPTED" => Ok(RequestStatus::Accepted),
            "DECLINED" => Ok(RequestStatus::Declined),
            _ => Err(UnknownCode { kind: "request status", code: s.to_string() }),
        }
    }
}

/// Request from one dancer to partner with another
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRequest {
    pub id: Uuid,
    pub from_dancer_id: Uuid,
    pub to_dancer_id: Uuid,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_dancer: Option<Dancer>,
}

/// Review of a teacher by a confirmed Pro-Am partner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherReview {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub reviewer_id: Uuid,
    pub rating: i16,
    pub body: String,
    pub is_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Name-only view of a dancer, used in thread lists and tryouts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DancerSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
}

/// Latest message exchanged with one counterpart
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageThread {
    pub dancer: DancerSummary,
    pub last_message: String,
    pub last_message_at: chrono::DateTime<chrono::Utc>,
    pub unread_count: i64,
}

/// Lifecycle of a scheduled tryout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TryoutStatus {
    #[default]
    Proposed,
    Confirmed,
    RescheduleRequested,
    Canceled,
}

impl TryoutStatus {
    pub const ALL: [TryoutStatus; 4] = [
        TryoutStatus::Proposed,
        TryoutStatus::Confirmed,
        TryoutStatus::RescheduleRequested,
        TryoutStatus::Canceled,
    ];

    /// Still on someone's calendar
    pub const ACTIVE: [TryoutStatus; 2] = [TryoutStatus::Proposed, TryoutStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TryoutStatus::Proposed => "PROPOSED",
            TryoutStatus::Confirmed => "CONFIRMED",
            TryoutStatus::RescheduleRequested => "RESCHEDULE_REQUESTED",
            TryoutStatus::Canceled => "CANCELED",
        }
    }

    /// Statuses reachable from this one; a canceled tryout is final
    pub fn next(&self) -> &'static [TryoutStatus] {
        match self {
            TryoutStatus::Proposed => &[
                TryoutStatus::Confirmed,
                TryoutStatus::RescheduleRequested,
                TryoutStatus::Canceled,
            ],
            TryoutStatus::Confirmed => &[TryoutStatus::RescheduleRequested, TryoutStatus::Canceled],
            TryoutStatus::RescheduleRequested => &[
                TryoutStatus::Proposed,
                TryoutStatus::Confirmed,
                TryoutStatus::Canceled,
            ],
            TryoutStatus::Canceled => &[],
        }
    }

    pub fn can_transition_to(&self, next: TryoutStatus) -> bool {
        self.next().contains(&next)
    }
}

impl FromStr for TryoutStatus {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownCode { kind: "tryout status", code: s.to_string() })
    }
}

/// A tryout proposed by one dancer to another
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tryout {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    /// Participant who made the latest change
    pub proposed_by_id: Uuid,
    pub datetime: chrono::DateTime<chrono::Utc>,
    pub location_text: String,
    pub notes: Option<String>,
    pub status: TryoutStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<DancerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<DancerSummary>,
}

impl Tryout {
    pub fn involves(&self, dancer_id: Uuid) -> bool {
        self.requester_id == dancer_id || self.recipient_id == dancer_id
    }
}

/// Where a competition result came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultSource {
    #[default]
    Manual,
    Ndca,
    O2cm,
}

impl ResultSource {
    pub const ALL: [ResultSource; 3] = [ResultSource::Manual, ResultSource::Ndca, ResultSource::O2cm];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSource::Manual => "MANUAL",
            ResultSource::Ndca => "NDCA",
            ResultSource::O2cm => "O2CM",
        }
    }
}

impl FromStr for ResultSource {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| UnknownCode { kind: "result source", code: s.to_string() })
    }
}

/// Placement at one competition event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionResult {
    pub id: Uuid,
    pub dancer_id: Uuid,
    pub competition_name: String,
    pub competition_date: chrono::NaiveDate,
    pub location: Option<String>,
    pub partner_name: Option<String>,
    pub style: DanceStyleKind,
    pub level: DanceLevel,
    pub placement: Option<i32>,
    pub total_competitors: Option<i32>,
    pub source: ResultSource,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_order() {
        assert_eq!(DanceLevel::Newcomer.ordinal(), Some(0));
        assert_eq!(DanceLevel::Championship.ordinal(), Some(6));
        assert_eq!(DanceLevel::Unrecognized.ordinal(), None);
    }

    #[test]
    fn test_unknown_level_deserializes_as_unrecognized() {
        let level: DanceLevel = serde_json::from_str("\"SYLLABUS\"").unwrap();
        assert_eq!(level, DanceLevel::Unrecognized);

        let level: DanceLevel = serde_json::from_str("\"PRE_CHAMP\"").unwrap();
        assert_eq!(level, DanceLevel::PreChamp);
        assert_eq!(DanceLevel::from_code("GOLD"), DanceLevel::Gold);
    }

    #[test]
    fn test_style_codes_round_trip_through_from_str() {
        for style in DanceStyleKind::ALL {
            assert_eq!(style.as_str().parse::<DanceStyleKind>(), Ok(style));
        }
        assert!("LINDY_HOP".parse::<DanceStyleKind>().is_err());
    }

    #[test]
    fn test_style_categories() {
        assert_eq!(DanceStyleKind::Foxtrot.category(), DanceCategory::Smooth);
        assert_eq!(DanceStyleKind::Jive.category(), DanceCategory::Latin);
        assert_eq!(DanceStyleKind::Bolero.category(), DanceCategory::Rhythm);
        assert_eq!(DanceStyleKind::Quickstep.category(), DanceCategory::Standard);
    }

    #[test]
    fn test_empty_location_counts_as_missing() {
        let dancer = Dancer {
            city: Some(String::new()),
            state: Some("OH".to_string()),
            ..Default::default()
        };
        assert_eq!(dancer.city(), None);
        assert_eq!(dancer.state(), Some("OH"));
    }

    #[test]
    fn test_name_falls_back_to_first_and_last() {
        let mut dancer = Dancer {
            first_name: "Ana".to_string(),
            last_name: "Ruiz".to_string(),
            ..Default::default()
        };
        assert_eq!(dancer.name(), "Ana Ruiz");

        dancer.display_name = Some("Ana R.".to_string());
        assert_eq!(dancer.name(), "Ana R.");
    }

    #[test]
    fn test_dancer_json_uses_camel_case_codes() {
        let dancer: Dancer = serde_json::from_value(serde_json::json!({
            "firstName": "Ana",
            "partnershipType": ["PRO_AM"],
            "competitionFrequency": "FOUR_TO_SIX",
            "danceStyles": [{ "style": "WALTZ", "level": "GOLD" }]
        }))
        .unwrap();

        assert!(dancer.seeks(PartnershipType::ProAm));
        assert_eq!(dancer.competition_frequency, Some(CompetitionFrequency::FourToSix));
        assert_eq!(dancer.dance_styles[0].level, DanceLevel::Gold);
    }

    #[test]
    fn test_duplicate_style_detection() {
        let mut dancer = Dancer {
            dance_styles: vec![
                DanceStyleEntry::new(DanceStyleKind::Waltz, DanceLevel::Gold),
                DanceStyleEntry::new(DanceStyleKind::Tango, DanceLevel::Gold),
            ],
            ..Default::default()
        };
        assert_eq!(dancer.duplicate_style(), None);

        dancer
            .dance_styles
            .push(DanceStyleEntry::new(DanceStyleKind::Waltz, DanceLevel::Silver));
        assert_eq!(dancer.duplicate_style(), Some(DanceStyleKind::Waltz));
    }

    #[test]
    fn test_private_rates_hidden_from_public_profile() {
        let rates = LessonRates {
            private_lesson_per_hour: Some(150.0),
            ..Default::default()
        };
        let dancer = Dancer {
            is_teacher: true,
            lesson_rates: Some(rates.clone()),
            ..Default::default()
        };
        assert_eq!(dancer.into_public().lesson_rates, None);

        let published = LessonRates { rates_public: true, ..rates };
        let dancer = Dancer {
            is_teacher: true,
            lesson_rates: Some(published.clone()),
            ..Default::default()
        };
        assert_eq!(dancer.into_public().lesson_rates, Some(published));
    }

    #[test]
    fn test_lesson_rates_json_shape() {
        let rates: LessonRates = serde_json::from_value(serde_json::json!({
            "privateLessonPerHour": 150,
            "packageRates": [{ "sessions": 5, "price": 700, "description": "5-lesson package" }],
            "proAmCompRate": "$150/hour + travel expenses",
            "currency": "USD",
            "ratesPublic": true
        }))
        .unwrap();

        assert_eq!(rates.package_rates[0].sessions, 5);
        assert!(rates.rates_public);
    }

    #[test]
    fn test_tryout_transition_table() {
        use TryoutStatus::*;

        let allowed = [
            (Proposed, Confirmed),
            (Proposed, RescheduleRequested),
            (Proposed, Canceled),
            (Confirmed, RescheduleRequested),
            (Confirmed, Canceled),
            (RescheduleRequested, Proposed),
            (RescheduleRequested, Confirmed),
            (RescheduleRequested, Canceled),
        ];

        for from in TryoutStatus::ALL {
            for to in TryoutStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from.as_str(),
                    to.as_str()
                );
            }
        }
    }

    #[test]
    fn test_canceled_tryout_is_final() {
        assert!(TryoutStatus::Canceled.next().is_empty());
        assert!(!TryoutStatus::Confirmed.can_transition_to(TryoutStatus::Proposed));
        assert_eq!("RESCHEDULE_REQUESTED".parse::<TryoutStatus>(), Ok(TryoutStatus::RescheduleRequested));
    }
}
