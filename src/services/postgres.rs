use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, Postgres};
use sqlx::types::Json;
use sqlx::{PgPool, QueryBuilder};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CompetitionResult, CreateCompetitionResultRequest, CreateTryoutRequest, DanceLevel,
    DanceStyleEntry, Dancer, DancerSummary, LessonRates, Message, MessageThread, PartnerRequest,
    RequestStatus, SearchQuery, TeacherReview, Tryout, TryoutStatus, UnknownCode,
    UpdateProfileRequest, UpdateTryoutRequest, UpsertStyleRequest,
};

/// Rows per search page
pub const SEARCH_PAGE_SIZE: i64 = 20;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

const DANCER_COLUMNS: &str = r#"
    d.id, d.external_user_id, d.email, d.first_name, d.last_name, d.display_name, d.bio,
    d.city, d.state, d.country, d.studio_name, d.ndca_id, d.is_claimed, d.is_teacher,
    d.open_to_pro_am, d.partner_status, d.partnership_types, d.competition_frequency,
    d.budget_range, d.travel_willingness, d.teacher_bio, d.studio_address, d.studio_city,
    d.studio_state, d.lesson_rates, d.created_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct DancerRow {
    id: Uuid,
    external_user_id: Option<String>,
    email: Option<String>,
    first_name: String,
    last_name: String,
    display_name: Option<String>,
    bio: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    studio_name: Option<String>,
    ndca_id: Option<String>,
    is_claimed: bool,
    is_teacher: bool,
    open_to_pro_am: bool,
    partner_status: String,
    partnership_types: Vec<String>,
    competition_frequency: Option<String>,
    budget_range: Option<String>,
    travel_willingness: Option<String>,
    teacher_bio: Option<String>,
    studio_address: Option<String>,
    studio_city: Option<String>,
    studio_state: Option<String>,
    lesson_rates: Option<Json<LessonRates>>,
    created_at: DateTime<Utc>,
}

impl DancerRow {
    fn into_dancer(self, dance_styles: Vec<DanceStyleEntry>) -> Dancer {
        let id = self.id;
        Dancer {
            id,
            external_user_id: self.external_user_id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            display_name: self.display_name,
            bio: self.bio,
            city: self.city,
            state: self.state,
            country: self.country,
            studio_name: self.studio_name,
            ndca_id: self.ndca_id,
            is_claimed: self.is_claimed,
            is_teacher: self.is_teacher,
            open_to_pro_am: self.open_to_pro_am,
            partner_status: parse_code(&self.partner_status, id).unwrap_or_default(),
            partnership_types: self
                .partnership_types
                .iter()
                .filter_map(|code| parse_code(code, id))
                .collect(),
            competition_frequency: self
                .competition_frequency
                .as_deref()
                .and_then(|code| parse_code(code, id)),
            budget_range: self.budget_range.as_deref().and_then(|code| parse_code(code, id)),
            travel_willingness: self
                .travel_willingness
                .as_deref()
                .and_then(|code| parse_code(code, id)),
            teacher_bio: self.teacher_bio,
            studio_address: self.studio_address,
            studio_city: self.studio_city,
            studio_state: self.studio_state,
            lesson_rates: self.lesson_rates.map(|rates| rates.0),
            dance_styles,
            created_at: self.created_at,
        }
    }
}

/// Unknown codes are dropped so scoring treats the field as missing
fn parse_code<T: FromStr<Err = UnknownCode>>(code: &str, dancer_id: Uuid) -> Option<T> {
    match code.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring stored value for dancer {}: {}", dancer_id, e);
            None
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StyleRow {
    id: Uuid,
    dancer_id: Uuid,
    style: String,
    level: String,
    is_competing: bool,
    wants_to_compete: bool,
}

impl StyleRow {
    fn into_entry(self) -> Option<DanceStyleEntry> {
        let style = parse_code(&self.style, self.dancer_id)?;
        Some(DanceStyleEntry {
            id: self.id,
            dancer_id: self.dancer_id,
            style,
            level: DanceLevel::from_code(&self.level),
            is_competing: self.is_competing,
            wants_to_compete: self.wants_to_compete,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PartnerRequestRow {
    id: Uuid,
    from_dancer_id: Uuid,
    to_dancer_id: Uuid,
    message: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl PartnerRequestRow {
    fn into_request(self) -> PartnerRequest {
        PartnerRequest {
            id: self.id,
            from_dancer_id: self.from_dancer_id,
            to_dancer_id: self.to_dancer_id,
            message: self.message,
            status: parse_code(&self.status, self.from_dancer_id).unwrap_or_default(),
            created_at: self.created_at,
            from_dancer: None,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TryoutRow {
    id: Uuid,
    requester_id: Uuid,
    recipient_id: Uuid,
    proposed_by_id: Uuid,
    datetime: DateTime<Utc>,
    location_text: String,
    notes: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryoutRow {
    fn into_tryout(self, people: &HashMap<Uuid, DancerSummary>) -> Tryout {
        Tryout {
            id: self.id,
            requester_id: self.requester_id,
            recipient_id: self.recipient_id,
            proposed_by_id: self.proposed_by_id,
            datetime: self.datetime,
            location_text: self.location_text,
            notes: self.notes,
            status: parse_code(&self.status, self.requester_id).unwrap_or_default(),
            created_at: self.created_at,
            requester: people.get(&self.requester_id).cloned(),
            recipient: people.get(&self.recipient_id).cloned(),
        }
    }
}

const TRYOUT_COLUMNS: &str =
    "id, requester_id, recipient_id, proposed_by_id, datetime, location_text, notes, status, created_at";

#[derive(Debug, sqlx::FromRow)]
struct CompetitionResultRow {
    id: Uuid,
    dancer_id: Uuid,
    competition_name: String,
    competition_date: chrono::NaiveDate,
    location: Option<String>,
    partner_name: Option<String>,
    style: String,
    level: String,
    placement: Option<i32>,
    total_competitors: Option<i32>,
    source: String,
    created_at: DateTime<Utc>,
}

impl CompetitionResultRow {
    /// Results in a style this service does not know are skipped
    fn into_result(self) -> Option<CompetitionResult> {
        Some(CompetitionResult {
            id: self.id,
            dancer_id: self.dancer_id,
            competition_name: self.competition_name,
            competition_date: self.competition_date,
            location: self.location,
            partner_name: self.partner_name,
            style: parse_code(&self.style, self.dancer_id)?,
            level: DanceLevel::from_code(&self.level),
            placement: self.placement,
            total_competitors: self.total_competitors,
            source: parse_code(&self.source, self.dancer_id).unwrap_or_default(),
            created_at: self.created_at,
        })
    }
}

const RESULT_COLUMNS: &str = r#"
    id, dancer_id, competition_name, competition_date, location, partner_name, style, level,
    placement, total_competitors, source, created_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    display_name: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ThreadRow {
    other_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    first_name: String,
    last_name: String,
    display_name: Option<String>,
    unread_count: i64,
}

/// PostgreSQL-backed store for profiles, styles, partner requests, reviews and messages
///
/// The schema is owned outside this service; queries assume the tables exist.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    pool: PgPool,
}

impl ProfileStore {
    /// Connect with the given pool limits
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Build a store whose connections are opened on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Attach dance styles to a batch of dancer rows
    async fn with_styles(&self, rows: Vec<DancerRow>) -> Result<Vec<Dancer>, StoreError> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

        let style_rows = sqlx::query_as::<_, StyleRow>(
            r#"
            SELECT id, dancer_id, style, level, is_competing, wants_to_compete
            FROM dance_styles
            WHERE dancer_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut styles: HashMap<Uuid, Vec<DanceStyleEntry>> = HashMap::new();
        for entry in style_rows.into_iter().filter_map(StyleRow::into_entry) {
            styles.entry(entry.dancer_id).or_default().push(entry);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let entries = styles.remove(&row.id).unwrap_or_default();
                row.into_dancer(entries)
            })
            .collect())
    }

    async fn fetch_one_with_styles(&self, row: Option<DancerRow>) -> Result<Option<Dancer>, StoreError> {
        match row {
            Some(row) => Ok(self.with_styles(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn find_dancer(&self, id: Uuid) -> Result<Option<Dancer>, StoreError> {
        let sql = format!("SELECT {} FROM dancers d WHERE d.id = $1", DANCER_COLUMNS);
        let row = sqlx::query_as::<_, DancerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        self.fetch_one_with_styles(row).await
    }

    /// Look up the profile linked to an identity-provider subject
    pub async fn find_by_subject(&self, subject: &str) -> Result<Option<Dancer>, StoreError> {
        let sql = format!(
            "SELECT {} FROM dancers d WHERE d.external_user_id = $1",
            DANCER_COLUMNS
        );
        let row = sqlx::query_as::<_, DancerRow>(&sql)
            .bind(subject)
            .fetch_optional(&self.pool)
            .await?;

        self.fetch_one_with_styles(row).await
    }

    /// Profile for the subject, created as a claimed profile on first access
    pub async fn find_or_create_by_subject(
        &self,
        subject: &str,
        email: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Dancer, StoreError> {
        if let Some(dancer) = self.find_by_subject(subject).await? {
            return Ok(dancer);
        }

        let sql = format!(
            r#"
            INSERT INTO dancers AS d (id, external_user_id, email, first_name, last_name,
                is_claimed, partner_status, partnership_types, created_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, 'OPEN_TO_INQUIRIES', '{{}}', NOW())
            ON CONFLICT (external_user_id) DO UPDATE SET external_user_id = EXCLUDED.external_user_id
            RETURNING {}
            "#,
            DANCER_COLUMNS
        );

        let row = sqlx::query_as::<_, DancerRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(subject)
            .bind(email)
            .bind(first_name.unwrap_or("Dancer"))
            .bind(last_name.unwrap_or_default())
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created profile {} for new account", row.id);

        self.fetch_one_with_styles(Some(row))
            .await?
            .ok_or_else(|| StoreError::NotFound(subject.to_string()))
    }

    /// Apply a partial profile update; absent fields keep their stored values
    pub async fn update_profile(
        &self,
        dancer_id: Uuid,
        update: &UpdateProfileRequest,
    ) -> Result<Dancer, StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE dancers SET ");
        let mut set = builder.separated(", ");
        set.push("updated_at = NOW()");

        macro_rules! assign {
            ($column:literal, $value:expr) => {
                if let Some(value) = $value {
                    set.push(concat!($column, " = ")).push_bind_unseparated(value);
                }
            };
        }

        assign!("first_name", update.first_name.clone());
        assign!("last_name", update.last_name.clone());
        assign!("display_name", update.display_name.clone());
        assign!("bio", update.bio.clone());
        assign!("city", update.city.clone());
        assign!("state", update.state.clone());
        assign!("country", update.country.clone());
        assign!("studio_name", update.studio_name.clone());
        assign!("ndca_id", update.ndca_id.clone());
        assign!("is_teacher", update.is_teacher);
        assign!("open_to_pro_am", update.open_to_pro_am);
        assign!("partner_status", update.partner_status.map(|s| s.as_str()));
        assign!(
            "partnership_types",
            update
                .partnership_types
                .as_ref()
                .map(|types| types.iter().map(|t| t.as_str().to_string()).collect::<Vec<_>>())
        );
        assign!(
            "competition_frequency",
            update.competition_frequency.map(|f| f.map(|f| f.as_str()))
        );
        assign!("budget_range", update.budget_range.map(|b| b.map(|b| b.as_str())));
        assign!(
            "travel_willingness",
            update.travel_willingness.map(|t| t.map(|t| t.as_str()))
        );
        assign!("teacher_bio", update.teacher_bio.clone());
        assign!("studio_address", update.studio_address.clone());
        assign!("studio_city", update.studio_city.clone());
        assign!("studio_state", update.studio_state.clone());
        assign!("lesson_rates", update.lesson_rates.clone().map(|rates| rates.map(Json)));

        builder.push(" WHERE id = ").push_bind(dancer_id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(dancer_id.to_string()));
        }

        tracing::debug!("Updated profile {}", dancer_id);

        self.find_dancer(dancer_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(dancer_id.to_string()))
    }

    /// Claimed profiles other than `exclude_id`, capped at `limit`
    pub async fn list_candidates(&self, exclude_id: Uuid, limit: i64) -> Result<Vec<Dancer>, StoreError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM dancers d
            WHERE d.id <> $1 AND d.is_claimed = TRUE
            ORDER BY d.created_at DESC
            LIMIT $2
            "#,
            DANCER_COLUMNS
        );

        let rows = sqlx::query_as::<_, DancerRow>(&sql)
            .bind(exclude_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Loaded {} candidates for {}", rows.len(), exclude_id);

        self.with_styles(rows).await
    }

    /// Filtered, paginated directory search: claimed profiles first, then newest
    pub async fn search(&self, query: &SearchQuery) -> Result<(Vec<Dancer>, i64), StoreError> {
        let mut count: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM dancers d WHERE TRUE");
        push_search_filters(&mut count, query);

        let mut select: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM dancers d WHERE TRUE", DANCER_COLUMNS));
        push_search_filters(&mut select, query);
        let offset = i64::from(query.page.max(1) - 1) * SEARCH_PAGE_SIZE;
        select
            .push(" ORDER BY d.is_claimed DESC, d.created_at DESC LIMIT ")
            .push_bind(SEARCH_PAGE_SIZE)
            .push(" OFFSET ")
            .push_bind(offset);

        let (total, rows) = tokio::try_join!(
            count.build_query_scalar::<i64>().fetch_one(&self.pool),
            select.build_query_as::<DancerRow>().fetch_all(&self.pool),
        )?;

        Ok((self.with_styles(rows).await?, total))
    }

    /// Claim an unclaimed profile for `subject`
    pub async fn claim(
        &self,
        dancer_id: Uuid,
        subject: &str,
        email: Option<&str>,
    ) -> Result<Dancer, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE dancers
            SET external_user_id = $2, email = COALESCE($3, email), is_claimed = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_claimed = FALSE
            "#,
        )
        .bind(dancer_id)
        .bind(subject)
        .bind(email)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(
                "This profile has already been claimed".to_string(),
            ));
        }

        tracing::info!("Profile {} claimed", dancer_id);

        self.find_dancer(dancer_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(dancer_id.to_string()))
    }

    /// Insert or update the dancer's entry for a style (one entry per style)
    pub async fn upsert_style(
        &self,
        dancer_id: Uuid,
        request: &UpsertStyleRequest,
    ) -> Result<DanceStyleEntry, StoreError> {
        let row = sqlx::query_as::<_, StyleRow>(
            r#"
            INSERT INTO dance_styles (id, dancer_id, style, category, level, is_competing, wants_to_compete, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            ON CONFLICT (dancer_id, style) DO UPDATE SET
                level = EXCLUDED.level,
                is_competing = EXCLUDED.is_competing,
                wants_to_compete = EXCLUDED.wants_to_compete
            RETURNING id, dancer_id, style, level, is_competing, wants_to_compete
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dancer_id)
        .bind(request.style.as_str())
        .bind(request.style.category().as_str())
        .bind(request.level.as_str())
        .bind(request.is_competing)
        .bind(request.wants_to_compete)
        .fetch_one(&self.pool)
        .await?;

        row.into_entry()
            .ok_or_else(|| StoreError::NotFound(request.style.as_str().to_string()))
    }

    /// Delete a style entry owned by `dancer_id`; false if no such entry
    pub async fn delete_style(&self, dancer_id: Uuid, style_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM dance_styles WHERE id = $1 AND dancer_id = $2")
            .bind(style_id)
            .bind(dancer_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Create a pending partner request; conflicts with an existing pending one
    pub async fn create_partner_request(
        &self,
        from_dancer_id: Uuid,
        to_dancer_id: Uuid,
        message: Option<&str>,
    ) -> Result<PartnerRequest, StoreError> {
        let existing: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM partner_requests
            WHERE from_dancer_id = $1 AND to_dancer_id = $2 AND status = 'PENDING'
            "#,
        )
        .bind(from_dancer_id)
        .bind(to_dancer_id)
        .fetch_optional(&self.pool)
        .await?;

        if existing.is_some() {
            return Err(StoreError::Conflict("Request already sent".to_string()));
        }

        let row = sqlx::query_as::<_, PartnerRequestRow>(
            r#"
            INSERT INTO partner_requests (id, from_dancer_id, to_dancer_id, message, status, created_at)
            VALUES ($1, $2, $3, $4, 'PENDING', NOW())
            RETURNING id, from_dancer_id, to_dancer_id, message, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(from_dancer_id)
        .bind(to_dancer_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Partner request {} -> {}", from_dancer_id, to_dancer_id);

        Ok(row.into_request())
    }

    /// Pending requests addressed to `dancer_id`, newest first, with sender profiles
    pub async fn incoming_requests(&self, dancer_id: Uuid) -> Result<Vec<PartnerRequest>, StoreError> {
        let rows = sqlx::query_as::<_, PartnerRequestRow>(
            r#"
            SELECT id, from_dancer_id, to_dancer_id, message, status, created_at
            FROM partner_requests
            WHERE to_dancer_id = $1 AND status = 'PENDING'
            ORDER BY created_at DESC
            "#,
        )
        .bind(dancer_id)
        .fetch_all(&self.pool)
        .await?;

        let sender_ids: Vec<Uuid> = rows.iter().map(|row| row.from_dancer_id).collect();
        let sql = format!("SELECT {} FROM dancers d WHERE d.id = ANY($1)", DANCER_COLUMNS);
        let sender_rows = sqlx::query_as::<_, DancerRow>(&sql)
            .bind(&sender_ids)
            .fetch_all(&self.pool)
            .await?;
        let senders: HashMap<Uuid, Dancer> = self
            .with_styles(sender_rows)
            .await?
            .into_iter()
            .map(|dancer| (dancer.id, dancer))
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut request = row.into_request();
                request.from_dancer = senders.get(&request.from_dancer_id).cloned();
                request
            })
            .collect())
    }

    pub async fn find_partner_request(&self, id: Uuid) -> Result<Option<PartnerRequest>, StoreError> {
        let row = sqlx::query_as::<_, PartnerRequestRow>(
            r#"
            SELECT id, from_dancer_id, to_dancer_id, message, status, created_at
            FROM partner_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PartnerRequestRow::into_request))
    }

    pub async fn set_request_status(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<PartnerRequest, StoreError> {
        let row = sqlx::query_as::<_, PartnerRequestRow>(
            r#"
            UPDATE partner_requests SET status = $2
            WHERE id = $1
            RETURNING id, from_dancer_id, to_dancer_id, message, status, created_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PartnerRequestRow::into_request)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Whether `from` has an accepted request to `to`
    pub async fn has_accepted_partnership(&self, from: Uuid, to: Uuid) -> Result<bool, StoreError> {
        let found: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM partner_requests
                WHERE from_dancer_id = $1 AND to_dancer_id = $2 AND status = 'ACCEPTED'
            )
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }

    /// One review per (teacher, reviewer); a second submission replaces the first
    pub async fn upsert_review(
        &self,
        teacher_id: Uuid,
        reviewer_id: Uuid,
        rating: i16,
        body: &str,
    ) -> Result<TeacherReview, StoreError> {
        let (id, rating, body, is_verified, created_at): (Uuid, i16, String, bool, DateTime<Utc>) =
            sqlx::query_as(
                r#"
                INSERT INTO teacher_reviews (id, teacher_id, reviewer_id, rating, body, is_verified, created_at)
                VALUES ($1, $2, $3, $4, $5, TRUE, NOW())
                ON CONFLICT (teacher_id, reviewer_id) DO UPDATE SET
                    rating = EXCLUDED.rating,
                    body = EXCLUDED.body
                RETURNING id, rating, body, is_verified, created_at
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(teacher_id)
            .bind(reviewer_id)
            .bind(rating)
            .bind(body)
            .fetch_one(&self.pool)
            .await?;

        Ok(TeacherReview {
            id,
            teacher_id,
            reviewer_id,
            rating,
            body,
            is_verified,
            created_at,
        })
    }

    pub async fn send_message(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        content: &str,
    ) -> Result<Message, StoreError> {
        let (id, is_read, created_at): (Uuid, bool, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO messages (id, sender_id, receiver_id, content, is_read, created_at)
            VALUES ($1, $2, $3, $4, FALSE, NOW())
            RETURNING id, is_read, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(Message {
            id,
            sender_id,
            receiver_id,
            content: content.to_string(),
            is_read,
            created_at,
        })
    }

    /// Messages between two dancers, oldest first; marks the ones sent to `dancer_id` as read
    pub async fn conversation(&self, dancer_id: Uuid, other_id: Uuid) -> Result<Vec<Message>, StoreError> {
        let marked = sqlx::query(
            r#"
            UPDATE messages SET is_read = TRUE
            WHERE sender_id = $1 AND receiver_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(other_id)
        .bind(dancer_id)
        .execute(&self.pool)
        .await?;

        tracing::trace!("Marked {} messages read for {}", marked.rows_affected(), dancer_id);

        let rows: Vec<(Uuid, Uuid, Uuid, String, bool, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT id, sender_id, receiver_id, content, is_read, created_at
            FROM messages
            WHERE (sender_id = $1 AND receiver_id = $2) OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(dancer_id)
        .bind(other_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, sender_id, receiver_id, content, is_read, created_at)| Message {
                id,
                sender_id,
                receiver_id,
                content,
                is_read,
                created_at,
            })
            .collect())
    }

    /// Latest message per counterpart with unread counts, newest thread first
    pub async fn threads(&self, dancer_id: Uuid) -> Result<Vec<MessageThread>, StoreError> {
        let rows = sqlx::query_as::<_, ThreadRow>(
            r#"
            WITH latest AS (
                SELECT DISTINCT ON (other_id) other_id, content, created_at
                FROM (
                    SELECT CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END AS other_id,
                           content, created_at
                    FROM messages
                    WHERE sender_id = $1 OR receiver_id = $1
                ) exchanged
                ORDER BY other_id, created_at DESC
            )
            SELECT l.other_id, l.content, l.created_at,
                   d.first_name, d.last_name, d.display_name,
                   (SELECT COUNT(*) FROM messages u
                    WHERE u.sender_id = l.other_id AND u.receiver_id = $1 AND u.is_read = FALSE
                   ) AS unread_count
            FROM latest l
            JOIN dancers d ON d.id = l.other_id
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(dancer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MessageThread {
                dancer: DancerSummary {
                    id: row.other_id,
                    first_name: row.first_name,
                    last_name: row.last_name,
                    display_name: row.display_name,
                },
                last_message: row.content,
                last_message_at: row.created_at,
                unread_count: row.unread_count,
            })
            .collect())
    }

    /// Name summaries for a set of dancers
    async fn summaries(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, DancerSummary>, StoreError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT id, first_name, last_name, display_name FROM dancers WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let summary = DancerSummary {
                    id: row.id,
                    first_name: row.first_name,
                    last_name: row.last_name,
                    display_name: row.display_name,
                };
                (row.id, summary)
            })
            .collect())
    }

    async fn with_participants(&self, rows: Vec<TryoutRow>) -> Result<Vec<Tryout>, StoreError> {
        let ids: Vec<Uuid> = rows
            .iter()
            .flat_map(|row| [row.requester_id, row.recipient_id])
            .collect();
        let people = self.summaries(&ids).await?;

        Ok(rows.into_iter().map(|row| row.into_tryout(&people)).collect())
    }

    /// Propose a tryout; the requester is the first proposer
    pub async fn create_tryout(
        &self,
        requester_id: Uuid,
        request: &CreateTryoutRequest,
    ) -> Result<Tryout, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO tryouts (id, requester_id, recipient_id, proposed_by_id, datetime,
                location_text, notes, status, created_at)
            VALUES ($1, $2, $3, $2, $4, $5, $6, $7, NOW())
            RETURNING {}
            "#,
            TRYOUT_COLUMNS
        );

        let row = sqlx::query_as::<_, TryoutRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(requester_id)
            .bind(request.recipient_id)
            .bind(request.datetime)
            .bind(request.location_text.trim())
            .bind(request.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()))
            .bind(TryoutStatus::Proposed.as_str())
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Tryout {} proposed by {}", row.id, requester_id);

        self.with_participants(vec![row])
            .await?
            .pop()
            .ok_or_else(|| StoreError::NotFound(requester_id.to_string()))
    }

    /// Proposed and confirmed tryouts the dancer takes part in, soonest first
    pub async fn active_tryouts(&self, dancer_id: Uuid) -> Result<Vec<Tryout>, StoreError> {
        let active: Vec<&str> = TryoutStatus::ACTIVE.iter().map(TryoutStatus::as_str).collect();
        let sql = format!(
            r#"
            SELECT {}
            FROM tryouts
            WHERE (requester_id = $1 OR recipient_id = $1) AND status = ANY($2)
            ORDER BY datetime ASC
            "#,
            TRYOUT_COLUMNS
        );

        let rows = sqlx::query_as::<_, TryoutRow>(&sql)
            .bind(dancer_id)
            .bind(active)
            .fetch_all(&self.pool)
            .await?;

        self.with_participants(rows).await
    }

    pub async fn find_tryout(&self, id: Uuid) -> Result<Option<Tryout>, StoreError> {
        let sql = format!("SELECT {} FROM tryouts WHERE id = $1", TRYOUT_COLUMNS);
        let row = sqlx::query_as::<_, TryoutRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.with_participants(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Apply a tryout change made by `changed_by`, who becomes the latest proposer
    ///
    /// The transition itself is checked by the caller.
    pub async fn update_tryout(
        &self,
        id: Uuid,
        changed_by: Uuid,
        update: &UpdateTryoutRequest,
    ) -> Result<Tryout, StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE tryouts SET ");
        let mut set = builder.separated(", ");
        set.push("proposed_by_id = ").push_bind_unseparated(changed_by);

        if let Some(status) = update.status {
            set.push("status = ").push_bind_unseparated(status.as_str());
        }
        if let Some(datetime) = update.datetime {
            set.push("datetime = ").push_bind_unseparated(datetime);
        }
        if let Some(location) = update.location_text.as_deref().map(str::trim) {
            set.push("location_text = ").push_bind_unseparated(location.to_string());
        }
        if let Some(notes) = &update.notes {
            set.push("notes = ").push_bind_unseparated(notes.clone());
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(TRYOUT_COLUMNS);

        let row = builder
            .build_query_as::<TryoutRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        self.with_participants(vec![row])
            .await?
            .pop()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// The dancer's results, most recent competition first
    pub async fn competition_results(&self, dancer_id: Uuid) -> Result<Vec<CompetitionResult>, StoreError> {
        let sql = format!(
            "SELECT {} FROM competition_results WHERE dancer_id = $1 ORDER BY competition_date DESC",
            RESULT_COLUMNS
        );
        let rows = sqlx::query_as::<_, CompetitionResultRow>(&sql)
            .bind(dancer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().filter_map(CompetitionResultRow::into_result).collect())
    }

    pub async fn add_competition_result(
        &self,
        dancer_id: Uuid,
        request: &CreateCompetitionResultRequest,
    ) -> Result<CompetitionResult, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO competition_results (id, dancer_id, competition_name, competition_date,
                location, partner_name, style, level, placement, total_competitors, source, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
            RETURNING {}
            "#,
            RESULT_COLUMNS
        );

        let row = sqlx::query_as::<_, CompetitionResultRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(dancer_id)
            .bind(request.competition_name.trim())
            .bind(request.competition_date)
            .bind(request.location.as_deref().filter(|l| !l.is_empty()))
            .bind(request.partner_name.as_deref().filter(|p| !p.is_empty()))
            .bind(request.style.as_str())
            .bind(request.level.as_str())
            .bind(request.placement)
            .bind(request.total_competitors)
            .bind(request.source.as_str())
            .fetch_one(&self.pool)
            .await?;

        row.into_result()
            .ok_or_else(|| StoreError::NotFound(request.style.as_str().to_string()))
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Append the WHERE conditions of a directory search
fn push_search_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &SearchQuery) {
    if query.unclaimed {
        builder.push(" AND d.is_claimed = FALSE");
    }

    if query.teachers {
        builder.push(" AND d.is_teacher = TRUE AND d.open_to_pro_am = TRUE");
    }

    if let Some(status) = query.status {
        builder.push(" AND d.partner_status = ").push_bind(status.as_str());
    }

    if let Some(state) = query.state.as_deref().filter(|s| !s.is_empty()) {
        builder.push(" AND d.state = ").push_bind(state.to_string());
    }

    if query.style.is_some() || query.level.is_some() {
        builder.push(" AND EXISTS (SELECT 1 FROM dance_styles s WHERE s.dancer_id = d.id");
        if let Some(style) = query.style {
            builder.push(" AND s.style = ").push_bind(style.as_str());
        }
        if let Some(level) = query.level {
            builder.push(" AND s.level = ").push_bind(level.as_str());
        }
        builder.push(")");
    }

    if let Some(text) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", escape_like(text));
        builder.push(" AND (");
        let mut any = builder.separated(" OR ");
        for column in ["d.first_name", "d.last_name", "d.display_name", "d.city", "d.studio_name"] {
            any.push(format!("{} ILIKE ", column))
                .push_bind_unseparated(pattern.clone());
        }
        builder.push(")");
    }
}

/// Escape LIKE wildcards so free text matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Number of pages needed for `total` rows
pub fn page_count(total: i64) -> i64 {
    (total + SEARCH_PAGE_SIZE - 1) / SEARCH_PAGE_SIZE
}
