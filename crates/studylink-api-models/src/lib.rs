#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the StudyLink REST API.
//!
//! Field names follow the backend's camelCase JSON contract. A few names carry
//! the backend's own spelling (`recruitmentDeadLine` on recommendations) so the
//! payloads round-trip without custom adapters.
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Identifier type used by every backend entity.
pub type EntityId = i64;

/// Experience level advertised on a member profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Career {
    /// Just getting started.
    Newbie,
    /// A few years of experience.
    Junior,
    /// Long-standing experience.
    Senior,
}

/// How a study group meets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudyStyle {
    /// Meets remotely.
    Online,
    /// Meets in person.
    Offline,
    /// Mix of both.
    Hybrid,
}

/// Lifecycle of an application to join a study group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// Awaiting a decision from the group owner.
    Pending,
    /// Accepted into the group.
    Accepted,
    /// Declined by the group owner.
    Rejected,
}

/// Decision recorded when an owner processes an application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationDecision {
    /// Accept the applicant.
    Accepted,
    /// Reject the applicant.
    Rejected,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Response of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer credential for subsequent requests.
    pub access_token: String,
}

/// Body of `POST /api/auth/signup`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Public display name.
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Experience level.
    pub career: Option<Career>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Current occupation.
    pub job: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Study goal.
    pub goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Preferred meeting style.
    pub study_style: Option<StudyStyle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// Interest tags.
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Home region.
    pub region: Option<String>,
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// Response of `GET /api/members/me`; the authoritative identity source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Member identifier.
    pub id: EntityId,
    /// Account email.
    pub email: String,
    /// Public display name.
    pub nickname: String,
    #[serde(default)]
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    /// Experience level.
    pub career: Option<Career>,
    #[serde(default)]
    /// Current occupation.
    pub job: Option<String>,
    #[serde(default)]
    /// Study goal.
    pub goal: Option<String>,
    #[serde(default)]
    /// Preferred meeting style.
    pub study_style: Option<StudyStyle>,
    #[serde(default)]
    /// Home region.
    pub region: Option<String>,
    #[serde(default)]
    /// Interest tags.
    pub tags: Vec<String>,
    #[serde(default)]
    /// Account creation timestamp.
    pub created_at: Option<NaiveDateTime>,
}

/// Body of `PUT /api/members/me`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New display name.
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New experience level.
    pub career: Option<Career>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New occupation.
    pub job: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New study goal.
    pub goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New meeting style.
    pub study_style: Option<StudyStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New home region.
    pub region: Option<String>,
}

impl ProfileUpdateRequest {
    /// Whether the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nickname.is_none()
            && self.career.is_none()
            && self.job.is_none()
            && self.goal.is_none()
            && self.study_style.is_none()
            && self.tags.is_none()
            && self.region.is_none()
    }
}

/// Entry of the "my study groups" lists (participating or created).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MyStudyGroup {
    /// Study group identifier.
    pub id: EntityId,
    /// Group title.
    pub title: String,
    /// Group topic.
    pub topic: String,
    /// Members currently in the group.
    pub current_participants: u32,
    /// Maximum number of members.
    pub max_participants: u32,
    #[serde(default)]
    /// Last day applications are accepted.
    pub recruitment_deadline: Option<NaiveDate>,
}

/// Application as seen by the applicant (`GET /api/members/me/applications`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberApplication {
    /// Application identifier.
    pub application_id: EntityId,
    /// Target study group.
    pub study_group_id: EntityId,
    /// Target study group title.
    pub study_group_title: String,
    /// Motivation message.
    pub message: String,
    /// Current status.
    pub status: ApplicationStatus,
    #[serde(default)]
    /// Submission timestamp.
    pub applied_at: Option<NaiveDateTime>,
}

// ---------------------------------------------------------------------------
// Study groups
// ---------------------------------------------------------------------------

/// Entry of `GET /api/study-groups`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroupSummary {
    /// Study group identifier.
    pub id: EntityId,
    /// Group title.
    pub title: String,
    /// Group topic.
    pub topic: String,
    /// Owner display name.
    pub creator_nickname: String,
    #[serde(default)]
    /// Last day applications are accepted.
    pub recruitment_deadline: Option<NaiveDate>,
    #[serde(default)]
    /// Meeting region.
    pub region: Option<String>,
    #[serde(default)]
    /// Number of detail views.
    pub view_count: u32,
    #[serde(default)]
    /// Number of members who marked the group as interesting.
    pub interest_count: u32,
}

/// Entry of `GET /api/study-groups/recommendations[/v2]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedStudyGroup {
    /// Study group identifier.
    pub id: EntityId,
    /// Group title.
    pub title: String,
    /// Group topic.
    pub topic: String,
    /// Owner display name.
    pub creator_nickname: String,
    #[serde(default, rename = "recruitmentDeadLine")]
    /// Last day applications are accepted.
    pub recruitment_deadline: Option<NaiveDate>,
    /// Relevance score computed by the backend.
    pub match_score: f64,
}

/// Response of `GET /api/study-groups/{id}` and of create/update calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroupDetail {
    /// Study group identifier.
    pub id: EntityId,
    /// Group title.
    pub title: String,
    /// Group topic.
    pub topic: String,
    /// Long-form description.
    pub description: String,
    /// Shared goal.
    pub goal: String,
    /// Members currently in the group.
    pub current_member_count: u32,
    /// Maximum number of members.
    pub max_member_count: u32,
    #[serde(default)]
    /// Meeting region.
    pub region: Option<String>,
    #[serde(default)]
    /// Meeting style.
    pub study_style: Option<StudyStyle>,
    #[serde(default)]
    /// Topic tags.
    pub tags: Vec<String>,
    /// Owner member identifier.
    pub creator_id: EntityId,
    /// Owner display name.
    pub creator_nickname: String,
    #[serde(default)]
    /// Last day applications are accepted.
    pub recruitment_deadline: Option<NaiveDate>,
    #[serde(default)]
    /// Creation timestamp.
    pub created_at: Option<NaiveDateTime>,
}

/// Body of `POST /api/study-groups`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroupCreateRequest {
    /// Group title.
    pub title: String,
    /// Group topic.
    pub topic: String,
    /// Long-form description.
    pub description: String,
    /// Shared goal.
    pub goal: String,
    /// Maximum number of members.
    pub member_count: u32,
    /// Meeting style.
    pub study_style: StudyStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Meeting region.
    pub region: Option<String>,
    #[serde(default)]
    /// Topic tags.
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Minimum experience level expected from applicants.
    pub required_career: Option<Career>,
    /// Last day applications are accepted.
    pub recruitment_deadline: NaiveDate,
}

/// Body of `PUT /api/study-groups/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroupUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New title.
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New topic.
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New description.
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New goal.
    pub goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New member cap.
    pub member_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New deadline.
    pub recruitment_deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New region.
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// New meeting style.
    pub study_style: Option<StudyStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
}

impl StudyGroupUpdateRequest {
    /// Whether the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.topic.is_none()
            && self.description.is_none()
            && self.goal.is_none()
            && self.member_count.is_none()
            && self.recruitment_deadline.is_none()
            && self.region.is_none()
            && self.study_style.is_none()
            && self.tags.is_none()
    }
}

/// Sort orders accepted by the study group listing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StudyGroupSort {
    /// Newest first (backend default).
    #[default]
    Latest,
    /// Still-open groups, closest recruitment deadline first.
    Deadline,
}

/// Query string of `GET /api/study-groups`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyGroupQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Restrict to one region.
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Result ordering.
    pub sort: Option<StudyGroupSort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Free-text search across title and topic.
    pub search: Option<String>,
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

/// Body of `POST /api/study-groups/{id}/applications`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationRequest {
    /// Motivation message.
    pub message: String,
}

/// Application as seen by the group owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    /// Application identifier.
    pub application_id: EntityId,
    #[serde(default)]
    /// Applicant member identifier.
    pub applicant_id: Option<EntityId>,
    /// Applicant display name.
    pub applicant_nickname: String,
    /// Motivation message.
    pub message: String,
    /// Current status.
    pub status: ApplicationStatus,
}

/// Body of `POST /api/study-groups/{id}/applications/{applicationId}/process`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationProcessRequest {
    /// Owner decision.
    pub status: ApplicationDecision,
}

// ---------------------------------------------------------------------------
// Comments and interests
// ---------------------------------------------------------------------------

/// Body of `POST /api/study-groups/{id}/comments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    /// Comment body.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Parent comment when replying.
    pub parent_id: Option<EntityId>,
}

/// Threaded comment returned by the comment endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment identifier.
    pub id: EntityId,
    /// Comment body.
    pub content: String,
    /// Author display name.
    pub author_nickname: String,
    /// Author member identifier.
    pub author_id: EntityId,
    #[serde(default)]
    /// Creation timestamp.
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    /// Replies, oldest first.
    pub children: Vec<Comment>,
}

impl Comment {
    /// Total number of comments in this thread, including the root.
    #[must_use]
    pub fn thread_len(&self) -> usize {
        1 + self.children.iter().map(Self::thread_len).sum::<usize>()
    }
}

/// Response of `POST /api/study-groups/{id}/interest`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InterestToggle {
    /// Whether the group is now marked as interesting.
    pub is_interested: bool,
}
