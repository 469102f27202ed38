// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Core data structures for the Unyield verification pipeline: the four
//! persisted entities (users, video submissions, reports, admin actions)
//! and their fixed enumerations.
//!
//! ## Design Principles
//!
//! - **Serializable**: all models serialize to camelCase JSON, which is the
//!   stable field-name contract the API layer and gateway callers rely on
//!   (`totalPoints`, `pointsAwarded`, ...)
//! - **Type Safe**: lifecycle states and audit targets are enums, not
//!   strings, so illegal states are unrepresentable at the call sites
//! - **Denormalized display fields** (`verified_by_name`, `admin_name`) are
//!   write-time caches of User data, never a second source of truth
//!
//! ## Core Models
//!
//! - [`User`]: identity plus competitive record (points, rank, streak)
//! - [`VideoSubmission`]: a proof-of-performance artifact under moderation
//! - [`Report`]: a user's flag against a submission
//! - [`AdminAction`]: immutable audit record of a privileged decision

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geographic leaderboard scope. `Global` doubles as the "no filter"
/// sentinel in leaderboard queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    #[default]
    Global,
    NorthAmerica,
    SouthAmerica,
    Europe,
    Africa,
    Asia,
    Oceania,
    MiddleEast,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Global => "global",
            Region::NorthAmerica => "north_america",
            Region::SouthAmerica => "south_america",
            Region::Europe => "europe",
            Region::Africa => "africa",
            Region::Asia => "asia",
            Region::Oceania => "oceania",
            Region::MiddleEast => "middle_east",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "north_america" => Region::NorthAmerica,
            "south_america" => Region::SouthAmerica,
            "europe" => Region::Europe,
            "africa" => Region::Africa,
            "asia" => Region::Asia,
            "oceania" => Region::Oceania,
            "middle_east" => Region::MiddleEast,
            _ => Region::Global,
        }
    }
}

/// Accolade tags an admin can grant to a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccoladeTag {
    Admin,
    VerifiedAthlete,
    FoundingMember,
    Champion,
    Coach,
}

/// A registered user and their competitive record.
///
/// `rank` is derived from `total_points` and is recomputed by the scoring
/// engine on every points change; it is never authoritative on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Public display name
    pub display_name: String,
    /// Leaderboard region
    pub region: Region,
    /// Cumulative points across all approved submissions
    pub total_points: i64,
    /// Points earned in the current scoring week
    pub weekly_points: i64,
    /// Derived rank, 1 = best (default worst-value 99 at registration)
    pub rank: i64,
    /// Consecutive-workout streak in calendar days
    pub streak: i64,
    /// Best streak ever achieved
    pub streak_best: i64,
    /// Calendar day of the last qualifying workout
    pub last_workout_date: Option<NaiveDate>,
    /// Accolades granted by admins
    pub accolades: Vec<AccoladeTag>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the default competitive record.
    pub fn new(display_name: String, region: Region) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name,
            region,
            total_points: 0,
            weekly_points: 0,
            rank: 99,
            streak: 0,
            streak_best: 0,
            last_workout_date: None,
            accolades: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// Lifecycle state of a video submission.
///
/// `Pending` is initial; `Approved` and `Rejected` are terminal. The single
/// legal exit from `Approved` is the report-escalation force-reject path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "approved" => SubmissionStatus::Approved,
            "rejected" => SubmissionStatus::Rejected,
            _ => SubmissionStatus::Pending,
        }
    }
}

/// A user-submitted exercise video awaiting (or past) verification.
///
/// Invariant: `points_awarded > 0` implies `status == Approved`. The value is
/// set at most once, at approval time, and never recomputed even if the
/// scoring policy changes later; force-reject zeroes it while reversing the
/// owner's totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSubmission {
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Optional workout this submission belongs to
    pub workout_id: Option<Uuid>,
    /// Exercise name, e.g. "pushup"
    pub exercise: String,
    /// Repetitions claimed
    pub reps: i64,
    /// Added weight in kilograms (0 for bodyweight)
    pub weight_kg: f64,
    /// Duration of the set, for timed exercises
    pub duration_seconds: Option<i64>,
    /// Opaque media reference issued by the blob store
    pub media_url: String,
    pub status: SubmissionStatus,
    /// Verifying admin, stamped at decision time
    pub verified_by: Option<Uuid>,
    /// Verifying admin's display name (write-time cache for display)
    pub verified_by_name: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    /// Required when rejected
    pub rejection_reason: Option<String>,
    /// Points granted at approval; 0 otherwise
    pub points_awarded: i64,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a new submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub user_id: Uuid,
    pub workout_id: Option<Uuid>,
    pub exercise: String,
    pub reps: i64,
    pub weight_kg: f64,
    pub duration_seconds: Option<i64>,
    pub media_url: String,
}

impl VideoSubmission {
    pub fn new(params: NewSubmission) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: params.user_id,
            workout_id: params.workout_id,
            exercise: params.exercise,
            reps: params.reps,
            weight_kg: params.weight_kg,
            duration_seconds: params.duration_seconds,
            media_url: params.media_url,
            status: SubmissionStatus::Pending,
            verified_by: None,
            verified_by_name: None,
            verified_at: None,
            rejection_reason: None,
            points_awarded: 0,
            created_at: Utc::now(),
        }
    }
}

/// Why a submission was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    FakeVideo,
    IncorrectForm,
    InappropriateContent,
    Spam,
    Harassment,
    Other,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::FakeVideo => "fake_video",
            ReportType::IncorrectForm => "incorrect_form",
            ReportType::InappropriateContent => "inappropriate_content",
            ReportType::Spam => "spam",
            ReportType::Harassment => "harassment",
            ReportType::Other => "other",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "fake_video" => ReportType::FakeVideo,
            "incorrect_form" => ReportType::IncorrectForm,
            "inappropriate_content" => ReportType::InappropriateContent,
            "spam" => ReportType::Spam,
            "harassment" => ReportType::Harassment,
            _ => ReportType::Other,
        }
    }
}

/// Lifecycle state of a report. `Pending` is initial; the other three are
/// terminal, reached exactly once via an admin review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "reviewed" => ReportStatus::Reviewed,
            "resolved" => ReportStatus::Resolved,
            "dismissed" => ReportStatus::Dismissed,
            _ => ReportStatus::Pending,
        }
    }
}

/// What the reviewing admin did about a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportAction {
    NoAction,
    VideoRemoved,
    WarningIssued,
    UserBanned,
}

impl ReportAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportAction::NoAction => "no_action",
            ReportAction::VideoRemoved => "video_removed",
            ReportAction::WarningIssued => "warning_issued",
            ReportAction::UserBanned => "user_banned",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "video_removed" => ReportAction::VideoRemoved,
            "warning_issued" => ReportAction::WarningIssued,
            "user_banned" => ReportAction::UserBanned,
            _ => ReportAction::NoAction,
        }
    }
}

/// A user's flag against a video submission.
///
/// Multiple reports may target the same submission; each is reviewed
/// independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub submission_id: Uuid,
    pub report_type: ReportType,
    /// Free-text reason, non-empty, bounded length
    pub reason: String,
    pub status: ReportStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
    pub action_taken: Option<ReportAction>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(
        reporter_id: Uuid,
        submission_id: Uuid,
        report_type: ReportType,
        reason: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reporter_id,
            submission_id,
            report_type,
            reason,
            status: ReportStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
            action_taken: None,
            created_at: Utc::now(),
        }
    }
}

/// Kind of privileged action recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminActionKind {
    UserBanned,
    UserUnbanned,
    UserAccoladeGranted,
    UserAccoladeRevoked,
    VideoApproved,
    VideoRejected,
    AppealGranted,
    AppealDenied,
    ReportResolved,
    ReportDismissed,
    ChallengeCreated,
    ChallengeRemoved,
    NotificationBroadcast,
    SettingsUpdated,
}

impl AdminActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminActionKind::UserBanned => "user_banned",
            AdminActionKind::UserUnbanned => "user_unbanned",
            AdminActionKind::UserAccoladeGranted => "user_accolade_granted",
            AdminActionKind::UserAccoladeRevoked => "user_accolade_revoked",
            AdminActionKind::VideoApproved => "video_approved",
            AdminActionKind::VideoRejected => "video_rejected",
            AdminActionKind::AppealGranted => "appeal_granted",
            AdminActionKind::AppealDenied => "appeal_denied",
            AdminActionKind::ReportResolved => "report_resolved",
            AdminActionKind::ReportDismissed => "report_dismissed",
            AdminActionKind::ChallengeCreated => "challenge_created",
            AdminActionKind::ChallengeRemoved => "challenge_removed",
            AdminActionKind::NotificationBroadcast => "notification_broadcast",
            AdminActionKind::SettingsUpdated => "settings_updated",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "user_banned" => AdminActionKind::UserBanned,
            "user_unbanned" => AdminActionKind::UserUnbanned,
            "user_accolade_granted" => AdminActionKind::UserAccoladeGranted,
            "user_accolade_revoked" => AdminActionKind::UserAccoladeRevoked,
            "video_approved" => AdminActionKind::VideoApproved,
            "video_rejected" => AdminActionKind::VideoRejected,
            "appeal_granted" => AdminActionKind::AppealGranted,
            "appeal_denied" => AdminActionKind::AppealDenied,
            "report_resolved" => AdminActionKind::ReportResolved,
            "report_dismissed" => AdminActionKind::ReportDismissed,
            "challenge_created" => AdminActionKind::ChallengeCreated,
            "challenge_removed" => AdminActionKind::ChallengeRemoved,
            "notification_broadcast" => AdminActionKind::NotificationBroadcast,
            _ => AdminActionKind::SettingsUpdated,
        }
    }
}

/// Typed audit target: one variant per entity an admin action can touch.
///
/// Persisted as a (`target_type`, `target_id`) column pair so the audit table
/// can span entities without a typed foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "targetType", content = "targetId", rename_all = "snake_case")]
pub enum AuditTarget {
    User(Uuid),
    Submission(Uuid),
    Report(Uuid),
    Appeal(Uuid),
}

impl AuditTarget {
    pub fn target_type(&self) -> &'static str {
        match self {
            AuditTarget::User(_) => "user",
            AuditTarget::Submission(_) => "submission",
            AuditTarget::Report(_) => "report",
            AuditTarget::Appeal(_) => "appeal",
        }
    }

    pub fn target_id(&self) -> Uuid {
        match self {
            AuditTarget::User(id)
            | AuditTarget::Submission(id)
            | AuditTarget::Report(id)
            | AuditTarget::Appeal(id) => *id,
        }
    }

    pub fn from_db(target_type: &str, target_id: Uuid) -> Self {
        match target_type {
            "user" => AuditTarget::User(target_id),
            "report" => AuditTarget::Report(target_id),
            "appeal" => AuditTarget::Appeal(target_id),
            _ => AuditTarget::Submission(target_id),
        }
    }
}

/// Immutable audit record of a privileged decision.
///
/// Written synchronously as the last step of every moderation operation and
/// never mutated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAction {
    pub id: Uuid,
    pub admin_id: Uuid,
    /// Acting admin's display name (write-time cache for display)
    pub admin_name: String,
    pub kind: AdminActionKind,
    #[serde(flatten)]
    pub target: AuditTarget,
    /// Structured detail payload, action-kind specific
    pub details: serde_json::Value,
    /// Requester IP, best-effort
    pub ip_address: Option<String>,
    /// Requester user agent, best-effort
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AdminAction {
    pub fn new(
        admin_id: Uuid,
        admin_name: String,
        kind: AdminActionKind,
        target: AuditTarget,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            admin_id,
            admin_name,
            kind,
            target,
            details,
            ip_address: None,
            user_agent: None,
            created_at: Utc::now(),
        }
    }
}
