// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Persistence Gateway
//!
//! The only component touching durable storage. Exposes atomic reads and
//! writes over the four entities (users, video submissions, reports, admin
//! actions) on a SQLite pool.
//!
//! Lifecycle transitions are implemented as conditional `UPDATE ... WHERE
//! status = ?` statements whose rows-affected count is the optimistic
//! check-and-set: a count of zero means another writer won the race (or the
//! precondition never held) and the caller surfaces `InvalidState`. The
//! moderator composes these with score and audit writes inside a single
//! transaction so the §-style transition/score/audit unit commits or rolls
//! back as a whole.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite, Transaction};
use uuid::Uuid;

use crate::errors::{PipelineError, Result};
use crate::models::{
    AccoladeTag, AdminAction, AdminActionKind, AuditTarget, Region, Report, ReportAction,
    ReportStatus, SubmissionStatus, User, VideoSubmission,
};

/// Sort field selector for leaderboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreScope {
    /// Sort by cumulative `total_points`
    AllTime,
    /// Sort by `weekly_points` for the current scoring week
    Weekly,
}

/// Gateway over the SQLite store.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

fn decode_err<E>(e: E) -> PipelineError
where
    E: std::error::Error + Send + Sync + 'static,
{
    PipelineError::Persistence(sqlx::Error::Decode(Box::new(e)))
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(decode_err)
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(decode_err)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    s.parse::<NaiveDate>().map_err(decode_err)
}

impl Database {
    /// Open a connection pool and run migrations.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        // An in-memory SQLite database exists per connection; pin the pool
        // to one connection so every handle sees the same database.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&connection_options)
                .await?
        } else {
            SqlitePoolOptions::new().connect(&connection_options).await?
        };

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Create the schema. Idempotent.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                region TEXT NOT NULL DEFAULT 'global',
                total_points INTEGER NOT NULL DEFAULT 0,
                weekly_points INTEGER NOT NULL DEFAULT 0,
                rank INTEGER NOT NULL DEFAULT 99,
                streak INTEGER NOT NULL DEFAULT 0,
                streak_best INTEGER NOT NULL DEFAULT 0,
                last_workout_date TEXT,
                accolades TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS video_submissions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                workout_id TEXT,
                exercise TEXT NOT NULL,
                reps INTEGER NOT NULL,
                weight_kg REAL NOT NULL DEFAULT 0,
                duration_seconds INTEGER,
                media_url TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                verified_by TEXT,
                verified_by_name TEXT,
                verified_at TEXT,
                rejection_reason TEXT,
                points_awarded INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reports (
                id TEXT PRIMARY KEY,
                reporter_id TEXT NOT NULL,
                submission_id TEXT NOT NULL,
                report_type TEXT NOT NULL,
                reason TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                reviewed_by TEXT,
                reviewed_at TEXT,
                review_notes TEXT,
                action_taken TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS admin_actions (
                id TEXT PRIMARY KEY,
                admin_id TEXT NOT NULL,
                admin_name TEXT NOT NULL,
                kind TEXT NOT NULL,
                target_type TEXT NOT NULL,
                target_id TEXT NOT NULL,
                details TEXT NOT NULL DEFAULT '{}',
                ip_address TEXT,
                user_agent TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_submissions_status ON video_submissions(status)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reports_status ON reports(status)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_actions_admin ON admin_actions(admin_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_actions_target ON admin_actions(target_type, target_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Begin a transaction for a composite transition/score/audit unit.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    // ----- users -----

    /// Insert a new user.
    pub async fn create_user(&self, user: &User) -> Result<Uuid> {
        sqlx::query(
            r#"
            INSERT INTO users (id, display_name, region, total_points, weekly_points,
                               rank, streak, streak_best, last_workout_date, accolades, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.display_name)
        .bind(user.region.as_str())
        .bind(user.total_points)
        .bind(user.weekly_points)
        .bind(user.rank)
        .bind(user.streak)
        .bind(user.streak_best)
        .bind(user.last_workout_date.map(|d| d.to_string()))
        .bind(serde_json::to_string(&user.accolades).map_err(decode_err)?)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get a user by id.
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_user).transpose()
    }

    /// Get a user by id, failing with `NotFound` when absent.
    pub async fn get_user_required(&self, user_id: Uuid) -> Result<User> {
        self.get_user(user_id)
            .await?
            .ok_or_else(|| PipelineError::not_found("user", user_id))
    }

    /// Get a user inside an open transaction.
    pub async fn get_user_tx(
        &self,
        tx: &mut Transaction<'static, Sqlite>,
        user_id: Uuid,
    ) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&mut **tx)
            .await?;

        row.map(row_to_user).transpose()
    }

    /// Write a user's competitive record (points, rank, streak fields).
    ///
    /// Runs inside the caller's transaction so the rank written here was
    /// computed from the totals read in the same transaction.
    pub async fn update_user_score(
        &self,
        tx: &mut Transaction<'static, Sqlite>,
        user: &User,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET total_points = ?1, weekly_points = ?2, rank = ?3,
                streak = ?4, streak_best = ?5, last_workout_date = ?6
            WHERE id = ?7
            "#,
        )
        .bind(user.total_points)
        .bind(user.weekly_points)
        .bind(user.rank)
        .bind(user.streak)
        .bind(user.streak_best)
        .bind(user.last_workout_date.map(|d| d.to_string()))
        .bind(user.id.to_string())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Replace a user's accolade set.
    pub async fn update_user_accolades(
        &self,
        tx: &mut Transaction<'static, Sqlite>,
        user_id: Uuid,
        accolades: &[AccoladeTag],
    ) -> Result<()> {
        sqlx::query("UPDATE users SET accolades = ?1 WHERE id = ?2")
            .bind(serde_json::to_string(accolades).map_err(decode_err)?)
            .bind(user_id.to_string())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Zero every user's weekly points. Called by the scheduler collaborator
    /// at the scoring-week rollover.
    pub async fn reset_weekly_points(&self) -> Result<u64> {
        let result = sqlx::query("UPDATE users SET weekly_points = 0 WHERE weekly_points != 0")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Ranked user page for the leaderboard service.
    ///
    /// Descending by the scope's field with `id ASC` as the explicit
    /// deterministic tie-break.
    pub async fn leaderboard_page(
        &self,
        region: Region,
        scope: ScoreScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        let sort_field = match scope {
            ScoreScope::AllTime => "total_points",
            ScoreScope::Weekly => "weekly_points",
        };

        let rows = if region == Region::Global {
            sqlx::query(&format!(
                "SELECT * FROM users ORDER BY {sort_field} DESC, id ASC LIMIT ?1 OFFSET ?2"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query(&format!(
                "SELECT * FROM users WHERE region = ?1 ORDER BY {sort_field} DESC, id ASC LIMIT ?2 OFFSET ?3"
            ))
            .bind(region.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        };

        rows.into_iter().map(row_to_user).collect()
    }

    // ----- video submissions -----

    /// Insert a new submission.
    pub async fn create_submission(&self, submission: &VideoSubmission) -> Result<Uuid> {
        sqlx::query(
            r#"
            INSERT INTO video_submissions
                (id, user_id, workout_id, exercise, reps, weight_kg, duration_seconds,
                 media_url, status, points_awarded, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(submission.id.to_string())
        .bind(submission.user_id.to_string())
        .bind(submission.workout_id.map(|id| id.to_string()))
        .bind(&submission.exercise)
        .bind(submission.reps)
        .bind(submission.weight_kg)
        .bind(submission.duration_seconds)
        .bind(&submission.media_url)
        .bind(submission.status.as_str())
        .bind(submission.points_awarded)
        .bind(submission.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(submission.id)
    }

    /// Get a submission by id.
    pub async fn get_submission(&self, submission_id: Uuid) -> Result<Option<VideoSubmission>> {
        let row = sqlx::query("SELECT * FROM video_submissions WHERE id = ?1")
            .bind(submission_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_submission).transpose()
    }

    /// Get a submission inside an open transaction.
    pub async fn get_submission_tx(
        &self,
        tx: &mut Transaction<'static, Sqlite>,
        submission_id: Uuid,
    ) -> Result<Option<VideoSubmission>> {
        let row = sqlx::query("SELECT * FROM video_submissions WHERE id = ?1")
            .bind(submission_id.to_string())
            .fetch_optional(&mut **tx)
            .await?;

        row.map(row_to_submission).transpose()
    }

    /// Oldest-first moderation queue of pending submissions.
    pub async fn pending_submissions(&self, limit: i64) -> Result<Vec<VideoSubmission>> {
        let rows = sqlx::query(
            "SELECT * FROM video_submissions WHERE status = 'pending' ORDER BY created_at ASC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_submission).collect()
    }

    /// Check-and-set `pending -> approved`, stamping verifier identity and
    /// the awarded points. Returns false when the submission was no longer
    /// pending (lost race or already decided).
    pub async fn mark_submission_approved(
        &self,
        tx: &mut Transaction<'static, Sqlite>,
        submission_id: Uuid,
        admin_id: Uuid,
        admin_name: &str,
        points: i64,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE video_submissions
            SET status = 'approved', verified_by = ?1, verified_by_name = ?2,
                verified_at = ?3, points_awarded = ?4
            WHERE id = ?5 AND status = 'pending'
            "#,
        )
        .bind(admin_id.to_string())
        .bind(admin_name)
        .bind(now.to_rfc3339())
        .bind(points)
        .bind(submission_id.to_string())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Check-and-set `pending -> rejected` with a reason.
    pub async fn mark_submission_rejected(
        &self,
        tx: &mut Transaction<'static, Sqlite>,
        submission_id: Uuid,
        admin_id: Uuid,
        admin_name: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE video_submissions
            SET status = 'rejected', verified_by = ?1, verified_by_name = ?2,
                verified_at = ?3, rejection_reason = ?4
            WHERE id = ?5 AND status = 'pending'
            "#,
        )
        .bind(admin_id.to_string())
        .bind(admin_name)
        .bind(now.to_rfc3339())
        .bind(reason)
        .bind(submission_id.to_string())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Escalation check-and-set: force any not-yet-rejected submission to
    /// `rejected`, zeroing `points_awarded`. Returns false when the
    /// submission was already rejected (the removal is then a no-op).
    pub async fn revoke_submission(
        &self,
        tx: &mut Transaction<'static, Sqlite>,
        submission_id: Uuid,
        admin_id: Uuid,
        admin_name: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE video_submissions
            SET status = 'rejected', verified_by = ?1, verified_by_name = ?2,
                verified_at = ?3, rejection_reason = ?4, points_awarded = 0
            WHERE id = ?5 AND status != 'rejected'
            "#,
        )
        .bind(admin_id.to_string())
        .bind(admin_name)
        .bind(now.to_rfc3339())
        .bind(reason)
        .bind(submission_id.to_string())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    // ----- reports -----

    /// Insert a new report.
    pub async fn create_report(&self, report: &Report) -> Result<Uuid> {
        sqlx::query(
            r#"
            INSERT INTO reports (id, reporter_id, submission_id, report_type, reason, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(report.id.to_string())
        .bind(report.reporter_id.to_string())
        .bind(report.submission_id.to_string())
        .bind(report.report_type.as_str())
        .bind(&report.reason)
        .bind(report.status.as_str())
        .bind(report.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(report.id)
    }

    /// Get a report by id.
    pub async fn get_report(&self, report_id: Uuid) -> Result<Option<Report>> {
        let row = sqlx::query("SELECT * FROM reports WHERE id = ?1")
            .bind(report_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_report).transpose()
    }

    /// Oldest-first moderation queue of pending reports.
    pub async fn pending_reports(&self, limit: i64) -> Result<Vec<Report>> {
        let rows = sqlx::query(
            "SELECT * FROM reports WHERE status = 'pending' ORDER BY created_at ASC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_report).collect()
    }

    /// Check-and-set `pending -> terminal` for a report review.
    pub async fn mark_report_reviewed(
        &self,
        tx: &mut Transaction<'static, Sqlite>,
        report_id: Uuid,
        status: ReportStatus,
        admin_id: Uuid,
        notes: Option<&str>,
        action_taken: ReportAction,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE reports
            SET status = ?1, reviewed_by = ?2, reviewed_at = ?3,
                review_notes = ?4, action_taken = ?5
            WHERE id = ?6 AND status = 'pending'
            "#,
        )
        .bind(status.as_str())
        .bind(admin_id.to_string())
        .bind(now.to_rfc3339())
        .bind(notes)
        .bind(action_taken.as_str())
        .bind(report_id.to_string())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    // ----- admin actions -----

    /// Append an audit record inside the caller's transaction. A failure
    /// here fails the whole unit; an unaudited privileged action is a
    /// correctness violation.
    pub async fn insert_admin_action(
        &self,
        tx: &mut Transaction<'static, Sqlite>,
        action: &AdminAction,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO admin_actions
                (id, admin_id, admin_name, kind, target_type, target_id,
                 details, ip_address, user_agent, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(action.id.to_string())
        .bind(action.admin_id.to_string())
        .bind(&action.admin_name)
        .bind(action.kind.as_str())
        .bind(action.target.target_type())
        .bind(action.target.target_id().to_string())
        .bind(action.details.to_string())
        .bind(action.ip_address.as_deref())
        .bind(action.user_agent.as_deref())
        .bind(action.created_at.to_rfc3339())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Append a standalone audit record in its own transaction.
    pub async fn append_admin_action(&self, action: &AdminAction) -> Result<()> {
        let mut tx = self.begin().await?;
        self.insert_admin_action(&mut tx, action).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Newest-first audit entries written by one admin.
    pub async fn actions_by_admin(&self, admin_id: Uuid, limit: i64) -> Result<Vec<AdminAction>> {
        let rows = sqlx::query(
            "SELECT * FROM admin_actions WHERE admin_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        )
        .bind(admin_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_action).collect()
    }

    /// Newest-first audit entries touching one target.
    pub async fn actions_by_target(
        &self,
        target: &AuditTarget,
        limit: i64,
    ) -> Result<Vec<AdminAction>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM admin_actions
            WHERE target_type = ?1 AND target_id = ?2
            ORDER BY created_at DESC, id DESC LIMIT ?3
            "#,
        )
        .bind(target.target_type())
        .bind(target.target_id().to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_action).collect()
    }
}

// ----- row mapping -----

fn row_to_user(row: sqlx::sqlite::SqliteRow) -> Result<User> {
    let id: String = row.try_get("id")?;
    let region: String = row.try_get("region")?;
    let last_workout_date: Option<String> = row.try_get("last_workout_date")?;
    let accolades: String = row.try_get("accolades")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(User {
        id: parse_uuid(&id)?,
        display_name: row.try_get("display_name")?,
        region: Region::from_db(&region),
        total_points: row.try_get("total_points")?,
        weekly_points: row.try_get("weekly_points")?,
        rank: row.try_get("rank")?,
        streak: row.try_get("streak")?,
        streak_best: row.try_get("streak_best")?,
        last_workout_date: last_workout_date.as_deref().map(parse_date).transpose()?,
        accolades: serde_json::from_str(&accolades).map_err(decode_err)?,
        created_at: parse_ts(&created_at)?,
    })
}

fn row_to_submission(row: sqlx::sqlite::SqliteRow) -> Result<VideoSubmission> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let workout_id: Option<String> = row.try_get("workout_id")?;
    let status: String = row.try_get("status")?;
    let verified_by: Option<String> = row.try_get("verified_by")?;
    let verified_at: Option<String> = row.try_get("verified_at")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(VideoSubmission {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        workout_id: workout_id.as_deref().map(parse_uuid).transpose()?,
        exercise: row.try_get("exercise")?,
        reps: row.try_get("reps")?,
        weight_kg: row.try_get("weight_kg")?,
        duration_seconds: row.try_get("duration_seconds")?,
        media_url: row.try_get("media_url")?,
        status: SubmissionStatus::from_db(&status),
        verified_by: verified_by.as_deref().map(parse_uuid).transpose()?,
        verified_by_name: row.try_get("verified_by_name")?,
        verified_at: verified_at.as_deref().map(parse_ts).transpose()?,
        rejection_reason: row.try_get("rejection_reason")?,
        points_awarded: row.try_get("points_awarded")?,
        created_at: parse_ts(&created_at)?,
    })
}

fn row_to_report(row: sqlx::sqlite::SqliteRow) -> Result<Report> {
    let id: String = row.try_get("id")?;
    let reporter_id: String = row.try_get("reporter_id")?;
    let submission_id: String = row.try_get("submission_id")?;
    let report_type: String = row.try_get("report_type")?;
    let status: String = row.try_get("status")?;
    let reviewed_by: Option<String> = row.try_get("reviewed_by")?;
    let reviewed_at: Option<String> = row.try_get("reviewed_at")?;
    let action_taken: Option<String> = row.try_get("action_taken")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Report {
        id: parse_uuid(&id)?,
        reporter_id: parse_uuid(&reporter_id)?,
        submission_id: parse_uuid(&submission_id)?,
        report_type: crate::models::ReportType::from_db(&report_type),
        reason: row.try_get("reason")?,
        status: ReportStatus::from_db(&status),
        reviewed_by: reviewed_by.as_deref().map(parse_uuid).transpose()?,
        reviewed_at: reviewed_at.as_deref().map(parse_ts).transpose()?,
        review_notes: row.try_get("review_notes")?,
        action_taken: action_taken.as_deref().map(ReportAction::from_db),
        created_at: parse_ts(&created_at)?,
    })
}

fn row_to_action(row: sqlx::sqlite::SqliteRow) -> Result<AdminAction> {
    let id: String = row.try_get("id")?;
    let admin_id: String = row.try_get("admin_id")?;
    let kind: String = row.try_get("kind")?;
    let target_type: String = row.try_get("target_type")?;
    let target_id: String = row.try_get("target_id")?;
    let details: String = row.try_get("details")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(AdminAction {
        id: parse_uuid(&id)?,
        admin_id: parse_uuid(&admin_id)?,
        admin_name: row.try_get("admin_name")?,
        kind: AdminActionKind::from_db(&kind),
        target: AuditTarget::from_db(&target_type, parse_uuid(&target_id)?),
        details: serde_json::from_str(&details).map_err(decode_err)?,
        ip_address: row.try_get("ip_address")?,
        user_agent: row.try_get("user_agent")?,
        created_at: parse_ts(&created_at)?,
    })
}
