// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Submission State Machine
//!
//! Owns the VideoSubmission lifecycle: `pending -> approved | rejected`,
//! plus the single escalation-only exit from `approved` (force-reject).
//!
//! Every transition, its scoring side effect, and its audit entry are applied
//! in one transaction. The status precondition is enforced by the gateway's
//! conditional update, so two admins racing on the same submission get
//! exactly one winner; the loser observes `InvalidState`. Notification
//! dispatch happens after commit and never fails the decision.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::config::ScoringPolicy;
use crate::database::Database;
use crate::errors::{PipelineError, Result};
use crate::logging::AppLogger;
use crate::models::{
    AccoladeTag, AdminAction, AdminActionKind, AuditTarget, SubmissionStatus, VideoSubmission,
};
use crate::notifications::Notifier;
use crate::scoring;

/// Identity and request metadata of the acting admin, supplied by the Auth
/// collaborator. IP and user agent are best-effort and flow into the audit
/// record.
#[derive(Debug, Clone)]
pub struct ModerationContext {
    pub admin_id: Uuid,
    pub admin_name: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ModerationContext {
    pub fn new(admin_id: Uuid, admin_name: impl Into<String>) -> Self {
        Self {
            admin_id,
            admin_name: admin_name.into(),
            ip_address: None,
            user_agent: None,
        }
    }

    pub(crate) fn action(
        &self,
        kind: AdminActionKind,
        target: AuditTarget,
        details: serde_json::Value,
    ) -> AdminAction {
        let mut action = AdminAction::new(
            self.admin_id,
            self.admin_name.clone(),
            kind,
            target,
            details,
        );
        action.ip_address = self.ip_address.clone();
        action.user_agent = self.user_agent.clone();
        action
    }
}

/// Entry point for admin decisions on video submissions.
#[derive(Clone)]
pub struct SubmissionModerator {
    db: Database,
    policy: ScoringPolicy,
    notifier: Arc<dyn Notifier>,
}

impl SubmissionModerator {
    pub fn new(db: Database, policy: ScoringPolicy, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            policy,
            notifier,
        }
    }

    /// Approve a pending submission: award points to the owner, stamp the
    /// verifier, and write the `video_approved` audit entry, atomically.
    pub async fn approve(
        &self,
        submission_id: Uuid,
        ctx: &ModerationContext,
    ) -> Result<VideoSubmission> {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let submission = self
            .db
            .get_submission_tx(&mut tx, submission_id)
            .await?
            .ok_or_else(|| PipelineError::not_found("submission", submission_id))?;

        let points = scoring::compute_points(&self.policy, &submission);

        let transitioned = self
            .db
            .mark_submission_approved(
                &mut tx,
                submission_id,
                ctx.admin_id,
                &ctx.admin_name,
                points,
                now,
            )
            .await?;
        if !transitioned {
            return Err(PipelineError::InvalidState(format!(
                "submission {submission_id} is not pending"
            )));
        }

        let mut owner = self
            .db
            .get_user_tx(&mut tx, submission.user_id)
            .await?
            .ok_or_else(|| PipelineError::not_found("user", submission.user_id))?;
        scoring::apply_award(&mut owner, points, now.date_naive());
        self.db.update_user_score(&mut tx, &owner).await?;

        let action = ctx.action(
            AdminActionKind::VideoApproved,
            AuditTarget::Submission(submission_id),
            json!({
                "exercise": submission.exercise,
                "reps": submission.reps,
                "pointsAwarded": points,
            }),
        );
        self.db.insert_admin_action(&mut tx, &action).await?;

        tx.commit().await?;

        AppLogger::log_moderation_event(ctx.admin_id, submission_id, "approved", points);

        if let Err(e) = self
            .notifier
            .submission_verified(submission.user_id, submission_id, true, points)
            .await
        {
            AppLogger::log_notification_failure(
                submission.user_id,
                "submission_verified",
                &e.to_string(),
            );
        }

        self.db.get_submission(submission_id).await?.ok_or_else(|| {
            PipelineError::not_found("submission", submission_id)
        })
    }

    /// Reject a pending submission with a required reason.
    pub async fn reject(
        &self,
        submission_id: Uuid,
        ctx: &ModerationContext,
        reason: &str,
    ) -> Result<VideoSubmission> {
        if reason.trim().is_empty() {
            return Err(PipelineError::Validation(
                "rejection reason is required".to_string(),
            ));
        }

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let submission = self
            .db
            .get_submission_tx(&mut tx, submission_id)
            .await?
            .ok_or_else(|| PipelineError::not_found("submission", submission_id))?;

        let transitioned = self
            .db
            .mark_submission_rejected(
                &mut tx,
                submission_id,
                ctx.admin_id,
                &ctx.admin_name,
                reason,
                now,
            )
            .await?;
        if !transitioned {
            return Err(PipelineError::InvalidState(format!(
                "submission {submission_id} is not pending"
            )));
        }

        let action = ctx.action(
            AdminActionKind::VideoRejected,
            AuditTarget::Submission(submission_id),
            json!({
                "exercise": submission.exercise,
                "reason": reason,
            }),
        );
        self.db.insert_admin_action(&mut tx, &action).await?;

        tx.commit().await?;

        AppLogger::log_moderation_event(ctx.admin_id, submission_id, "rejected", 0);

        if let Err(e) = self
            .notifier
            .submission_verified(submission.user_id, submission_id, false, 0)
            .await
        {
            AppLogger::log_notification_failure(
                submission.user_id,
                "submission_verified",
                &e.to_string(),
            );
        }

        self.db.get_submission(submission_id).await?.ok_or_else(|| {
            PipelineError::not_found("submission", submission_id)
        })
    }

    /// Escalation-only re-entry: revoke an approved (or still-pending)
    /// submission, reversing any previously awarded points.
    ///
    /// This is the one exception to one-way transitions; it exists so the
    /// report pipeline can undo a fraudulent approval. Points are reversed
    /// (clamped at zero) and `points_awarded` is zeroed; streak state is
    /// left as it was. The reason is required, as on `reject`. Fails with
    /// `InvalidState` when the submission is already rejected, which the
    /// report workflow treats as a no-op.
    pub async fn force_reject(
        &self,
        submission_id: Uuid,
        ctx: &ModerationContext,
        reason: &str,
    ) -> Result<VideoSubmission> {
        if reason.trim().is_empty() {
            return Err(PipelineError::Validation(
                "rejection reason is required".to_string(),
            ));
        }

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let submission = self
            .db
            .get_submission_tx(&mut tx, submission_id)
            .await?
            .ok_or_else(|| PipelineError::not_found("submission", submission_id))?;

        let reversed_points = match submission.status {
            SubmissionStatus::Approved => submission.points_awarded,
            SubmissionStatus::Pending => 0,
            SubmissionStatus::Rejected => {
                return Err(PipelineError::InvalidState(format!(
                    "submission {submission_id} is already rejected"
                )));
            }
        };

        let transitioned = self
            .db
            .revoke_submission(
                &mut tx,
                submission_id,
                ctx.admin_id,
                &ctx.admin_name,
                reason,
                now,
            )
            .await?;
        if !transitioned {
            // Raced with another revocation between the read and the update.
            return Err(PipelineError::InvalidState(format!(
                "submission {submission_id} is already rejected"
            )));
        }

        if reversed_points > 0 {
            let mut owner = self
                .db
                .get_user_tx(&mut tx, submission.user_id)
                .await?
                .ok_or_else(|| PipelineError::not_found("user", submission.user_id))?;
            scoring::apply_reversal(&mut owner, reversed_points);
            self.db.update_user_score(&mut tx, &owner).await?;
        }

        let action = ctx.action(
            AdminActionKind::VideoRejected,
            AuditTarget::Submission(submission_id),
            json!({
                "exercise": submission.exercise,
                "reason": reason,
                "escalation": true,
                "pointsReversed": reversed_points,
            }),
        );
        self.db.insert_admin_action(&mut tx, &action).await?;

        tx.commit().await?;

        AppLogger::log_moderation_event(
            ctx.admin_id,
            submission_id,
            "force_rejected",
            -reversed_points,
        );

        self.db.get_submission(submission_id).await?.ok_or_else(|| {
            PipelineError::not_found("submission", submission_id)
        })
    }

    /// Grant an accolade to a user. Idempotent on the tag set.
    pub async fn grant_accolade(
        &self,
        user_id: Uuid,
        ctx: &ModerationContext,
        tag: AccoladeTag,
    ) -> Result<()> {
        let mut tx = self.db.begin().await?;

        let mut user = self
            .db
            .get_user_tx(&mut tx, user_id)
            .await?
            .ok_or_else(|| PipelineError::not_found("user", user_id))?;

        if !user.accolades.contains(&tag) {
            user.accolades.push(tag);
            self.db
                .update_user_accolades(&mut tx, user_id, &user.accolades)
                .await?;
        }

        let action = ctx.action(
            AdminActionKind::UserAccoladeGranted,
            AuditTarget::User(user_id),
            json!({ "accolade": tag }),
        );
        self.db.insert_admin_action(&mut tx, &action).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Revoke an accolade from a user. Idempotent on the tag set.
    pub async fn revoke_accolade(
        &self,
        user_id: Uuid,
        ctx: &ModerationContext,
        tag: AccoladeTag,
    ) -> Result<()> {
        let mut tx = self.db.begin().await?;

        let mut user = self
            .db
            .get_user_tx(&mut tx, user_id)
            .await?
            .ok_or_else(|| PipelineError::not_found("user", user_id))?;

        if user.accolades.contains(&tag) {
            user.accolades.retain(|t| *t != tag);
            self.db
                .update_user_accolades(&mut tx, user_id, &user.accolades)
                .await?;
        }

        let action = ctx.action(
            AdminActionKind::UserAccoladeRevoked,
            AuditTarget::User(user_id),
            json!({ "accolade": tag }),
        );
        self.db.insert_admin_action(&mut tx, &action).await?;

        tx.commit().await?;
        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }
}
