// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Report Escalation Workflow
//!
//! Tracks user reports against video submissions and the single admin review
//! that moves each report out of `pending`. A review whose action removes
//! the video re-enters the submission state machine through `force_reject`
//! before the report's own transition commits; a submission another review
//! already removed makes that step an idempotent no-op.
//!
//! Multiple pending reports may target the same submission. Resolving one
//! never auto-resolves the others; each is reviewed on its own.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::errors::{PipelineError, Result};
use crate::logging::AppLogger;
use crate::models::{
    AdminActionKind, AuditTarget, Report, ReportAction, ReportStatus, ReportType,
};
use crate::moderation::{ModerationContext, SubmissionModerator};

/// Longest accepted free-text reason on a report.
pub const MAX_REASON_LENGTH: usize = 1000;

/// Terminal status an admin review assigns to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Reviewed,
    Resolved,
    Dismissed,
}

impl ReviewOutcome {
    fn report_status(self) -> ReportStatus {
        match self {
            ReviewOutcome::Reviewed => ReportStatus::Reviewed,
            ReviewOutcome::Resolved => ReportStatus::Resolved,
            ReviewOutcome::Dismissed => ReportStatus::Dismissed,
        }
    }

    fn audit_kind(self) -> AdminActionKind {
        match self {
            ReviewOutcome::Dismissed => AdminActionKind::ReportDismissed,
            _ => AdminActionKind::ReportResolved,
        }
    }
}

/// Report intake and review over the shared moderator.
#[derive(Clone)]
pub struct ReportWorkflow {
    moderator: SubmissionModerator,
}

impl ReportWorkflow {
    pub fn new(moderator: SubmissionModerator) -> Self {
        Self { moderator }
    }

    /// File a report against an existing submission.
    pub async fn submit(
        &self,
        reporter_id: Uuid,
        submission_id: Uuid,
        report_type: ReportType,
        reason: &str,
    ) -> Result<Report> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(PipelineError::Validation(
                "report reason is required".to_string(),
            ));
        }
        if reason.len() > MAX_REASON_LENGTH {
            return Err(PipelineError::Validation(format!(
                "report reason exceeds {MAX_REASON_LENGTH} characters"
            )));
        }

        let db = self.moderator.database();
        if db.get_submission(submission_id).await?.is_none() {
            return Err(PipelineError::not_found("submission", submission_id));
        }

        let report = Report::new(reporter_id, submission_id, report_type, reason.to_string());
        db.create_report(&report).await?;

        AppLogger::log_report_event(report.id, submission_id, "filed", None);

        Ok(report)
    }

    /// Review a pending report.
    ///
    /// When `action_taken` is `VideoRemoved` the referenced submission is
    /// force-rejected first; an already-rejected submission turns that step
    /// into a no-op which the audit details record as `alreadyRemoved`.
    pub async fn review(
        &self,
        report_id: Uuid,
        ctx: &ModerationContext,
        outcome: ReviewOutcome,
        notes: Option<&str>,
        action_taken: ReportAction,
    ) -> Result<Report> {
        let db = self.moderator.database();
        let now = Utc::now();

        let report = db
            .get_report(report_id)
            .await?
            .ok_or_else(|| PipelineError::not_found("report", report_id))?;
        if report.status != ReportStatus::Pending {
            return Err(PipelineError::InvalidState(format!(
                "report {report_id} has already been reviewed"
            )));
        }

        let mut already_removed = false;
        if action_taken == ReportAction::VideoRemoved {
            let removal_reason = format!("removed via report: {}", report.report_type.as_str());
            match self
                .moderator
                .force_reject(report.submission_id, ctx, &removal_reason)
                .await
            {
                Ok(_) => {}
                // An earlier resolution already removed the submission.
                Err(PipelineError::InvalidState(_)) => already_removed = true,
                Err(e) => return Err(e),
            }
        }

        let mut tx = db.begin().await?;

        let transitioned = db
            .mark_report_reviewed(
                &mut tx,
                report_id,
                outcome.report_status(),
                ctx.admin_id,
                notes,
                action_taken,
                now,
            )
            .await?;
        if !transitioned {
            return Err(PipelineError::InvalidState(format!(
                "report {report_id} has already been reviewed"
            )));
        }

        let action = ctx.action(
            outcome.audit_kind(),
            AuditTarget::Report(report_id),
            json!({
                "submissionId": report.submission_id,
                "actionTaken": action_taken.as_str(),
                "alreadyRemoved": already_removed,
            }),
        );
        db.insert_admin_action(&mut tx, &action).await?;

        tx.commit().await?;

        AppLogger::log_report_event(
            report_id,
            report.submission_id,
            "reviewed",
            Some(action_taken.as_str()),
        );

        if let Err(e) = self
            .moderator
            .notifier()
            .report_reviewed(report.reporter_id, report_id, outcome.report_status())
            .await
        {
            AppLogger::log_notification_failure(
                report.reporter_id,
                "report_reviewed",
                &e.to_string(),
            );
        }

        db.get_report(report_id)
            .await?
            .ok_or_else(|| PipelineError::not_found("report", report_id))
    }
}
