// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end tests of the submission lifecycle: approval scoring, rejection,
//! forced reversal, audit consistency, and the at-most-once transition
//! guarantee under racing admins.

use std::sync::Arc;

use anyhow::Result;
use unyield_core::config::ScoringPolicy;
use unyield_core::database::Database;
use unyield_core::errors::PipelineError;
use unyield_core::models::{
    AdminActionKind, AuditTarget, NewSubmission, Region, SubmissionStatus, User, VideoSubmission,
};
use unyield_core::moderation::{ModerationContext, SubmissionModerator};
use unyield_core::notifications::NoopNotifier;
use unyield_core::scoring;
use uuid::Uuid;

async fn setup() -> Result<(Database, SubmissionModerator, ModerationContext)> {
    let db = Database::new("sqlite::memory:").await?;
    let moderator = SubmissionModerator::new(
        db.clone(),
        ScoringPolicy::default(),
        Arc::new(NoopNotifier),
    );
    let ctx = ModerationContext::new(Uuid::new_v4(), "mod_sarah");
    Ok((db, moderator, ctx))
}

async fn seed_submission(db: &Database, reps: i64, weight_kg: f64) -> Result<VideoSubmission> {
    let user = User::new("athlete1".to_string(), Region::Global);
    db.create_user(&user).await?;

    let submission = VideoSubmission::new(NewSubmission {
        user_id: user.id,
        workout_id: None,
        exercise: "pushup".to_string(),
        reps,
        weight_kg,
        duration_seconds: None,
        media_url: "https://blobs.example/v1.mp4".to_string(),
    });
    db.create_submission(&submission).await?;
    Ok(submission)
}

#[tokio::test]
async fn test_approve_awards_points_and_stamps_verifier() -> Result<()> {
    let (db, moderator, ctx) = setup().await?;
    // 10 reps at the default 10 points per rep
    let submission = seed_submission(&db, 10, 0.0).await?;

    let approved = moderator.approve(submission.id, &ctx).await?;

    assert_eq!(approved.status, SubmissionStatus::Approved);
    assert_eq!(approved.points_awarded, 100);
    assert_eq!(approved.verified_by, Some(ctx.admin_id));
    assert_eq!(approved.verified_by_name, Some("mod_sarah".to_string()));
    assert!(approved.verified_at.is_some());

    let owner = db.get_user_required(submission.user_id).await?;
    assert_eq!(owner.total_points, 100);
    assert_eq!(owner.weekly_points, 100);
    assert_eq!(owner.rank, scoring::rank_for_points(100));
    assert_eq!(owner.streak, 1);
    assert!(owner.last_workout_date.is_some());

    Ok(())
}

#[tokio::test]
async fn test_pending_submission_has_zero_points() -> Result<()> {
    let (db, _moderator, _ctx) = setup().await?;
    let submission = seed_submission(&db, 10, 0.0).await?;

    let stored = db.get_submission(submission.id).await?.unwrap();
    assert_eq!(stored.status, SubmissionStatus::Pending);
    assert_eq!(stored.points_awarded, 0);

    Ok(())
}

#[tokio::test]
async fn test_double_approve_fails_without_side_effects() -> Result<()> {
    let (db, moderator, ctx) = setup().await?;
    let submission = seed_submission(&db, 10, 0.0).await?;

    moderator.approve(submission.id, &ctx).await?;
    let second = moderator.approve(submission.id, &ctx).await;
    assert!(matches!(second, Err(PipelineError::InvalidState(_))));

    // totals unchanged by the failed second call
    let owner = db.get_user_required(submission.user_id).await?;
    assert_eq!(owner.total_points, 100);
    assert_eq!(owner.weekly_points, 100);

    // exactly one approval audit entry
    let actions = db
        .actions_by_target(&AuditTarget::Submission(submission.id), 10)
        .await?;
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].kind, AdminActionKind::VideoApproved);

    Ok(())
}

#[tokio::test]
async fn test_reject_requires_reason() -> Result<()> {
    let (db, moderator, ctx) = setup().await?;
    let submission = seed_submission(&db, 10, 0.0).await?;

    let result = moderator.reject(submission.id, &ctx, "   ").await;
    assert!(matches!(result, Err(PipelineError::Validation(_))));

    let stored = db.get_submission(submission.id).await?.unwrap();
    assert_eq!(stored.status, SubmissionStatus::Pending);

    Ok(())
}

#[tokio::test]
async fn test_reject_is_terminal() -> Result<()> {
    let (db, moderator, ctx) = setup().await?;
    let submission = seed_submission(&db, 10, 0.0).await?;

    let rejected = moderator
        .reject(submission.id, &ctx, "form breaks down after rep 4")
        .await?;
    assert_eq!(rejected.status, SubmissionStatus::Rejected);
    assert_eq!(
        rejected.rejection_reason,
        Some("form breaks down after rep 4".to_string())
    );
    assert_eq!(rejected.points_awarded, 0);

    // no points were awarded
    let owner = db.get_user_required(submission.user_id).await?;
    assert_eq!(owner.total_points, 0);

    // a rejected submission cannot be approved afterwards
    let result = moderator.approve(submission.id, &ctx).await;
    assert!(matches!(result, Err(PipelineError::InvalidState(_))));

    Ok(())
}

#[tokio::test]
async fn test_approve_missing_submission_is_not_found() -> Result<()> {
    let (_db, moderator, ctx) = setup().await?;

    let result = moderator.approve(Uuid::new_v4(), &ctx).await;
    assert!(matches!(result, Err(PipelineError::NotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn test_force_reject_reverses_points_and_audits_twice() -> Result<()> {
    let (db, moderator, ctx) = setup().await?;
    let submission = seed_submission(&db, 10, 0.0).await?;

    moderator.approve(submission.id, &ctx).await?;
    let revoked = moderator
        .force_reject(submission.id, &ctx, "spliced footage")
        .await?;

    assert_eq!(revoked.status, SubmissionStatus::Rejected);
    assert_eq!(revoked.points_awarded, 0);
    assert_eq!(revoked.rejection_reason, Some("spliced footage".to_string()));

    let owner = db.get_user_required(submission.user_id).await?;
    assert_eq!(owner.total_points, 0);
    assert_eq!(owner.weekly_points, 0);
    assert_eq!(owner.rank, scoring::rank_for_points(0));
    // streak is deliberately not rolled back
    assert_eq!(owner.streak, 1);

    // exactly two audit entries: the approval then the forced rejection
    let actions = db
        .actions_by_target(&AuditTarget::Submission(submission.id), 10)
        .await?;
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].kind, AdminActionKind::VideoRejected);
    assert_eq!(actions[1].kind, AdminActionKind::VideoApproved);
    assert_eq!(actions[0].details["escalation"], true);
    assert_eq!(actions[0].details["pointsReversed"], 100);

    Ok(())
}

#[tokio::test]
async fn test_force_reject_requires_reason() -> Result<()> {
    let (db, moderator, ctx) = setup().await?;
    let submission = seed_submission(&db, 10, 0.0).await?;

    moderator.approve(submission.id, &ctx).await?;
    let result = moderator.force_reject(submission.id, &ctx, "   ").await;
    assert!(matches!(result, Err(PipelineError::Validation(_))));

    // the approval and its points are untouched
    let stored = db.get_submission(submission.id).await?.unwrap();
    assert_eq!(stored.status, SubmissionStatus::Approved);
    let owner = db.get_user_required(submission.user_id).await?;
    assert_eq!(owner.total_points, 100);

    Ok(())
}

#[tokio::test]
async fn test_force_reject_on_rejected_submission_fails() -> Result<()> {
    let (db, moderator, ctx) = setup().await?;
    let submission = seed_submission(&db, 10, 0.0).await?;

    moderator.reject(submission.id, &ctx, "no depth").await?;
    let result = moderator
        .force_reject(submission.id, &ctx, "escalated")
        .await;
    assert!(matches!(result, Err(PipelineError::InvalidState(_))));

    Ok(())
}

#[tokio::test]
async fn test_force_reject_on_pending_submission_rejects_without_reversal() -> Result<()> {
    let (db, moderator, ctx) = setup().await?;
    let submission = seed_submission(&db, 10, 0.0).await?;

    let revoked = moderator
        .force_reject(submission.id, &ctx, "reported before review")
        .await?;
    assert_eq!(revoked.status, SubmissionStatus::Rejected);
    assert_eq!(revoked.points_awarded, 0);

    let owner = db.get_user_required(submission.user_id).await?;
    assert_eq!(owner.total_points, 0);

    Ok(())
}

#[tokio::test]
async fn test_points_reversal_clamps_at_zero() -> Result<()> {
    let (db, moderator, ctx) = setup().await?;
    let submission = seed_submission(&db, 10, 0.0).await?;

    moderator.approve(submission.id, &ctx).await?;

    // Weekly points rolled over between approval and escalation; the
    // reversal must not push either total below zero.
    db.reset_weekly_points().await?;

    moderator
        .force_reject(submission.id, &ctx, "spliced footage")
        .await?;

    let owner = db.get_user_required(submission.user_id).await?;
    assert_eq!(owner.total_points, 0);
    assert_eq!(owner.weekly_points, 0);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_approvals_have_one_winner() -> Result<()> {
    let (db, moderator, _) = setup().await?;
    let submission = seed_submission(&db, 10, 0.0).await?;

    let ctx_a = ModerationContext::new(Uuid::new_v4(), "mod_a");
    let ctx_b = ModerationContext::new(Uuid::new_v4(), "mod_b");

    let m1 = moderator.clone();
    let m2 = moderator.clone();
    let id = submission.id;
    let (r1, r2) = tokio::join!(
        tokio::spawn(async move { m1.approve(id, &ctx_a).await }),
        tokio::spawn(async move { m2.approve(id, &ctx_b).await }),
    );
    let results = [r1.unwrap(), r2.unwrap()];

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(PipelineError::InvalidState(_)))));

    // points were applied exactly once
    let owner = db.get_user_required(submission.user_id).await?;
    assert_eq!(owner.total_points, 100);

    // exactly one approval audit entry was written
    let actions = db
        .actions_by_target(&AuditTarget::Submission(submission.id), 10)
        .await?;
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].kind, AdminActionKind::VideoApproved);

    Ok(())
}

#[tokio::test]
async fn test_weighted_submission_scores_higher() -> Result<()> {
    let (db, moderator, ctx) = setup().await?;
    let submission = seed_submission(&db, 10, 40.0).await?;

    let approved = moderator.approve(submission.id, &ctx).await?;
    // 10 reps * 10 + 40kg * 10 reps * 0.25
    assert_eq!(approved.points_awarded, 200);

    Ok(())
}

#[tokio::test]
async fn test_accolade_grant_and_revoke_are_idempotent_and_audited() -> Result<()> {
    let (db, moderator, ctx) = setup().await?;
    let user = User::new("athlete2".to_string(), Region::Global);
    db.create_user(&user).await?;

    moderator
        .grant_accolade(user.id, &ctx, unyield_core::models::AccoladeTag::VerifiedAthlete)
        .await?;
    moderator
        .grant_accolade(user.id, &ctx, unyield_core::models::AccoladeTag::VerifiedAthlete)
        .await?;

    let reloaded = db.get_user_required(user.id).await?;
    assert_eq!(reloaded.accolades.len(), 1);

    moderator
        .revoke_accolade(user.id, &ctx, unyield_core::models::AccoladeTag::VerifiedAthlete)
        .await?;
    let reloaded = db.get_user_required(user.id).await?;
    assert!(reloaded.accolades.is_empty());

    // every grant/revoke call is audited, idempotent or not
    let actions = db.actions_by_target(&AuditTarget::User(user.id), 10).await?;
    assert_eq!(actions.len(), 3);
    assert_eq!(actions[0].kind, AdminActionKind::UserAccoladeRevoked);

    Ok(())
}

#[tokio::test]
async fn test_pending_queue_lists_unreviewed_submissions() -> Result<()> {
    let (db, moderator, ctx) = setup().await?;
    let first = seed_submission(&db, 10, 0.0).await?;
    let second = seed_submission(&db, 5, 0.0).await?;

    moderator.approve(first.id, &ctx).await?;

    let pending = db.pending_submissions(10).await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.id);

    Ok(())
}
