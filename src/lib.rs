// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Unyield Core
//!
//! The submission verification, points, and ranking pipeline for the Unyield
//! fitness platform. User-submitted exercise videos move through a
//! moderation workflow; approved submissions turn into scored points, which
//! feed a competitive ranking and weekly leaderboard. Reports against a
//! submission can escalate into a retroactive reversal of an approval, and
//! every privileged decision leaves an immutable audit record.
//!
//! ## Architecture
//!
//! - **Persistence Gateway** ([`database`]): the only component touching
//!   durable storage; atomic reads/writes over the four entities
//! - **Submission State Machine** ([`moderation`]): `pending -> approved |
//!   rejected` with a single escalation-only exit from `approved`
//! - **Points & Rank Engine** ([`scoring`]): pure scoring math driven by an
//!   external [`config::ScoringPolicy`]
//! - **Audit Log** ([`audit`]): immutable admin-action trail
//! - **Report Escalation Workflow** ([`reports`]): report intake and review,
//!   re-entering the state machine when a video is removed
//! - **Leaderboard Query Service** ([`leaderboard`]): read-only ranked views
//!
//! The HTTP API, authentication, and blob storage are collaborators owned by
//! the embedding server, not by this crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use unyield_core::config::ScoringPolicy;
//! use unyield_core::database::Database;
//! use unyield_core::moderation::{ModerationContext, SubmissionModerator};
//! use unyield_core::notifications::NoopNotifier;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Database::new("sqlite:unyield.db").await?;
//!     let policy = ScoringPolicy::load(None)?;
//!     let moderator = SubmissionModerator::new(db, policy, Arc::new(NoopNotifier));
//!
//!     let ctx = ModerationContext::new(Uuid::new_v4(), "mod_sarah");
//!     let submission_id = Uuid::new_v4();
//!     let approved = moderator.approve(submission_id, &ctx).await?;
//!     println!("awarded {} points", approved.points_awarded);
//!
//!     Ok(())
//! }
//! ```

/// Core data models for the four persisted entities
pub mod models;

/// Pipeline error taxonomy
pub mod errors;

/// Scoring-policy configuration
pub mod config;

/// Persistence gateway over SQLite
pub mod database;

/// Points and rank engine
pub mod scoring;

/// Submission lifecycle state machine
pub mod moderation;

/// Immutable audit trail of privileged decisions
pub mod audit;

/// Report intake and escalation workflow
pub mod reports;

/// Read-only leaderboard queries
pub mod leaderboard;

/// Best-effort notification dispatch
pub mod notifications;

/// Structured logging setup
pub mod logging;
