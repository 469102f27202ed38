// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Audit Log
//!
//! Append-only record of privileged decisions, queryable by acting admin or
//! by target. Moderation operations write their entries inside their own
//! transaction through the gateway; this surface covers standalone writes
//! (e.g. a settings change with no entity transition) and the read side.
//!
//! A failed audit write always fails its enclosing transaction. An
//! unaudited privileged action is a correctness violation, not a cosmetic
//! one.

use uuid::Uuid;

use crate::database::Database;
use crate::errors::Result;
use crate::models::{AdminAction, AuditTarget};

/// Default cap on audit query results.
pub const DEFAULT_QUERY_LIMIT: i64 = 100;

/// Read/write surface over the admin-action table.
#[derive(Clone)]
pub struct AuditLog {
    db: Database,
}

impl AuditLog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist a fully populated audit entry in its own transaction.
    pub async fn record(&self, entry: &AdminAction) -> Result<()> {
        self.db.append_admin_action(entry).await
    }

    /// Entries written by one admin, newest first.
    pub async fn query_by_admin(
        &self,
        admin_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<AdminAction>> {
        self.db
            .actions_by_admin(admin_id, limit.unwrap_or(DEFAULT_QUERY_LIMIT))
            .await
    }

    /// Entries touching one target, newest first.
    pub async fn query_by_target(
        &self,
        target: &AuditTarget,
        limit: Option<i64>,
    ) -> Result<Vec<AdminAction>> {
        self.db
            .actions_by_target(target, limit.unwrap_or(DEFAULT_QUERY_LIMIT))
            .await
    }
}
