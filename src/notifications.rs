// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Best-effort notification dispatch.
//!
//! Notifications are fired after a moderation decision commits and are never
//! part of the atomic unit: a delivery failure is logged by the caller and
//! does not convert into, or mask, the operation's success. Embedders
//! without a push service use [`NoopNotifier`].

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::models::ReportStatus;

/// Outbound notification hooks invoked by the pipeline.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A submission was approved or rejected.
    async fn submission_verified(
        &self,
        user_id: Uuid,
        submission_id: Uuid,
        approved: bool,
        points: i64,
    ) -> Result<()>;

    /// A report the user filed was reviewed.
    async fn report_reviewed(
        &self,
        reporter_id: Uuid,
        report_id: Uuid,
        status: ReportStatus,
    ) -> Result<()>;
}

/// Posts notification events as JSON to a webhook endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn post(&self, payload: serde_json::Value) -> Result<()> {
        self.client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn submission_verified(
        &self,
        user_id: Uuid,
        submission_id: Uuid,
        approved: bool,
        points: i64,
    ) -> Result<()> {
        self.post(json!({
            "event": "submission_verified",
            "userId": user_id,
            "submissionId": submission_id,
            "approved": approved,
            "points": points,
        }))
        .await
    }

    async fn report_reviewed(
        &self,
        reporter_id: Uuid,
        report_id: Uuid,
        status: ReportStatus,
    ) -> Result<()> {
        self.post(json!({
            "event": "report_reviewed",
            "userId": reporter_id,
            "reportId": report_id,
            "status": status.as_str(),
        }))
        .await
    }
}

/// Discards every notification. Used in tests and by embedders without a
/// push service.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn submission_verified(
        &self,
        _user_id: Uuid,
        _submission_id: Uuid,
        _approved: bool,
        _points: i64,
    ) -> Result<()> {
        Ok(())
    }

    async fn report_reviewed(
        &self,
        _reporter_id: Uuid,
        _report_id: Uuid,
        _status: ReportStatus,
    ) -> Result<()> {
        Ok(())
    }
}
