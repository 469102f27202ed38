// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Leaderboard Query Service
//!
//! Read-only ranked views over users, filtered by region and scored by
//! either all-time or weekly points. Ordering is a pure query-time sort;
//! no shared ranking table is maintained, and these reads never mutate
//! `rank`. Ties are broken by user id ascending so repeated reads over an
//! unchanged store return the same order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::{Database, ScoreScope};
use crate::errors::Result;
use crate::models::{Region, User};

/// Default page size for leaderboard reads.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Public projection of a user's competitive record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: Uuid,
    pub display_name: String,
    pub region: Region,
    pub total_points: i64,
    pub weekly_points: i64,
    pub streak: i64,
}

impl From<User> for LeaderboardEntry {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            display_name: user.display_name,
            region: user.region,
            total_points: user.total_points,
            weekly_points: user.weekly_points,
            streak: user.streak,
        }
    }
}

/// Read-only leaderboard queries.
#[derive(Clone)]
pub struct Leaderboard {
    db: Database,
}

impl Leaderboard {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Ranked page of users. `Region::Global` means no region filter;
    /// `scope` selects the sort field.
    pub async fn get(
        &self,
        region: Region,
        scope: ScoreScope,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<LeaderboardEntry>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).max(0);
        let offset = offset.unwrap_or(0).max(0);

        let users = self.db.leaderboard_page(region, scope, limit, offset).await?;
        Ok(users.into_iter().map(LeaderboardEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_projection() {
        let mut user = User::new("athlete".to_string(), Region::Asia);
        user.total_points = 500;
        user.weekly_points = 120;
        user.streak = 4;
        let id = user.id;

        let entry = LeaderboardEntry::from(user);
        assert_eq!(entry.user_id, id);
        assert_eq!(entry.total_points, 500);
        assert_eq!(entry.weekly_points, 120);
        assert_eq!(entry.streak, 4);
        assert_eq!(entry.region, Region::Asia);
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = LeaderboardEntry::from(User::new("athlete".to_string(), Region::Global));
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("totalPoints").is_some());
        assert!(json.get("weeklyPoints").is_some());
        assert!(json.get("displayName").is_some());
    }
}
