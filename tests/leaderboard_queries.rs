// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tests of the read-only leaderboard views: scope selection, region
//! filtering, pagination, and deterministic tie-breaking.

use anyhow::Result;
use unyield_core::database::{Database, ScoreScope};
use unyield_core::leaderboard::Leaderboard;
use unyield_core::models::{Region, User};

async fn seed_user(
    db: &Database,
    name: &str,
    region: Region,
    total: i64,
    weekly: i64,
) -> Result<User> {
    let mut user = User::new(name.to_string(), region);
    user.total_points = total;
    user.weekly_points = weekly;
    db.create_user(&user).await?;
    Ok(user)
}

#[tokio::test]
async fn test_weekly_scope_orders_by_weekly_points() -> Result<()> {
    let db = Database::new("sqlite::memory:").await?;
    let board = Leaderboard::new(db.clone());

    seed_user(&db, "second", Region::Global, 900, 150).await?;
    seed_user(&db, "first", Region::Global, 100, 300).await?;
    seed_user(&db, "third", Region::Global, 500, 150).await?;

    let page = board
        .get(Region::Global, ScoreScope::Weekly, Some(2), None)
        .await?;
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].display_name, "first");
    assert_eq!(page[0].weekly_points, 300);
    assert_eq!(page[1].weekly_points, 150);

    Ok(())
}

#[tokio::test]
async fn test_all_time_scope_orders_by_total_points() -> Result<()> {
    let db = Database::new("sqlite::memory:").await?;
    let board = Leaderboard::new(db.clone());

    seed_user(&db, "low", Region::Global, 100, 300).await?;
    seed_user(&db, "high", Region::Global, 900, 0).await?;

    let page = board
        .get(Region::Global, ScoreScope::AllTime, None, None)
        .await?;
    assert_eq!(page[0].display_name, "high");
    assert_eq!(page[1].display_name, "low");

    Ok(())
}

#[tokio::test]
async fn test_ties_are_deterministic_across_calls() -> Result<()> {
    let db = Database::new("sqlite::memory:").await?;
    let board = Leaderboard::new(db.clone());

    let a = seed_user(&db, "tied_a", Region::Global, 150, 150).await?;
    let b = seed_user(&db, "tied_b", Region::Global, 150, 150).await?;

    let first_read = board
        .get(Region::Global, ScoreScope::Weekly, None, None)
        .await?;
    let second_read = board
        .get(Region::Global, ScoreScope::Weekly, None, None)
        .await?;

    let order: Vec<_> = first_read.iter().map(|e| e.user_id).collect();
    let order_again: Vec<_> = second_read.iter().map(|e| e.user_id).collect();
    assert_eq!(order, order_again);

    // tie-break is user id ascending
    let mut expected = vec![a.id, b.id];
    expected.sort_by_key(|id| id.to_string());
    assert_eq!(order, expected);

    Ok(())
}

#[tokio::test]
async fn test_region_filter_and_global_sentinel() -> Result<()> {
    let db = Database::new("sqlite::memory:").await?;
    let board = Leaderboard::new(db.clone());

    seed_user(&db, "eu_athlete", Region::Europe, 500, 50).await?;
    seed_user(&db, "asia_athlete", Region::Asia, 400, 40).await?;

    let europe = board
        .get(Region::Europe, ScoreScope::AllTime, None, None)
        .await?;
    assert_eq!(europe.len(), 1);
    assert_eq!(europe[0].display_name, "eu_athlete");

    let global = board
        .get(Region::Global, ScoreScope::AllTime, None, None)
        .await?;
    assert_eq!(global.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_pagination_offset() -> Result<()> {
    let db = Database::new("sqlite::memory:").await?;
    let board = Leaderboard::new(db.clone());

    for (name, total) in [("p1", 300), ("p2", 200), ("p3", 100)] {
        seed_user(&db, name, Region::Global, total, 0).await?;
    }

    let page = board
        .get(Region::Global, ScoreScope::AllTime, Some(2), Some(1))
        .await?;
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].display_name, "p2");
    assert_eq!(page[1].display_name, "p3");

    Ok(())
}

#[tokio::test]
async fn test_weekly_reset_zeroes_weekly_points_only() -> Result<()> {
    let db = Database::new("sqlite::memory:").await?;
    let board = Leaderboard::new(db.clone());

    let user = seed_user(&db, "athlete", Region::Global, 800, 120).await?;

    let affected = db.reset_weekly_points().await?;
    assert_eq!(affected, 1);

    let reloaded = db.get_user_required(user.id).await?;
    assert_eq!(reloaded.weekly_points, 0);
    assert_eq!(reloaded.total_points, 800);

    let page = board
        .get(Region::Global, ScoreScope::Weekly, None, None)
        .await?;
    assert_eq!(page[0].weekly_points, 0);

    Ok(())
}
