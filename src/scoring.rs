// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Points & Rank Engine
//!
//! Pure scoring math: converting an approved submission into a point value
//! under an externally supplied [`ScoringPolicy`], and applying awards and
//! reversals to a user's competitive record (totals, streak, rank).
//!
//! Nothing in here touches storage; the moderator applies the mutated
//! [`User`] inside its transaction so rank is always recomputed from the
//! just-updated total, never a stale snapshot.

use chrono::NaiveDate;

use crate::config::ScoringPolicy;
use crate::models::{User, VideoSubmission};

/// Compute the points a submission earns under the given policy.
///
/// Pure function of (exercise, reps, weight, duration). The result is a
/// non-negative integer; the formula itself is policy, not pipeline logic.
pub fn compute_points(policy: &ScoringPolicy, submission: &VideoSubmission) -> i64 {
    let reps = submission.reps.max(0) as f64;
    let multiplier = policy.exercise_multiplier(&submission.exercise);

    let rep_points = reps * policy.points_per_rep as f64 * multiplier;
    let weight_points = submission.weight_kg.max(0.0) * reps * policy.weight_factor;
    let duration_points = submission
        .duration_seconds
        .map_or(0.0, |secs| secs.max(0) as f64 * policy.duration_factor);

    (rep_points + weight_points + duration_points).floor().max(0.0) as i64
}

/// Derived rank for a cumulative point total: `max(1, 100 - total / 250)`.
///
/// Evaluated per user, independent of anyone else's totals. Global ordering
/// is realized lazily by the leaderboard sort, not by a stored dense rank.
pub fn rank_for_points(total_points: i64) -> i64 {
    (100 - total_points / 250).max(1)
}

/// Apply an award to a user's record: totals, streak, and rank.
///
/// Streak uses calendar-day adjacency on `today`:
/// - the day immediately after the last qualifying workout increments it
/// - the same day holds it (one submission per day counts)
/// - a gap of more than one day, or no prior workout, resets it to 1
pub fn apply_award(user: &mut User, points: i64, today: NaiveDate) {
    user.total_points += points;
    user.weekly_points += points;

    user.streak = match user.last_workout_date {
        Some(last) if last == today => user.streak,
        Some(last) if last.succ_opt() == Some(today) => user.streak + 1,
        _ => 1,
    };
    user.streak_best = user.streak_best.max(user.streak);
    user.last_workout_date = Some(today);

    user.rank = rank_for_points(user.total_points);
}

/// Reverse a previously applied award: totals down (clamped at zero) and
/// rank recomputed. Streak state is deliberately left untouched; only the
/// points effect of a fraudulent approval is undone.
pub fn apply_reversal(user: &mut User, points: i64) {
    user.total_points = (user.total_points - points).max(0);
    user.weekly_points = (user.weekly_points - points).max(0);
    user.rank = rank_for_points(user.total_points);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewSubmission, Region};
    use uuid::Uuid;

    fn submission(exercise: &str, reps: i64, weight_kg: f64, duration: Option<i64>) -> VideoSubmission {
        VideoSubmission::new(NewSubmission {
            user_id: Uuid::new_v4(),
            workout_id: None,
            exercise: exercise.to_string(),
            reps,
            weight_kg,
            duration_seconds: duration,
            media_url: "https://blobs.example/v.mp4".to_string(),
        })
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ten_reps_at_ten_points_each() {
        let policy = ScoringPolicy::default();
        let sub = submission("pushup", 10, 0.0, None);
        assert_eq!(compute_points(&policy, &sub), 100);
    }

    #[test]
    fn test_weight_adds_points() {
        let policy = ScoringPolicy::default();
        let bodyweight = submission("squat", 10, 0.0, None);
        let weighted = submission("squat", 10, 40.0, None);
        assert!(compute_points(&policy, &weighted) > compute_points(&policy, &bodyweight));
    }

    #[test]
    fn test_exercise_multiplier_applies() {
        let mut policy = ScoringPolicy::default();
        policy
            .exercise_multipliers
            .insert("muscle_up".to_string(), 3.0);
        let sub = submission("muscle_up", 10, 0.0, None);
        assert_eq!(compute_points(&policy, &sub), 300);
    }

    #[test]
    fn test_points_never_negative() {
        let policy = ScoringPolicy::default();
        let sub = submission("pushup", -5, -10.0, Some(-30));
        assert_eq!(compute_points(&policy, &sub), 0);
    }

    #[test]
    fn test_rank_formula() {
        assert_eq!(rank_for_points(0), 100);
        assert_eq!(rank_for_points(249), 100);
        assert_eq!(rank_for_points(250), 99);
        assert_eq!(rank_for_points(1000), 96);
        // floor at 1 regardless of how high the total goes
        assert_eq!(rank_for_points(24_750), 1);
        assert_eq!(rank_for_points(1_000_000), 1);
    }

    #[test]
    fn test_award_updates_totals_and_rank() {
        let mut user = User::new("athlete".to_string(), Region::Global);
        apply_award(&mut user, 100, day(2025, 3, 1));
        assert_eq!(user.total_points, 100);
        assert_eq!(user.weekly_points, 100);
        assert_eq!(user.rank, rank_for_points(100));
        assert_eq!(user.streak, 1);
        assert_eq!(user.streak_best, 1);
    }

    #[test]
    fn test_streak_increments_on_consecutive_days() {
        let mut user = User::new("athlete".to_string(), Region::Global);
        apply_award(&mut user, 50, day(2025, 3, 1));
        apply_award(&mut user, 50, day(2025, 3, 2));
        assert_eq!(user.streak, 2);
        assert_eq!(user.streak_best, 2);
    }

    #[test]
    fn test_streak_holds_on_same_day() {
        let mut user = User::new("athlete".to_string(), Region::Global);
        apply_award(&mut user, 50, day(2025, 3, 1));
        apply_award(&mut user, 50, day(2025, 3, 2));
        apply_award(&mut user, 50, day(2025, 3, 2));
        assert_eq!(user.streak, 2);
        assert_eq!(user.total_points, 150);
    }

    #[test]
    fn test_streak_resets_after_gap() {
        let mut user = User::new("athlete".to_string(), Region::Global);
        apply_award(&mut user, 50, day(2025, 3, 1));
        apply_award(&mut user, 50, day(2025, 3, 2));
        apply_award(&mut user, 50, day(2025, 3, 4));
        assert_eq!(user.streak, 1);
        // best remembers the earlier run
        assert_eq!(user.streak_best, 2);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let mut user = User::new("athlete".to_string(), Region::Global);
        apply_award(&mut user, 50, day(2025, 3, 31));
        apply_award(&mut user, 50, day(2025, 4, 1));
        assert_eq!(user.streak, 2);
    }

    #[test]
    fn test_reversal_clamps_at_zero_and_keeps_streak() {
        let mut user = User::new("athlete".to_string(), Region::Global);
        apply_award(&mut user, 100, day(2025, 3, 1));
        user.weekly_points = 40; // simulate a weekly rollover in between

        apply_reversal(&mut user, 100);
        assert_eq!(user.total_points, 0);
        assert_eq!(user.weekly_points, 0);
        assert_eq!(user.rank, rank_for_points(0));
        assert_eq!(user.streak, 1);
        assert_eq!(user.last_workout_date, Some(day(2025, 3, 1)));
    }
}
