// src/core/achievements.rs

use serde::Serialize;
use sqlx::SqlitePool;

use crate::{error::AppError, models::profile::PersonalProfile};

pub const BADGE_GOOD_START: &str = "Ottimo Inizio";
pub const BADGE_TASK_GRINDER: &str = "Macinatore di Task";
pub const BADGE_TOTAL_EXPERT: &str = "Esperto Totale";

/// Aggregate result of one evaluation run, reported back to the caller
/// (typically the login flow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeOutcome {
    /// Every satisfied rule resulted in a (new) stored grant.
    AllGranted,
    /// Nothing needed granting: no rule matched, or the matching badges
    /// were already present.
    AlreadyPresent,
    /// At least one grant failed at the storage layer. Recoverable: the
    /// next evaluation will retry the missing grants.
    PartialFailure,
}

/// Outcome of a single idempotent grant request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantResult {
    Granted,
    AlreadyPresent,
}

/// Returns the badge names whose rule the given counters satisfy.
/// All three rules are evaluated independently on every run.
fn satisfied_rules(total_points: i64, tasks_completed: i64) -> Vec<&'static str> {
    let mut satisfied = Vec::new();
    if total_points >= 100 {
        satisfied.push(BADGE_GOOD_START);
    }
    if tasks_completed >= 10 {
        satisfied.push(BADGE_TASK_GRINDER);
    }
    if total_points >= 200 && tasks_completed >= 20 {
        satisfied.push(BADGE_TOTAL_EXPERT);
    }
    satisfied
}

/// Records a badge grant unless the student already holds the badge.
///
/// The check-then-insert is a single `INSERT .. ON CONFLICT DO NOTHING`
/// against the composite (student, badge) key, so a repeated or concurrent
/// call can never produce a second grant.
pub async fn grant_if_absent(
    pool: &SqlitePool,
    email: &str,
    badge_name: &str,
) -> Result<GrantResult, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO badge_grant (student_email, badge_name, date_granted)
        VALUES (?, ?, ?)
        ON CONFLICT (student_email, badge_name) DO NOTHING
        "#,
    )
    .bind(email)
    .bind(badge_name)
    .bind(chrono::Utc::now().date_naive())
    .execute(pool)
    .await?;

    if result.rows_affected() == 1 {
        tracing::info!("Granted badge '{}' to '{}'", badge_name, email);
        Ok(GrantResult::Granted)
    } else {
        Ok(GrantResult::AlreadyPresent)
    }
}

/// Evaluates every badge rule against the student's profile and requests a
/// grant for each satisfied one. Unsatisfied rules are silently skipped.
///
/// Re-runnable at every login with no observable side effect beyond the
/// first successful grant per badge. Storage failures are absorbed into a
/// `PartialFailure` outcome instead of aborting the login.
pub async fn evaluate_and_grant(pool: &SqlitePool, profile: &PersonalProfile) -> BadgeOutcome {
    let mut newly_granted = 0;
    let mut failed = 0;

    for badge_name in satisfied_rules(profile.total_points, profile.tasks_completed) {
        match grant_if_absent(pool, &profile.student_email, badge_name).await {
            Ok(GrantResult::Granted) => newly_granted += 1,
            Ok(GrantResult::AlreadyPresent) => {}
            Err(e) => {
                tracing::error!(
                    "Failed to grant badge '{}' to '{}': {}",
                    badge_name,
                    profile.student_email,
                    e
                );
                failed += 1;
            }
        }
    }

    if failed > 0 {
        BadgeOutcome::PartialFailure
    } else if newly_granted > 0 {
        BadgeOutcome::AllGranted
    } else {
        BadgeOutcome::AlreadyPresent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_rule_below_all_thresholds() {
        assert!(satisfied_rules(99, 9).is_empty());
        assert!(satisfied_rules(0, 0).is_empty());
    }

    #[test]
    fn test_good_start_boundary() {
        assert!(satisfied_rules(99, 0).is_empty());
        assert_eq!(satisfied_rules(100, 0), vec![BADGE_GOOD_START]);
    }

    #[test]
    fn test_task_grinder_boundary() {
        assert!(satisfied_rules(0, 9).is_empty());
        assert_eq!(satisfied_rules(0, 10), vec![BADGE_TASK_GRINDER]);
    }

    #[test]
    fn test_total_expert_needs_both_thresholds() {
        // 199 points is enough for Good Start but not for Total Expert.
        assert_eq!(
            satisfied_rules(199, 20),
            vec![BADGE_GOOD_START, BADGE_TASK_GRINDER]
        );
        assert_eq!(
            satisfied_rules(200, 19),
            vec![BADGE_GOOD_START, BADGE_TASK_GRINDER]
        );
        assert_eq!(
            satisfied_rules(200, 20),
            vec![BADGE_GOOD_START, BADGE_TASK_GRINDER, BADGE_TOTAL_EXPERT]
        );
    }
}
