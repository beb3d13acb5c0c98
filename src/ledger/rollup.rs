//! Daily records and the weekly goal window.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};
use tracing::info;

use crate::domain::ActivityKind;

use super::{local_day, ProgressLedger};

const WEEK_DAYS: i64 = 7;

/// Sunday on or before `day`.
pub fn most_recent_sunday(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_sunday() as i64)
}

impl ProgressLedger {
    /// Fold XP and time into today's record and the current week.
    pub fn update_daily_progress(
        &mut self,
        xp: u64,
        activity: ActivityKind,
        time_spent_minutes: Option<u32>,
        now: DateTime<FixedOffset>,
    ) {
        let today = local_day(now);
        let minutes = time_spent_minutes.unwrap_or(0);

        let daily = self.daily_entry(today);
        daily.xp_earned = daily.xp_earned.saturating_add(xp);
        daily.time_spent_minutes = daily.time_spent_minutes.saturating_add(minutes);
        if activity == ActivityKind::Lesson {
            daily.lessons_completed += 1;
        }
        let tally = daily.activities.entry(activity).or_default();
        tally.count += 1;
        tally.xp = tally.xp.saturating_add(xp);

        self.roll_weekly(xp, activity, minutes, today);
        self.touch(now);
        self.recompute_statistics();
    }

    fn roll_weekly(&mut self, xp: u64, activity: ActivityKind, minutes: u32, today: NaiveDate) {
        let goals = &mut self.weekly_goals;
        if today - goals.week_start >= Duration::days(WEEK_DAYS) {
            let anchor = most_recent_sunday(today);
            info!(target: "progress", user_id = %self.user_id, language = %self.language, previous = %goals.week_start, %anchor, "Weekly goals reset");
            goals.current_xp = 0;
            goals.current_lessons = 0;
            goals.current_minutes = 0;
            goals.week_start = anchor;
        }

        goals.current_xp = goals.current_xp.saturating_add(xp);
        goals.current_minutes = goals.current_minutes.saturating_add(minutes);
        if activity == ActivityKind::Lesson {
            goals.current_lessons += 1;
        }
    }
}
