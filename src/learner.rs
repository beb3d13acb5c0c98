//! Learner profile: the user-level XP total and day streak that the
//! request flow updates alongside each ledger.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::local_day;

const XP_PER_LEARNER_LEVEL: u64 = 1000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Learner {
    pub user_id: String,
    pub total_xp: u64,
    pub level: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_active_date: Option<NaiveDate>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Bumped by the store on every successful update.
    #[serde(default)]
    pub revision: u64,
}

impl Learner {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            total_xp: 0,
            level: 1,
            current_streak: 0,
            longest_streak: 0,
            last_active_date: None,
            updated_at: None,
            revision: 0,
        }
    }

    pub fn award_xp(&mut self, xp: u64) {
        self.total_xp = self.total_xp.saturating_add(xp);
        self.level = (self.total_xp / XP_PER_LEARNER_LEVEL) as u32 + 1;
    }

    /// Same day keeps the streak, the next day extends it, any gap restarts at 1.
    pub fn touch_streak(&mut self, now: DateTime<FixedOffset>) {
        let today = local_day(now);
        self.current_streak = match self.last_active_date {
            Some(last) if last == today => self.current_streak.max(1),
            Some(last) if last.succ_opt() == Some(today) => self.current_streak + 1,
            Some(last) if last > today => self.current_streak,
            _ => 1,
        };
        if self.last_active_date.map_or(true, |last| today > last) {
            self.last_active_date = Some(today);
        }
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.updated_at = Some(now.with_timezone(&Utc));
    }
}
