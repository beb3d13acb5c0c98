//! Per-user, per-language progress ledger.
//!
//! A `ProgressLedger` owns every progress sub-record for one (user, language)
//! pair: lesson, speaking and listening exercise records, skill records,
//! vocabulary strengths, daily rollups, weekly goals and the derived
//! `Statistics`. All mutation goes through the operations in the submodules:
//!   - `attempts`   : lesson / speaking / listening attempt recording
//!   - `skills`     : XP, accuracy and level per skill
//!   - `rollup`     : daily records and weekly goal counters
//!   - `vocabulary` : spaced-repetition strength per word
//!   - `statistics` : wholesale recompute of the derived rollup
//!
//! Every mutating operation ends with `recompute_statistics`, so the
//! statistics block is always a pure function of the collections.
//!
//! Operations take the caller's local "now" as a `DateTime<FixedOffset>`;
//! calendar-day truncation happens inside the ledger.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Skill;

pub mod attempts;
pub mod records;
pub mod rollup;
pub mod skills;
pub mod statistics;
pub mod vocabulary;

pub use attempts::{AttemptOutcome, LessonAttempt, LessonOutcome, ListeningAttemptInput, SpeakingAttemptInput};
pub use records::*;
pub use rollup::most_recent_sunday;
pub use skills::{level_for_xp, SkillUpdate, MAX_SKILL_LEVEL, XP_PER_LEVEL};
pub use statistics::Statistics;
pub use vocabulary::VocabularyOutcome;

/// Weekly targets applied to freshly created ledgers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalTargets {
    pub xp: u64,
    pub lessons: u32,
    pub minutes: u32,
}

impl Default for GoalTargets {
    fn default() -> Self {
        Self { xp: 500, lessons: 5, minutes: 120 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLedger {
    pub id: Uuid,
    pub user_id: String,
    pub language: String,

    #[serde(default)]
    pub lesson_records: HashMap<String, LessonRecord>,
    #[serde(default)]
    pub speaking_records: HashMap<String, SpeakingRecord>,
    #[serde(default)]
    pub listening_records: HashMap<String, ListeningRecord>,
    #[serde(default)]
    pub skill_records: BTreeMap<Skill, SkillRecord>,
    #[serde(default)]
    pub vocabulary_records: HashMap<String, VocabularyRecord>,
    #[serde(default)]
    pub daily_records: BTreeMap<NaiveDate, DailyRecord>,

    pub weekly_goals: WeeklyGoals,
    #[serde(default)]
    pub statistics: Statistics,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by the store on every successful save.
    #[serde(default)]
    pub revision: u64,
}

impl ProgressLedger {
    /// Fresh, empty ledger. The weekly window is anchored to the most recent Sunday.
    pub fn new(user_id: impl Into<String>, language: impl Into<String>, targets: GoalTargets, now: DateTime<FixedOffset>) -> Self {
        let today = local_day(now);
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            language: language.into(),
            lesson_records: HashMap::new(),
            speaking_records: HashMap::new(),
            listening_records: HashMap::new(),
            skill_records: BTreeMap::new(),
            vocabulary_records: HashMap::new(),
            daily_records: BTreeMap::new(),
            weekly_goals: WeeklyGoals::new(targets, most_recent_sunday(today)),
            statistics: Statistics::default(),
            created_at: now.with_timezone(&Utc),
            updated_at: now.with_timezone(&Utc),
            revision: 0,
        }
    }

    /// Recompute the derived statistics from scratch.
    pub fn recompute_statistics(&mut self) {
        self.statistics = Statistics::compute(self);
    }

    /// Daily record for the given local date, if any activity was recorded.
    pub fn daily_record(&self, day: NaiveDate) -> Option<&DailyRecord> {
        self.daily_records.get(&day)
    }

    #[cfg(test)]
    pub(crate) fn skill(&self, skill: Skill) -> Option<&SkillRecord> {
        self.skill_records.get(&skill)
    }

    fn touch(&mut self, now: DateTime<FixedOffset>) {
        self.updated_at = now.with_timezone(&Utc);
    }

    fn lesson_entry(&mut self, lesson_id: &str) -> &mut LessonRecord {
        self.lesson_records
            .entry(lesson_id.to_string())
            .or_insert_with(|| LessonRecord::new(lesson_id))
    }

    fn skill_entry(&mut self, skill: Skill) -> &mut SkillRecord {
        self.skill_records.entry(skill).or_default()
    }

    fn daily_entry(&mut self, day: NaiveDate) -> &mut DailyRecord {
        self.daily_records.entry(day).or_insert_with(|| DailyRecord::new(day))
    }
}

/// Local calendar date of `now` (midnight truncation in the caller's offset).
pub fn local_day(now: DateTime<FixedOffset>) -> NaiveDate {
    now.date_naive()
}

/// Rounded arithmetic mean of scores; 0 for an empty slice.
pub(crate) fn rounded_mean<I>(scores: I) -> u8
where
    I: IntoIterator<Item = u8>,
{
    let (sum, n) = scores
        .into_iter()
        .fold((0u64, 0u64), |(sum, n), s| (sum + s as u64, n + 1));
    if n == 0 {
        return 0;
    }
    (sum as f64 / n as f64).round().min(100.0) as u8
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use chrono::Datelike;

    #[test]
    fn new_ledger_anchors_week_on_sunday() {
        let l = ledger();
        assert_eq!(l.weekly_goals.week_start.weekday(), chrono::Weekday::Sun);
        assert_eq!(l.weekly_goals.week_start, NaiveDate::from_ymd_opt(2026, 10, 11).unwrap());
        assert_eq!(l.statistics, Statistics::default());
    }

    #[test]
    fn rounded_mean_handles_empty_and_halves() {
        assert_eq!(rounded_mean(Vec::<u8>::new()), 0);
        assert_eq!(rounded_mean([70, 71]), 71);
        assert_eq!(rounded_mean([55]), 55);
    }

    #[test]
    fn local_day_uses_caller_offset() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let late = at(2026, 10, 15, 2).with_timezone(&tz);
        assert_eq!(local_day(late), NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
    }
}
