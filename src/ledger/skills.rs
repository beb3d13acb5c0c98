//! Skill XP, accuracy and leveling.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::info;

use crate::domain::Skill;

use super::ProgressLedger;

pub const XP_PER_LEVEL: u64 = 500;
pub const MAX_SKILL_LEVEL: u8 = 10;

/// `min(floor(xp / 500), 10)`
pub fn level_for_xp(xp: u64) -> u8 {
    (xp / XP_PER_LEVEL).min(MAX_SKILL_LEVEL as u64) as u8
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillUpdate {
    pub skill: Skill,
    pub leveled_up: bool,
    pub level: u8,
    pub xp: u64,
    pub accuracy: f64,
}

impl ProgressLedger {
    /// Add XP to a skill and fold one accuracy sample into its running value.
    ///
    /// Accuracy is `(old + sample) / 2`, so recent samples dominate.
    pub fn update_skill(&mut self, skill: Skill, xp_delta: u64, accuracy_sample: u8, now: DateTime<FixedOffset>) -> SkillUpdate {
        let record = self.skill_entry(skill);
        let old_level = record.level;

        record.xp = record.xp.saturating_add(xp_delta);
        record.accuracy = (record.accuracy + accuracy_sample as f64) / 2.0;
        record.level = level_for_xp(record.xp);
        record.last_practiced = Some(now.with_timezone(&Utc));

        let update = SkillUpdate {
            skill,
            leveled_up: record.level > old_level,
            level: record.level,
            xp: record.xp,
            accuracy: record.accuracy,
        };
        if update.leveled_up {
            info!(target: "progress", user_id = %self.user_id, language = %self.language, %skill, level = update.level, "Skill level up");
        }

        self.touch(now);
        self.recompute_statistics();
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::*;
    use proptest::prelude::*;

    #[test]
    fn xp_sequence_levels_up() {
        let mut l = ledger();
        let now = at(2026, 10, 14, 10);
        assert!(!l.update_skill(Skill::Grammar, 100, 80, now).leveled_up);
        assert!(!l.update_skill(Skill::Grammar, 150, 80, now).leveled_up);
        let third = l.update_skill(Skill::Grammar, 260, 80, now);
        assert_eq!(third.xp, 510);
        assert_eq!(third.level, 1);
        assert!(third.leveled_up);
        let fourth = l.update_skill(Skill::Grammar, 500, 80, now);
        assert_eq!(fourth.xp, 1010);
        assert_eq!(fourth.level, 2);
    }

    #[test]
    fn accuracy_is_two_point_running_average() {
        let mut l = ledger();
        let now = at(2026, 10, 14, 10);
        l.update_skill(Skill::Speaking, 10, 100, now);
        l.update_skill(Skill::Speaking, 10, 40, now);
        let last = l.update_skill(Skill::Speaking, 10, 70, now);
        // 0 -> 50 -> 45 -> 57.5
        assert_eq!(last.accuracy, 57.5);
        let true_mean = (100.0 + 40.0 + 70.0) / 3.0;
        assert!((last.accuracy - true_mean).abs() > 1.0);
    }

    #[test]
    fn level_caps_at_ten() {
        let mut l = ledger();
        let out = l.update_skill(Skill::Reading, 1_000_000, 90, at(2026, 10, 14, 10));
        assert_eq!(out.level, MAX_SKILL_LEVEL);
        assert_eq!(out.xp, 1_000_000);
        let again = l.update_skill(Skill::Reading, 500, 90, at(2026, 10, 14, 11));
        assert!(!again.leveled_up);
        assert_eq!(again.level, 10);
    }

    proptest! {
        #[test]
        fn level_is_monotonic_and_capped(a in 0u64..20_000, b in 0u64..20_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(level_for_xp(lo) <= level_for_xp(hi));
            prop_assert!(level_for_xp(hi) <= MAX_SKILL_LEVEL);
            prop_assert_eq!(level_for_xp(lo) as u64, (lo / 500).min(10));
        }
    }
}
