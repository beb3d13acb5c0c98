//! Derived statistics, always recomputed from scratch.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{rounded_mean, ProgressLedger};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_lessons_completed: u32,
    pub total_time_spent_minutes: u64,
    /// Rounded mean best score over completed or mastered lessons.
    pub average_score: u8,
    /// Longest run of consecutive days with a daily record.
    pub best_streak: u32,
    pub words_learned: u32,
    pub perfect_scores: u32,
    pub speaking_completed: u32,
    pub speaking_average_score: u8,
    pub listening_completed: u32,
    pub listening_average_score: u8,
}

impl Statistics {
    pub fn compute(ledger: &ProgressLedger) -> Self {
        let finished: Vec<u8> = ledger
            .lesson_records
            .values()
            .filter(|r| r.status.is_finished())
            .map(|r| r.best_score)
            .collect();

        let speaking: Vec<u8> = ledger
            .speaking_records
            .values()
            .filter(|r| r.is_completed)
            .map(|r| r.average_score)
            .collect();
        let listening: Vec<u8> = ledger
            .listening_records
            .values()
            .filter(|r| r.is_completed)
            .map(|r| r.average_score)
            .collect();

        Self {
            total_lessons_completed: finished.len() as u32,
            total_time_spent_minutes: ledger
                .lesson_records
                .values()
                .map(|r| r.time_spent_minutes as u64)
                .sum(),
            average_score: rounded_mean(finished.iter().copied()),
            best_streak: longest_day_run(ledger),
            words_learned: ledger.vocabulary_records.values().filter(|v| v.learned).count() as u32,
            perfect_scores: ledger.lesson_records.values().filter(|r| r.best_score == 100).count() as u32,
            speaking_completed: speaking.len() as u32,
            speaking_average_score: rounded_mean(speaking.iter().copied()),
            listening_completed: listening.len() as u32,
            listening_average_score: rounded_mean(listening.iter().copied()),
        }
    }
}

fn longest_day_run(ledger: &ProgressLedger) -> u32 {
    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev = None;
    // BTreeMap keys iterate in date order.
    for day in ledger.daily_records.keys() {
        run = match prev {
            Some(p) if *day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(*day);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityKind, Skill};
    use crate::ledger::test_support::*;
    use crate::ledger::LessonAttempt;

    #[test]
    fn empty_ledger_yields_zeros() {
        let l = ledger();
        assert_eq!(Statistics::compute(&l), Statistics::default());
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut l = ledger();
        l.record_lesson_attempt("a", LessonAttempt { score: 100, time_spent_minutes: 12 }, at(2026, 10, 14, 9));
        l.record_lesson_attempt("b", LessonAttempt { score: 71, time_spent_minutes: 8 }, at(2026, 10, 14, 9));
        l.record_lesson_attempt("c", LessonAttempt { score: 10, time_spent_minutes: 4 }, at(2026, 10, 14, 9));
        l.update_skill(Skill::Grammar, 30, 90, at(2026, 10, 14, 9));

        let first = l.statistics.clone();
        l.recompute_statistics();
        let second = l.statistics.clone();
        l.recompute_statistics();
        assert_eq!(first, second);
        assert_eq!(second, l.statistics);

        assert_eq!(first.total_lessons_completed, 2);
        assert_eq!(first.total_time_spent_minutes, 24);
        assert_eq!(first.average_score, 86);
        assert_eq!(first.perfect_scores, 1);
    }

    #[test]
    fn best_streak_counts_consecutive_days() {
        let mut l = ledger();
        for d in [1, 2, 3, 5, 6] {
            l.update_daily_progress(5, ActivityKind::Vocabulary, None, at(2026, 10, d, 9));
        }
        assert_eq!(l.statistics.best_streak, 3);
    }
}
