//! Spaced-repetition strength per word.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Serialize;

use super::records::VocabularyRecord;
use super::ProgressLedger;

pub const MAX_STRENGTH: u8 = 5;
pub const LEARNED_STRENGTH: u8 = 4;
/// Days until the next review, indexed by strength.
const REVIEW_INTERVAL_DAYS: [i64; 6] = [1, 1, 3, 7, 14, 30];

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyOutcome {
    pub word: String,
    pub strength: u8,
    pub learned: bool,
    pub newly_learned: bool,
    pub next_review: DateTime<Utc>,
}

impl ProgressLedger {
    pub fn record_vocabulary_review(&mut self, word: &str, correct: bool, now: DateTime<FixedOffset>) -> VocabularyOutcome {
        let at = now.with_timezone(&Utc);
        let key = word.trim();
        let record = self
            .vocabulary_records
            .entry(key.to_string())
            .or_insert_with(|| VocabularyRecord::new(key));

        let was_learned = record.learned;
        record.total_count += 1;
        if correct {
            record.correct_count += 1;
            record.strength = (record.strength + 1).min(MAX_STRENGTH);
        } else {
            record.strength = record.strength.saturating_sub(1);
        }
        let next = at + Duration::days(REVIEW_INTERVAL_DAYS[record.strength as usize]);
        record.last_reviewed = Some(at);
        record.next_review = Some(next);
        record.learned = record.strength >= LEARNED_STRENGTH;

        let outcome = VocabularyOutcome {
            word: record.word.clone(),
            strength: record.strength,
            learned: record.learned,
            newly_learned: !was_learned && record.learned,
            next_review: next,
        };
        self.touch(now);
        self.recompute_statistics();
        outcome
    }

    /// Words whose next review is at or before `now`, most overdue first.
    pub fn due_words(&self, now: DateTime<Utc>) -> Vec<&VocabularyRecord> {
        let mut due: Vec<&VocabularyRecord> = self
            .vocabulary_records
            .values()
            .filter(|v| v.is_due(now))
            .collect();
        due.sort_by_key(|v| v.next_review);
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::*;

    #[test]
    fn strength_climbs_and_caps() {
        let mut l = ledger();
        let now = at(2026, 10, 14, 9);
        let mut last = None;
        for _ in 0..8 {
            last = Some(l.record_vocabulary_review("gato", true, now));
        }
        let last = last.unwrap();
        assert_eq!(last.strength, MAX_STRENGTH);
        assert!(last.learned);
        assert_eq!(l.statistics.words_learned, 1);
        assert_eq!(l.vocabulary_records["gato"].total_count, 8);
    }

    #[test]
    fn wrong_answer_drops_strength_and_learned_flag() {
        let mut l = ledger();
        let now = at(2026, 10, 14, 9);
        for _ in 0..4 {
            l.record_vocabulary_review("perro", true, now);
        }
        assert!(l.vocabulary_records["perro"].learned);
        let out = l.record_vocabulary_review("perro", false, now);
        assert_eq!(out.strength, 3);
        assert!(!out.learned);
        assert_eq!(l.statistics.words_learned, 0);
        assert_eq!(out.next_review, now.with_timezone(&Utc) + Duration::days(7));
    }

    #[test]
    fn strength_never_underflows() {
        let mut l = ledger();
        let out = l.record_vocabulary_review("casa", false, at(2026, 10, 14, 9));
        assert_eq!(out.strength, 0);
    }

    #[test]
    fn due_words_respects_next_review() {
        let mut l = ledger();
        l.record_vocabulary_review("uno", true, at(2026, 10, 14, 9));
        l.record_vocabulary_review("dos", false, at(2026, 10, 10, 9));
        let due = l.due_words(at(2026, 10, 14, 10).with_timezone(&Utc));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].word, "dos");
    }
}
