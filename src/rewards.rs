//! XP rewards computed from attempt outcomes (never from the ledger itself).

use crate::ledger::{AttemptOutcome, LessonOutcome};

const LESSON_BASE_XP: u64 = 10;
const PERFECT_LESSON_BONUS: u64 = 10;
const EXERCISE_BASE_XP: u64 = 5;
const FIRST_COMPLETION_BONUS: u64 = 5;
const NEW_BEST_BONUS: u64 = 5;
const VOCABULARY_CORRECT_XP: u64 = 2;

pub fn lesson_xp(outcome: &LessonOutcome) -> u64 {
  let mut xp = LESSON_BASE_XP + outcome.score as u64 / 10;
  if outcome.score == 100 { xp += PERFECT_LESSON_BONUS; }
  if outcome.is_new_best { xp += NEW_BEST_BONUS; }
  xp
}

/// Speaking and listening share one reward curve.
pub fn exercise_xp(outcome: &AttemptOutcome) -> u64 {
  let mut xp = EXERCISE_BASE_XP + outcome.score as u64 / 10;
  if outcome.newly_completed { xp += FIRST_COMPLETION_BONUS; }
  if outcome.is_new_best { xp += NEW_BEST_BONUS; }
  xp
}

pub fn vocabulary_xp(correct: bool) -> u64 {
  if correct { VOCABULARY_CORRECT_XP } else { 0 }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::LessonStatus;
  use crate::ledger::Statistics;

  fn lesson(score: u8, is_new_best: bool) -> LessonOutcome {
    LessonOutcome {
      lesson_id: "l".into(),
      score,
      status: LessonStatus::Completed,
      best_score: score,
      attempts: 1,
      is_new_best,
      statistics: Statistics::default(),
    }
  }

  #[test]
  fn lesson_rewards() {
    assert_eq!(lesson_xp(&lesson(75, false)), 17);
    assert_eq!(lesson_xp(&lesson(100, true)), 35);
  }

  #[test]
  fn exercise_rewards() {
    let out = AttemptOutcome {
      exercise_id: "x".into(),
      score: 80,
      is_new_best: true,
      newly_completed: true,
      best_score: 80,
      average_score: 80,
      total_attempts: 1,
      is_completed: true,
    };
    assert_eq!(exercise_xp(&out), 23);
    assert_eq!(vocabulary_xp(false), 0);
  }
}
