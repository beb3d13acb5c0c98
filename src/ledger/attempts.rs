//! Lesson, speaking and listening attempt recording.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{LessonStatus, ListeningExercise, SpeakingExercise};

use super::records::{
    ExerciseRecord, ListeningAnswer, ListeningAttempt, ScoredAttempt, SpeakingAttempt,
    EXERCISE_COMPLETION_SCORE,
};
use super::{rounded_mean, ProgressLedger, Statistics};

pub const LESSON_COMPLETED_SCORE: u8 = 70;
pub const LESSON_MASTERED_SCORE: u8 = 90;
/// Mastery needs at least this many attempts on the lesson.
pub const LESSON_MASTERY_MIN_ATTEMPTS: u32 = 2;

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonAttempt {
    pub score: u8,
    #[serde(default)]
    pub time_spent_minutes: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonOutcome {
    pub lesson_id: String,
    pub score: u8,
    pub status: LessonStatus,
    pub best_score: u8,
    pub attempts: u32,
    pub is_new_best: bool,
    /// Serialized by the submission envelope instead.
    #[serde(skip)]
    pub statistics: Statistics,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingAttemptInput {
    pub pronunciation_score: u8,
    pub fluency_score: u8,
    pub accuracy_score: u8,
    #[serde(default)]
    pub recording_duration_seconds: u32,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningAttemptInput {
    pub comprehension_score: u8,
    #[serde(default)]
    pub questions_answered: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub time_spent_seconds: u32,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub answers: Vec<ListeningAnswer>,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Result of a speaking or listening attempt.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutcome {
    pub exercise_id: String,
    pub score: u8,
    pub is_new_best: bool,
    /// This attempt flipped `is_completed` from false to true.
    pub newly_completed: bool,
    pub best_score: u8,
    pub average_score: u8,
    pub total_attempts: u32,
    pub is_completed: bool,
}

/// Overall speaking score: rounded mean of the three sub-scores.
pub fn speaking_overall(pronunciation: u8, fluency: u8, accuracy: u8) -> u8 {
    let sum = pronunciation as f64 + fluency as f64 + accuracy as f64;
    (sum / 3.0).round() as u8
}

/// Status after an attempt with `score`, given the post-increment attempt count.
pub fn lesson_status_for(score: u8, attempts: u32) -> LessonStatus {
    if score >= LESSON_MASTERED_SCORE && attempts >= LESSON_MASTERY_MIN_ATTEMPTS {
        LessonStatus::Mastered
    } else if score >= LESSON_COMPLETED_SCORE {
        LessonStatus::Completed
    } else {
        LessonStatus::InProgress
    }
}

impl<E, A: ScoredAttempt> ExerciseRecord<E, A> {
    /// Append an attempt and refresh every derived field. Returns
    /// `(is_new_best, newly_completed)`.
    fn push_attempt(&mut self, attempt: A, now: DateTime<Utc>) -> (bool, bool) {
        let score = attempt.score();
        let previous_best = self.best_score;
        let was_completed = self.is_completed;

        self.attempts.push(attempt);
        self.total_attempts += 1;
        self.last_practiced = Some(now);
        self.best_score = previous_best.max(score);
        self.average_score = rounded_mean(self.scores());
        if score >= EXERCISE_COMPLETION_SCORE {
            self.is_completed = true;
        }

        (score > previous_best, !was_completed && self.is_completed)
    }

    fn outcome(&self, exercise_id: &str, score: u8, is_new_best: bool, newly_completed: bool) -> AttemptOutcome {
        AttemptOutcome {
            exercise_id: exercise_id.to_string(),
            score,
            is_new_best,
            newly_completed,
            best_score: self.best_score,
            average_score: self.average_score,
            total_attempts: self.total_attempts,
            is_completed: self.is_completed,
        }
    }
}

impl ProgressLedger {
    pub fn record_lesson_attempt(&mut self, lesson_id: &str, attempt: LessonAttempt, now: DateTime<FixedOffset>) -> LessonOutcome {
        let at = now.with_timezone(&Utc);
        let record = self.lesson_entry(lesson_id);

        let previous_best = record.best_score;
        record.attempts += 1;
        record.time_spent_minutes = record.time_spent_minutes.saturating_add(attempt.time_spent_minutes);
        record.last_attempted_at = Some(at);
        record.best_score = previous_best.max(attempt.score);
        record.status = lesson_status_for(attempt.score, record.attempts);
        if record.status.is_finished() && record.completed_at.is_none() {
            record.completed_at = Some(at);
        }
        if record.status == LessonStatus::Mastered && record.mastered_at.is_none() {
            record.mastered_at = Some(at);
        }

        let status = record.status;
        let best_score = record.best_score;
        let attempts = record.attempts;
        debug!(target: "progress", %lesson_id, score = attempt.score, ?status, attempts, "Lesson attempt recorded");

        self.touch(now);
        self.recompute_statistics();

        LessonOutcome {
            lesson_id: lesson_id.to_string(),
            score: attempt.score,
            status,
            best_score,
            attempts,
            is_new_best: attempt.score > previous_best,
            statistics: self.statistics.clone(),
        }
    }

    pub fn record_speaking_attempt(
        &mut self,
        exercise: &SpeakingExercise,
        input: SpeakingAttemptInput,
        now: DateTime<FixedOffset>,
    ) -> AttemptOutcome {
        let at = now.with_timezone(&Utc);
        let overall = speaking_overall(input.pronunciation_score, input.fluency_score, input.accuracy_score);
        let attempt = SpeakingAttempt {
            attempted_at: at,
            pronunciation_score: input.pronunciation_score,
            fluency_score: input.fluency_score,
            accuracy_score: input.accuracy_score,
            overall_score: overall,
            recording_duration_seconds: input.recording_duration_seconds,
            feedback: input.feedback,
            improvements: input.improvements,
        };

        let record = self
            .speaking_records
            .entry(exercise.id.clone())
            .or_insert_with(|| ExerciseRecord::new(exercise.clone()));
        let (is_new_best, newly_completed) = record.push_attempt(attempt, at);
        let outcome = record.outcome(&exercise.id, overall, is_new_best, newly_completed);
        debug!(target: "progress", exercise_id = %exercise.id, overall, is_new_best, "Speaking attempt recorded");

        self.touch(now);
        self.recompute_statistics();
        outcome
    }

    pub fn record_listening_attempt(
        &mut self,
        exercise: &ListeningExercise,
        input: ListeningAttemptInput,
        now: DateTime<FixedOffset>,
    ) -> AttemptOutcome {
        let at = now.with_timezone(&Utc);
        let score = input.comprehension_score;
        let attempt = ListeningAttempt {
            attempted_at: at,
            comprehension_score: score,
            questions_answered: input.questions_answered,
            correct_answers: input.correct_answers,
            time_spent_seconds: input.time_spent_seconds,
            completion_rate: input.completion_rate,
            answers: input.answers,
            feedback: input.feedback,
        };

        let record = self
            .listening_records
            .entry(exercise.id.clone())
            .or_insert_with(|| ExerciseRecord::new(exercise.clone()));
        let (is_new_best, newly_completed) = record.push_attempt(attempt, at);
        let outcome = record.outcome(&exercise.id, score, is_new_best, newly_completed);
        debug!(target: "progress", exercise_id = %exercise.id, score, is_new_best, "Listening attempt recorded");

        self.touch(now);
        self.recompute_statistics();
        outcome
    }
}
