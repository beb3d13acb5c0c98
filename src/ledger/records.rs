//! Sub-records stored inside a ledger.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ActivityKind, LessonStatus, ListeningExercise, SpeakingExercise};

use super::GoalTargets;

/// Score at which speaking/listening exercises flip `is_completed`.
pub const EXERCISE_COMPLETION_SCORE: u8 = 80;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub lesson_id: String,
    pub status: LessonStatus,
    pub best_score: u8,
    pub attempts: u32,
    pub time_spent_minutes: u32,
    pub last_attempted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub mastered_at: Option<DateTime<Utc>>,
}

impl LessonRecord {
    pub fn new(lesson_id: &str) -> Self {
        Self {
            lesson_id: lesson_id.to_string(),
            status: LessonStatus::NotStarted,
            best_score: 0,
            attempts: 0,
            time_spent_minutes: 0,
            last_attempted_at: None,
            completed_at: None,
            mastered_at: None,
        }
    }
}

/// An attempt that carries a single derived 0–100 score.
pub trait ScoredAttempt {
    fn score(&self) -> u8;
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingAttempt {
    pub attempted_at: DateTime<Utc>,
    pub pronunciation_score: u8,
    pub fluency_score: u8,
    pub accuracy_score: u8,
    pub overall_score: u8,
    pub recording_duration_seconds: u32,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

impl ScoredAttempt for SpeakingAttempt {
    fn score(&self) -> u8 {
        self.overall_score
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListeningAnswer {
    pub question_id: String,
    pub answer: String,
    pub is_correct: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListeningAttempt {
    pub attempted_at: DateTime<Utc>,
    pub comprehension_score: u8,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub time_spent_seconds: u32,
    pub completion_rate: f64,
    #[serde(default)]
    pub answers: Vec<ListeningAnswer>,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl ScoredAttempt for ListeningAttempt {
    fn score(&self) -> u8 {
        self.comprehension_score
    }
}

/// Progress on one catalog exercise: metadata snapshot plus the
/// chronological attempt log and the fields derived from it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord<E, A> {
    pub exercise: E,
    pub attempts: Vec<A>,
    pub best_score: u8,
    pub total_attempts: u32,
    pub average_score: u8,
    pub last_practiced: Option<DateTime<Utc>>,
    pub is_completed: bool,
}

pub type SpeakingRecord = ExerciseRecord<SpeakingExercise, SpeakingAttempt>;
pub type ListeningRecord = ExerciseRecord<ListeningExercise, ListeningAttempt>;

impl<E, A: ScoredAttempt> ExerciseRecord<E, A> {
    pub fn new(exercise: E) -> Self {
        Self {
            exercise,
            attempts: Vec::new(),
            best_score: 0,
            total_attempts: 0,
            average_score: 0,
            last_practiced: None,
            is_completed: false,
        }
    }

    pub fn scores(&self) -> impl Iterator<Item = u8> + '_ {
        self.attempts.iter().map(|a| a.score())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    pub level: u8,
    pub xp: u64,
    /// Two-point running average, not a true mean.
    pub accuracy: f64,
    pub last_practiced: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyRecord {
    pub word: String,
    /// 0..=5
    pub strength: u8,
    pub correct_count: u32,
    pub total_count: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
    pub learned: bool,
}

impl VocabularyRecord {
    pub fn new(word: &str) -> Self {
        Self {
            word: word.to_string(),
            strength: 0,
            correct_count: 0,
            total_count: 0,
            last_reviewed: None,
            next_review: None,
            learned: false,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review.map_or(true, |t| t <= now)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTally {
    pub count: u32,
    pub xp: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub xp_earned: u64,
    pub lessons_completed: u32,
    pub time_spent_minutes: u32,
    #[serde(default)]
    pub activities: BTreeMap<ActivityKind, ActivityTally>,
}

impl DailyRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            xp_earned: 0,
            lessons_completed: 0,
            time_spent_minutes: 0,
            activities: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoals {
    pub target_xp: u64,
    pub target_lessons: u32,
    pub target_minutes: u32,
    pub current_xp: u64,
    pub current_lessons: u32,
    pub current_minutes: u32,
    pub week_start: NaiveDate,
}

impl WeeklyGoals {
    pub fn new(targets: GoalTargets, week_start: NaiveDate) -> Self {
        Self {
            target_xp: targets.xp,
            target_lessons: targets.lessons,
            target_minutes: targets.minutes,
            current_xp: 0,
            current_lessons: 0,
            current_minutes: 0,
            week_start,
        }
    }

    /// All three weekly targets reached.
    pub fn is_met(&self) -> bool {
        self.current_xp >= self.target_xp
            && self.current_lessons >= self.target_lessons
            && self.current_minutes >= self.target_minutes
    }
}
