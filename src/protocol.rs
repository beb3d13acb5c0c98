//! Public request/response structs for the HTTP API (serde ready).
//! Request bodies use wide integer types so out-of-range values reach the
//! validation layer instead of failing deserialization.

use serde::{Deserialize, Serialize};

use crate::domain::{ActivityKind, Skill};
use crate::learner::Learner;
use crate::ledger::{ListeningAnswer, SkillUpdate, Statistics, VocabularyRecord, WeeklyGoals};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonAttemptIn {
    pub score: i64,
    #[serde(default)]
    pub time_spent_minutes: i64,
    /// Skill credited with the lesson XP; defaults to vocabulary.
    #[serde(default)]
    pub skill: Option<Skill>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingAttemptIn {
    pub exercise_id: String,
    pub pronunciation_score: i64,
    pub fluency_score: i64,
    pub accuracy_score: i64,
    #[serde(default)]
    pub recording_duration_seconds: i64,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningAttemptIn {
    pub exercise_id: String,
    pub comprehension_score: i64,
    #[serde(default)]
    pub questions_answered: i64,
    #[serde(default)]
    pub correct_answers: i64,
    #[serde(default)]
    pub time_spent_seconds: i64,
    #[serde(default)]
    pub completion_rate: f64,
    #[serde(default)]
    pub answers: Vec<ListeningAnswer>,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyReviewIn {
    pub word: String,
    pub correct: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProgressIn {
    pub xp_delta: i64,
    pub accuracy: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgressIn {
    pub xp: i64,
    pub activity_type: ActivityKind,
    #[serde(default)]
    pub time_spent_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpEvent {
    pub skill: Skill,
    pub level: u8,
}

/// Response for every attempt submission: the attempt-specific outcome
/// flattened in, plus the rewards and rollups it produced.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOut<T: Serialize> {
    #[serde(flatten)]
    pub result: T,
    pub xp_awarded: u64,
    pub skill: SkillUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_up: Option<LevelUpEvent>,
    pub statistics: Statistics,
    pub weekly_goals: WeeklyGoals,
    pub learner: Learner,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProgressOut {
    pub leveled_up: bool,
    pub level: u8,
    pub xp: u64,
    pub accuracy: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgressOut {
    pub xp_earned_today: u64,
    pub weekly_goals: WeeklyGoals,
    pub weekly_goal_met: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSummaryOut {
    pub language: String,
    pub statistics: Statistics,
    pub weekly_goals: WeeklyGoals,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueWordsOut {
    pub words: Vec<VocabularyRecord>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
