//! Core behaviors behind the HTTP handlers.
//!
//! Each submission is one read-modify-write cycle:
//!   1. validate the payload
//!   2. load the ledger for (user, language), or create it lazily
//!   3. record the attempt (statistics are recomputed inside the ledger)
//!   4. compute the XP reward from the attempt outcome
//!   5. update the matching skill and the daily/weekly rollups
//!   6. persist the ledger once, then award XP and streak to the learner
//!
//! All derived fields are computed in memory before the single ledger save.
//! A concurrent writer that saved first makes the save fail with a
//! conflict; nothing is retried here.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{ActivityKind, Skill};
use crate::learner::Learner;
use crate::ledger::{
  AttemptOutcome, LessonAttempt, LessonOutcome, ListeningAttemptInput, ProgressLedger, SkillUpdate,
  SpeakingAttemptInput, Statistics, VocabularyOutcome,
};
use crate::protocol::*;
use crate::rewards;
use crate::state::AppState;
use crate::store::StoreError;

const MAX_MINUTES_PER_SUBMISSION: i64 = 24 * 60;
const MAX_SECONDS_PER_SUBMISSION: i64 = 24 * 60 * 60;
const MAX_XP_PER_SUBMISSION: i64 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
  #[error("validation error: {0}")]
  Validation(String),
  #[error("unknown {kind} exercise: {id}")]
  UnknownExercise { kind: &'static str, id: String },
  #[error(transparent)]
  Store(#[from] StoreError),
}

type ServiceResult<T> = Result<T, ServiceError>;

// -------- Queries --------

/// Ledger for (user, language), or `None` when nothing was recorded yet.
pub async fn get_ledger(state: &AppState, user_id: &str, language: &str) -> ServiceResult<Option<ProgressLedger>> {
  let language = normalize_language(language)?;
  Ok(state.store.load_ledger(user_id, &language).await)
}

/// Ledger or a zeroed, unsaved default. Absence is a valid empty state.
pub async fn get_progress(state: &AppState, user_id: &str, language: &str) -> ServiceResult<ProgressLedger> {
  let language = normalize_language(language)?;
  Ok(match state.store.load_ledger(user_id, &language).await {
    Some(l) => l,
    None => ProgressLedger::new(user_id, language, state.goals, state.now()),
  })
}

pub async fn get_statistics(state: &AppState, user_id: &str, language: &str) -> ServiceResult<Statistics> {
  Ok(get_ledger(state, user_id, language).await?.map(|l| l.statistics).unwrap_or_default())
}

pub async fn list_languages(state: &AppState, user_id: &str) -> Vec<LanguageSummaryOut> {
  state
    .store
    .ledgers_for_user(user_id)
    .await
    .into_iter()
    .map(|l| LanguageSummaryOut { language: l.language, statistics: l.statistics, weekly_goals: l.weekly_goals })
    .collect()
}

pub async fn get_learner(state: &AppState, user_id: &str) -> Learner {
  state.store.load_learner(user_id).await.unwrap_or_else(|| Learner::new(user_id))
}

pub async fn due_words(state: &AppState, user_id: &str, language: &str) -> ServiceResult<DueWordsOut> {
  let now = state.now().with_timezone(&Utc);
  let words = get_ledger(state, user_id, language)
    .await?
    .map(|l| l.due_words(now).into_iter().cloned().collect())
    .unwrap_or_default();
  Ok(DueWordsOut { words })
}

// -------- Submissions --------

#[instrument(level = "info", skip(state, body), fields(%user_id, %language, %lesson_id))]
pub async fn submit_lesson(
  state: &AppState,
  user_id: &str,
  language: &str,
  lesson_id: &str,
  body: LessonAttemptIn,
) -> ServiceResult<SubmissionOut<LessonOutcome>> {
  let score = validate_score("score", body.score)?;
  let minutes = validate_range("timeSpentMinutes", body.time_spent_minutes, 0, MAX_MINUTES_PER_SUBMISSION)?;
  let lesson_id = validate_id("lessonId", lesson_id)?;
  let skill = body.skill.unwrap_or(Skill::Vocabulary);

  let now = state.now();
  let mut ledger = load_or_create(state, user_id, language, now).await?;

  let mut outcome = ledger.record_lesson_attempt(&lesson_id, LessonAttempt { score, time_spent_minutes: minutes }, now);
  let xp = rewards::lesson_xp(&outcome);
  let skill = ledger.update_skill(skill, xp, score, now);
  ledger.update_daily_progress(xp, ActivityKind::Lesson, Some(minutes), now);
  outcome.statistics = ledger.statistics.clone();

  if outcome.is_new_best {
    info!(target: "progress", %user_id, %lesson_id, score, "New personal best");
  }
  finish(state, ledger, user_id, outcome, xp, skill, now).await
}

#[instrument(level = "info", skip(state, body), fields(%user_id, %language, exercise_id = %body.exercise_id))]
pub async fn submit_speaking(
  state: &AppState,
  user_id: &str,
  language: &str,
  body: SpeakingAttemptIn,
) -> ServiceResult<SubmissionOut<AttemptOutcome>> {
  let input = SpeakingAttemptInput {
    pronunciation_score: validate_score("pronunciationScore", body.pronunciation_score)?,
    fluency_score: validate_score("fluencyScore", body.fluency_score)?,
    accuracy_score: validate_score("accuracyScore", body.accuracy_score)?,
    recording_duration_seconds: validate_range("recordingDurationSeconds", body.recording_duration_seconds, 0, MAX_SECONDS_PER_SUBMISSION)?,
    feedback: body.feedback,
    improvements: body.improvements,
  };
  let exercise = state
    .catalog
    .speaking(body.exercise_id.trim())
    .cloned()
    .ok_or_else(|| ServiceError::UnknownExercise { kind: "speaking", id: body.exercise_id.clone() })?;

  let now = state.now();
  let mut ledger = load_or_create(state, user_id, language, now).await?;

  let outcome = ledger.record_speaking_attempt(&exercise, input, now);
  let xp = rewards::exercise_xp(&outcome);
  let skill = ledger.update_skill(Skill::Speaking, xp, outcome.score, now);
  let minutes = seconds_to_minutes(exercise_seconds(&ledger, &exercise.id));
  ledger.update_daily_progress(xp, ActivityKind::Speaking, Some(minutes), now);

  if outcome.is_new_best {
    info!(target: "progress", %user_id, exercise_id = %exercise.id, score = outcome.score, "New personal best");
  }
  finish(state, ledger, user_id, outcome, xp, skill, now).await
}

#[instrument(level = "info", skip(state, body), fields(%user_id, %language, exercise_id = %body.exercise_id))]
pub async fn submit_listening(
  state: &AppState,
  user_id: &str,
  language: &str,
  body: ListeningAttemptIn,
) -> ServiceResult<SubmissionOut<AttemptOutcome>> {
  let questions_answered = validate_range("questionsAnswered", body.questions_answered, 0, 1_000)?;
  let correct_answers = validate_range("correctAnswers", body.correct_answers, 0, questions_answered as i64)?;
  if !(0.0..=1.0).contains(&body.completion_rate) {
    return Err(ServiceError::Validation("completionRate must be between 0 and 1".into()));
  }
  let time_spent_seconds = validate_range("timeSpentSeconds", body.time_spent_seconds, 0, MAX_SECONDS_PER_SUBMISSION)?;
  let input = ListeningAttemptInput {
    comprehension_score: validate_score("comprehensionScore", body.comprehension_score)?,
    questions_answered,
    correct_answers,
    time_spent_seconds,
    completion_rate: body.completion_rate,
    answers: body.answers,
    feedback: body.feedback,
  };
  let exercise = state
    .catalog
    .listening(body.exercise_id.trim())
    .cloned()
    .ok_or_else(|| ServiceError::UnknownExercise { kind: "listening", id: body.exercise_id.clone() })?;

  let now = state.now();
  let mut ledger = load_or_create(state, user_id, language, now).await?;

  let outcome = ledger.record_listening_attempt(&exercise, input, now);
  let xp = rewards::exercise_xp(&outcome);
  let skill = ledger.update_skill(Skill::Listening, xp, outcome.score, now);
  ledger.update_daily_progress(xp, ActivityKind::Listening, Some(seconds_to_minutes(time_spent_seconds)), now);

  if outcome.is_new_best {
    info!(target: "progress", %user_id, exercise_id = %exercise.id, score = outcome.score, "New personal best");
  }
  finish(state, ledger, user_id, outcome, xp, skill, now).await
}

#[instrument(level = "info", skip(state, body), fields(%user_id, %language))]
pub async fn submit_vocabulary(
  state: &AppState,
  user_id: &str,
  language: &str,
  body: VocabularyReviewIn,
) -> ServiceResult<SubmissionOut<VocabularyOutcome>> {
  let word = validate_id("word", &body.word)?;
  let now = state.now();
  let mut ledger = load_or_create(state, user_id, language, now).await?;

  let outcome = ledger.record_vocabulary_review(&word, body.correct, now);
  let xp = rewards::vocabulary_xp(body.correct);
  let skill = ledger.update_skill(Skill::Vocabulary, xp, if body.correct { 100 } else { 0 }, now);
  ledger.update_daily_progress(xp, ActivityKind::Vocabulary, None, now);

  finish(state, ledger, user_id, outcome, xp, skill, now).await
}

/// Direct skill update; also counts as activity for the learner streak.
#[instrument(level = "info", skip(state, body), fields(%user_id, %language, %skill))]
pub async fn update_skill_progress(
  state: &AppState,
  user_id: &str,
  language: &str,
  skill: Skill,
  body: SkillProgressIn,
) -> ServiceResult<SkillProgressOut> {
  let xp = validate_range("xpDelta", body.xp_delta, 0, MAX_XP_PER_SUBMISSION)? as u64;
  let accuracy = validate_score("accuracy", body.accuracy)?;
  let now = state.now();
  let mut ledger = load_or_create(state, user_id, language, now).await?;

  let update = ledger.update_skill(skill, xp, accuracy, now);
  state.store.save_ledger(ledger).await?;
  Ok(SkillProgressOut { leveled_up: update.leveled_up, level: update.level, xp: update.xp, accuracy: update.accuracy })
}

#[instrument(level = "info", skip(state, body), fields(%user_id, %language))]
pub async fn update_daily_progress(
  state: &AppState,
  user_id: &str,
  language: &str,
  body: DailyProgressIn,
) -> ServiceResult<DailyProgressOut> {
  let xp = validate_range("xp", body.xp, 0, MAX_XP_PER_SUBMISSION)? as u64;
  let minutes = body
    .time_spent_minutes
    .map(|m| validate_range("timeSpentMinutes", m, 0, MAX_MINUTES_PER_SUBMISSION))
    .transpose()?;
  let now = state.now();
  let mut ledger = load_or_create(state, user_id, language, now).await?;

  ledger.update_daily_progress(xp, body.activity_type, minutes, now);
  let xp_earned_today = ledger
    .daily_record(crate::ledger::local_day(now))
    .map(|d| d.xp_earned)
    .unwrap_or(0);
  let saved = state.store.save_ledger(ledger).await?;
  Ok(DailyProgressOut {
    xp_earned_today,
    weekly_goal_met: saved.weekly_goals.is_met(),
    weekly_goals: saved.weekly_goals,
  })
}

// -------- Shared steps --------

async fn load_or_create(
  state: &AppState,
  user_id: &str,
  language: &str,
  now: DateTime<FixedOffset>,
) -> ServiceResult<ProgressLedger> {
  let language = normalize_language(language)?;
  match state.store.load_ledger(user_id, &language).await {
    Some(l) => {
      debug!(target: "progress", %user_id, %language, revision = l.revision, "Ledger loaded");
      Ok(l)
    }
    None => {
      info!(target: "progress", %user_id, %language, "Creating ledger");
      Ok(ProgressLedger::new(user_id, language, state.goals, now))
    }
  }
}

/// Persist the ledger, then credit the learner.
async fn finish<T: Serialize>(
  state: &AppState,
  ledger: ProgressLedger,
  user_id: &str,
  result: T,
  xp: u64,
  skill: SkillUpdate,
  now: DateTime<FixedOffset>,
) -> ServiceResult<SubmissionOut<T>> {
  let saved = state.store.save_ledger(ledger).await?;

  let learner = state
    .store
    .update_learner(user_id, |l| {
      l.award_xp(xp);
      l.touch_streak(now);
    })
    .await?;

  let level_up = skill.leveled_up.then(|| LevelUpEvent { skill: skill.skill, level: skill.level });
  Ok(SubmissionOut {
    result,
    xp_awarded: xp,
    skill,
    level_up,
    statistics: saved.statistics,
    weekly_goals: saved.weekly_goals,
    learner,
  })
}

/// Speaking attempts carry recording length in seconds; use the latest one.
fn exercise_seconds(ledger: &ProgressLedger, exercise_id: &str) -> u32 {
  ledger
    .speaking_records
    .get(exercise_id)
    .and_then(|r| r.attempts.last())
    .map(|a| a.recording_duration_seconds)
    .unwrap_or(0)
}

fn seconds_to_minutes(seconds: u32) -> u32 {
  (seconds + 59) / 60
}

// -------- Validation --------

fn validate_score(field: &str, v: i64) -> ServiceResult<u8> {
  Ok(validate_range(field, v, 0, 100)? as u8)
}

fn validate_range(field: &str, v: i64, min: i64, max: i64) -> ServiceResult<u32> {
  if v < min || v > max {
    return Err(ServiceError::Validation(format!("{field} must be between {min} and {max}")));
  }
  Ok(v as u32)
}

fn validate_id(field: &str, raw: &str) -> ServiceResult<String> {
  let s = raw.trim();
  if s.is_empty() || s.chars().count() > 128 {
    return Err(ServiceError::Validation(format!("{field} must be 1-128 characters")));
  }
  Ok(s.to_string())
}

/// Language codes like "es", "pt-BR" or "zh_hans"; stored lowercase.
pub fn normalize_language(raw: &str) -> ServiceResult<String> {
  let s = raw.trim();
  let ok = (2..=16).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
  if !ok {
    return Err(ServiceError::Validation(format!("invalid language code: {raw:?}")));
  }
  Ok(s.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;

  async fn state() -> AppState {
    AppState::new(AppConfig::default()).await.unwrap()
  }

  fn speaking(p: i64) -> SpeakingAttemptIn {
    SpeakingAttemptIn {
      exercise_id: "es-sp-1".into(),
      pronunciation_score: p,
      fluency_score: 80,
      accuracy_score: 70,
      recording_duration_seconds: 65,
      feedback: None,
      improvements: vec![],
    }
  }

  #[tokio::test]
  async fn lesson_submission_creates_ledger_and_rewards() {
    let st = state().await;
    assert!(get_ledger(&st, "u1", "es").await.unwrap().is_none());

    let out = submit_lesson(&st, "u1", "ES", "l-1", LessonAttemptIn { score: 95, time_spent_minutes: 12, skill: Some(Skill::Grammar) })
      .await
      .unwrap();
    assert_eq!(out.result.status, crate::domain::LessonStatus::Completed);
    assert_eq!(out.xp_awarded, 24);
    assert_eq!(out.skill.skill, Skill::Grammar);
    assert_eq!(out.learner.total_xp, 24);
    assert_eq!(out.learner.current_streak, 1);
    assert_eq!(out.weekly_goals.current_lessons, 1);
    assert_eq!(out.statistics.total_lessons_completed, 1);

    let ledger = get_ledger(&st, "u1", "es").await.unwrap().unwrap();
    assert_eq!(ledger.revision, 1);
    assert_eq!(ledger.lesson_records["l-1"].time_spent_minutes, 12);
  }

  #[tokio::test]
  async fn speaking_submission_uses_catalog_snapshot() {
    let st = state().await;
    let out = submit_speaking(&st, "u1", "es", speaking(90)).await.unwrap();
    assert_eq!(out.result.score, 80);
    assert!(out.result.is_completed);
    let ledger = get_ledger(&st, "u1", "es").await.unwrap().unwrap();
    assert_eq!(ledger.speaking_records["es-sp-1"].exercise.category, "greetings");
    let today = ledger.daily_records.values().next().unwrap();
    assert_eq!(today.time_spent_minutes, 2);
  }

  #[tokio::test]
  async fn rejects_out_of_range_scores_and_unknown_exercises() {
    let st = state().await;
    let err = submit_speaking(&st, "u1", "es", speaking(101)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let mut body = speaking(90);
    body.exercise_id = "nope".into();
    let err = submit_speaking(&st, "u1", "es", body).await.unwrap_err();
    assert!(matches!(err, ServiceError::UnknownExercise { kind: "speaking", .. }));
    assert!(get_ledger(&st, "u1", "es").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn missing_ledger_reads_as_zeroed_defaults() {
    let st = state().await;
    let stats = get_statistics(&st, "nobody", "fr").await.unwrap();
    assert_eq!(stats, Statistics::default());
    let progress = get_progress(&st, "nobody", "fr").await.unwrap();
    assert!(progress.lesson_records.is_empty());
    assert_eq!(progress.revision, 0);
  }

  #[test]
  fn language_codes() {
    assert_eq!(normalize_language(" pt-BR ").unwrap(), "pt-br");
    assert!(normalize_language("e").is_err());
    assert!(normalize_language("es/../x").is_err());
  }
}
