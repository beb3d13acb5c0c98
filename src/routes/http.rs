//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs the caller and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::catalog::CatalogFilter;
use crate::domain::Skill;
use crate::logic::*;
use crate::protocol::*;
use crate::response::AppError;
use crate::routes::auth::UserId;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, AppError>;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

// -------- Catalog --------

#[instrument(level = "info", skip(state))]
pub async fn http_list_speaking(
  State(state): State<Arc<AppState>>,
  Query(f): Query<CatalogFilter>,
) -> impl IntoResponse {
  let items: Vec<_> = state.catalog.list_speaking(&f).into_iter().cloned().collect();
  Json(items)
}

#[instrument(level = "info", skip(state))]
pub async fn http_random_speaking(
  State(state): State<Arc<AppState>>,
  Query(f): Query<CatalogFilter>,
) -> ApiResult<crate::domain::SpeakingExercise> {
  let ex = state.catalog.random_speaking(&f).cloned()
    .ok_or_else(|| AppError::not_found("no speaking exercise matches the filter"))?;
  info!(target: "lingo_backend", id = %ex.id, "HTTP speaking exercise served");
  Ok(Json(ex))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_listening(
  State(state): State<Arc<AppState>>,
  Query(f): Query<CatalogFilter>,
) -> impl IntoResponse {
  let items: Vec<_> = state.catalog.list_listening(&f).into_iter().cloned().collect();
  Json(items)
}

#[instrument(level = "info", skip(state))]
pub async fn http_random_listening(
  State(state): State<Arc<AppState>>,
  Query(f): Query<CatalogFilter>,
) -> ApiResult<crate::domain::ListeningExercise> {
  let ex = state.catalog.random_listening(&f).cloned()
    .ok_or_else(|| AppError::not_found("no listening exercise matches the filter"))?;
  info!(target: "lingo_backend", id = %ex.id, "HTTP listening exercise served");
  Ok(Json(ex))
}

// -------- Progress queries --------

#[instrument(level = "info", skip(state), fields(user_id = %user.0))]
pub async fn http_list_progress(
  State(state): State<Arc<AppState>>,
  user: UserId,
) -> impl IntoResponse {
  Json(list_languages(&state, &user.0).await)
}

#[instrument(level = "info", skip(state), fields(user_id = %user.0, %language))]
pub async fn http_get_progress(
  State(state): State<Arc<AppState>>,
  user: UserId,
  Path(language): Path<String>,
) -> ApiResult<crate::ledger::ProgressLedger> {
  Ok(Json(get_progress(&state, &user.0, &language).await?))
}

#[instrument(level = "info", skip(state), fields(user_id = %user.0, %language))]
pub async fn http_get_statistics(
  State(state): State<Arc<AppState>>,
  user: UserId,
  Path(language): Path<String>,
) -> ApiResult<crate::ledger::Statistics> {
  Ok(Json(get_statistics(&state, &user.0, &language).await?))
}

#[instrument(level = "info", skip(state), fields(user_id = %user.0, %language))]
pub async fn http_get_due_words(
  State(state): State<Arc<AppState>>,
  user: UserId,
  Path(language): Path<String>,
) -> ApiResult<DueWordsOut> {
  Ok(Json(due_words(&state, &user.0, &language).await?))
}

#[instrument(level = "info", skip(state), fields(user_id = %user.0))]
pub async fn http_get_learner(
  State(state): State<Arc<AppState>>,
  user: UserId,
) -> impl IntoResponse {
  Json(get_learner(&state, &user.0).await)
}

// -------- Submissions --------

#[instrument(level = "info", skip(state, body), fields(user_id = %user.0, %language, %lesson_id, score = body.score))]
pub async fn http_post_lesson_attempt(
  State(state): State<Arc<AppState>>,
  user: UserId,
  Path((language, lesson_id)): Path<(String, String)>,
  Json(body): Json<LessonAttemptIn>,
) -> ApiResult<SubmissionOut<crate::ledger::LessonOutcome>> {
  let out = submit_lesson(&state, &user.0, &language, &lesson_id, body).await?;
  info!(target: "progress", status = ?out.result.status, xp = out.xp_awarded, "HTTP lesson attempt recorded");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(user_id = %user.0, %language, exercise_id = %body.exercise_id))]
pub async fn http_post_speaking_attempt(
  State(state): State<Arc<AppState>>,
  user: UserId,
  Path(language): Path<String>,
  Json(body): Json<SpeakingAttemptIn>,
) -> ApiResult<SubmissionOut<crate::ledger::AttemptOutcome>> {
  let out = submit_speaking(&state, &user.0, &language, body).await?;
  info!(target: "progress", score = out.result.score, is_new_best = out.result.is_new_best, xp = out.xp_awarded, "HTTP speaking attempt recorded");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(user_id = %user.0, %language, exercise_id = %body.exercise_id))]
pub async fn http_post_listening_attempt(
  State(state): State<Arc<AppState>>,
  user: UserId,
  Path(language): Path<String>,
  Json(body): Json<ListeningAttemptIn>,
) -> ApiResult<SubmissionOut<crate::ledger::AttemptOutcome>> {
  let out = submit_listening(&state, &user.0, &language, body).await?;
  info!(target: "progress", score = out.result.score, is_new_best = out.result.is_new_best, xp = out.xp_awarded, "HTTP listening attempt recorded");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(user_id = %user.0, %language))]
pub async fn http_post_vocabulary_review(
  State(state): State<Arc<AppState>>,
  user: UserId,
  Path(language): Path<String>,
  Json(body): Json<VocabularyReviewIn>,
) -> ApiResult<SubmissionOut<crate::ledger::VocabularyOutcome>> {
  Ok(Json(submit_vocabulary(&state, &user.0, &language, body).await?))
}

#[instrument(level = "info", skip(state, body), fields(user_id = %user.0, %language, %skill))]
pub async fn http_post_skill_progress(
  State(state): State<Arc<AppState>>,
  user: UserId,
  Path((language, skill)): Path<(String, String)>,
  Json(body): Json<SkillProgressIn>,
) -> ApiResult<SkillProgressOut> {
  let skill = Skill::parse(&skill).ok_or_else(|| AppError::validation(format!("unknown skill: {skill}")))?;
  Ok(Json(update_skill_progress(&state, &user.0, &language, skill, body).await?))
}

#[instrument(level = "info", skip(state, body), fields(user_id = %user.0, %language))]
pub async fn http_post_daily_progress(
  State(state): State<Arc<AppState>>,
  user: UserId,
  Path(language): Path<String>,
  Json(body): Json<DailyProgressIn>,
) -> ApiResult<DailyProgressOut> {
  Ok(Json(update_daily_progress(&state, &user.0, &language, body).await?))
}
