use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{create_test_app, send};

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;
    let (status, body) = send(&app, "GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_progress_requires_identity() {
    let app = create_test_app().await;
    let (status, body) = send(&app, "GET", "/api/v1/progress/es", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_missing_ledger_returns_zeroed_statistics() {
    let app = create_test_app().await;
    let (status, body) = send(&app, "GET", "/api/v1/progress/fr/statistics", Some("ana"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalLessonsCompleted"], 0);
    assert_eq!(body["averageScore"], 0);
}

#[tokio::test]
async fn test_lesson_attempts_progress_to_mastered() {
    let app = create_test_app().await;
    let uri = "/api/v1/progress/es/lessons/lesson-1/attempts";

    let (status, first) = send(&app, "POST", uri, Some("ana"), Some(json!({ "score": 95, "timeSpentMinutes": 10 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], "completed");
    assert_eq!(first["isNewBest"], true);
    assert_eq!(first["bestScore"], 95);

    let (status, second) = send(&app, "POST", uri, Some("ana"), Some(json!({ "score": 92, "timeSpentMinutes": 7 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["status"], "mastered");
    assert_eq!(second["isNewBest"], false);
    assert_eq!(second["bestScore"], 95);
    assert_eq!(second["statistics"]["totalLessonsCompleted"], 1);
    assert_eq!(second["statistics"]["totalTimeSpentMinutes"], 17);
    assert_eq!(second["weeklyGoals"]["currentLessons"], 2);

    let (_, learner) = send(&app, "GET", "/api/v1/learner", Some("ana"), None).await;
    assert_eq!(learner["currentStreak"], 1);
    assert!(learner["totalXp"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_speaking_attempt_completes_exercise() {
    let app = create_test_app().await;
    let body = json!({
        "exerciseId": "es-sp-1",
        "pronunciationScore": 90,
        "fluencyScore": 80,
        "accuracyScore": 70,
        "recordingDurationSeconds": 4
    });
    let (status, out) = send(&app, "POST", "/api/v1/progress/es/speaking/attempts", Some("ben"), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["score"], 80);
    assert_eq!(out["isCompleted"], true);
    assert_eq!(out["skill"]["skill"], "speaking");
    assert_eq!(out["statistics"]["speakingCompleted"], 1);

    let (_, ledger) = send(&app, "GET", "/api/v1/progress/es", Some("ben"), None).await;
    assert_eq!(ledger["speakingRecords"]["es-sp-1"]["totalAttempts"], 1);
    assert_eq!(ledger["speakingRecords"]["es-sp-1"]["exercise"]["category"], "greetings");
}

#[tokio::test]
async fn test_listening_low_score_stays_incomplete() {
    let app = create_test_app().await;
    let body = json!({
        "exerciseId": "es-li-1",
        "comprehensionScore": 55,
        "questionsAnswered": 1,
        "correctAnswers": 0,
        "timeSpentSeconds": 40,
        "completionRate": 1.0,
        "answers": [{ "questionId": "q1", "answer": "Un euro", "isCorrect": false }]
    });
    let (status, out) = send(&app, "POST", "/api/v1/progress/es/listening/attempts", Some("cai"), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["score"], 55);
    assert_eq!(out["bestScore"], 55);
    assert_eq!(out["isCompleted"], false);
}

#[tokio::test]
async fn test_invalid_payloads_are_rejected() {
    let app = create_test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/progress/es/lessons/l1/attempts",
        Some("dan"),
        Some(json!({ "score": 140 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/progress/es/speaking/attempts",
        Some("dan"),
        Some(json!({ "exerciseId": "missing", "pronunciationScore": 1, "fluencyScore": 1, "accuracyScore": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/progress/es/skills/cooking",
        Some("dan"),
        Some(json!({ "xpDelta": 10, "accuracy": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_skill_endpoint_levels_up() {
    let app = create_test_app().await;
    let uri = "/api/v1/progress/de/skills/grammar";
    for xp in [100, 150] {
        let (_, out) = send(&app, "POST", uri, Some("eva"), Some(json!({ "xpDelta": xp, "accuracy": 80 }))).await;
        assert_eq!(out["leveledUp"], false);
    }
    let (status, out) = send(&app, "POST", uri, Some("eva"), Some(json!({ "xpDelta": 260, "accuracy": 80 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["leveledUp"], true);
    assert_eq!(out["level"], 1);
    assert_eq!(out["xp"], 510);
}

#[tokio::test]
async fn test_daily_progress_and_language_listing() {
    let app = create_test_app().await;
    let (status, out) = send(
        &app,
        "POST",
        "/api/v1/progress/it/daily",
        Some("fay"),
        Some(json!({ "xp": 40, "activityType": "lesson", "timeSpentMinutes": 15 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["xpEarnedToday"], 40);
    assert_eq!(out["weeklyGoals"]["currentXp"], 40);
    assert_eq!(out["weeklyGoalMet"], false);

    let (_, list) = send(&app, "GET", "/api/v1/progress", Some("fay"), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["language"], "it");
}

#[tokio::test]
async fn test_vocabulary_reviews_and_due_words() {
    let app = create_test_app().await;
    let uri = "/api/v1/progress/es/vocabulary/reviews";
    let (status, out) = send(&app, "POST", uri, Some("gus"), Some(json!({ "word": "gato", "correct": false }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["strength"], 0);
    assert_eq!(out["xpAwarded"], 0);

    let (_, due) = send(&app, "GET", "/api/v1/progress/es/vocabulary/due", Some("gus"), None).await;
    assert_eq!(due["words"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_catalog_filters() {
    let app = create_test_app().await;
    let (status, list) = send(&app, "GET", "/api/v1/catalog/listening?language=fr", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().iter().all(|e| e["language"] == "fr"));

    let (status, _) = send(&app, "GET", "/api/v1/catalog/speaking/random?language=xx", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
