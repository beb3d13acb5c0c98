//! Domain vocabulary shared by the ledger, catalog and HTTP layer:
//! skills, activity kinds, lesson status and exercise metadata snapshots.

use serde::{Deserialize, Serialize};

/// Competency axis tracked by a skill record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
  Listening,
  Speaking,
  Reading,
  Writing,
  Grammar,
  Vocabulary,
}

impl Skill {
  pub fn as_str(&self) -> &'static str {
    match self {
      Skill::Listening => "listening",
      Skill::Speaking => "speaking",
      Skill::Reading => "reading",
      Skill::Writing => "writing",
      Skill::Grammar => "grammar",
      Skill::Vocabulary => "vocabulary",
    }
  }

  pub fn parse(s: &str) -> Option<Skill> {
    match s.trim().to_ascii_lowercase().as_str() {
      "listening" => Some(Skill::Listening),
      "speaking" => Some(Skill::Speaking),
      "reading" => Some(Skill::Reading),
      "writing" => Some(Skill::Writing),
      "grammar" => Some(Skill::Grammar),
      "vocabulary" => Some(Skill::Vocabulary),
      _ => None,
    }
  }
}

impl std::fmt::Display for Skill {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Activity tag carried into the daily/weekly rollups.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
  Lesson,
  Speaking,
  Listening,
  Vocabulary,
}

/// Lifecycle of a lesson record. A low-scoring later attempt can move a
/// completed lesson back to `InProgress`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
  #[default]
  NotStarted,
  InProgress,
  Completed,
  Mastered,
}

impl LessonStatus {
  pub fn is_finished(&self) -> bool {
    matches!(self, LessonStatus::Completed | LessonStatus::Mastered)
  }
}

/// Static metadata of a speaking exercise, snapshotted into the ledger on first attempt.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingExercise {
  pub id: String,
  #[serde(default)] pub language: String,
  pub text: String,
  #[serde(default)] pub translation: String,
  pub category: String,
  pub difficulty: String,
}

/// Static metadata of a listening exercise.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListeningExercise {
  pub id: String,
  #[serde(default)] pub language: String,
  pub title: String,
  pub audio_ref: String,
  pub transcript: String,
  pub category: String,
  pub difficulty: String,
  pub duration_seconds: u32,
  #[serde(default)] pub questions: Vec<ListeningQuestion>,
}

/// Comprehension question bundled with a listening exercise.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListeningQuestion {
  pub id: String,
  pub prompt: String,
  #[serde(default)] pub options: Vec<String>,
  pub answer: String,
}
