//! Built-in exercise content so the app is usable without a config bank.

use crate::domain::{ListeningExercise, ListeningQuestion, SpeakingExercise};

fn speaking(id: &str, language: &str, text: &str, translation: &str, category: &str, difficulty: &str) -> SpeakingExercise {
  SpeakingExercise {
    id: id.into(),
    language: language.into(),
    text: text.into(),
    translation: translation.into(),
    category: category.into(),
    difficulty: difficulty.into(),
  }
}

pub fn seed_speaking() -> Vec<SpeakingExercise> {
  vec![
    speaking("es-sp-1", "es", "Buenos días, ¿cómo estás?", "Good morning, how are you?", "greetings", "beginner"),
    speaking("es-sp-2", "es", "Me gustaría una mesa para dos.", "I would like a table for two.", "food", "beginner"),
    speaking("es-sp-3", "es", "Si hubiera sabido, habría venido antes.", "Had I known, I would have come earlier.", "grammar", "advanced"),
    speaking("fr-sp-1", "fr", "Bonjour, je m'appelle Marie.", "Hello, my name is Marie.", "greetings", "beginner"),
    speaking("fr-sp-2", "fr", "Pourriez-vous répéter, s'il vous plaît ?", "Could you repeat, please?", "travel", "intermediate"),
    speaking("zh-sp-1", "zh", "今天天气很好", "The weather is great today.", "daily", "beginner"),
    speaking("zh-sp-2", "zh", "我想喝咖啡", "I want to drink coffee.", "food", "beginner"),
  ]
}

pub fn seed_listening() -> Vec<ListeningExercise> {
  vec![
    ListeningExercise {
      id: "es-li-1".into(),
      language: "es".into(),
      title: "En el mercado".into(),
      audio_ref: "audio/es/mercado.mp3".into(),
      transcript: "¿Cuánto cuestan las manzanas? Dos euros el kilo.".into(),
      category: "shopping".into(),
      difficulty: "beginner".into(),
      duration_seconds: 35,
      questions: vec![ListeningQuestion {
        id: "q1".into(),
        prompt: "¿Cuánto cuesta un kilo de manzanas?".into(),
        options: vec!["Un euro".into(), "Dos euros".into(), "Tres euros".into()],
        answer: "Dos euros".into(),
      }],
    },
    ListeningExercise {
      id: "fr-li-1".into(),
      language: "fr".into(),
      title: "À la gare".into(),
      audio_ref: "audio/fr/gare.mp3".into(),
      transcript: "Le train pour Lyon part à dix heures.".into(),
      category: "travel".into(),
      difficulty: "beginner".into(),
      duration_seconds: 28,
      questions: vec![ListeningQuestion {
        id: "q1".into(),
        prompt: "À quelle heure part le train ?".into(),
        options: vec!["Neuf heures".into(), "Dix heures".into()],
        answer: "Dix heures".into(),
      }],
    },
    ListeningExercise {
      id: "zh-li-1".into(),
      language: "zh".into(),
      title: "他是老师".into(),
      audio_ref: "audio/zh/laoshi.mp3".into(),
      transcript: "他是老师。他在北京工作。".into(),
      category: "daily".into(),
      difficulty: "beginner".into(),
      duration_seconds: 20,
      questions: vec![],
    },
  ]
}
