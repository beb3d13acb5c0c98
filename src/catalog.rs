//! Read-only exercise catalog: built-in seeds plus the optional TOML bank.
//!
//! Config entries override seeds with the same id. Lookups are by id;
//! listings and random picks filter by language, difficulty and category.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::info;

use crate::domain::{ListeningExercise, SpeakingExercise};
use crate::seeds::{seed_listening, seed_speaking};

/// Query-string filter; empty fields match everything.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct CatalogFilter {
    pub language: Option<String>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
}

pub trait CatalogEntry {
    fn id(&self) -> &str;
    fn language(&self) -> &str;
    fn difficulty(&self) -> &str;
    fn category(&self) -> &str;
}

impl CatalogEntry for SpeakingExercise {
    fn id(&self) -> &str { &self.id }
    fn language(&self) -> &str { &self.language }
    fn difficulty(&self) -> &str { &self.difficulty }
    fn category(&self) -> &str { &self.category }
}

impl CatalogEntry for ListeningExercise {
    fn id(&self) -> &str { &self.id }
    fn language(&self) -> &str { &self.language }
    fn difficulty(&self) -> &str { &self.difficulty }
    fn category(&self) -> &str { &self.category }
}

impl CatalogFilter {
    pub fn matches<E: CatalogEntry>(&self, e: &E) -> bool {
        fn eq(want: &Option<String>, have: &str) -> bool {
            want.as_deref()
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map_or(true, |w| w.eq_ignore_ascii_case(have))
        }
        eq(&self.language, e.language()) && eq(&self.difficulty, e.difficulty()) && eq(&self.category, e.category())
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    speaking: HashMap<String, SpeakingExercise>,
    listening: HashMap<String, ListeningExercise>,
}

impl Catalog {
    pub fn new(extra_speaking: Vec<SpeakingExercise>, extra_listening: Vec<ListeningExercise>) -> Self {
        let bank_speaking = extra_speaking.len();
        let bank_listening = extra_listening.len();

        let speaking = index(seed_speaking().into_iter().chain(extra_speaking));
        let listening = index(seed_listening().into_iter().chain(extra_listening));

        info!(
            target: "lingo_backend",
            speaking = speaking.len(),
            listening = listening.len(),
            bank_speaking,
            bank_listening,
            "Catalog inventory"
        );
        Self { speaking, listening }
    }

    pub fn speaking(&self, id: &str) -> Option<&SpeakingExercise> {
        self.speaking.get(id)
    }

    pub fn listening(&self, id: &str) -> Option<&ListeningExercise> {
        self.listening.get(id)
    }

    pub fn list_speaking(&self, filter: &CatalogFilter) -> Vec<&SpeakingExercise> {
        list(&self.speaking, filter)
    }

    pub fn list_listening(&self, filter: &CatalogFilter) -> Vec<&ListeningExercise> {
        list(&self.listening, filter)
    }

    pub fn random_speaking(&self, filter: &CatalogFilter) -> Option<&SpeakingExercise> {
        self.list_speaking(filter).choose(&mut rand::thread_rng()).copied()
    }

    pub fn random_listening(&self, filter: &CatalogFilter) -> Option<&ListeningExercise> {
        self.list_listening(filter).choose(&mut rand::thread_rng()).copied()
    }
}

/// Later entries win on duplicate ids.
fn index<E: CatalogEntry>(entries: impl Iterator<Item = E>) -> HashMap<String, E> {
    entries.map(|e| (e.id().to_string(), e)).collect()
}

fn list<'a, E: CatalogEntry>(map: &'a HashMap<String, E>, filter: &CatalogFilter) -> Vec<&'a E> {
    let mut out: Vec<&E> = map.values().filter(|e| filter.matches(*e)).collect();
    out.sort_by(|a, b| a.id().cmp(b.id()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(language: &str) -> CatalogFilter {
        CatalogFilter { language: Some(language.into()), ..Default::default() }
    }

    #[test]
    fn filters_by_language_and_difficulty() {
        let c = Catalog::new(vec![], vec![]);
        let es = c.list_speaking(&filter("es"));
        assert!(es.len() >= 2);
        assert!(es.iter().all(|e| e.language == "es"));

        let advanced = c.list_speaking(&CatalogFilter {
            language: Some("ES".into()),
            difficulty: Some("advanced".into()),
            category: None,
        });
        assert_eq!(advanced.len(), 1);
        assert!(c.random_listening(&filter("xx")).is_none());
        assert!(c.random_listening(&filter("fr")).is_some());
    }

    #[test]
    fn config_entries_override_seeds() {
        let custom = SpeakingExercise {
            id: "es-sp-1".into(),
            language: "es".into(),
            text: "Hola".into(),
            translation: "Hi".into(),
            category: "greetings".into(),
            difficulty: "beginner".into(),
        };
        let c = Catalog::new(vec![custom], vec![]);
        assert_eq!(c.speaking("es-sp-1").unwrap().text, "Hola");
    }
}
