use std::{collections::HashSet, fmt, str::FromStr};

use anyhow::{bail, Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Selection;

const PATTERNS_JSON: &str = include_str!("../data/patterns.json");

pub const CATEGORIES: [&str; 7] = [
    "Women's Dresses",
    "Women's Tops",
    "Women's Outerwear",
    "Men's Shirts",
    "Men's Pants",
    "Kids' Casual",
    "Baby Wear",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl FromStr for Difficulty {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => bail!("unknown difficulty '{s}' (expected beginner, intermediate or advanced)"),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub name: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub designer: String,
    pub rating: f32,
    pub downloads: u32,
    pub likes: u32,
    pub price: u32,
    pub tags: Vec<String>,
    pub description: String,
    pub sizes: Vec<String>,
    pub formats: Vec<String>,
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} [{} / {}] ${} ★{:.1} ({})",
            self.name,
            self.designer,
            self.category,
            self.difficulty,
            self.price,
            self.rating,
            self.tags.iter().join(", ")
        )
    }
}

#[derive(Debug, Clone)]
pub enum PatternAction {
    SelectCategory(Selection<String>),
    SelectDifficulty(Selection<Difficulty>),
    ToggleLike(String),
}

#[derive(Debug, Clone)]
pub struct PatternLibrary {
    patterns: Vec<Pattern>,
    category: Selection<String>,
    difficulty: Selection<Difficulty>,
    liked: HashSet<String>,
}

impl PatternLibrary {
    pub fn load() -> Result<Self> {
        Self::from_json(PATTERNS_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let patterns: Vec<Pattern> =
            serde_json::from_str(json).context("failed to parse pattern catalog")?;
        Ok(Self {
            patterns,
            category: Selection::All,
            difficulty: Selection::All,
            liked: HashSet::new(),
        })
    }

    pub fn apply(&mut self, action: PatternAction) -> Result<()> {
        match action {
            PatternAction::SelectCategory(category) => {
                if let Selection::Only(name) = &category {
                    if !CATEGORIES.contains(&name.as_str()) {
                        bail!("unknown pattern category '{name}'");
                    }
                }
                self.category = category;
            }
            PatternAction::SelectDifficulty(difficulty) => self.difficulty = difficulty,
            PatternAction::ToggleLike(id) => {
                if !self.patterns.iter().any(|x| x.id == id) {
                    bail!("unknown pattern id '{id}'");
                }
                if !self.liked.remove(&id) {
                    self.liked.insert(id);
                }
            }
        }
        debug!(
            "Pattern filter: category = {}, difficulty = {}",
            self.category, self.difficulty
        );
        Ok(())
    }

    pub fn visible(&self) -> impl Iterator<Item = &Pattern> + '_ {
        self.patterns.iter().filter(|pattern| {
            self.category.matches(&pattern.category) && self.difficulty.matches(&pattern.difficulty)
        })
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.contains(id)
    }

    pub fn category(&self) -> &Selection<String> {
        &self.category
    }

    pub fn difficulty(&self) -> &Selection<Difficulty> {
        &self.difficulty
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn visible_ids(library: &PatternLibrary) -> Vec<&str> {
        library.visible().map(|x| x.id.as_str()).collect()
    }

    #[test]
    fn can_load_embedded_catalog() {
        let library = PatternLibrary::load().unwrap();

        assert_eq!(4, library.patterns().len());
        assert!(library
            .patterns()
            .iter()
            .all(|x| CATEGORIES.contains(&x.category.as_str())));
        assert_eq!(vec!["1", "2", "3", "4"], visible_ids(&library));
    }

    #[test]
    fn can_filter_by_category() {
        let mut library = PatternLibrary::load().unwrap();
        library
            .apply(PatternAction::SelectCategory(Selection::Only(
                "Men's Shirts".to_string(),
            )))
            .unwrap();

        assert_eq!(vec!["3"], visible_ids(&library));
    }

    #[test]
    fn can_combine_filters() {
        let mut library = PatternLibrary::load().unwrap();
        library
            .apply(PatternAction::SelectDifficulty(Selection::Only(
                Difficulty::Beginner,
            )))
            .unwrap();
        assert_eq!(vec!["1", "4"], visible_ids(&library));

        library
            .apply(PatternAction::SelectCategory("Kids' Casual".parse().unwrap()))
            .unwrap();
        assert_eq!(vec!["4"], visible_ids(&library));

        library
            .apply(PatternAction::SelectCategory("Baby Wear".parse().unwrap()))
            .unwrap();
        assert!(visible_ids(&library).is_empty());

        library
            .apply(PatternAction::SelectDifficulty(Selection::All))
            .unwrap();
        library
            .apply(PatternAction::SelectCategory(Selection::All))
            .unwrap();
        assert_eq!(4, library.visible().count());
    }

    #[test]
    fn can_reject_unknown_category() {
        let mut library = PatternLibrary::load().unwrap();
        let result = library.apply(PatternAction::SelectCategory(Selection::Only(
            "Hats".to_string(),
        )));

        assert!(result.is_err());
        assert_eq!(&Selection::All, library.category());
    }

    #[test]
    fn can_toggle_like() {
        let mut library = PatternLibrary::load().unwrap();

        library
            .apply(PatternAction::ToggleLike("2".to_string()))
            .unwrap();
        assert!(library.is_liked("2"));

        library
            .apply(PatternAction::ToggleLike("2".to_string()))
            .unwrap();
        assert!(!library.is_liked("2"));

        assert!(library
            .apply(PatternAction::ToggleLike("99".to_string()))
            .is_err());
    }

    #[test]
    fn can_parse_difficulty() {
        assert_eq!(Difficulty::Advanced, "ADVANCED".parse().unwrap());
        assert_eq!(
            Selection::Only(Difficulty::Beginner),
            "beginner".parse::<Selection<Difficulty>>().unwrap()
        );
        assert!("expert".parse::<Difficulty>().is_err());
    }
}
