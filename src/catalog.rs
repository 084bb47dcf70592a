//! The things that can show up in the crowd, and the things the director can ask for.
//!
//! The actual art lives with whoever renders the game; the core only ever deals in [`SpriteType`] names. The
//! [`Catalog::standard`] set matches the stock art pack, but a config file can replace it wholesale.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The name of one piece of audience art, e.g. `man4` or `cp2`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteType(String);

impl SpriteType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The art shown while a couple is on the big screen and reacting to it.
    pub fn reaction(&self) -> SpriteType {
        SpriteType(format!("{}_react", self.0))
    }
}

impl fmt::Display for SpriteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpriteType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Which list a [`SpriteType`] came from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Solo,
    Couple,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Solo => f.write_str("solo"),
            Category::Couple => f.write_str("couple"),
        }
    }
}

/// A single request from the director: get one of these fans into the middle of the shot.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub valid_types: BTreeSet<SpriteType>,
    #[serde(default)]
    pub is_couple: bool,
}

impl Task {
    /// Whether a fan wearing this sprite satisfies the task.
    pub fn accepts(&self, sprite: &SpriteType) -> bool {
        self.valid_types.contains(sprite)
    }
}

/// Every sprite the crowd can be built from, plus the pool of tasks drawn against them.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Catalog {
    pub solo: Vec<SpriteType>,
    pub couples: Vec<SpriteType>,
    pub tasks: Vec<Task>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

lazy_static::lazy_static! {
    static ref STANDARD: Catalog = {
        fn sprites(names: &[&str]) -> Vec<SpriteType> {
            names.iter().map(|&n| SpriteType::new(n)).collect()
        }
        fn task(id: u32, name: &str, description: &str, valid: &[&str]) -> Task {
            Task {
                id,
                name: name.into(),
                description: description.into(),
                valid_types: valid.iter().map(|&n| SpriteType::new(n)).collect(),
                is_couple: false,
            }
        }

        let mut love = task(3, "Show some love!", "Get a sweet couple into the middle of the shot", &["cp1", "cp2", "cp3"]);
        love.is_couple = true;

        Catalog {
            solo: sprites(&[
                "man1", "man2", "man3", "man4", "man5", "man6", "man7", "man8", "man9", "man10", "man11",
            ]),
            couples: sprites(&["cp1", "cp2", "cp3"]),
            tasks: vec![
                task(1, "Hands in the air!", "Get a cheering fan into the middle of the shot", &["man4", "man6", "man10"]),
                task(2, "Brooding is a look!", "Get a distracted fan into the middle of the shot", &["man3", "man5", "man7", "man9", "man11"]),
                love,
                task(4, "Nine-to-five, still alive!", "Get an office worker into the middle of the shot", &["man1"]),
                task(5, "Hey, over here!", "Get a woman into the middle of the shot", &["man2", "man3", "man5", "man6", "man7", "man9", "man11"]),
                task(6, "Bring on the heartthrobs!", "Get a man into the middle of the shot", &["man1", "man4", "man8", "man10"]),
                task(7, "Sun-kissed!", "Get a fan with a deep tan into the middle of the shot", &["man5", "man8", "man11"]),
                task(8, "Short hair, don't care!", "Get a short-haired woman into the middle of the shot", &["man3", "man6", "man7", "man11"]),
                task(9, "Angels in white?", "Get a fan dressed in white into the middle of the shot", &["man2", "man3", "man4", "man8"]),
                task(10, "Left hand up!", "Get the fan raising their left hand into the middle of the shot", &["man8"]),
                task(11, "Right hand up!", "Get a fan raising their right hand into the middle of the shot", &["man1", "man2"]),
            ],
        }
    };
}

impl Catalog {
    /// The stock art pack: eleven solo fans, three couples, eleven tasks.
    pub fn standard() -> Self {
        STANDARD.clone()
    }

    /// Which list, if any, the sprite belongs to.
    pub fn category_of(&self, sprite: &SpriteType) -> Option<Category> {
        if self.solo.contains(sprite) {
            Some(Category::Solo)
        } else if self.couples.contains(sprite) {
            Some(Category::Couple)
        } else {
            None
        }
    }

    /// Ensure the task pool is usable: non-empty, and only asking for sprites that exist.
    pub fn validate(&self) -> Result<()> {
        if self.tasks.is_empty() {
            return Err(Error::EmptyTaskPool);
        }
        for task in &self.tasks {
            if let Some(bad) = task.valid_types.iter().find(|s| self.category_of(s).is_none()) {
                return Err(Error::UnknownSprite {
                    task: task.id,
                    sprite: bad.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod catalog_test {
    use super::*;

    #[test]
    fn standard_catalog_validates() {
        let cat = Catalog::standard();
        cat.validate().expect("stock catalog should be valid");
        assert_eq!(cat.solo.len(), 11);
        assert_eq!(cat.couples.len(), 3);
        assert_eq!(cat.tasks.len(), 11);
    }

    #[test]
    fn only_the_couple_task_is_a_couple_task() {
        let cat = Catalog::standard();
        let couple_tasks: Vec<_> = cat.tasks.iter().filter(|t| t.is_couple).map(|t| t.id).collect();
        assert_eq!(couple_tasks, vec![3]);
    }

    #[test]
    fn empty_pool_rejected() {
        let mut cat = Catalog::standard();
        cat.tasks.clear();
        assert!(matches!(cat.validate(), Err(Error::EmptyTaskPool)));
    }

    #[test]
    fn unknown_sprite_rejected() {
        let mut cat = Catalog::standard();
        cat.tasks[0].valid_types.insert("ghost".into());
        match cat.validate() {
            Err(Error::UnknownSprite { task, sprite }) => {
                assert_eq!(task, cat.tasks[0].id);
                assert_eq!(sprite, "ghost");
            }
            other => panic!("expected UnknownSprite, got {:?}", other),
        }
    }

    #[test]
    fn reaction_variant_named_after_original() {
        assert_eq!(SpriteType::new("cp2").reaction().as_str(), "cp2_react");
    }

    #[test]
    fn categories_resolve() {
        let cat = Catalog::standard();
        assert_eq!(cat.category_of(&"man7".into()), Some(Category::Solo));
        assert_eq!(cat.category_of(&"cp1".into()), Some(Category::Couple));
        assert_eq!(cat.category_of(&"cp1_react".into()), None);
    }
}
