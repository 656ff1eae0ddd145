use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

/// Subjects offered in the genre picker and as featured rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Fiction,
    Romance,
    Fantasy,
    Mystery,
    Thriller,
    ScienceFiction,
    SelfHelp,
    Biography,
    History,
    Cooking,
    Children,
}

impl Genre {
    pub const ALL: [Genre; 11] = [
        Genre::Fiction,
        Genre::Romance,
        Genre::Fantasy,
        Genre::Mystery,
        Genre::Thriller,
        Genre::ScienceFiction,
        Genre::SelfHelp,
        Genre::Biography,
        Genre::History,
        Genre::Cooking,
        Genre::Children,
    ];

    /// Catalog subject slug, as used in `/subjects/{slug}.json`.
    pub fn slug(&self) -> &'static str {
        match self {
            Genre::Fiction => "fiction",
            Genre::Romance => "romance",
            Genre::Fantasy => "fantasy",
            Genre::Mystery => "mystery",
            Genre::Thriller => "thriller",
            Genre::ScienceFiction => "science_fiction",
            Genre::SelfHelp => "self_help",
            Genre::Biography => "biography",
            Genre::History => "history",
            Genre::Cooking => "cooking",
            Genre::Children => "children",
        }
    }

    /// Row heading: underscores become spaces, every word capitalised.
    pub fn label(&self) -> String {
        self.slug()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Genre {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace(|c: char| c == '-' || c == ' ', "_");
        Genre::ALL
            .into_iter()
            .find(|genre| genre.slug() == normalized)
            .ok_or_else(|| anyhow!("unknown genre '{value}'"))
    }
}
