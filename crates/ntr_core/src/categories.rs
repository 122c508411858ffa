use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of topics every article is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Movies,
    #[serde(rename = "TV")]
    Tv,
    Gaming,
    Tech,
    Culture,
}

impl Category {
    /// Canonical order. The first entry is the fallback for unknown input.
    pub const ALL: [Category; 5] = [
        Category::Movies,
        Category::Tv,
        Category::Gaming,
        Category::Tech,
        Category::Culture,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Movies => "Movies",
            Category::Tv => "TV",
            Category::Gaming => "Gaming",
            Category::Tech => "Tech",
            Category::Culture => "Culture",
        }
    }

    pub fn slug(self) -> String {
        hyphenate(self.name())
    }

    /// Case-insensitive exact match against the canonical names.
    pub fn from_name(input: &str) -> Option<Category> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(input))
    }

    /// Never fails: anything unrecognised maps to the first canonical category.
    pub fn normalize(input: &str) -> Category {
        Self::from_name(input).unwrap_or(Self::ALL[0])
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// String form of [`Category::normalize`].
pub fn normalize_category(input: &str) -> &'static str {
    Category::normalize(input).name()
}

/// Lower-cases and collapses every whitespace run into a single hyphen.
pub fn hyphenate(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_whitespace = false;
    for c in input.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
        } else {
            out.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }
    out
}

pub fn category_slug(category: &str) -> String {
    hyphenate(category.trim())
}
