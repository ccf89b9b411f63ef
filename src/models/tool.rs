use serde::{Deserialize, Serialize};

/// Subject grouping for catalog entries.
///
/// The set is closed: every category a tool can carry is listed here, so
/// filter and theming code can match exhaustively instead of going through
/// stringly-typed lookup maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Math,
    Science,
    Language,
    Memory,
    Logic,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Math,
        Category::Science,
        Category::Language,
        Category::Memory,
        Category::Logic,
    ];

    /// Parse a category identifier as it appears in URLs and stored data.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "math" => Some(Category::Math),
            "science" => Some(Category::Science),
            "language" => Some(Category::Language),
            "memory" => Some(Category::Memory),
            "logic" => Some(Category::Logic),
            _ => None,
        }
    }

    /// The identifier used in URLs and persisted records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Math => "math",
            Category::Science => "science",
            Category::Language => "language",
            Category::Memory => "memory",
            Category::Logic => "logic",
        }
    }

    /// Section heading shown for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Math => "Math Games",
            Category::Science => "Science Games",
            Category::Language => "Language Games",
            Category::Memory => "Memory Games",
            Category::Logic => "Logic & Puzzles",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category restriction for catalog views. `All` is the identity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse a `?category=` query value. Unknown values return `None`;
    /// callers render those as an empty result set rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Some(CategoryFilter::All);
        }
        Category::parse(s).map(CategoryFilter::Only)
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

/// A single catalog entry. Loaded once at startup and never mutated; the
/// catalog itself is supplied by the surrounding application as a read-only
/// slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub icon: String,
    #[serde(rename = "isPopular", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_popular: bool,
    pub href: String,
}
