use serde::{Deserialize, Serialize};

/// What an expense was spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Tea,
    Breakfast,
    Lunch,
    Dinner,
    /// Anything that doesn't fit a meal, and the fallback when none is given
    #[default]
    Other,
}

impl Category {
    /// All categories in declaration order (the order reports use).
    pub const ALL: [Category; 5] = [
        Category::Tea,
        Category::Breakfast,
        Category::Lunch,
        Category::Dinner,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tea => "Tea",
            Category::Breakfast => "Breakfast",
            Category::Lunch => "Lunch",
            Category::Dinner => "Dinner",
            Category::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tea" => Some(Category::Tea),
            "breakfast" => Some(Category::Breakfast),
            "lunch" => Some(Category::Lunch),
            "dinner" => Some(Category::Dinner),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    /// Comma-separated list of valid names, for error messages.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
