//! Product categories offered by the studio.

use serde::{Deserialize, Serialize};

/// Error returned when a category name is not part of the catalogue.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0} (expected Kitchen, Wardrobe, Cabinetry or Custom)")]
pub struct ParseCategoryError(pub String);

/// The fixed set of catalogue categories.
///
/// Serialized exactly as the API spells them (`"Kitchen"`, `"Wardrobe"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    Kitchen,
    Wardrobe,
    Cabinetry,
    Custom,
}

impl Category {
    /// All categories in catalogue order.
    pub const ALL: [Self; 4] = [Self::Kitchen, Self::Wardrobe, Self::Cabinetry, Self::Custom];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kitchen => "Kitchen",
            Self::Wardrobe => "Wardrobe",
            Self::Cabinetry => "Cabinetry",
            Self::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ParseCategoryError;

    /// Case-insensitive, so CLI users can type `kitchen`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseCategoryError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_format() {
        assert_eq!(serde_json::to_string(&Category::Cabinetry).unwrap(), "\"Cabinetry\"");
        let list: Vec<Category> =
            serde_json::from_str(r#"["Kitchen","Wardrobe","Cabinetry","Custom"]"#).unwrap();
        assert_eq!(list, Category::ALL);
    }

    #[test]
    fn test_category_from_str_ignores_case() {
        assert_eq!("wardrobe".parse::<Category>().unwrap(), Category::Wardrobe);
        assert!("Bathroom".parse::<Category>().is_err());
    }
}
