use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-generated identifier for farms and products
pub type Id = String;

/// Database identifier for taxonomy rows (categories, sub-categories, morphs)
pub type MorphId = i64;

/// Fallback display color when no category/sub-category color resolves
pub const DEFAULT_MORPH_COLOR: &str = "#9CA3AF";

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}

/// Check that a stored color is a well-formed "#RRGGBB" hex string.
/// Colors flow from storage unvalidated, so consumers must not trust them.
pub fn is_well_formed_color(color: &str) -> bool {
    let bytes = color.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(|b| b.is_ascii_hexdigit())
}

/// Resolve an optional stored color to a displayable one, falling back to
/// the default gray when missing or malformed.
pub fn color_or_default(color: Option<&str>) -> &str {
    match color {
        Some(c) if is_well_formed_color(c) => c,
        _ => DEFAULT_MORPH_COLOR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "male" => Sex::Male,
            "female" => Sex::Female,
            _ => Sex::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Available,
    OnHold,
    Sold,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Available => "available",
            ProductStatus::OnHold => "on_hold",
            ProductStatus::Sold => "sold",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "on_hold" => ProductStatus::OnHold,
            "sold" => ProductStatus::Sold,
            _ => ProductStatus::Available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_colors() {
        assert!(is_well_formed_color("#9CA3AF"));
        assert!(is_well_formed_color("#aa0000"));
        assert!(!is_well_formed_color("9CA3AF"));
        assert!(!is_well_formed_color("#9CA3A"));
        assert!(!is_well_formed_color("#9CA3AFF"));
        assert!(!is_well_formed_color("#GGGGGG"));
        assert!(!is_well_formed_color(""));
    }

    #[test]
    fn test_color_or_default_falls_back() {
        assert_eq!(color_or_default(Some("#AA0000")), "#AA0000");
        assert_eq!(color_or_default(Some("red")), DEFAULT_MORPH_COLOR);
        assert_eq!(color_or_default(None), DEFAULT_MORPH_COLOR);
    }
}
