use crate::model::MorphId;
use serde::{Deserialize, Serialize};

/// A single genetic trait, the leaf of the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Morph {
    pub id: MorphId,
    pub name: String,
    pub category_id: MorphId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category_id: Option<MorphId>,
    /// Fourth taxonomy level. Present in storage but never populated or
    /// consumed by filtering, selection, or color resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_sub_category_id: Option<MorphId>,
}

/// Second-level trait group. Belongs to exactly one category and carries a
/// required display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphSubCategory {
    pub id: MorphId,
    pub category_id: MorphId,
    pub name: String,
    pub color: String,
    pub sort_order: i64,
    #[serde(default)]
    pub morphs: Vec<Morph>,
}

/// Top-level trait group. Created and removed only via administrative
/// seeding; immutable from the application's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphCategory {
    pub id: MorphId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub sort_order: i64,
    /// Morphs attached directly to the category (no sub-category)
    #[serde(default)]
    pub morphs: Vec<Morph>,
    #[serde(default)]
    pub sub_categories: Vec<MorphSubCategory>,
}
