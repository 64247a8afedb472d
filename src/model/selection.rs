use crate::model::MorphId;
use serde::{Deserialize, Serialize};

/// A morph annotated with the effective display color resolved at the time
/// it was selected. Colors are captured at add-time and not recomputed if
/// the catalog changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedMorph {
    pub id: MorphId,
    pub name: String,
    pub color: String,
}
