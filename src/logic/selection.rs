use std::collections::HashSet;

use crate::model::{color_or_default, Morph, MorphCategory, MorphId, SelectedMorph, DEFAULT_MORPH_COLOR};

/// Resolve a morph's effective display color against the catalog.
///
/// Precedence is fixed: the owning sub-category's color if the morph belongs
/// to one, else the owning category's color, else the default gray. This is
/// the single source of truth for color resolution; no caller re-implements
/// the walk.
pub fn effective_color(catalog: &[MorphCategory], morph_id: MorphId) -> String {
    for category in catalog {
        if let Some(sub) = category
            .sub_categories
            .iter()
            .find(|sub| sub.morphs.iter().any(|m| m.id == morph_id))
        {
            return color_or_default(Some(&sub.color)).to_string();
        }
        if category.morphs.iter().any(|m| m.id == morph_id) {
            return color_or_default(category.color.as_deref()).to_string();
        }
    }
    DEFAULT_MORPH_COLOR.to_string()
}

/// The in-session, ordered, de-duplicated list of morphs chosen for one
/// product. Owned by a single in-progress form session; discarded when the
/// session ends without submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    entries: Vec<SelectedMorph>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a morph, resolving its effective color against the catalog at
    /// add-time. Adding an id already in the set is a no-op.
    pub fn add(&mut self, catalog: &[MorphCategory], morph: &Morph) {
        if self.contains(morph.id) {
            return;
        }
        let color = effective_color(catalog, morph.id);
        self.entries.push(SelectedMorph {
            id: morph.id,
            name: morph.name.clone(),
            color,
        });
    }

    /// Add every candidate not already present. Duplicates within the batch
    /// produce a single entry.
    pub fn add_multiple<'a, I>(&mut self, catalog: &[MorphCategory], morphs: I)
    where
        I: IntoIterator<Item = &'a Morph>,
    {
        for morph in morphs {
            self.add(catalog, morph);
        }
    }

    /// Remove the entry with the given id. Absent ids are a no-op.
    pub fn remove(&mut self, morph_id: MorphId) {
        self.entries.retain(|entry| entry.id != morph_id);
    }

    pub fn contains(&self, morph_id: MorphId) -> bool {
        self.entries.iter().any(|entry| entry.id == morph_id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[SelectedMorph] {
        &self.entries
    }

    /// The selected ids, for feeding the filter index
    pub fn ids(&self) -> HashSet<MorphId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    /// The selected ids in insertion order, for form submission
    pub fn ordered_ids(&self) -> Vec<MorphId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }
}
