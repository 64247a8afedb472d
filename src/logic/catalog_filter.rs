use std::collections::HashSet;

use crate::model::{MorphCategory, MorphId};

/// Compute the subset of the catalog eligible for display in the type-ahead
/// dropdown: morphs whose name contains the query (case-insensitive,
/// unanchored) and whose id is not already selected. Sub-categories and
/// categories left without any matching morph are dropped entirely.
///
/// Pure function of (catalog, selection, query); callers recompute it on
/// every keystroke and every selection change instead of caching.
pub fn filter_catalog(
    catalog: &[MorphCategory],
    selected: &HashSet<MorphId>,
    query: &str,
) -> Vec<MorphCategory> {
    let query = query.to_lowercase();

    let matches = |name: &str| query.is_empty() || name.to_lowercase().contains(&query);

    catalog
        .iter()
        .filter_map(|category| {
            let morphs: Vec<_> = category
                .morphs
                .iter()
                .filter(|m| matches(&m.name) && !selected.contains(&m.id))
                .cloned()
                .collect();

            let sub_categories: Vec<_> = category
                .sub_categories
                .iter()
                .filter_map(|sub| {
                    let sub_morphs: Vec<_> = sub
                        .morphs
                        .iter()
                        .filter(|m| matches(&m.name) && !selected.contains(&m.id))
                        .cloned()
                        .collect();

                    if sub_morphs.is_empty() {
                        return None;
                    }
                    let mut sub = sub.clone();
                    sub.morphs = sub_morphs;
                    Some(sub)
                })
                .collect();

            if morphs.is_empty() && sub_categories.is_empty() {
                return None;
            }
            let mut category = category.clone();
            category.morphs = morphs;
            category.sub_categories = sub_categories;
            Some(category)
        })
        .collect()
}

/// Parse the `selected` query parameter ("1,2,3") into a set of morph ids.
/// Malformed entries are skipped rather than rejected.
pub fn parse_selected_ids(raw: &str) -> HashSet<MorphId> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<MorphId>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Morph, MorphSubCategory};

    fn morph(id: MorphId, name: &str, category_id: MorphId, sub: Option<MorphId>) -> Morph {
        Morph {
            id,
            name: name.to_string(),
            category_id,
            sub_category_id: sub,
            sub_sub_category_id: None,
        }
    }

    fn fixture_catalog() -> Vec<MorphCategory> {
        vec![
            MorphCategory {
                id: 1,
                name: "Dominant".to_string(),
                color: Some("#AA0000".to_string()),
                sort_order: 1,
                morphs: vec![morph(1, "Leopard", 1, None), morph(2, "Lesser", 1, None)],
                sub_categories: vec![MorphSubCategory {
                    id: 10,
                    category_id: 1,
                    name: "Striped".to_string(),
                    color: "#0000AA".to_string(),
                    sort_order: 1,
                    morphs: vec![morph(3, "Pinstripe", 1, Some(10))],
                }],
            },
            MorphCategory {
                id: 2,
                name: "Recessive".to_string(),
                color: None,
                sort_order: 2,
                morphs: vec![morph(4, "Clown", 2, None), morph(5, "Piebald", 2, None)],
                sub_categories: vec![],
            },
        ]
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let catalog = fixture_catalog();
        let result = filter_catalog(&catalog, &HashSet::new(), "");
        assert_eq!(result, catalog);
    }

    #[test]
    fn test_substring_match_is_case_insensitive_and_unanchored() {
        let catalog = fixture_catalog();
        let result = filter_catalog(&catalog, &HashSet::new(), "PIE");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Recessive");
        assert_eq!(result[0].morphs.len(), 1);
        assert_eq!(result[0].morphs[0].name, "Piebald");

        // "strip" matches mid-word in "Pinstripe"
        let result = filter_catalog(&catalog, &HashSet::new(), "strip");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].sub_categories[0].morphs[0].name, "Pinstripe");
    }

    #[test]
    fn test_result_never_contains_selected_morphs() {
        let catalog = fixture_catalog();
        let selected: HashSet<MorphId> = [1, 3, 4].into_iter().collect();
        let result = filter_catalog(&catalog, &selected, "");

        for category in &result {
            for m in &category.morphs {
                assert!(!selected.contains(&m.id));
            }
            for sub in &category.sub_categories {
                for m in &sub.morphs {
                    assert!(!selected.contains(&m.id));
                }
            }
        }
    }

    #[test]
    fn test_no_empty_groups_survive() {
        let catalog = fixture_catalog();

        // Selecting the only sub-category morph drops the sub-category
        let selected: HashSet<MorphId> = [3].into_iter().collect();
        let result = filter_catalog(&catalog, &selected, "");
        assert!(result[0].sub_categories.is_empty());

        // Selecting everything under a category drops the category
        let selected: HashSet<MorphId> = [4, 5].into_iter().collect();
        let result = filter_catalog(&catalog, &selected, "");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Dominant");
    }

    #[test]
    fn test_search_narrows_and_excludes() {
        let catalog = fixture_catalog();

        let result = filter_catalog(&catalog, &HashSet::new(), "le");
        let names: Vec<_> = result[0].morphs.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Leopard", "Lesser"]);

        // After selecting "Leopard", the same query returns only "Lesser"
        let selected: HashSet<MorphId> = [1].into_iter().collect();
        let result = filter_catalog(&catalog, &selected, "le");
        let names: Vec<_> = result[0].morphs.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Lesser"]);
    }

    #[test]
    fn test_ordering_is_preserved() {
        let catalog = fixture_catalog();
        let result = filter_catalog(&catalog, &HashSet::new(), "e");
        let names: Vec<_> = result
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Dominant", "Recessive"]);
        let morph_names: Vec<_> = result[0].morphs.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(morph_names, vec!["Leopard", "Lesser"]);
    }

    #[test]
    fn test_input_catalog_is_untouched() {
        let catalog = fixture_catalog();
        let before = catalog.clone();
        let selected: HashSet<MorphId> = [1, 2, 3, 4, 5].into_iter().collect();
        let _ = filter_catalog(&catalog, &selected, "q");
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_parse_selected_ids_skips_malformed() {
        let ids = parse_selected_ids("1, 2,x,3,");
        assert_eq!(ids, [1, 2, 3].into_iter().collect());
        assert!(parse_selected_ids("").is_empty());
    }
}
