use itertools::Itertools;
use thiserror::Error;

use crate::model::{MorphId, NewProduct};

/// Validation failures surfaced to the submitting form. These are recovered
/// locally by the caller and never reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at least one morph is required")]
    EmptyMorphSet,
    #[error("product name must not be empty")]
    EmptyName,
    #[error("species must not be empty")]
    EmptySpecies,
    #[error("price must not be negative")]
    NegativePrice,
}

/// Normalize a submitted morph-id list for persistence: de-duplicate
/// preserving first-occurrence order, and reject an empty result before any
/// store call happens.
pub fn prepare_morph_ids(morph_ids: &[MorphId]) -> Result<Vec<MorphId>, ValidationError> {
    let ids: Vec<MorphId> = morph_ids.iter().copied().unique().collect();
    if ids.is_empty() {
        return Err(ValidationError::EmptyMorphSet);
    }
    Ok(ids)
}

/// Validate a product creation payload. The morph list is checked here so
/// an invalid submission performs no writes at all.
pub fn validate_new_product(product: &NewProduct) -> Result<(), ValidationError> {
    if product.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if product.species.trim().is_empty() {
        return Err(ValidationError::EmptySpecies);
    }
    if product.price < 0.0 {
        return Err(ValidationError::NegativePrice);
    }
    prepare_morph_ids(&product.morph_ids)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sex;

    fn valid_product() -> NewProduct {
        NewProduct {
            farm_id: "farm-1".to_string(),
            name: "Banana Pied".to_string(),
            species: "Ball Python".to_string(),
            sex: Sex::Male,
            price: 450.0,
            description: None,
            image_urls: vec![],
            hatch_date: None,
            morph_ids: vec![7, 8],
        }
    }

    #[test]
    fn test_empty_morph_list_is_rejected() {
        assert_eq!(prepare_morph_ids(&[]), Err(ValidationError::EmptyMorphSet));
    }

    #[test]
    fn test_duplicates_collapse_preserving_order() {
        assert_eq!(prepare_morph_ids(&[3, 1, 3, 2, 1]).unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(validate_new_product(&valid_product()).is_ok());
    }

    #[test]
    fn test_each_rejection_has_distinct_message() {
        let mut p = valid_product();
        p.name = "  ".to_string();
        assert_eq!(validate_new_product(&p), Err(ValidationError::EmptyName));

        let mut p = valid_product();
        p.species = "".to_string();
        assert_eq!(validate_new_product(&p), Err(ValidationError::EmptySpecies));

        let mut p = valid_product();
        p.price = -1.0;
        assert_eq!(validate_new_product(&p), Err(ValidationError::NegativePrice));

        let mut p = valid_product();
        p.morph_ids = vec![];
        assert_eq!(validate_new_product(&p), Err(ValidationError::EmptyMorphSet));

        let messages: Vec<String> = [
            ValidationError::EmptyMorphSet,
            ValidationError::EmptyName,
            ValidationError::EmptySpecies,
            ValidationError::NegativePrice,
        ]
        .iter()
        .map(|e| e.to_string())
        .collect();
        let unique: std::collections::HashSet<_> = messages.iter().collect();
        assert_eq!(unique.len(), messages.len());
    }
}
