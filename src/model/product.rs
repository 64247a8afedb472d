use crate::model::{generate_id, Id, MorphId, ProductStatus, SelectedMorph, Sex};
use serde::{Deserialize, Serialize};

/// A listed animal. Carries one or more morphs via the product_morphs
/// association table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub farm_id: Id,
    pub name: String,
    pub species: String,
    pub sex: Sex,
    pub price: f64,
    pub description: Option<String>,
    pub image_urls: Vec<String>,
    pub status: ProductStatus,
    pub hatch_date: Option<chrono::NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Input model for creating a new product. `morph_ids` is the submitted
/// Selection Set; the form boundary delivers it as a repeated field, so
/// zero occurrences deserialize as an empty list and are rejected by
/// validation rather than by serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub farm_id: Id,
    pub name: String,
    pub species: String,
    #[serde(default = "default_sex")]
    pub sex: Sex,
    pub price: f64,
    pub description: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub hatch_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub morph_ids: Vec<MorphId>,
}

fn default_sex() -> Sex {
    Sex::Unknown
}

impl NewProduct {
    /// Convert to a full Product with server-generated fields
    pub fn into_product(self) -> Product {
        let now = chrono::Utc::now();
        Product {
            id: generate_id(),
            farm_id: self.farm_id,
            name: self.name,
            species: self.species,
            sex: self.sex,
            price: self.price,
            description: self.description,
            image_urls: self.image_urls,
            status: ProductStatus::Available,
            hatch_date: self.hatch_date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a product. Absent fields are left unchanged; a
/// present `morph_ids` replaces the association set wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub species: Option<String>,
    pub sex: Option<Sex>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_urls: Option<Vec<String>>,
    pub status: Option<ProductStatus>,
    pub hatch_date: Option<chrono::NaiveDate>,
    pub morph_ids: Option<Vec<MorphId>>,
}

impl ProductUpdate {
    /// Apply the scalar fields onto an existing product, bumping updated_at
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(species) = &self.species {
            product.species = species.clone();
        }
        if let Some(sex) = self.sex {
            product.sex = sex;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(description) = &self.description {
            product.description = Some(description.clone());
        }
        if let Some(image_urls) = &self.image_urls {
            product.image_urls = image_urls.clone();
        }
        if let Some(status) = self.status {
            product.status = status;
        }
        if let Some(hatch_date) = self.hatch_date {
            product.hatch_date = Some(hatch_date);
        }
        product.updated_at = chrono::Utc::now();
    }
}

/// Read model: a product joined with its morphs, each annotated with the
/// effective color resolved against the catalog at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithMorphs {
    #[serde(flatten)]
    pub product: Product,
    pub morphs: Vec<SelectedMorph>,
}

/// Storefront listing filter. Free-text search matches anywhere in the
/// product name, case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQueryFilter {
    pub farm_id: Option<Id>,
    pub status: Option<ProductStatus>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub const DEFAULT_PAGE_SIZE: i64 = 24;
pub const MAX_PAGE_SIZE: i64 = 100;

impl ProductQueryFilter {
    /// Effective limit: default 24, capped at 100
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_defaults_and_cap() {
        let filter = ProductQueryFilter::default();
        assert_eq!(filter.effective_limit(), 24);
        assert_eq!(filter.effective_offset(), 0);

        let filter = ProductQueryFilter {
            limit: Some(500),
            offset: Some(-3),
            ..Default::default()
        };
        assert_eq!(filter.effective_limit(), 100);
        assert_eq!(filter.effective_offset(), 0);
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let new = NewProduct {
            farm_id: "farm-1".to_string(),
            name: "Banana Pied".to_string(),
            species: "Ball Python".to_string(),
            sex: Sex::Male,
            price: 450.0,
            description: None,
            image_urls: vec![],
            hatch_date: None,
            morph_ids: vec![1, 2],
        };
        let mut product = new.into_product();

        let update = ProductUpdate {
            price: Some(400.0),
            status: Some(ProductStatus::OnHold),
            ..Default::default()
        };
        update.apply_to(&mut product);

        assert_eq!(product.price, 400.0);
        assert_eq!(product.status, ProductStatus::OnHold);
        assert_eq!(product.name, "Banana Pied");
        assert_eq!(product.sex, Sex::Male);
    }
}
