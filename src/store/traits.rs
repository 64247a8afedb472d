use crate::model::{Farm, Id, Morph, MorphCategory, MorphId, Product, ProductQueryFilter};
use anyhow::Result;

/// Read access to the morph taxonomy. The catalog is reference data: loaded
/// wholesale, never paginated, mutated only by administrative seeding.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch the full three-level taxonomy as one nested structure, each
    /// category populated with its direct morphs and its sub-categories
    /// (each populated with their morphs), in stored sort order.
    async fn fetch_structured_morphs(&self) -> Result<Vec<MorphCategory>>;
}

#[async_trait::async_trait]
pub trait FarmStore: Send + Sync {
    async fn get_farm(&self, id: &Id) -> Result<Option<Farm>>;
    async fn list_farms(&self) -> Result<Vec<Farm>>;
    async fn upsert_farm(&self, farm: Farm) -> Result<()>;
    async fn delete_farm(&self, id: &Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    async fn get_product(&self, id: &Id) -> Result<Option<Product>>;
    async fn list_products(&self, filter: &ProductQueryFilter) -> Result<Vec<Product>>;
    async fn upsert_product(&self, product: Product) -> Result<()>;
    async fn delete_product(&self, id: &Id) -> Result<bool>;
}

/// The persisted product–morph association. For a given product the stored
/// set is always fully consistent with the last-submitted selection.
#[async_trait::async_trait]
pub trait ProductMorphStore: Send + Sync {
    /// Replace the entire association set for a product: delete every
    /// existing row, then insert one row per id, inside one transaction.
    /// Callers must have validated and de-duplicated `morph_ids` first.
    async fn replace_product_morphs(&self, product_id: &Id, morph_ids: &[MorphId]) -> Result<()>;

    /// The product's morphs in association insertion order
    async fn list_product_morphs(&self, product_id: &Id) -> Result<Vec<Morph>>;
}

pub trait Store:
    CatalogStore + FarmStore + ProductStore + ProductMorphStore + Send + Sync
{
}
