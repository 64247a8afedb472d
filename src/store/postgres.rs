use anyhow::{Context, Result};
use sqlx::postgres::PgRow;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};

use crate::model::{
    Farm, Id, Morph, MorphCategory, MorphId, MorphSubCategory, Product, ProductQueryFilter,
    ProductStatus, Sex,
};
use crate::store::traits::{CatalogStore, FarmStore, ProductMorphStore, ProductStore, Store};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Seed helper: upsert a taxonomy category with a fixed id
    pub async fn upsert_morph_category(
        &self,
        id: MorphId,
        name: &str,
        color: Option<&str>,
        sort_order: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO morph_categories (id, name, color, sort_order)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                color = EXCLUDED.color,
                sort_order = EXCLUDED.sort_order
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(color)
        .bind(sort_order)
        .execute(&self.pool)
        .await
        .context("Failed to upsert morph category")?;

        Ok(())
    }

    /// Seed helper: upsert a taxonomy sub-category with a fixed id
    pub async fn upsert_morph_sub_category(
        &self,
        id: MorphId,
        category_id: MorphId,
        name: &str,
        color: &str,
        sort_order: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO morph_sub_categories (id, category_id, name, color, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                category_id = EXCLUDED.category_id,
                name = EXCLUDED.name,
                color = EXCLUDED.color,
                sort_order = EXCLUDED.sort_order
            "#,
        )
        .bind(id)
        .bind(category_id)
        .bind(name)
        .bind(color)
        .bind(sort_order)
        .execute(&self.pool)
        .await
        .context("Failed to upsert morph sub-category")?;

        Ok(())
    }

    /// Seed helper: upsert a morph with a fixed id
    pub async fn upsert_morph(
        &self,
        id: MorphId,
        name: &str,
        category_id: MorphId,
        sub_category_id: Option<MorphId>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO morphs (id, name, category_id, sub_category_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                category_id = EXCLUDED.category_id,
                sub_category_id = EXCLUDED.sub_category_id
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category_id)
        .bind(sub_category_id)
        .execute(&self.pool)
        .await
        .context("Failed to upsert morph")?;

        Ok(())
    }
}

fn farm_from_row(row: &PgRow) -> Farm {
    Farm {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        location: row.get("location"),
        logo_url: row.get("logo_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn product_from_row(row: &PgRow) -> Product {
    let sex: String = row.get("sex");
    let status: String = row.get("status");

    Product {
        id: row.get("id"),
        farm_id: row.get("farm_id"),
        name: row.get("name"),
        species: row.get("species"),
        sex: Sex::parse(&sex),
        price: row.get("price"),
        description: row.get("description"),
        image_urls: row.get("image_urls"),
        status: ProductStatus::parse(&status),
        hatch_date: row.get("hatch_date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn morph_from_row(row: &PgRow) -> Morph {
    Morph {
        id: row.get("id"),
        name: row.get("name"),
        category_id: row.get("category_id"),
        sub_category_id: row.get("sub_category_id"),
        sub_sub_category_id: row.get("sub_sub_category_id"),
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresStore {
    async fn fetch_structured_morphs(&self) -> Result<Vec<MorphCategory>> {
        let category_rows =
            sqlx::query("SELECT id, name, color, sort_order FROM morph_categories ORDER BY sort_order, id")
                .fetch_all(&self.pool)
                .await
                .context("Failed to fetch morph categories")?;

        let sub_category_rows = sqlx::query(
            "SELECT id, category_id, name, color, sort_order FROM morph_sub_categories ORDER BY sort_order, id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch morph sub-categories")?;

        let morph_rows = sqlx::query(
            "SELECT id, name, category_id, sub_category_id, sub_sub_category_id FROM morphs ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch morphs")?;

        let mut categories: Vec<MorphCategory> = category_rows
            .iter()
            .map(|row| MorphCategory {
                id: row.get("id"),
                name: row.get("name"),
                color: row.get("color"),
                sort_order: row.get("sort_order"),
                morphs: Vec::new(),
                sub_categories: Vec::new(),
            })
            .collect();

        let category_index: std::collections::HashMap<MorphId, usize> = categories
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.id, idx))
            .collect();

        let mut sub_category_index: std::collections::HashMap<MorphId, (usize, usize)> =
            std::collections::HashMap::new();
        for row in &sub_category_rows {
            let sub = MorphSubCategory {
                id: row.get("id"),
                category_id: row.get("category_id"),
                name: row.get("name"),
                color: row.get("color"),
                sort_order: row.get("sort_order"),
                morphs: Vec::new(),
            };
            if let Some(&cat_idx) = category_index.get(&sub.category_id) {
                sub_category_index.insert(sub.id, (cat_idx, categories[cat_idx].sub_categories.len()));
                categories[cat_idx].sub_categories.push(sub);
            }
        }

        for row in &morph_rows {
            let morph = morph_from_row(row);
            match morph.sub_category_id.and_then(|id| sub_category_index.get(&id)) {
                Some(&(cat_idx, sub_idx)) => {
                    categories[cat_idx].sub_categories[sub_idx].morphs.push(morph);
                }
                None => {
                    if let Some(&cat_idx) = category_index.get(&morph.category_id) {
                        categories[cat_idx].morphs.push(morph);
                    }
                }
            }
        }

        Ok(categories)
    }
}

#[async_trait::async_trait]
impl FarmStore for PostgresStore {
    async fn get_farm(&self, id: &Id) -> Result<Option<Farm>> {
        let row = sqlx::query(
            "SELECT id, name, description, location, logo_url, created_at, updated_at FROM farms WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch farm")?;

        Ok(row.as_ref().map(farm_from_row))
    }

    async fn list_farms(&self) -> Result<Vec<Farm>> {
        let rows = sqlx::query(
            "SELECT id, name, description, location, logo_url, created_at, updated_at FROM farms ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list farms")?;

        Ok(rows.iter().map(farm_from_row).collect())
    }

    async fn upsert_farm(&self, farm: Farm) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO farms (id, name, description, location, logo_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                location = EXCLUDED.location,
                logo_url = EXCLUDED.logo_url,
                updated_at = NOW()
            "#,
        )
        .bind(&farm.id)
        .bind(&farm.name)
        .bind(&farm.description)
        .bind(&farm.location)
        .bind(&farm.logo_url)
        .bind(farm.created_at)
        .bind(farm.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to upsert farm")?;

        Ok(())
    }

    async fn delete_farm(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM farms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete farm")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresStore {
    async fn get_product(&self, id: &Id) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, farm_id, name, species, sex, price, description, image_urls, status, hatch_date, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch product")?;

        Ok(row.as_ref().map(product_from_row))
    }

    async fn list_products(&self, filter: &ProductQueryFilter) -> Result<Vec<Product>> {
        let mut builder = sqlx::QueryBuilder::new(
            "SELECT id, farm_id, name, species, sex, price, description, image_urls, status, hatch_date, created_at, updated_at FROM products WHERE 1=1",
        );

        if let Some(farm_id) = &filter.farm_id {
            builder.push(" AND farm_id = ").push_bind(farm_id.as_str());
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(search) = &filter.search {
            if !search.is_empty() {
                builder
                    .push(" AND name ILIKE ")
                    .push_bind(format!("%{}%", search));
            }
        }
        builder.push(" ORDER BY created_at DESC");
        builder.push(" LIMIT ").push_bind(filter.effective_limit());
        builder.push(" OFFSET ").push_bind(filter.effective_offset());

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .context("Failed to list products")?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    async fn upsert_product(&self, product: Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, farm_id, name, species, sex, price, description, image_urls, status, hatch_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                species = EXCLUDED.species,
                sex = EXCLUDED.sex,
                price = EXCLUDED.price,
                description = EXCLUDED.description,
                image_urls = EXCLUDED.image_urls,
                status = EXCLUDED.status,
                hatch_date = EXCLUDED.hatch_date,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&product.id)
        .bind(&product.farm_id)
        .bind(&product.name)
        .bind(&product.species)
        .bind(product.sex.as_str())
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.image_urls)
        .bind(product.status.as_str())
        .bind(product.hatch_date)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to upsert product")?;

        Ok(())
    }

    async fn delete_product(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete product")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl ProductMorphStore for PostgresStore {
    async fn replace_product_morphs(&self, product_id: &Id, morph_ids: &[MorphId]) -> Result<()> {
        // Delete + reinsert in one transaction so a failure mid-way cannot
        // leave the product with a partial association set.
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin association transaction")?;

        sqlx::query("DELETE FROM product_morphs WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await
            .context("Failed to clear product morphs")?;

        for morph_id in morph_ids {
            sqlx::query("INSERT INTO product_morphs (product_id, morph_id) VALUES ($1, $2)")
                .bind(product_id)
                .bind(morph_id)
                .execute(&mut *tx)
                .await
                .context("Failed to insert product morph")?;
        }

        tx.commit()
            .await
            .context("Failed to commit association transaction")?;

        Ok(())
    }

    async fn list_product_morphs(&self, product_id: &Id) -> Result<Vec<Morph>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.name, m.category_id, m.sub_category_id, m.sub_sub_category_id
            FROM product_morphs pm
            JOIN morphs m ON m.id = pm.morph_id
            WHERE pm.product_id = $1
            ORDER BY pm.id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list product morphs")?;

        Ok(rows.iter().map(morph_from_row).collect())
    }
}

impl Store for PostgresStore {}
