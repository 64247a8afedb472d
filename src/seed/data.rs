use anyhow::Result;
use chrono::Utc;

use crate::model::{Farm, Id, MorphId, Product, ProductStatus, Sex};
use crate::store::traits::{FarmStore, ProductMorphStore, ProductStore};
use crate::store::PostgresStore;

/// Demonstration dataset: a ball python morph taxonomy plus one farm with a
/// few listed animals. Idempotent; safe to run on every startup.
pub async fn load_seed_data(store: &PostgresStore) -> Result<()> {
    seed_taxonomy(store).await?;
    seed_demo_farm(store).await?;
    Ok(())
}

async fn seed_taxonomy(store: &PostgresStore) -> Result<()> {
    // Categories
    store
        .upsert_morph_category(1, "Dominant", Some("#F59E0B"), 1)
        .await?;
    store
        .upsert_morph_category(2, "Co-Dominant", Some("#10B981"), 2)
        .await?;
    store
        .upsert_morph_category(3, "Recessive", Some("#8B5CF6"), 3)
        .await?;

    // Sub-categories
    store
        .upsert_morph_sub_category(10, 2, "BEL Complex", "#3B82F6", 1)
        .await?;
    store
        .upsert_morph_sub_category(11, 3, "Albino Complex", "#EC4899", 1)
        .await?;

    // Dominant morphs
    for (id, name) in [(1, "Spider"), (2, "Pinstripe"), (3, "Leopard"), (4, "Calico")] {
        store.upsert_morph(id, name, 1, None).await?;
    }

    // Co-Dominant morphs, direct
    for (id, name) in [
        (5, "Pastel"),
        (6, "Yellow Belly"),
        (7, "Gravel"),
        (8, "Banana"),
        (9, "Enchi"),
    ] {
        store.upsert_morph(id, name, 2, None).await?;
    }

    // Co-Dominant morphs under the BEL Complex
    for (id, name) in [(10, "Lesser"), (11, "Butter"), (12, "Mojave"), (13, "Phantom")] {
        store.upsert_morph(id, name, 2, Some(10)).await?;
    }

    // Recessive morphs, direct
    for (id, name) in [(14, "Clown"), (15, "Piebald"), (16, "Ghost")] {
        store.upsert_morph(id, name, 3, None).await?;
    }

    // Recessive morphs under the Albino Complex
    for (id, name) in [(17, "Albino"), (18, "Candy"), (19, "Toffee")] {
        store.upsert_morph(id, name, 3, Some(11)).await?;
    }

    Ok(())
}

fn seed_product(
    id: &str,
    farm_id: &Id,
    name: &str,
    sex: Sex,
    price: f64,
    description: &str,
) -> Product {
    let now = Utc::now();
    Product {
        id: id.to_string(),
        farm_id: farm_id.clone(),
        name: name.to_string(),
        species: "Ball Python".to_string(),
        sex,
        price,
        description: Some(description.to_string()),
        image_urls: vec![],
        status: ProductStatus::Available,
        hatch_date: None,
        created_at: now,
        updated_at: now,
    }
}

async fn seed_demo_farm(store: &PostgresStore) -> Result<()> {
    let farm_id: Id = "farm-ridgeline".to_string();
    let now = Utc::now();

    store
        .upsert_farm(Farm {
            id: farm_id.clone(),
            name: "Ridgeline Reptiles".to_string(),
            description: Some("Family-run ball python breeder".to_string()),
            location: Some("Asheville, NC".to_string()),
            logo_url: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    let listings: [(&str, &str, Sex, f64, &str, &[MorphId]); 3] = [
        (
            "prod-banana-pastel",
            "Banana Pastel Male",
            Sex::Male,
            350.0,
            "2024 hatchling, feeding on f/t rats",
            &[8, 5],
        ),
        (
            "prod-lesser-clown",
            "Lesser het Clown Female",
            Sex::Female,
            600.0,
            "Proven genetics, great feeder",
            &[10, 14],
        ),
        (
            "prod-albino",
            "Albino Male",
            Sex::Male,
            275.0,
            "High-contrast albino",
            &[17],
        ),
    ];

    for (id, name, sex, price, description, morph_ids) in listings {
        let product = seed_product(id, &farm_id, name, sex, price, description);
        let product_id = product.id.clone();
        store.upsert_product(product).await?;
        store.replace_product_morphs(&product_id, morph_ids).await?;
    }

    Ok(())
}
