use reqwest::Client;
use serde_json::{json, Value};
use tokio::time::{sleep, Duration};

// Test client wrapper for making API calls
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn put(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .put(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }
}

/// Full marketplace workflow against a running server. Requires the server
/// to be started with LOAD_SEED_DATA=true so the morph taxonomy exists.
/// Skipped unless TEST_API_BASE_URL is set (e.g. http://localhost:3000).
#[tokio::test]
async fn test_marketplace_workflow() {
    let Ok(base_url) = std::env::var("TEST_API_BASE_URL") else {
        println!("TEST_API_BASE_URL not set, skipping API integration test");
        return;
    };

    let client = TestClient::new(base_url);

    // Wait a bit for services to be ready
    sleep(Duration::from_secs(1)).await;

    // 1. Server is up
    let response = client.get("/health").await.expect("health request failed");
    assert!(response.status().is_success());

    // 2. Seeded catalog is served structured
    let response = client.get("/catalog").await.expect("catalog request failed");
    assert!(response.status().is_success());
    let catalog: Value = response.json().await.unwrap();
    let categories = catalog.as_array().expect("catalog should be an array");
    assert!(!categories.is_empty(), "catalog should be seeded");

    // 3. Create a farm
    let response = client
        .post(
            "/farms",
            json!({
                "name": "Integration Test Exotics",
                "description": "created by the integration suite",
                "location": null,
                "logo_url": null
            }),
        )
        .await
        .expect("farm create failed");
    assert!(response.status().is_success());
    let farm: Value = response.json().await.unwrap();
    let farm_id = farm["id"].as_str().unwrap().to_string();

    // 4. Create a product; duplicate morph ids in the submission collapse
    let response = client
        .post(
            "/products",
            json!({
                "farm_id": farm_id,
                "name": "Banana Pastel Test Male",
                "species": "Ball Python",
                "sex": "male",
                "price": 300.0,
                "morph_ids": [8, 5, 8]
            }),
        )
        .await
        .expect("product create failed");
    assert!(response.status().is_success());
    let product: Value = response.json().await.unwrap();
    let product_id = product["id"].as_str().unwrap().to_string();
    assert_eq!(product["morphs"].as_array().unwrap().len(), 2);

    // 5. Replacing the association twice yields the same final set
    for _ in 0..2 {
        let response = client
            .put(
                &format!("/products/{}/morphs", product_id),
                json!({ "morph_ids": [10, 14] }),
            )
            .await
            .expect("morph replace failed");
        assert!(response.status().is_success());
        let morphs: Value = response.json().await.unwrap();
        let ids: Vec<i64> = morphs
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![10, 14]);
    }

    // 6. An empty selection is rejected with a validation error
    let response = client
        .put(
            &format!("/products/{}/morphs", product_id),
            json!({ "morph_ids": [] }),
        )
        .await
        .expect("morph replace failed");
    assert_eq!(response.status().as_u16(), 422);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "at least one morph is required");

    // The rejected call performed no writes
    let response = client
        .get(&format!("/products/{}/morphs", product_id))
        .await
        .expect("morph list failed");
    let morphs: Value = response.json().await.unwrap();
    assert_eq!(morphs.as_array().unwrap().len(), 2);

    // 7. Catalog search excludes selected morphs server-side
    let response = client
        .get("/catalog/search?q=le&selected=10")
        .await
        .expect("catalog search failed");
    assert!(response.status().is_success());
    let filtered: Value = response.json().await.unwrap();
    for category in filtered.as_array().unwrap() {
        for m in category["morphs"].as_array().unwrap() {
            assert_ne!(m["id"].as_i64().unwrap(), 10);
        }
        for sub in category["sub_categories"].as_array().unwrap() {
            for m in sub["morphs"].as_array().unwrap() {
                assert_ne!(m["id"].as_i64().unwrap(), 10);
            }
        }
    }

    // 8. Storefront listing finds the product by substring
    let response = client
        .get("/products?search=pastel%20test")
        .await
        .expect("product search failed");
    assert!(response.status().is_success());
    let listing: Value = response.json().await.unwrap();
    let found = listing["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["id"] == product_id.as_str());
    assert!(found, "created product should appear in the search listing");
}
