use crate::model::{generate_id, Id};
use serde::{Deserialize, Serialize};

/// A breeder account owning products and a public storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Farm {
    pub fn new(name: String, description: Option<String>, location: Option<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: generate_id(),
            name,
            description,
            location,
            logo_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input model for creating or updating a farm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFarm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub logo_url: Option<String>,
}

impl NewFarm {
    /// Convert to a full Farm with server-generated fields
    pub fn into_farm(self) -> Farm {
        let now = chrono::Utc::now();
        Farm {
            id: self.id.unwrap_or_else(generate_id),
            name: self.name,
            description: self.description,
            location: self.location,
            logo_url: self.logo_url,
            created_at: now,
            updated_at: now,
        }
    }
}
