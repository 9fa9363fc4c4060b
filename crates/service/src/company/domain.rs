use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain company (business view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub subscription_plan: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<models::company::Model> for Company {
    fn from(m: models::company::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            subscription_plan: m.subscription_plan,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

/// Creation input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub subscription_plan: String,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub subscription_plan: Option<String>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.subscription_plan.is_none()
    }
}

/// One page of companies plus the size of the whole collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyPage {
    pub companies: Vec<Company>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}
