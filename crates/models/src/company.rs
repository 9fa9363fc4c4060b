use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

pub const NAME_REQUIRED: &str = "name is required";
pub const SUBSCRIPTION_PLAN_REQUIRED: &str = "subscription_plan is required";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub subscription_plan: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation(NAME_REQUIRED.into()));
    }
    Ok(())
}

/// Plans are an open set; only emptiness is rejected.
pub fn validate_subscription_plan(plan: &str) -> Result<(), errors::ModelError> {
    if plan.trim().is_empty() {
        return Err(errors::ModelError::Validation(SUBSCRIPTION_PLAN_REQUIRED.into()));
    }
    Ok(())
}

/// Insert a company with a fresh id; `created_at` and `updated_at` share one instant.
pub async fn create<C: ConnectionTrait>(db: &C, name: &str, subscription_plan: &str) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_subscription_plan(subscription_plan)?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        subscription_plan: Set(subscription_plan.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
