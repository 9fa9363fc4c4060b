use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use models::company::{self, Entity as CompanyEntity};
use crate::company::domain::{Company, CompanyPatch, NewCompany};
use crate::company::repository::CompanyRepository;
use crate::errors::ServiceError;

pub struct SeaOrmCompanyRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCompanyRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl CompanyRepository for SeaOrmCompanyRepository {
    async fn insert(&self, input: &NewCompany) -> Result<Company, ServiceError> {
        // validations are in models::company
        let created = company::create(&self.db, &input.name, &input.subscription_plan).await?;
        Ok(created.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Company>, ServiceError> {
        let found = CompanyEntity::find_by_id(id).one(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(found.map(Company::from))
    }

    async fn update(&self, id: Uuid, patch: &CompanyPatch) -> Result<Company, ServiceError> {
        // single UPDATE .. RETURNING; updated_at never falls behind created_at
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let mut stmt = CompanyEntity::update_many()
            .col_expr(company::Column::UpdatedAt, Expr::cust_with_values("GREATEST($1, \"created_at\")", [now]))
            .filter(company::Column::Id.eq(id));
        if let Some(n) = &patch.name {
            stmt = stmt.col_expr(company::Column::Name, Expr::value(n.clone()));
        }
        if let Some(p) = &patch.subscription_plan {
            stmt = stmt.col_expr(company::Column::SubscriptionPlan, Expr::value(p.clone()));
        }
        let rows = stmt.exec_with_returning(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        rows.into_iter()
            .next()
            .map(Company::from)
            .ok_or_else(|| ServiceError::not_found("company"))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = CompanyEntity::delete_by_id(id).exec(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }

    async fn list_page(&self, limit: u64, offset: u64) -> Result<Vec<Company>, ServiceError> {
        let rows = CompanyEntity::find()
            .order_by_asc(company::Column::CreatedAt)
            .order_by_asc(company::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(rows.into_iter().map(Company::from).collect())
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        CompanyEntity::find().count(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }
}
