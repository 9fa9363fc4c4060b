use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{Company, CompanyPage, CompanyPatch, NewCompany};
use super::repository::CompanyRepository;
use crate::errors::ServiceError;
use crate::pagination::Pagination;

pub const ID_REQUIRED: &str = "id is required";
pub const INVALID_UUID_FORMAT: &str = "invalid UUID format";
pub const FAILED_TO_CREATE: &str = "failed to create company";
pub const FAILED_TO_GET: &str = "failed to get company";
pub const FAILED_TO_UPDATE: &str = "failed to update company";
pub const FAILED_TO_DELETE: &str = "failed to delete company";
pub const FAILED_TO_LIST: &str = "failed to list companies";
pub const FAILED_TO_COUNT: &str = "failed to count companies";

/// Parse a wire identifier, rejecting blank and malformed values.
pub fn parse_company_id(raw: &str) -> Result<Uuid, ServiceError> {
    if raw.trim().is_empty() {
        return Err(ServiceError::Validation(ID_REQUIRED.into()));
    }
    Uuid::parse_str(raw).map_err(|_| ServiceError::Validation(INVALID_UUID_FORMAT.into()))
}

/// Company CRUD rules independent of the RPC framework.
pub struct CompanyService<R: CompanyRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CompanyRepository + ?Sized> Clone for CompanyService<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: CompanyRepository + ?Sized> CompanyService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a company after checking both required fields.
    ///
    /// # Examples
    /// ```
    /// use service::company::{CompanyService, domain::NewCompany, repository::mock::InMemoryCompanyRepository};
    /// use std::sync::Arc;
    /// let svc = CompanyService::new(Arc::new(InMemoryCompanyRepository::default()));
    /// let input = NewCompany { name: "Acme".into(), subscription_plan: "enterprise".into() };
    /// let company = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(company.created_at, company.updated_at);
    /// ```
    #[instrument(skip(self, input), fields(name = %input.name, plan = %input.subscription_plan))]
    pub async fn create(&self, input: NewCompany) -> Result<Company, ServiceError> {
        models::company::validate_name(&input.name)?;
        models::company::validate_subscription_plan(&input.subscription_plan)?;

        let company = self.repo.insert(&input).await.map_err(|e| e.internal(FAILED_TO_CREATE))?;
        info!(company_id = %company.id, "company_created");
        Ok(company)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Company, ServiceError> {
        let id = parse_company_id(id)?;
        self.repo
            .get(id)
            .await
            .map_err(|e| e.internal(FAILED_TO_GET))?
            .ok_or_else(|| ServiceError::not_found("company"))
    }

    /// Apply present fields only. An empty patch returns the stored record
    /// without writing.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: CompanyPatch) -> Result<Company, ServiceError> {
        let id = parse_company_id(id)?;
        if let Some(name) = &patch.name {
            models::company::validate_name(name)?;
        }
        if let Some(plan) = &patch.subscription_plan {
            models::company::validate_subscription_plan(plan)?;
        }

        if patch.is_empty() {
            debug!(company_id = %id, "empty patch; returning current record");
            return self
                .repo
                .get(id)
                .await
                .map_err(|e| e.internal(FAILED_TO_UPDATE))?
                .ok_or_else(|| ServiceError::not_found("company"));
        }

        let company = self.repo.update(id, &patch).await.map_err(|e| e.internal(FAILED_TO_UPDATE))?;
        info!(company_id = %company.id, "company_updated");
        Ok(company)
    }

    /// Hard delete. A missing row is not an error.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = parse_company_id(id)?;
        let removed = self.repo.delete(id).await.map_err(|e| e.internal(FAILED_TO_DELETE))?;
        if removed {
            info!(company_id = %id, "company_deleted");
        } else {
            debug!(company_id = %id, "delete matched no rows");
        }
        Ok(())
    }

    /// One page plus the total size of the collection.
    #[instrument(skip(self))]
    pub async fn list(&self, pagination: Pagination) -> Result<CompanyPage, ServiceError> {
        let window = pagination.normalize();
        let companies = self
            .repo
            .list_page(window.limit, window.offset)
            .await
            .map_err(|e| e.internal(FAILED_TO_LIST))?;
        let total = self.repo.count().await.map_err(|e| e.internal(FAILED_TO_COUNT))?;
        debug!(page = window.page, limit = window.limit, returned = companies.len(), total, "companies_listed");
        Ok(CompanyPage { companies, total, page: window.page, limit: window.limit })
    }
}
