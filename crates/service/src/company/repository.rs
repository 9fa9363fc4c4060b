use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Company, CompanyPatch, NewCompany};
use crate::errors::ServiceError;

/// Persistence accessor for the `company` table. No business rules live here.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Assign a new id and timestamp pair, persist, return the stored row.
    async fn insert(&self, input: &NewCompany) -> Result<Company, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<Company>, ServiceError>;
    /// Apply present fields and refresh `updated_at`; `NotFound` if no row matches.
    async fn update(&self, id: Uuid, patch: &CompanyPatch) -> Result<Company, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    /// Rows ordered by `(created_at, id)`.
    async fn list_page(&self, limit: u64, offset: u64) -> Result<Vec<Company>, ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryCompanyRepository {
        rows: Mutex<Vec<Company>>, // insertion order == (created_at, id) order
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    impl InMemoryCompanyRepository {
        /// Number of repository calls made so far.
        pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

        /// Make every subsequent call fail with a database error.
        pub fn set_failing(&self, failing: bool) { self.failing.store(failing, Ordering::SeqCst); }

        fn enter(&self) -> Result<(), ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CompanyRepository for InMemoryCompanyRepository {
        async fn insert(&self, input: &NewCompany) -> Result<Company, ServiceError> {
            self.enter()?;
            let now = Utc::now();
            let company = Company {
                id: Uuid::new_v4(),
                name: input.name.clone(),
                subscription_plan: input.subscription_plan.clone(),
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap_or_else(|e| e.into_inner()).push(company.clone());
            Ok(company)
        }

        async fn get(&self, id: Uuid) -> Result<Option<Company>, ServiceError> {
            self.enter()?;
            Ok(self.rows.lock().unwrap_or_else(|e| e.into_inner()).iter().find(|c| c.id == id).cloned())
        }

        async fn update(&self, id: Uuid, patch: &CompanyPatch) -> Result<Company, ServiceError> {
            self.enter()?;
            let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            let row = rows
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| ServiceError::not_found("company"))?;
            if let Some(name) = &patch.name { row.name = name.clone(); }
            if let Some(plan) = &patch.subscription_plan { row.subscription_plan = plan.clone(); }
            row.updated_at = Utc::now().max(row.created_at);
            Ok(row.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            self.enter()?;
            let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            let before = rows.len();
            rows.retain(|c| c.id != id);
            Ok(rows.len() < before)
        }

        async fn list_page(&self, limit: u64, offset: u64) -> Result<Vec<Company>, ServiceError> {
            self.enter()?;
            let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            Ok(rows.iter().skip(offset as usize).take(limit as usize).cloned().collect())
        }

        async fn count(&self) -> Result<u64, ServiceError> {
            self.enter()?;
            Ok(self.rows.lock().unwrap_or_else(|e| e.into_inner()).len() as u64)
        }
    }
}
