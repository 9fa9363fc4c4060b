//! Fixture seeding for demo and test environments.
//!
//! Works directly against the repository; the fixture list is supplied by the
//! caller as a [`SeedConfig`].

use std::collections::HashSet;

use configs::SeedConfig;
use tracing::{info, instrument};

use crate::company::domain::{Company, NewCompany};
use crate::company::repository::CompanyRepository;
use crate::errors::ServiceError;

const SCAN_PAGE: u64 = 100;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

/// Every stored company, walking the table page by page.
async fn all_companies<R: CompanyRepository + ?Sized>(repo: &R) -> Result<Vec<Company>, ServiceError> {
    let mut out = Vec::new();
    let mut offset = 0;
    loop {
        let page = repo.list_page(SCAN_PAGE, offset).await?;
        let n = page.len() as u64;
        out.extend(page);
        if n < SCAN_PAGE {
            return Ok(out);
        }
        offset += n;
    }
}

/// Insert each configured company whose name is not already stored.
#[instrument(skip_all, fields(fixtures = cfg.companies.len()))]
pub async fn seed_companies<R: CompanyRepository + ?Sized>(repo: &R, cfg: &SeedConfig) -> Result<SeedReport, ServiceError> {
    let mut existing: HashSet<String> = all_companies(repo).await?.into_iter().map(|c| c.name).collect();
    let mut report = SeedReport::default();

    for fixture in &cfg.companies {
        if existing.contains(&fixture.name) {
            info!(name = %fixture.name, "company already exists, skipping");
            report.skipped += 1;
            continue;
        }
        let input = NewCompany { name: fixture.name.clone(), subscription_plan: fixture.subscription_plan.clone() };
        let company = repo.insert(&input).await?;
        info!(name = %company.name, plan = %company.subscription_plan, company_id = %company.id, "seeded company");
        existing.insert(company.name);
        report.created += 1;
    }
    Ok(report)
}

/// Delete every stored company whose name appears in the fixture list.
#[instrument(skip_all, fields(fixtures = cfg.companies.len()))]
pub async fn clear_seed_companies<R: CompanyRepository + ?Sized>(repo: &R, cfg: &SeedConfig) -> Result<usize, ServiceError> {
    let mut deleted = 0;
    for company in all_companies(repo).await? {
        if cfg.contains_name(&company.name) {
            repo.delete(company.id).await?;
            info!(name = %company.name, company_id = %company.id, "deleted seed company");
            deleted += 1;
        }
    }
    Ok(deleted)
}
