//! gRPC surface for companies.
//!
//! Thin translation layer: decode the request, call [`CompanyService`], encode
//! the reply. Every call is timed and counted in [`crate::metrics`].

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use tonic::{Code, Request, Response, Status};
use tracing::info;

use proto::company_service_server::CompanyService as CompanyRpc;
use proto::{
    CreateCompanyRequest, CreateCompanyResponse, DeleteCompanyRequest, DeleteCompanyResponse, GetCompanyRequest,
    GetCompanyResponse, ListCompaniesRequest, ListCompaniesResponse, UpdateCompanyRequest, UpdateCompanyResponse,
};
use service::company::domain::{Company, CompanyPatch, NewCompany};
use service::company::repository::CompanyRepository;
use service::company::CompanyService;
use service::errors::ServiceError;
use service::pagination::Pagination;

use crate::errors::{code_label, to_status};
use crate::metrics::record_rpc;

#[derive(Clone)]
pub struct CompanyGrpc {
    svc: CompanyService<dyn CompanyRepository>,
}

impl CompanyGrpc {
    pub fn new(svc: CompanyService<dyn CompanyRepository>) -> Self {
        Self { svc }
    }

    pub fn from_repo(repo: Arc<dyn CompanyRepository>) -> Self {
        Self::new(CompanyService::new(repo))
    }
}

pub fn to_timestamp(dt: DateTime<Utc>) -> Timestamp {
    Timestamp { seconds: dt.timestamp(), nanos: dt.timestamp_subsec_nanos() as i32 }
}

pub fn company_to_proto(c: Company) -> proto::Company {
    proto::Company {
        id: c.id.to_string(),
        name: c.name,
        subscription_plan: c.subscription_plan,
        created_at: Some(to_timestamp(c.created_at)),
        updated_at: Some(to_timestamp(c.updated_at)),
    }
}

/// Run one RPC body, map its error and record the outcome.
async fn observe<T, F>(method: &'static str, fut: F) -> Result<Response<T>, Status>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    let started = Instant::now();
    let result = fut.await.map_err(|e| to_status(&e));
    let code = match &result {
        Ok(_) => Code::Ok,
        Err(status) => status.code(),
    };
    record_rpc(method, code_label(code), started.elapsed().as_secs_f64());
    result.map(Response::new)
}

#[tonic::async_trait]
impl CompanyRpc for CompanyGrpc {
    async fn create_company(
        &self,
        request: Request<CreateCompanyRequest>,
    ) -> Result<Response<CreateCompanyResponse>, Status> {
        let req = request.into_inner();
        observe("CreateCompany", async {
            let company = self
                .svc
                .create(NewCompany { name: req.name, subscription_plan: req.subscription_plan })
                .await?;
            info!(company_id = %company.id, "company created");
            Ok::<_, ServiceError>(CreateCompanyResponse { company: Some(company_to_proto(company)) })
        })
        .await
    }

    async fn get_company(&self, request: Request<GetCompanyRequest>) -> Result<Response<GetCompanyResponse>, Status> {
        let req = request.into_inner();
        observe("GetCompany", async {
            let company = self.svc.get(&req.id).await?;
            Ok::<_, ServiceError>(GetCompanyResponse { company: Some(company_to_proto(company)) })
        })
        .await
    }

    async fn update_company(
        &self,
        request: Request<UpdateCompanyRequest>,
    ) -> Result<Response<UpdateCompanyResponse>, Status> {
        let req = request.into_inner();
        observe("UpdateCompany", async {
            let patch = CompanyPatch { name: req.name, subscription_plan: req.subscription_plan };
            let company = self.svc.update(&req.id, patch).await?;
            Ok::<_, ServiceError>(UpdateCompanyResponse { company: Some(company_to_proto(company)) })
        })
        .await
    }

    async fn delete_company(
        &self,
        request: Request<DeleteCompanyRequest>,
    ) -> Result<Response<DeleteCompanyResponse>, Status> {
        let req = request.into_inner();
        observe("DeleteCompany", async {
            self.svc.delete(&req.id).await?;
            Ok::<_, ServiceError>(DeleteCompanyResponse { success: true })
        })
        .await
    }

    async fn list_companies(
        &self,
        request: Request<ListCompaniesRequest>,
    ) -> Result<Response<ListCompaniesResponse>, Status> {
        let req = request.into_inner();
        observe("ListCompanies", async {
            let page = self.svc.list(Pagination::new(req.page, req.limit)).await?;
            Ok::<_, ServiceError>(ListCompaniesResponse {
                companies: page.companies.into_iter().map(company_to_proto).collect(),
                total: i32::try_from(page.total).unwrap_or(i32::MAX),
            })
        })
        .await
    }
}
