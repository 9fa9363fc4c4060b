use std::net::SocketAddr;
use std::sync::Arc;

use proto::company_service_client::CompanyServiceClient;
use proto::{
    CreateCompanyRequest, DeleteCompanyRequest, GetCompanyRequest, ListCompaniesRequest, UpdateCompanyRequest,
};
use server::grpc::CompanyGrpc;
use server::routes::build_router;
use server::startup::serve;
use service::company::repository::mock::InMemoryCompanyRepository;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tonic::transport::Channel;
use tonic::Code;

struct TestServer {
    addr: SocketAddr,
    repo: Arc<InMemoryCompanyRepository>,
    _stop: oneshot::Sender<()>,
}

async fn start() -> anyhow::Result<TestServer> {
    let repo = Arc::new(InMemoryCompanyRepository::default());
    let app = build_router(CompanyGrpc::from_repo(repo.clone()))?;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = serve(listener, app, async {
            let _ = rx.await;
        })
        .await;
    });
    Ok(TestServer { addr, repo, _stop: tx })
}

async fn client(srv: &TestServer) -> anyhow::Result<CompanyServiceClient<Channel>> {
    Ok(CompanyServiceClient::connect(format!("http://{}", srv.addr)).await?)
}

async fn create(c: &mut CompanyServiceClient<Channel>, name: &str, plan: &str) -> proto::Company {
    c.create_company(CreateCompanyRequest { name: name.into(), subscription_plan: plan.into() })
        .await
        .unwrap()
        .into_inner()
        .company
        .unwrap()
}

#[tokio::test]
async fn company_lifecycle() -> anyhow::Result<()> {
    let srv = start().await?;
    let mut c = client(&srv).await?;

    let created = create(&mut c, "Acme Corporation", "enterprise").await;
    assert!(uuid::Uuid::parse_str(&created.id).is_ok());
    assert_eq!(created.created_at, created.updated_at);

    let got = c.get_company(GetCompanyRequest { id: created.id.clone() }).await?.into_inner();
    assert_eq!(got.company.as_ref(), Some(&created));

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let updated = c
        .update_company(UpdateCompanyRequest {
            id: created.id.clone(),
            name: None,
            subscription_plan: Some("premium".into()),
        })
        .await?
        .into_inner()
        .company
        .unwrap();
    assert_eq!(updated.name, "Acme Corporation");
    assert_eq!(updated.subscription_plan, "premium");
    assert_eq!(updated.created_at, created.created_at);
    let stamp = |t: Option<prost_types::Timestamp>| t.map(|t| (t.seconds, t.nanos));
    assert!(stamp(updated.updated_at) > stamp(created.updated_at));

    let deleted = c.delete_company(DeleteCompanyRequest { id: created.id.clone() }).await?.into_inner();
    assert!(deleted.success);

    let err = c.get_company(GetCompanyRequest { id: created.id.clone() }).await.unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
    assert_eq!(err.message(), "company not found");
    Ok(())
}

#[tokio::test]
async fn validation_errors_are_invalid_argument() -> anyhow::Result<()> {
    let srv = start().await?;
    let mut c = client(&srv).await?;

    let err = c
        .create_company(CreateCompanyRequest { name: "   ".into(), subscription_plan: "basic".into() })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
    assert_eq!(err.message(), "name is required");

    let err = c
        .create_company(CreateCompanyRequest { name: "Acme".into(), subscription_plan: "".into() })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
    assert_eq!(err.message(), "subscription_plan is required");

    let err = c.get_company(GetCompanyRequest { id: "".into() }).await.unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
    assert_eq!(err.message(), "id is required");

    let err = c.get_company(GetCompanyRequest { id: "not-a-uuid".into() }).await.unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
    assert_eq!(err.message(), "invalid UUID format");

    let err = c.delete_company(DeleteCompanyRequest { id: "not-a-uuid".into() }).await.unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);

    // nothing reached storage
    assert_eq!(srv.repo.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn update_unknown_id_is_not_found() -> anyhow::Result<()> {
    let srv = start().await?;
    let mut c = client(&srv).await?;
    let err = c
        .update_company(UpdateCompanyRequest {
            id: uuid::Uuid::new_v4().to_string(),
            name: Some("Renamed".into()),
            subscription_plan: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
    Ok(())
}

#[tokio::test]
async fn list_pages_and_total() -> anyhow::Result<()> {
    let srv = start().await?;
    let mut c = client(&srv).await?;
    for i in 0..12 {
        create(&mut c, &format!("Company {i:02}"), "basic").await;
    }

    let first = c.list_companies(ListCompaniesRequest { page: 1, limit: 5 }).await?.into_inner();
    assert_eq!(first.total, 12);
    assert_eq!(first.companies.len(), 5);
    assert_eq!(first.companies[0].name, "Company 00");

    let last = c.list_companies(ListCompaniesRequest { page: 3, limit: 5 }).await?.into_inner();
    assert_eq!(last.companies.len(), 2);
    assert_eq!(last.companies[1].name, "Company 11");

    // defaults: page 1, limit 10
    let defaulted = c.list_companies(ListCompaniesRequest { page: 0, limit: 0 }).await?.into_inner();
    assert_eq!(defaulted.companies.len(), 10);

    let beyond = c.list_companies(ListCompaniesRequest { page: 9, limit: 5 }).await?.into_inner();
    assert!(beyond.companies.is_empty());
    assert_eq!(beyond.total, 12);
    Ok(())
}

#[tokio::test]
async fn storage_failure_is_internal_without_detail() -> anyhow::Result<()> {
    let srv = start().await?;
    let mut c = client(&srv).await?;
    srv.repo.set_failing(true);
    let err = c
        .create_company(CreateCompanyRequest { name: "Acme".into(), subscription_plan: "basic".into() })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Internal);
    assert_eq!(err.message(), "failed to create company");
    Ok(())
}
