use axum::{response::IntoResponse, routing::get, Json, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use common::types::Health;
use proto::company_service_server::CompanyServiceServer;

use crate::grpc::CompanyGrpc;
use crate::metrics::encode_metrics;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> impl IntoResponse {
    encode_metrics()
}

/// gRPC service plus reflection, with `/health` and `/metrics` on the same port.
pub fn build_router(grpc: CompanyGrpc) -> anyhow::Result<Router> {
    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(proto::FILE_DESCRIPTOR_SET)
        .build_v1()?;

    let rpc = tonic::service::Routes::new(CompanyServiceServer::new(grpc))
        .add_service(reflection)
        .into_axum_router();

    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    Ok(rpc.merge(ops).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::DEBUG))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use service::company::repository::mock::InMemoryCompanyRepository;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(CompanyGrpc::from_repo(Arc::new(InMemoryCompanyRepository::default()))).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let res = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["status"], "ok");
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_text() {
        crate::metrics::record_rpc("ListCompanies", "OK", 0.001);
        let res = app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("company_rpc_requests_total"));
    }
}
