//! Identity-provider token exchange (OAuth2 client-credentials grant).
//!
//! Not used by the company CRUD path; other integrations call this to obtain a
//! machine-to-machine bearer token.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::CoreError;

#[derive(Clone, Debug)]
pub struct ClientCredentials {
    /// Provider host, e.g. `tenant.eu.auth0.com`. A value with an explicit
    /// `http://` or `https://` scheme is used as-is.
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
    pub audience: String,
}

impl From<&configs::IdentityConfig> for ClientCredentials {
    fn from(cfg: &configs::IdentityConfig) -> Self {
        Self {
            domain: cfg.domain.clone(),
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            audience: cfg.audience.clone(),
        }
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// `https://{domain}/oauth/token`
pub fn token_endpoint(domain: &str) -> String {
    let base = domain.trim().trim_end_matches('/');
    if base.starts_with("http://") || base.starts_with("https://") {
        format!("{base}/oauth/token")
    } else {
        format!("https://{base}/oauth/token")
    }
}

/// Exchange client credentials for an access token.
pub async fn fetch_access_token(client: &Client, creds: &ClientCredentials) -> Result<AccessToken, CoreError> {
    if creds.domain.trim().is_empty() {
        return Err(CoreError::Config("identity domain is empty".into()));
    }
    let url = token_endpoint(&creds.domain);
    debug!(%url, client_id = %creds.client_id, "requesting access token");

    let body = TokenRequest {
        grant_type: "client_credentials",
        client_id: &creds.client_id,
        client_secret: &creds.client_secret,
        audience: &creds.audience,
    };
    let resp = client
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| CoreError::Network(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        warn!(%url, status = status.as_u16(), "token exchange rejected");
        return Err(CoreError::Upstream { status: status.as_u16(), body });
    }

    let token = resp
        .json::<AccessToken>()
        .await
        .map_err(|e| CoreError::Parse(e.to_string()))?;
    if token.access_token.is_empty() {
        return Err(CoreError::Parse("access_token missing from response".into()));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_stub() -> anyhow::Result<String> {
        async fn issue(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
            if body["grant_type"] == "client_credentials" && body["client_secret"] == "s3cret" {
                (StatusCode::OK, Json(json!({
                    "access_token": format!("tok-{}", body["audience"].as_str().unwrap_or_default()),
                    "token_type": "Bearer",
                    "expires_in": 86400
                })))
            } else {
                (StatusCode::UNAUTHORIZED, Json(json!({"error": "access_denied"})))
            }
        }

        let app = Router::new().route("/oauth/token", post(issue));
        let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await { eprintln!("stub error: {}", e); }
        });
        Ok(format!("http://{}", addr))
    }

    fn creds(domain: String, secret: &str) -> ClientCredentials {
        ClientCredentials {
            domain,
            client_id: "cid".into(),
            client_secret: secret.into(),
            audience: "https://api.example.com/".into(),
        }
    }

    #[test]
    fn endpoint_defaults_to_https() {
        assert_eq!(token_endpoint("tenant.auth0.com"), "https://tenant.auth0.com/oauth/token");
        assert_eq!(token_endpoint("http://127.0.0.1:9/"), "http://127.0.0.1:9/oauth/token");
    }

    #[tokio::test]
    async fn exchanges_credentials_for_token() -> anyhow::Result<()> {
        let base = spawn_stub().await?;
        let token = fetch_access_token(&Client::new(), &creds(base, "s3cret")).await?;
        assert_eq!(token.access_token, "tok-https://api.example.com/");
        assert_eq!(token.token_type.as_deref(), Some("Bearer"));
        assert_eq!(token.expires_in, Some(86400));
        Ok(())
    }

    #[tokio::test]
    async fn identity_section_drives_the_exchange() -> anyhow::Result<()> {
        let base = spawn_stub().await?;
        let cfg = configs::IdentityConfig {
            domain: base,
            client_id: "cid".into(),
            client_secret: "s3cret".into(),
            audience: "company-api".into(),
        };
        assert!(cfg.is_configured());
        let creds = ClientCredentials::from(&cfg);
        assert_eq!(creds.client_id, "cid");
        let token = fetch_access_token(&Client::new(), &creds).await?;
        assert_eq!(token.access_token, "tok-company-api");
        Ok(())
    }

    #[tokio::test]
    async fn rejected_credentials_surface_status() -> anyhow::Result<()> {
        let base = spawn_stub().await?;
        let err = fetch_access_token(&Client::new(), &creds(base, "wrong")).await.unwrap_err();
        assert!(matches!(err, CoreError::Upstream { status: 401, .. }));
        Ok(())
    }

    #[tokio::test]
    async fn empty_domain_is_config_error() {
        let err = fetch_access_token(&Client::new(), &creds(String::new(), "s3cret")).await.unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
