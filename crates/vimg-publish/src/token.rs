//! Token issuance.
//!
//! A single bearer token authenticates every publish call of one invocation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{PublishError, PublishResult};
use crate::metrics::record_token_request;
use crate::types::TokenResponse;

/// Issues bearer tokens for the video asset service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Return a token, optionally scoped to `client_id`.
    async fn issue_token(&self, client_id: Option<String>) -> PublishResult<String>;
}

/// Token endpoint configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// OAuth2 token endpoint
    pub token_url: String,
    pub client_secret: Option<String>,
    /// Resource-owner credentials; client credentials grant is used when unset
    pub username: Option<String>,
    pub password: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl TokenConfig {
    /// Create config from environment variables, with the request timeout
    /// shared by all calls to the video asset service.
    pub fn from_env(timeout: Duration) -> PublishResult<Self> {
        let token_url = std::env::var("VAL_TOKEN_URL")
            .map_err(|_| PublishError::config("VAL_TOKEN_URL not set"))?;

        Ok(Self {
            token_url,
            client_secret: std::env::var("VAL_CLIENT_SECRET").ok(),
            username: std::env::var("VAL_USERNAME").ok(),
            password: std::env::var("VAL_PASSWORD").ok(),
            timeout,
        })
    }

    /// Form fields sent to the token endpoint.
    fn form(&self, client_id: Option<String>) -> Vec<(&'static str, String)> {
        let mut form = Vec::new();

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                form.push(("grant_type", "password".to_string()));
                form.push(("username", username.clone()));
                form.push(("password", password.clone()));
            }
            _ => form.push(("grant_type", "client_credentials".to_string())),
        }

        if let Some(client_id) = client_id {
            form.push(("client_id", client_id));
        }
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.clone()));
        }
        form.push(("token_type", "jwt".to_string()));

        form
    }
}

/// `TokenIssuer` backed by an OAuth2 token endpoint.
pub struct HttpTokenIssuer {
    http: Client,
    config: TokenConfig,
}

impl HttpTokenIssuer {
    pub fn new(config: TokenConfig) -> PublishResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PublishError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env(timeout: Duration) -> PublishResult<Self> {
        Self::new(TokenConfig::from_env(timeout)?)
    }

    async fn request_token(&self, client_id: Option<String>) -> PublishResult<String> {
        debug!("Requesting token from {}", self.config.token_url);

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&self.config.form(client_id))
            .send()
            .await
            .map_err(|e| PublishError::auth(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::auth(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PublishError::auth(format!("invalid token response: {}", e)))?;

        if token.access_token.is_empty() {
            return Err(PublishError::auth("token endpoint returned an empty token"));
        }

        Ok(token.access_token)
    }
}

#[async_trait]
impl TokenIssuer for HttpTokenIssuer {
    async fn issue_token(&self, client_id: Option<String>) -> PublishResult<String> {
        let result = self.request_token(client_id).await;
        if let Err(e) = &result {
            warn!("Token issuance failed: {}", e);
        }
        record_token_request(result.is_ok());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> TokenConfig {
        TokenConfig {
            token_url: format!("{}/oauth2/access_token", server.uri()),
            client_secret: Some("secret".to_string()),
            username: None,
            password: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_password_grant_when_user_configured() {
        let config = TokenConfig {
            token_url: "http://localhost/token".to_string(),
            client_secret: None,
            username: Some("worker".to_string()),
            password: Some("pw".to_string()),
            timeout: Duration::from_secs(5),
        };

        let form = config.form(Some("client".to_string()));
        assert!(form.contains(&("grant_type", "password".to_string())));
        assert!(form.contains(&("username", "worker".to_string())));
        assert!(form.contains(&("client_id", "client".to_string())));
    }

    #[test]
    fn test_client_credentials_without_user() {
        let config = TokenConfig {
            token_url: "http://localhost/token".to_string(),
            client_secret: Some("secret".to_string()),
            username: None,
            password: None,
            timeout: Duration::from_secs(5),
        };

        let form = config.form(None);
        assert!(form.contains(&("grant_type", "client_credentials".to_string())));
        assert!(!form.iter().any(|(k, _)| *k == "client_id"));
    }

    #[tokio::test]
    async fn test_issue_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/access_token"))
            .and(body_string_contains("client_id=video-worker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "val_api_token",
                "token_type": "JWT",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let issuer = HttpTokenIssuer::new(config(&server)).unwrap();
        let token = issuer
            .issue_token(Some("video-worker".to_string()))
            .await
            .unwrap();

        assert_eq!(token, "val_api_token");
    }

    #[tokio::test]
    async fn test_rejected_token_request_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let issuer = HttpTokenIssuer::new(config(&server)).unwrap();
        let err = issuer.issue_token(None).await.unwrap_err();

        match err {
            PublishError::Auth(msg) => assert!(msg.contains("invalid_client")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_token_response_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"nope": 1})))
            .mount(&server)
            .await;

        let issuer = HttpTokenIssuer::new(config(&server)).unwrap();
        assert!(matches!(
            issuer.issue_token(None).await,
            Err(PublishError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn test_slow_token_endpoint_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "late"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let issuer = HttpTokenIssuer::new(TokenConfig {
            timeout: Duration::from_millis(200),
            ..config(&server)
        })
        .unwrap();

        assert!(matches!(
            issuer.issue_token(None).await,
            Err(PublishError::Auth(_))
        ));
    }
}
