//! HTTP client for the member portal API.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::Config;
use crate::user::UserRecord;

/// Default base URL for the portal API.
pub const DEFAULT_PORTAL_URL: &str = "http://localhost/portal/api/";

/// What the portal said to a login attempt.
///
/// Transport failures and unparseable replies are `Err` at the call site,
/// not a variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginCall {
    /// 2xx status, `success: true`, and a user record in the body.
    Accepted { user: UserRecord },
    /// The portal answered but did not grant a session. Carries the
    /// server's message when it sent one.
    Rejected { message: Option<String> },
}

/// Reply body for `login.php`. The portal sends this shape on success and
/// failure alike, so it is parsed before the HTTP status is considered.
#[derive(Debug, Deserialize)]
struct LoginReply {
    #[serde(default)]
    success: bool,
    user: Option<UserRecord>,
    message: Option<String>,
}

/// Client for the portal API.
#[derive(Debug, Clone)]
pub struct PortalClient {
    base_url: String,
    client: reqwest::Client,
}

impl PortalClient {
    /// Creates a client for the given base URL.
    ///
    /// The URL is normalized to end with a slash so endpoint paths can be
    /// appended directly.
    pub fn new(base_url: &str) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client from environment and config.
    ///
    /// Base URL resolution order:
    /// 1. `STILE_PORTAL_URL` env var (if set and non-empty)
    /// 2. `portal_url` from config (if set and non-empty)
    /// 3. Default: `http://localhost/portal/api/`
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = resolve_portal_url(config.effective_portal_url())?;
        Ok(Self::new(&base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends the credentials to `login.php` and classifies the reply.
    ///
    /// The reply body is read before the status code matters: the portal
    /// answers a bad password with a 401 whose body still carries the
    /// message the user should see. Only transport failures and bodies
    /// that are not the expected JSON shape come back as `Err`.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginCall> {
        let url = format!("{}login.php", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .with_context(|| format!("Failed to send login request to {url}"))?;

        let status = response.status();
        let reply: LoginReply = response
            .json()
            .await
            .context("Failed to parse login response")?;

        if status.is_success()
            && reply.success
            && let Some(user) = reply.user
        {
            return Ok(LoginCall::Accepted { user });
        }

        Ok(LoginCall::Rejected {
            message: reply.message,
        })
    }
}

/// Resolves the portal base URL with precedence: env > config > default.
/// Validates that the URL is well-formed.
pub fn resolve_portal_url(config_url: Option<&str>) -> Result<String> {
    // Try env var first
    if let Ok(env_url) = std::env::var("STILE_PORTAL_URL") {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    // Try config value
    if let Some(config_url) = config_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    // Default
    Ok(DEFAULT_PORTAL_URL.to_string())
}

/// Validates that a URL is well-formed.
fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid portal URL: {url}"))?;
    Ok(())
}

/// Derives where the portal's pages live from the API base URL.
///
/// The portal serves its pages one level above the API: a base of
/// `http://host/portal/api/` means pages at `http://host/portal/`. A base
/// that doesn't end in an `api` segment is used as-is.
pub fn derive_pages_url(portal_url: &str) -> String {
    let trimmed = portal_url.trim_end_matches('/');
    let base = trimmed.strip_suffix("/api").unwrap_or(trimmed);
    format!("{base}/")
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// 2xx + success + user is the only accepted combination.
    #[tokio::test]
    async fn test_login_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login.php"))
            .and(body_json(json!({"username": "sara", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "user": {"id": 7, "username": "sara", "full_name": "Sara K"}
            })))
            .mount(&server)
            .await;

        let client = PortalClient::new(&format!("{}/api/", server.uri()));
        let call = client.login("sara", "pw").await.unwrap();

        match call {
            LoginCall::Accepted { user } => {
                assert_eq!(user.id_string(), Some("7".to_string()));
                assert_eq!(user.display_name(), "Sara K");
            }
            other => panic!("expected Accepted, got {:?}", other),
        }
    }

    /// A 401 with a JSON body still surfaces the server's message.
    #[tokio::test]
    async fn test_login_rejected_message_survives_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login.php"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "message": "Account locked"
            })))
            .mount(&server)
            .await;

        let client = PortalClient::new(&format!("{}/api/", server.uri()));
        let call = client.login("sara", "pw").await.unwrap();

        assert_eq!(
            call,
            LoginCall::Rejected {
                message: Some("Account locked".to_string())
            }
        );
    }

    /// success:true without a user record is still a rejection.
    #[tokio::test]
    async fn test_login_success_without_user_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login.php"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true})),
            )
            .mount(&server)
            .await;

        let client = PortalClient::new(&format!("{}/api/", server.uri()));
        let call = client.login("sara", "pw").await.unwrap();

        assert_eq!(call, LoginCall::Rejected { message: None });
    }

    /// A body that isn't the expected JSON shape is a hard error,
    /// not a rejection.
    #[tokio::test]
    async fn test_login_unparseable_body_is_err() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login.php"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = PortalClient::new(&format!("{}/api/", server.uri()));
        let result = client.login("sara", "pw").await;

        assert!(result.is_err());
    }

    /// Base URLs without a trailing slash get one.
    #[test]
    fn test_new_normalizes_trailing_slash() {
        let client = PortalClient::new("http://portal.test/api");
        assert_eq!(client.base_url(), "http://portal.test/api/");
    }

    /// URL resolution: config value used when env var is unset.
    #[test]
    fn test_resolve_portal_url_from_config() {
        // Note: assumes STILE_PORTAL_URL is not set in the test environment
        let url = resolve_portal_url(Some("http://portal.test/api/")).unwrap();
        assert_eq!(url, "http://portal.test/api/");
    }

    /// URL resolution: default when neither env nor config is set.
    #[test]
    fn test_resolve_portal_url_default() {
        let url = resolve_portal_url(None).unwrap();
        assert_eq!(url, DEFAULT_PORTAL_URL);
    }

    /// URL resolution: malformed config URL is rejected.
    #[test]
    fn test_resolve_portal_url_invalid() {
        let result = resolve_portal_url(Some("not a url"));
        assert!(result.is_err());
    }

    /// Pages live one level above the API base.
    #[test]
    fn test_derive_pages_url() {
        assert_eq!(
            derive_pages_url("http://localhost/portal/api/"),
            "http://localhost/portal/"
        );
        assert_eq!(
            derive_pages_url("http://localhost/portal/api"),
            "http://localhost/portal/"
        );
        // no api segment to drop
        assert_eq!(
            derive_pages_url("https://portal.example.com/"),
            "https://portal.example.com/"
        );
    }
}
