//! CIS IP API v1 client

use async_trait::async_trait;
use cisip_core::traits::{IpListClient, IpsResult, ListIpsOptions};
use cisip_core::{DetailedResponse, Error, Result};
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Path of the list call, relative to the endpoint
const LIST_IPS_PATH: &str = "v1/ips";

/// Header identifying this client to the CIS API
pub const ORIGINAL_USER_AGENT_HEADER: &str = "X-Original-User-Agent";

/// Value sent in [`ORIGINAL_USER_AGENT_HEADER`]
pub const ORIGINAL_USER_AGENT: &str = concat!("cisip/", env!("CARGO_PKG_VERSION"));

/// Response envelope of the CIS API
#[derive(Debug, Deserialize)]
struct ListIpsResp {
    success: bool,
    #[serde(default)]
    errors: Vec<Value>,
    #[serde(default)]
    result: Option<IpsResult>,
}

/// Client for the CIS IP API
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct CisIpApiV1 {
    /// ⚠️ NEVER log this value
    iam_token: String,
    list_ips_url: Url,
    client: reqwest::Client,
}

// Custom Debug implementation that hides the IAM token
impl std::fmt::Debug for CisIpApiV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CisIpApiV1")
            .field("iam_token", &"<REDACTED>")
            .field("list_ips_url", &self.list_ips_url.as_str())
            .finish()
    }
}

impl CisIpApiV1 {
    /// Create a client for `endpoint`
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the endpoint is not a valid base URL or the HTTP
    /// client cannot be built.
    pub fn new(endpoint: &str, iam_token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(endpoint)
            .map_err(|e| Error::config(format!("Invalid CIS endpoint '{}': {}", endpoint, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::config(format!("Invalid CIS endpoint '{}'", endpoint)));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let list_ips_url = base
            .join(LIST_IPS_PATH)
            .map_err(|e| Error::config(format!("Invalid CIS endpoint '{}': {}", endpoint, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ORIGINAL_USER_AGENT_HEADER,
            HeaderValue::from_static(ORIGINAL_USER_AGENT),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            iam_token: iam_token.into(),
            list_ips_url,
            client,
        })
    }

    /// URL the list call is sent to
    pub fn list_ips_url(&self) -> &str {
        self.list_ips_url.as_str()
    }
}

fn status_error(status: reqwest::StatusCode, response: DetailedResponse) -> Error {
    let message = match status.as_u16() {
        401 | 403 => format!(
            "Authentication failed: Invalid IAM token or insufficient permissions. Status: {}",
            status
        ),
        429 => format!("Rate limit exceeded. Please retry later. Status: {}", status),
        500..=599 => format!("CIS server error: {}", status),
        _ => format!("List IPs failed: {}", status),
    };
    Error::remote_request(message, Some(response))
}

fn envelope_errors(errors: &[Value]) -> String {
    errors
        .iter()
        .map(|e| match e.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => e.to_string(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[async_trait]
impl IpListClient for CisIpApiV1 {
    /// List the CIS edge IP ranges
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /v1/ips
    /// Authorization: Bearer <token>
    /// Accept: application/json
    /// X-Original-User-Agent: cisip/<version>
    /// ```
    async fn list_ips(&self, _options: &ListIpsOptions) -> Result<(IpsResult, DetailedResponse)> {
        let response = self
            .client
            .get(self.list_ips_url.clone())
            .bearer_auth(&self.iam_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::remote_request(format!("HTTP request failed: {}", e), None))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::remote_request(
                format!("Failed to read response: {}", e),
                Some(DetailedResponse::new(status.as_u16(), String::new())),
            )
        })?;
        let raw = DetailedResponse::new(status.as_u16(), body);

        if !status.is_success() {
            return Err(status_error(status, raw));
        }

        let envelope: ListIpsResp = match serde_json::from_str(&raw.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                return Err(Error::remote_request(
                    format!("Failed to parse response: {}", e),
                    Some(raw),
                ));
            }
        };

        if !envelope.success {
            return Err(Error::remote_request(
                format!("List IPs failed: {}", envelope_errors(&envelope.errors)),
                Some(raw),
            ));
        }

        Ok((envelope.result.unwrap_or_default(), raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(endpoint: &str) -> Result<CisIpApiV1> {
        CisIpApiV1::new(endpoint, "token", Duration::from_secs(30))
    }

    #[test]
    fn list_url_is_joined_to_endpoint() {
        assert_eq!(
            client("https://api.cis.cloud.ibm.com").unwrap().list_ips_url(),
            "https://api.cis.cloud.ibm.com/v1/ips"
        );
        assert_eq!(
            client("http://127.0.0.1:8080/proxy").unwrap().list_ips_url(),
            "http://127.0.0.1:8080/proxy/v1/ips"
        );
    }

    #[test]
    fn invalid_endpoints_are_rejected() {
        assert!(matches!(client("not a url"), Err(Error::Config(_))));
        assert!(matches!(client("mailto:ops@example.com"), Err(Error::Config(_))));
    }

    #[test]
    fn envelope_with_missing_lists_decodes_empty() {
        let envelope: ListIpsResp =
            serde_json::from_value(json!({ "success": true, "result": {} })).unwrap();
        assert_eq!(envelope.result.unwrap_or_default(), IpsResult::default());
    }

    #[test]
    fn envelope_errors_prefer_messages() {
        let errors = vec![json!({ "code": 10000, "message": "Authentication error" }), json!(7)];
        assert_eq!(envelope_errors(&errors), "Authentication error; 7");
    }

    #[test]
    fn status_errors_carry_response() {
        let raw = DetailedResponse::new(429, "slow down");
        let err = status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, raw.clone());
        assert!(err.to_string().starts_with("Rate limit exceeded"));
        assert_eq!(err.response(), Some(&raw));
    }

    #[test]
    fn user_agent_names_crate_version() {
        assert_eq!(ORIGINAL_USER_AGENT, format!("cisip/{}", env!("CARGO_PKG_VERSION")));
        assert!(HeaderValue::from_str(ORIGINAL_USER_AGENT).is_ok());
    }

    #[test]
    fn token_not_exposed_in_debug() {
        let client = CisIpApiV1::new(
            "https://api.cis.cloud.ibm.com",
            "secret_token_12345",
            Duration::from_secs(30),
        )
        .unwrap();
        assert!(!format!("{:?}", client).contains("secret_token"));
    }
}
