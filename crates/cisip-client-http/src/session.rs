//! Pre-authenticated CIS session

use cisip_core::config::{CisConfig, Visibility};
use cisip_core::traits::{ClientSession, IpListClient};
use cisip_core::{Error, Result};
use thiserror::Error as ThisError;

use crate::client::CisIpApiV1;

/// Reasons a session cannot produce a CIS IP client
///
/// Decided once when the session is built and reported on every
/// acquisition afterwards.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum CisSessionError {
    /// No credentials were configured
    #[error(
        "ibmcloud_api_key or bluemix_api_key or iam_token and iam_refresh_token must be provided. Please see the documentation on how to configure it"
    )]
    MissingCredentials,

    /// Private endpoints were requested
    #[error("CIS Service doesnt support private endpoints.")]
    PrivateEndpoint,

    /// The client could not be configured
    #[error("[ERROR] Error occured while configuring CIS IP service: {0}")]
    Configuration(String),
}

/// Session holding a configured CIS IP client
///
/// # Example
///
/// ```rust,no_run
/// use cisip_client_http::CisSession;
/// use cisip_core::config::CisConfig;
/// use cisip_core::{IpAddressesRecord, IpListSynchronizer};
///
/// # async fn run() -> cisip_core::Result<()> {
/// let session = CisSession::new(&CisConfig::new("iam-token"));
/// let mut record = IpAddressesRecord::new();
/// IpListSynchronizer::new().refresh(&session, &mut record).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CisSession {
    client: std::result::Result<CisIpApiV1, CisSessionError>,
}

impl CisSession {
    /// Build a session from configuration
    ///
    /// Never fails: configuration problems are kept and surfaced as
    /// [`Error::ClientAcquisition`] when a client is requested.
    pub fn new(config: &CisConfig) -> Self {
        Self {
            client: Self::configure(config),
        }
    }

    fn configure(config: &CisConfig) -> std::result::Result<CisIpApiV1, CisSessionError> {
        if config.iam_token.is_empty() {
            return Err(CisSessionError::MissingCredentials);
        }

        // public-and-private falls through to the public endpoint
        match config.visibility {
            Visibility::Private => return Err(CisSessionError::PrivateEndpoint),
            Visibility::Public | Visibility::PublicAndPrivate => {}
        }

        let endpoint = config.resolved_endpoint();

        CisIpApiV1::new(
            &endpoint,
            config.iam_token.clone(),
            std::time::Duration::from_secs(config.timeout_secs),
        )
        .map_err(|e| CisSessionError::Configuration(e.to_string()))
    }

    /// Configuration problem recorded at construction, if any
    pub fn error(&self) -> Option<&CisSessionError> {
        self.client.as_ref().err()
    }
}

impl ClientSession for CisSession {
    fn cis_ip_client_session(&self) -> Result<Box<dyn IpListClient>> {
        match &self.client {
            Ok(client) => Ok(Box::new(client.clone())),
            Err(e) => Err(Error::client_acquisition(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_fails_acquisition() {
        let session = CisSession::new(&CisConfig::new(""));
        assert_eq!(session.error(), Some(&CisSessionError::MissingCredentials));

        let err = session.cis_ip_client_session().err().unwrap();
        assert!(matches!(err, Error::ClientAcquisition(ref m) if m.starts_with("ibmcloud_api_key")));
    }

    #[test]
    fn private_visibility_fails_acquisition() {
        let config = CisConfig::new("token").with_visibility(Visibility::Private);
        let session = CisSession::new(&config);

        for _ in 0..2 {
            let err = session.cis_ip_client_session().err().unwrap();
            assert_eq!(err.to_string(), "CIS Service doesnt support private endpoints.");
        }
    }

    #[test]
    fn invalid_endpoint_fails_acquisition() {
        let config = CisConfig::new("token").with_endpoint("http://");
        let session = CisSession::new(&config);

        let err = session.cis_ip_client_session().err().unwrap();
        assert!(err
            .to_string()
            .starts_with("[ERROR] Error occured while configuring CIS IP service: "));
    }

    #[test]
    fn public_and_private_visibility_uses_public_endpoint() {
        let config = CisConfig::new("token")
            .with_endpoint("https://api.cis.cloud.ibm.com")
            .with_visibility(Visibility::PublicAndPrivate);
        let session = CisSession::new(&config);

        assert!(session.error().is_none());
        assert!(session.cis_ip_client_session().is_ok());
    }

    #[test]
    fn configured_session_yields_clients() {
        let config = CisConfig::new("token").with_endpoint("https://api.cis.cloud.ibm.com");
        let session = CisSession::new(&config);

        assert!(session.error().is_none());
        assert!(session.cis_ip_client_session().is_ok());
        assert!(session.cis_ip_client_session().is_ok());
    }

    #[test]
    fn token_not_exposed_in_debug() {
        let config = CisConfig::new("secret_token_12345").with_endpoint("https://api.cis.cloud.ibm.com");
        let debug_str = format!("{:?}", CisSession::new(&config));
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("CisIpApiV1"));
    }
}
