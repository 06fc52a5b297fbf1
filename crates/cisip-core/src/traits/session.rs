// # Client Session Trait
//
// A session is a pre-authenticated handle to the cloud control plane. It is
// created and torn down by the surrounding framework and only borrowed by the
// data source for the duration of one read.
//
// ## Implementations
//
// - HTTP: `cisip-client-http` crate (`CisSession`)
// - Tests: in-memory doubles under `tests/common`

use crate::traits::ip_client::IpListClient;

/// Trait for authenticated sessions
///
/// # Acquisition Errors
///
/// A session may be unable to produce a client for this API surface
/// (missing credentials, unsupported endpoint visibility, account tier).
/// Implementations report that as [`crate::Error::ClientAcquisition`] and
/// must return the same error on every call; there is no recovery inside
/// the session.
///
/// # Thread Safety
///
/// Implementations must be thread-safe so the framework can share one
/// session between data sources.
pub trait ClientSession: Send + Sync {
    /// Produce a client scoped to the CIS IP API
    ///
    /// Each successful call returns an independent client handle.
    fn cis_ip_client_session(&self) -> Result<Box<dyn IpListClient>, crate::Error>;
}
