// # Data Source Trait
//
// The inbound contract consumed by the resource-management framework: a
// schema declaration and a `read` entry point invoked whenever the record
// must be refreshed (initial creation, manual refresh, plan/apply).

use async_trait::async_trait;

use crate::record::IpAddressesRecord;
use crate::schema::Schema;
use crate::traits::session::ClientSession;

/// Trait for read-only data sources
///
/// The framework serializes `read` calls per record instance, so the record
/// is borrowed mutably for the whole invocation.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Name the data source is registered under
    fn name(&self) -> &'static str;

    /// Attributes exposed by this data source
    fn schema(&self) -> Schema;

    /// Refresh `record` from the remote service
    ///
    /// On error the record is left exactly as it was.
    async fn read(
        &self,
        session: &dyn ClientSession,
        record: &mut IpAddressesRecord,
    ) -> Result<(), crate::Error>;
}
