// # cisipd - CIS IP address refresh
//
// This binary is a THIN integration layer: it reads configuration from the
// environment, builds a session, runs one refresh of the
// `ibm_cis_ip_addresses` data source, stores the record and prints it as
// JSON. All data source logic lives in cisip-core.
//
// ## Configuration
//
// ### Session
// - `IC_IAM_TOKEN` / `IBMCLOUD_IAM_TOKEN`: IAM bearer token (first non-empty wins)
// - `IBMCLOUD_CIS_API_ENDPOINT`: API endpoint (default: https://api.cis.cloud.ibm.com)
// - `CISIP_VISIBILITY`: Endpoint visibility (public, private, public-and-private)
// - `CISIP_HTTP_TIMEOUT_SECS`: HTTP timeout in seconds (default: 30)
//
// ### Refresh
// - `CISIP_IPV6_MAPPING`: Source of ipv6_cidrs (mirror_ipv4, from_ipv6)
// - `CISIP_ID_STRATEGY`: Record id generation (timestamp, monotonic)
//
// ### Record Store
// - `CISIP_STORE_TYPE`: Type of record store (memory, file)
// - `CISIP_STORE_PATH`: Path to record file (for file store)
// - `CISIP_RECORD_KEY`: Key the record is stored under (default: ibm_cis_ip_addresses.default)
//
// ### Logging
// - `CISIP_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export IC_IAM_TOKEN=...
// export CISIP_STORE_TYPE=file
// export CISIP_STORE_PATH=/var/lib/cisip/records.json
//
// cisipd
// ```

use anyhow::Result;
use cisip_client_http::CisSession;
use cisip_core::config::{
    CisConfig, CisipConfig, IdStrategy, Ipv6Mapping, RecordStoreConfig, SyncConfig, Visibility,
};
use cisip_core::{CIS_IP_ADDRESSES, CisIpAddressesDataSource, DataSourceRegistry, state};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CisipExitCode {
    /// Record refreshed and stored
    Success = 0,
    /// Configuration or startup error
    ConfigError = 1,
    /// Refresh or store failure
    RuntimeError = 2,
}

impl From<CisipExitCode> for ExitCode {
    fn from(code: CisipExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    cisip: CisipConfig,
    record_key: String,
    log_level: String,
}

impl Config {
    /// Load configuration through a variable lookup
    fn load(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| var(name).filter(|v| !v.is_empty());

        let iam_token = ["IC_IAM_TOKEN", "IBMCLOUD_IAM_TOKEN"]
            .into_iter()
            .find_map(non_empty)
            .unwrap_or_default();

        let visibility = match non_empty("CISIP_VISIBILITY").as_deref() {
            None | Some("public") => Visibility::Public,
            Some("private") => Visibility::Private,
            Some("public-and-private") => Visibility::PublicAndPrivate,
            Some(other) => anyhow::bail!(
                "CISIP_VISIBILITY '{}' is not valid. \
                Valid values: public, private, public-and-private",
                other
            ),
        };

        let timeout_secs = match non_empty("CISIP_HTTP_TIMEOUT_SECS") {
            Some(s) => s.parse().map_err(|_| {
                anyhow::anyhow!("CISIP_HTTP_TIMEOUT_SECS must be a number of seconds. Got: {}", s)
            })?,
            None => 30,
        };

        let ipv6_mapping = match non_empty("CISIP_IPV6_MAPPING").as_deref() {
            None | Some("mirror_ipv4") => Ipv6Mapping::MirrorIpv4,
            Some("from_ipv6") => Ipv6Mapping::FromIpv6,
            Some(other) => anyhow::bail!(
                "CISIP_IPV6_MAPPING '{}' is not valid. Valid values: mirror_ipv4, from_ipv6",
                other
            ),
        };

        let id_strategy = match non_empty("CISIP_ID_STRATEGY").as_deref() {
            None | Some("timestamp") => IdStrategy::Timestamp,
            Some("monotonic") => IdStrategy::Monotonic,
            Some(other) => anyhow::bail!(
                "CISIP_ID_STRATEGY '{}' is not valid. Valid values: timestamp, monotonic",
                other
            ),
        };

        let store = match non_empty("CISIP_STORE_TYPE").as_deref() {
            None | Some("memory") => RecordStoreConfig::Memory,
            Some("file") => RecordStoreConfig::File {
                path: non_empty("CISIP_STORE_PATH").ok_or_else(|| {
                    anyhow::anyhow!(
                        "CISIP_STORE_PATH is required when CISIP_STORE_TYPE=file. \
                        Set it via: export CISIP_STORE_PATH=/var/lib/cisip/records.json"
                    )
                })?,
            },
            Some(other) => anyhow::bail!(
                "CISIP_STORE_TYPE '{}' is not supported. Supported types: memory, file",
                other
            ),
        };

        let mut cis = CisConfig::new(iam_token).with_visibility(visibility);
        cis.endpoint = non_empty("IBMCLOUD_CIS_API_ENDPOINT");
        cis.timeout_secs = timeout_secs;

        Ok(Self {
            cisip: CisipConfig {
                cis,
                sync: SyncConfig {
                    ipv6_mapping,
                    id_strategy,
                },
                store,
            },
            record_key: non_empty("CISIP_RECORD_KEY")
                .unwrap_or_else(|| format!("{}.default", CIS_IP_ADDRESSES)),
            log_level: non_empty("CISIP_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::load(|name| env::var(name).ok())
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.cisip.validate()?;

        if self.record_key.trim().is_empty() {
            anyhow::bail!("CISIP_RECORD_KEY cannot be blank");
        }

        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "CISIP_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return CisipExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return CisipExitCode::ConfigError.into();
    }

    let log_level = config.level().unwrap_or(Level::INFO);
    // Logs go to stderr so stdout only carries the record
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CisipExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CisipExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(config).await {
            Ok(()) => CisipExitCode::Success,
            Err(e) => {
                error!("Refresh failed: {}", e);
                CisipExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Refresh the record once, store it and print it
async fn run(config: Config) -> Result<()> {
    let registry = DataSourceRegistry::new();
    registry.register(Arc::new(CisIpAddressesDataSource::with_config(config.cisip.sync)));

    let store = state::from_config(&config.cisip.store).await?;
    let mut record = store.get(&config.record_key).await?.unwrap_or_default();

    // The session lives for exactly this run
    let session = CisSession::new(&config.cisip.cis);

    info!("Refreshing {}", config.record_key);
    registry
        .read(CIS_IP_ADDRESSES, &session, &mut record)
        .await?;

    registry
        .schema(CIS_IP_ADDRESSES)?
        .validate_record(&record.attributes())?;

    store.put(&config.record_key, &record).await?;
    store.flush().await?;

    info!(
        "Refreshed {}: {} IPv4, {} IPv6 range(s)",
        config.record_key,
        record.ipv4_cidrs().len(),
        record.ipv6_cidrs().len()
    );

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
