//! The operation façade: a thin, typed front over `aws-sdk-dynamodb`.
//!
//! One [`Ddb`] instance wraps one SDK client and one consumed-capacity
//! counter. All network concerns (signing, retries, TLS, pooling) belong
//! to the SDK client; this layer only marshals values and shapes requests.

mod batch;
mod items;
mod search;
mod tables;

pub use batch::{
    BatchGetOutput, BatchGetPart, BatchGetResponses, BatchWriteOutput, TableKeys, WriteDirective,
};
pub use items::{GetItemOptions, GetItemOutput, WriteOptions, WriteOutput};
pub use search::{QueryOptions, QueryOutput, ScanOptions, ScanOutput};
pub use tables::{
    IndexProjection, KeyAttribute, KeyKind, KeySchema, ListTablesOptions, LocalIndex, TableList,
    Throughput,
};

use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::types::ConsumedCapacity;
use aws_sdk_dynamodb::Client;
use std::sync::atomic::{AtomicU64, Ordering};

/// Connection settings, passed through to the underlying SDK client.
///
/// Every field is optional; anything left unset falls back to the SDK's
/// own resolution chain (environment, profile, instance metadata).
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Static access key id; used only together with `secret_access_key`
    pub access_key_id: Option<String>,
    /// Static secret access key
    pub secret_access_key: Option<String>,
    /// Region name, e.g. `us-east-1`
    pub region: Option<String>,
    /// Endpoint URL override, e.g. `http://localhost:8000` for DynamoDB Local
    pub endpoint: Option<String>,
}

/// A DynamoDB client adapter.
///
/// Translates between the native value model ([`crate::Value`] /
/// [`crate::Item`]) and the database's tagged wire format, issues typed
/// operations through the underlying SDK client, and accumulates the
/// capacity units those operations report.
///
/// Methods take `&self`; wrap the instance in an `Arc` to share it across
/// tasks. The capacity counter is updated atomically, so concurrent
/// completions never lose counts.
///
/// # Example
/// ```no_run
/// use ddb::{item, Config, Ddb, GetItemOptions, Value};
///
/// # async fn example() -> Result<(), ddb::Error> {
/// let db = Ddb::connect(Config {
///     region: Some("us-east-1".into()),
///     ..Config::default()
/// })
/// .await;
///
/// let out = db
///     .get_item(
///         "users",
///         item([("id", Value::from("u1"))]),
///         None,
///         GetItemOptions::default(),
///     )
///     .await?;
/// println!("item: {:?}, cost: {}", out.item, out.consumed_capacity);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Ddb {
    client: Client,
    // f64 bits; f64 has no atomic type of its own
    consumed: AtomicU64,
}

impl Ddb {
    /// Connect with explicit settings.
    ///
    /// Builds an SDK client from `config` and wraps it. Credentials are
    /// only overridden when both halves of the key pair are present.
    pub async fn connect(config: Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = config.region {
            loader = loader.region(Region::new(region));
        }
        if let (Some(id), Some(secret)) = (config.access_key_id, config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(id, secret, None, None, "ddb"));
        }
        if let Some(endpoint) = config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        Self::from_client(Client::new(&loader.load().await))
    }

    /// Wrap a caller-built SDK client.
    ///
    /// Use this to supply custom middleware, timeouts, or a test client
    /// with a canned HTTP layer.
    pub fn from_client(client: Client) -> Self {
        Ddb {
            client,
            consumed: AtomicU64::new(0f64.to_bits()),
        }
    }

    /// The underlying SDK client, for operations this adapter does not
    /// cover.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Running total of capacity units consumed by operations issued
    /// through this instance.
    ///
    /// Monotonically increasing for the lifetime of the instance; failed
    /// operations contribute nothing.
    pub fn consumed_capacity(&self) -> f64 {
        f64::from_bits(self.consumed.load(Ordering::Relaxed))
    }

    /// Fold a completed call's capacity into the running total.
    ///
    /// Called only after the response decoded successfully, so a caller
    /// retrying a decode failure cannot double-count.
    pub(crate) fn record_capacity(&self, units: f64) {
        if units <= 0.0 {
            return;
        }
        // CAS loop; fetch_add does not exist for floats
        let _ = self
            .consumed
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + units).to_bits())
            });
    }
}

pub(crate) fn capacity_units(capacity: Option<&ConsumedCapacity>) -> f64 {
    capacity.and_then(|c| c.capacity_units()).unwrap_or(0.0)
}

pub(crate) fn total_capacity_units(capacity: &[ConsumedCapacity]) -> f64 {
    capacity.iter().filter_map(|c| c.capacity_units()).sum()
}
