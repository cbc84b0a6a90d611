//! Query and scan, plus their pagination cursors.
//!
//! Both operations return a decoded `last_evaluated_key` when truncated;
//! feeding it back as `exclusive_start_key` resumes where the previous
//! page stopped.

use aws_sdk_dynamodb::types::{ReturnConsumedCapacity, Select};
use tracing::debug;

use crate::client::capacity_units;
use crate::condition::{encode_conditions, Conditions};
use crate::error::Error;
use crate::value::{decode_item, decode_items, encode_item, Item};
use crate::Ddb;

/// Options for [`Ddb::query`].
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Return only these attributes
    pub attributes_to_get: Option<Vec<String>>,
    /// Maximum number of items to evaluate
    pub limit: Option<i32>,
    /// Strongly consistent read
    pub consistent_read: bool,
    /// Count matching items instead of returning them; ignored when
    /// `attributes_to_get` is set
    pub count: bool,
    /// Sort order along the range key; only an explicit `Some(false)`
    /// switches to descending
    pub scan_index_forward: Option<bool>,
    /// Resume from this key (a prior page's `last_evaluated_key`)
    pub exclusive_start_key: Option<Item>,
    /// Query a local secondary index instead of the primary key
    pub index_name: Option<String>,
}

/// Result of [`Ddb::query`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    /// Number of matching items
    pub count: i32,
    /// Decoded items, in range-key order
    pub items: Vec<Item>,
    /// Cursor for the next page, when the result was truncated
    pub last_evaluated_key: Option<Item>,
    /// Capacity units this call consumed
    pub consumed_capacity: f64,
}

/// Options for [`Ddb::scan`].
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Return only these attributes
    pub attributes_to_get: Option<Vec<String>>,
    /// Maximum number of items to evaluate
    pub limit: Option<i32>,
    /// Count matching items instead of returning them; ignored when
    /// `attributes_to_get` is set
    pub count: bool,
    /// Per-attribute comparisons applied server-side after the read
    pub filter: Option<Conditions>,
    /// Resume from this key (a prior page's `last_evaluated_key`)
    pub exclusive_start_key: Option<Item>,
}

/// Result of [`Ddb::scan`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutput {
    /// Number of items that passed the filter
    pub count: i32,
    /// Number of items evaluated before filtering
    pub scanned_count: i32,
    /// Decoded items
    pub items: Vec<Item>,
    /// Cursor for the next page, when the result was truncated
    pub last_evaluated_key: Option<Item>,
    /// Capacity units this call consumed
    pub consumed_capacity: f64,
}

impl Ddb {
    /// Query items by key conditions.
    ///
    /// `conditions` maps key attributes to comparisons; a bare
    /// [`crate::Value`] converts to an equality comparison, range-style
    /// operators carry their operand lists in order.
    ///
    /// # Example
    /// ```no_run
    /// # use std::collections::HashMap;
    /// # use ddb::{Comparison, Ddb, QueryOptions, Value};
    /// # async fn example(db: &Ddb) -> Result<(), ddb::Error> {
    /// let conditions = HashMap::from([
    ///     ("author".to_string(), Comparison::from(Value::from("u1"))),
    ///     (
    ///         "age".to_string(),
    ///         Comparison::Between(Value::from(10), Value::from(20)),
    ///     ),
    /// ]);
    /// let page = db.query("posts", conditions, QueryOptions::default()).await?;
    /// if let Some(cursor) = page.last_evaluated_key {
    ///     // pass back as exclusive_start_key for the next page
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn query(
        &self,
        table: &str,
        conditions: Conditions,
        options: QueryOptions,
    ) -> Result<QueryOutput, Error> {
        debug!(table, "query");

        let key_conditions = encode_conditions(conditions)?;
        let select = (options.count && options.attributes_to_get.is_none())
            .then_some(Select::Count);
        let start_key = options
            .exclusive_start_key
            .as_ref()
            .map(encode_item)
            .transpose()?;

        let mut builder = self
            .client()
            .query()
            .table_name(table)
            .set_key_conditions(Some(key_conditions))
            .set_attributes_to_get(options.attributes_to_get)
            .set_limit(options.limit)
            .set_consistent_read(options.consistent_read.then_some(true))
            .set_select(select)
            .set_exclusive_start_key(start_key)
            .set_index_name(options.index_name)
            .return_consumed_capacity(ReturnConsumedCapacity::Total);
        if options.scan_index_forward == Some(false) {
            builder = builder.scan_index_forward(false);
        }

        let output = builder.send().await?;

        let items = decode_items(output.items.unwrap_or_default())?;
        let last_evaluated_key = output.last_evaluated_key.map(decode_item).transpose()?;
        let units = capacity_units(output.consumed_capacity.as_ref());
        self.record_capacity(units);
        Ok(QueryOutput {
            count: output.count,
            items,
            last_evaluated_key,
            consumed_capacity: units,
        })
    }

    /// Scan a whole table, optionally filtered.
    ///
    /// The filter's operand rules: `NotNull`/`Null` take none, `Between`
    /// exactly two, `In` at least two, everything else one.
    pub async fn scan(&self, table: &str, options: ScanOptions) -> Result<ScanOutput, Error> {
        debug!(table, "scan");

        let filter = options.filter.map(encode_conditions).transpose()?;
        let select = (options.count && options.attributes_to_get.is_none())
            .then_some(Select::Count);
        let start_key = options
            .exclusive_start_key
            .as_ref()
            .map(encode_item)
            .transpose()?;

        let output = self
            .client()
            .scan()
            .table_name(table)
            .set_scan_filter(filter)
            .set_attributes_to_get(options.attributes_to_get)
            .set_limit(options.limit)
            .set_select(select)
            .set_exclusive_start_key(start_key)
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await?;

        let items = decode_items(output.items.unwrap_or_default())?;
        let last_evaluated_key = output.last_evaluated_key.map(decode_item).transpose()?;
        let units = capacity_units(output.consumed_capacity.as_ref());
        self.record_capacity(units);
        Ok(ScanOutput {
            count: output.count,
            scanned_count: output.scanned_count,
            items,
            last_evaluated_key,
            consumed_capacity: units,
        })
    }
}
