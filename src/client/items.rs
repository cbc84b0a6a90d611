//! Single-item operations: get, put, delete, update.
//!
//! Keys are plain [`Item`]s; where an operation takes a separate hash and
//! range part, the two maps are merged into one key mapping before
//! encoding.

use aws_sdk_dynamodb::types::{ReturnConsumedCapacity, ReturnValue};
use tracing::debug;

use crate::client::capacity_units;
use crate::condition::{encode_expected, encode_updates, AttributeUpdates, ExpectedClauses};
use crate::error::Error;
use crate::value::{decode_item, encode_item, Item};
use crate::Ddb;

/// Options for [`Ddb::get_item`].
#[derive(Debug, Clone, Default)]
pub struct GetItemOptions {
    /// Return only these attributes
    pub attributes_to_get: Option<Vec<String>>,
    /// Strongly consistent read
    pub consistent_read: bool,
}

/// Result of [`Ddb::get_item`].
#[derive(Debug, Clone, PartialEq)]
pub struct GetItemOutput {
    /// The decoded item, or `None` when no item matched the key
    pub item: Option<Item>,
    /// Capacity units this call consumed
    pub consumed_capacity: f64,
}

/// Options shared by the write operations (put, delete, update).
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Per-attribute preconditions gating the write
    pub expected: Option<ExpectedClauses>,
    /// Which attribute values to echo back (e.g. `ALL_OLD`)
    pub return_values: Option<ReturnValue>,
}

impl WriteOptions {
    /// Options asking for the item's prior attributes.
    pub fn return_all_old() -> Self {
        WriteOptions {
            expected: None,
            return_values: Some(ReturnValue::AllOld),
        }
    }
}

/// Result of a put, delete or update.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutput {
    /// Echoed attributes, present when `return_values` asked for them
    pub attributes: Option<Item>,
    /// Capacity units this call consumed
    pub consumed_capacity: f64,
}

fn merge_key(hash: Item, range: Option<Item>) -> Item {
    let mut key = hash;
    if let Some(range) = range {
        key.extend(range);
    }
    key
}

impl Ddb {
    /// Get one item by primary key.
    ///
    /// `hash` and `range` are merged into a single key mapping; pass
    /// `None` for `range` on hash-only tables.
    ///
    /// # Example
    /// ```no_run
    /// # use ddb::{item, Ddb, GetItemOptions, Value};
    /// # async fn example(db: &Ddb) -> Result<(), ddb::Error> {
    /// let out = db
    ///     .get_item(
    ///         "posts",
    ///         item([("author", Value::from("u1"))]),
    ///         Some(item([("posted_at", Value::from(1700000000))])),
    ///         GetItemOptions {
    ///             consistent_read: true,
    ///             ..GetItemOptions::default()
    ///         },
    ///     )
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_item(
        &self,
        table: &str,
        hash: Item,
        range: Option<Item>,
        options: GetItemOptions,
    ) -> Result<GetItemOutput, Error> {
        debug!(table, "get item");

        let key = encode_item(&merge_key(hash, range))?;
        let output = self
            .client()
            .get_item()
            .table_name(table)
            .set_key(Some(key))
            .set_attributes_to_get(options.attributes_to_get)
            .set_consistent_read(options.consistent_read.then_some(true))
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await?;

        let item = output.item.map(decode_item).transpose()?;
        let units = capacity_units(output.consumed_capacity.as_ref());
        self.record_capacity(units);
        Ok(GetItemOutput {
            item,
            consumed_capacity: units,
        })
    }

    /// Create an item, or completely replace the one with the same key.
    ///
    /// With `expected` set, the write only happens when every clause
    /// holds; with `return_values` set, the prior attributes come back
    /// decoded.
    pub async fn put_item(
        &self,
        table: &str,
        item: Item,
        options: WriteOptions,
    ) -> Result<WriteOutput, Error> {
        debug!(table, "put item");

        let encoded = encode_item(&item)?;
        let expected = options.expected.map(encode_expected).transpose()?;
        let output = self
            .client()
            .put_item()
            .table_name(table)
            .set_item(Some(encoded))
            .set_expected(expected)
            .set_return_values(options.return_values)
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await?;

        let attributes = output.attributes.map(decode_item).transpose()?;
        let units = capacity_units(output.consumed_capacity.as_ref());
        self.record_capacity(units);
        Ok(WriteOutput {
            attributes,
            consumed_capacity: units,
        })
    }

    /// Delete one item by primary key, optionally guarded by `expected`
    /// clauses.
    pub async fn delete_item(
        &self,
        table: &str,
        hash: Item,
        range: Option<Item>,
        options: WriteOptions,
    ) -> Result<WriteOutput, Error> {
        debug!(table, "delete item");

        let key = encode_item(&merge_key(hash, range))?;
        let expected = options.expected.map(encode_expected).transpose()?;
        let output = self
            .client()
            .delete_item()
            .table_name(table)
            .set_key(Some(key))
            .set_expected(expected)
            .set_return_values(options.return_values)
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await?;

        let attributes = output.attributes.map(decode_item).transpose()?;
        let units = capacity_units(output.consumed_capacity.as_ref());
        self.record_capacity(units);
        Ok(WriteOutput {
            attributes,
            consumed_capacity: units,
        })
    }

    /// Apply per-attribute update orders to one item.
    ///
    /// `key` is the full primary key mapping. Each update carries a value
    /// and/or an action (`PUT`, `ADD`, `DELETE`); an absent action takes
    /// the database default.
    ///
    /// # Example
    /// ```no_run
    /// # use std::collections::HashMap;
    /// # use ddb::{item, AttributeUpdate, Ddb, Value, WriteOptions};
    /// # async fn example(db: &Ddb) -> Result<(), ddb::Error> {
    /// let updates = HashMap::from([
    ///     ("views".to_string(), AttributeUpdate::add(1)),
    ///     ("draft".to_string(), AttributeUpdate::delete()),
    /// ]);
    /// db.update_item(
    ///     "posts",
    ///     item([("id", Value::from("p1"))]),
    ///     updates,
    ///     WriteOptions::default(),
    /// )
    /// .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update_item(
        &self,
        table: &str,
        key: Item,
        updates: AttributeUpdates,
        options: WriteOptions,
    ) -> Result<WriteOutput, Error> {
        debug!(table, "update item");

        let key = encode_item(&key)?;
        let updates = encode_updates(updates)?;
        let expected = options.expected.map(encode_expected).transpose()?;
        let output = self
            .client()
            .update_item()
            .table_name(table)
            .set_key(Some(key))
            .set_attribute_updates(Some(updates))
            .set_expected(expected)
            .set_return_values(options.return_values)
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await?;

        let attributes = output.attributes.map(decode_item).transpose()?;
        let units = capacity_units(output.consumed_capacity.as_ref());
        self.record_capacity(units);
        Ok(WriteOutput {
            attributes,
            consumed_capacity: units,
        })
    }
}
