//! Batch operations: one network call carrying many keys or writes.
//!
//! The database may leave part of a batch unprocessed under load; the
//! leftovers come back decoded so the caller can re-submit them. Retrying
//! is the caller's decision, not this layer's.

use aws_sdk_dynamodb::types::{
    DeleteRequest, KeysAndAttributes, PutRequest, ReturnConsumedCapacity, WriteRequest,
};
use std::collections::HashMap;
use tracing::debug;

use crate::client::total_capacity_units;
use crate::error::Error;
use crate::value::{decode_items, encode_item, Item};
use crate::Ddb;

/// One table's part of a batch-get request.
#[derive(Debug, Clone, Default)]
pub struct TableKeys {
    /// Primary keys to fetch
    pub keys: Vec<Item>,
    /// Return only these attributes
    pub attributes_to_get: Option<Vec<String>>,
}

impl TableKeys {
    /// A key set with no attribute projection.
    pub fn new(keys: Vec<Item>) -> Self {
        TableKeys {
            keys,
            attributes_to_get: None,
        }
    }
}

/// One table's part of a batch-get response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchGetPart {
    /// Decoded items, in response order
    pub items: Vec<Item>,
    /// Keys the database did not process; re-submit to finish the read
    pub unprocessed_keys: Vec<Item>,
}

/// Batch-get responses: unwrapped when the request named a single table,
/// keyed by table name otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchGetResponses {
    /// The single requested table's part, directly
    Single(BatchGetPart),
    /// One part per requested table
    PerTable(HashMap<String, BatchGetPart>),
}

impl BatchGetResponses {
    /// Look up one table's part regardless of shape.
    ///
    /// For the `Single` shape any table name matches, since the request
    /// named only one.
    pub fn part(&self, table: &str) -> Option<&BatchGetPart> {
        match self {
            BatchGetResponses::Single(part) => Some(part),
            BatchGetResponses::PerTable(parts) => parts.get(table),
        }
    }
}

/// Result of [`Ddb::batch_get_item`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchGetOutput {
    /// Per-table responses
    pub responses: BatchGetResponses,
    /// Capacity units the whole batch consumed, across tables
    pub consumed_capacity: f64,
}

/// One unprocessed write handed back by the database.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteDirective {
    /// A put that did not happen; the full item
    Put(Item),
    /// A delete that did not happen; the key
    Delete(Item),
}

/// Result of [`Ddb::batch_write_item`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchWriteOutput {
    /// Writes the database did not process, per table; re-submit to finish
    pub unprocessed: HashMap<String, Vec<WriteDirective>>,
    /// Capacity units the whole batch consumed, across tables
    pub consumed_capacity: f64,
}

fn decode_unprocessed_keys(part: Option<&KeysAndAttributes>) -> Result<Vec<Item>, Error> {
    match part {
        Some(ka) => Ok(decode_items(ka.keys().to_vec())?),
        None => Ok(Vec::new()),
    }
}

fn decode_write_request(request: WriteRequest) -> Result<Option<WriteDirective>, Error> {
    if let Some(put) = request.put_request {
        return Ok(Some(WriteDirective::Put(crate::value::decode_item(
            put.item,
        )?)));
    }
    if let Some(delete) = request.delete_request {
        return Ok(Some(WriteDirective::Delete(crate::value::decode_item(
            delete.key,
        )?)));
    }
    Ok(None)
}

impl Ddb {
    /// Fetch many items, possibly across tables, in one call.
    ///
    /// When the request names exactly one table the response is that
    /// table's part directly ([`BatchGetResponses::Single`]); with more
    /// tables the parts come back keyed by table name.
    ///
    /// # Example
    /// ```no_run
    /// # use std::collections::HashMap;
    /// # use ddb::{item, BatchGetResponses, Ddb, TableKeys, Value};
    /// # async fn example(db: &Ddb) -> Result<(), ddb::Error> {
    /// let request = HashMap::from([(
    ///     "users".to_string(),
    ///     TableKeys::new(vec![
    ///         item([("id", Value::from("u1"))]),
    ///         item([("id", Value::from("u2"))]),
    ///     ]),
    /// )]);
    /// let out = db.batch_get_item(request).await?;
    /// if let BatchGetResponses::Single(part) = out.responses {
    ///     assert!(part.unprocessed_keys.is_empty() || !part.items.is_empty());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn batch_get_item(
        &self,
        request: HashMap<String, TableKeys>,
    ) -> Result<BatchGetOutput, Error> {
        debug!(tables = request.len(), "batch get");

        // remember the single-table case before the map is consumed
        let single_table = (request.len() == 1)
            .then(|| request.keys().next().cloned())
            .flatten();

        let mut request_items = HashMap::with_capacity(request.len());
        for (table, part) in request {
            if part.keys.is_empty() {
                return Err(Error::Validation(format!(
                    "batch get for table {:?} has no keys",
                    table
                )));
            }
            let keys = part
                .keys
                .iter()
                .map(encode_item)
                .collect::<Result<Vec<_>, _>>()?;
            request_items.insert(
                table,
                KeysAndAttributes::builder()
                    .set_keys(Some(keys))
                    .set_attributes_to_get(part.attributes_to_get)
                    .build()?,
            );
        }

        let output = self
            .client()
            .batch_get_item()
            .set_request_items(Some(request_items))
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await?;

        let mut unprocessed = output.unprocessed_keys.unwrap_or_default();
        let mut parts = HashMap::new();
        for (table, wire_items) in output.responses.unwrap_or_default() {
            let part = BatchGetPart {
                items: decode_items(wire_items)?,
                unprocessed_keys: decode_unprocessed_keys(unprocessed.get(&table))?,
            };
            unprocessed.remove(&table);
            parts.insert(table, part);
        }
        // tables that came back with nothing but leftovers still get a part
        for (table, ka) in unprocessed {
            parts.insert(
                table,
                BatchGetPart {
                    items: Vec::new(),
                    unprocessed_keys: decode_items(ka.keys().to_vec())?,
                },
            );
        }

        let units = total_capacity_units(output.consumed_capacity.as_deref().unwrap_or_default());
        self.record_capacity(units);

        let responses = match single_table {
            Some(table) => BatchGetResponses::Single(parts.remove(&table).unwrap_or_default()),
            None => BatchGetResponses::PerTable(parts),
        };
        Ok(BatchGetOutput {
            responses,
            consumed_capacity: units,
        })
    }

    /// Put and delete many items, possibly across tables, in one call.
    ///
    /// Puts and deletes aimed at the same table merge into one directive
    /// list: puts first in input order, then deletes.
    pub async fn batch_write_item(
        &self,
        puts: HashMap<String, Vec<Item>>,
        deletes: HashMap<String, Vec<Item>>,
    ) -> Result<BatchWriteOutput, Error> {
        debug!(
            put_tables = puts.len(),
            delete_tables = deletes.len(),
            "batch write"
        );

        let mut request_items: HashMap<String, Vec<WriteRequest>> = HashMap::new();
        for (table, items) in puts {
            if items.is_empty() {
                continue;
            }
            let requests = request_items.entry(table).or_default();
            for item in items {
                requests.push(
                    WriteRequest::builder()
                        .put_request(
                            PutRequest::builder()
                                .set_item(Some(encode_item(&item)?))
                                .build()?,
                        )
                        .build(),
                );
            }
        }
        for (table, keys) in deletes {
            if keys.is_empty() {
                continue;
            }
            let requests = request_items.entry(table).or_default();
            for key in keys {
                requests.push(
                    WriteRequest::builder()
                        .delete_request(
                            DeleteRequest::builder()
                                .set_key(Some(encode_item(&key)?))
                                .build()?,
                        )
                        .build(),
                );
            }
        }
        if request_items.is_empty() {
            return Err(Error::Validation(
                "batch write requires at least one put or delete".into(),
            ));
        }

        let output = self
            .client()
            .batch_write_item()
            .set_request_items(Some(request_items))
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await?;

        let mut leftovers = HashMap::new();
        for (table, requests) in output.unprocessed_items.unwrap_or_default() {
            let mut directives = Vec::with_capacity(requests.len());
            for request in requests {
                if let Some(directive) = decode_write_request(request)? {
                    directives.push(directive);
                }
            }
            leftovers.insert(table, directives);
        }

        let units = total_capacity_units(output.consumed_capacity.as_deref().unwrap_or_default());
        self.record_capacity(units);
        Ok(BatchWriteOutput {
            unprocessed: leftovers,
            consumed_capacity: units,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{item, Value};
    use aws_sdk_dynamodb::types::AttributeValue;

    #[test]
    fn test_decode_write_request_put() {
        let request = WriteRequest::builder()
            .put_request(
                PutRequest::builder()
                    .item("id", AttributeValue::S("a".into()))
                    .build()
                    .unwrap(),
            )
            .build();
        let directive = decode_write_request(request).unwrap().unwrap();
        assert_eq!(directive, WriteDirective::Put(item([("id", Value::from("a"))])));
    }

    #[test]
    fn test_decode_write_request_delete() {
        let request = WriteRequest::builder()
            .delete_request(
                DeleteRequest::builder()
                    .key("id", AttributeValue::N("7".into()))
                    .build()
                    .unwrap(),
            )
            .build();
        let directive = decode_write_request(request).unwrap().unwrap();
        assert_eq!(
            directive,
            WriteDirective::Delete(item([("id", Value::from(7))]))
        );
    }

    #[test]
    fn test_decode_empty_write_request() {
        assert_eq!(
            decode_write_request(WriteRequest::builder().build()).unwrap(),
            None
        );
    }

    #[test]
    fn test_responses_part_lookup() {
        let single = BatchGetResponses::Single(BatchGetPart::default());
        assert!(single.part("anything").is_some());

        let per_table = BatchGetResponses::PerTable(HashMap::from([(
            "users".to_string(),
            BatchGetPart::default(),
        )]));
        assert!(per_table.part("users").is_some());
        assert!(per_table.part("posts").is_none());
    }
}
