//! # DynamoDB client adapter
//!
//! A thin, typed adapter between a small native value model — numbers,
//! strings and homogeneous arrays of either — and Amazon DynamoDB's tagged
//! wire format, with one method per database operation:
//! - Table management (create, update, delete, describe, list)
//! - Item CRUD with conditional writes
//! - Query and scan with typed comparisons and pagination cursors
//! - Batch get and batch write across tables
//! - A per-client running total of consumed capacity units
//!
//! ## Design
//!
//! - **Marshalling first**: the core is the bidirectional codec between
//!   [`Value`]/[`Item`] and tagged attribute values. Numbers travel as
//!   decimal strings and come back as `f64`; arrays are homogeneous by
//!   construction; null attributes are dropped, never encoded.
//! - **Transport delegated**: networking, signing, retries and TLS belong
//!   to the wrapped `aws-sdk-dynamodb` client. A conversion error aborts a
//!   call before anything is sent.
//! - **Typed requests**: every operation takes an explicit options struct;
//!   conditions, preconditions and update orders are enums, not loosely
//!   shaped maps.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use ddb::{item, Config, Ddb, GetItemOptions, Value, WriteOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ddb::Error> {
//!     let db = Ddb::connect(Config {
//!         region: Some("us-east-1".into()),
//!         ..Config::default()
//!     })
//!     .await;
//!
//!     db.put_item(
//!         "users",
//!         item([
//!             ("id", Value::from("u1")),
//!             ("name", Value::from("Ada")),
//!             ("logins", Value::from(7)),
//!         ]),
//!         WriteOptions::default(),
//!     )
//!     .await?;
//!
//!     let out = db
//!         .get_item(
//!             "users",
//!             item([("id", Value::from("u1"))]),
//!             None,
//!             GetItemOptions::default(),
//!         )
//!         .await?;
//!     println!("{:?} ({} capacity units so far)", out.item, db.consumed_capacity());
//!     Ok(())
//! }
//! ```
#![deny(missing_docs)]

mod client;
mod error;

/// Comparison operators, conditional-write clauses and update actions
pub mod condition;

/// Native value model and the tagged-value codec
pub mod value;

pub use client::{
    BatchGetOutput, BatchGetPart, BatchGetResponses, BatchWriteOutput, Config, Ddb,
    GetItemOptions, GetItemOutput, IndexProjection, KeyAttribute, KeyKind, KeySchema,
    ListTablesOptions, LocalIndex, QueryOptions, QueryOutput, ScanOptions, ScanOutput, TableKeys,
    TableList, Throughput, WriteDirective, WriteOptions, WriteOutput,
};
pub use condition::{
    AttributeUpdate, AttributeUpdates, Comparison, Conditions, Expected, ExpectedClauses,
    UpdateAction,
};
pub use error::Error;
pub use value::{
    decode_item, decode_items, decode_scalar, encode_item, encode_scalar, item, ConversionError,
    Item, Value,
};

// the wrapped SDK, for callers that need wire types or raw client access
pub use aws_sdk_dynamodb;
pub use aws_sdk_dynamodb::types::{ReturnValue, TableDescription};
