//! Table administration: create, update, delete, describe, list.
//!
//! These operations only shape structural requests; table lifecycle
//! semantics (status transitions, billing) are the database's own.

use aws_sdk_dynamodb::types::{
    AttributeDefinition, KeySchemaElement, KeyType, LocalSecondaryIndex, Projection,
    ProjectionType, ProvisionedThroughput, ScalarAttributeType, TableDescription,
};
use tracing::debug;

use crate::error::Error;
use crate::Ddb;

/// Scalar type of a key attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// String key (`S`)
    String,
    /// Number key (`N`)
    Number,
}

impl KeyKind {
    /// The wire type tag for this key kind.
    pub fn tag(self) -> &'static str {
        match self {
            KeyKind::String => "S",
            KeyKind::Number => "N",
        }
    }
}

impl From<KeyKind> for ScalarAttributeType {
    fn from(kind: KeyKind) -> Self {
        match kind {
            KeyKind::String => ScalarAttributeType::S,
            KeyKind::Number => ScalarAttributeType::N,
        }
    }
}

/// One key attribute: a name and its scalar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    /// Attribute name
    pub name: String,
    /// Attribute scalar type
    pub kind: KeyKind,
}

impl KeyAttribute {
    /// A new key attribute.
    pub fn new(name: impl Into<String>, kind: KeyKind) -> Self {
        KeyAttribute {
            name: name.into(),
            kind,
        }
    }
}

/// A table's primary key structure: a hash attribute and an optional
/// range attribute.
///
/// The hash component is required by construction; an empty attribute
/// name still fails with [`Error::Validation`] before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    /// Hash (partition) key attribute
    pub hash: KeyAttribute,
    /// Optional range (sort) key attribute
    pub range: Option<KeyAttribute>,
}

impl KeySchema {
    /// A hash-only key schema.
    pub fn hash(name: impl Into<String>, kind: KeyKind) -> Self {
        KeySchema {
            hash: KeyAttribute::new(name, kind),
            range: None,
        }
    }

    /// Add a range key attribute.
    pub fn range(mut self, name: impl Into<String>, kind: KeyKind) -> Self {
        self.range = Some(KeyAttribute::new(name, kind));
        self
    }
}

/// What a local secondary index projects into itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IndexProjection {
    /// Key attributes only (the default)
    #[default]
    KeysOnly,
    /// Every attribute
    All,
    /// Key attributes plus the named ones
    Include(Vec<String>),
}

/// A local secondary index: the primary hash key plus this index's own
/// range attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIndex {
    /// Index name
    pub name: String,
    /// The index's range attribute
    pub attribute: KeyAttribute,
    /// Projected attributes
    pub projection: IndexProjection,
}

/// Provisioned read/write throughput.
///
/// Fields are applied independently; the SDK reports an incomplete pair
/// as a build error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Throughput {
    /// Read capacity units
    pub read: Option<i64>,
    /// Write capacity units
    pub write: Option<i64>,
}

impl Throughput {
    /// Throughput with both halves set.
    pub fn new(read: i64, write: i64) -> Self {
        Throughput {
            read: Some(read),
            write: Some(write),
        }
    }

    fn is_set(&self) -> bool {
        self.read.is_some() || self.write.is_some()
    }

    fn build(self) -> Result<ProvisionedThroughput, Error> {
        Ok(ProvisionedThroughput::builder()
            .set_read_capacity_units(self.read)
            .set_write_capacity_units(self.write)
            .build()?)
    }
}

/// Options for [`Ddb::list_tables`].
#[derive(Debug, Clone, Default)]
pub struct ListTablesOptions {
    /// Maximum number of names to return
    pub limit: Option<i32>,
    /// Resume listing after this table name
    pub exclusive_start_table_name: Option<String>,
}

/// Result of [`Ddb::list_tables`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableList {
    /// Table names, in listing order
    pub names: Vec<String>,
    /// Cursor for the next page, when the listing was truncated
    pub last_evaluated_table_name: Option<String>,
}

fn key_element(attribute: &KeyAttribute, key_type: KeyType) -> Result<KeySchemaElement, Error> {
    if attribute.name.is_empty() {
        return Err(Error::Validation(format!(
            "{} key attribute name is empty",
            match key_type {
                KeyType::Range => "range",
                _ => "hash",
            }
        )));
    }
    Ok(KeySchemaElement::builder()
        .attribute_name(&attribute.name)
        .key_type(key_type)
        .build()?)
}

fn attribute_definition(attribute: &KeyAttribute) -> Result<AttributeDefinition, Error> {
    Ok(AttributeDefinition::builder()
        .attribute_name(&attribute.name)
        .attribute_type(attribute.kind.into())
        .build()?)
}

fn index_projection(projection: IndexProjection) -> Result<Projection, Error> {
    let builder = Projection::builder();
    Ok(match projection {
        IndexProjection::KeysOnly => builder.projection_type(ProjectionType::KeysOnly).build(),
        IndexProjection::All => builder.projection_type(ProjectionType::All).build(),
        IndexProjection::Include(attributes) => {
            if attributes.is_empty() {
                return Err(Error::Validation(
                    "INCLUDE projection requires at least one attribute".into(),
                ));
            }
            builder
                .projection_type(ProjectionType::Include)
                .set_non_key_attributes(Some(attributes))
                .build()
        }
    })
}

impl Ddb {
    /// Create a table.
    ///
    /// Builds attribute definitions and the key schema from the hash/range
    /// pair; each local secondary index contributes its own attribute
    /// definition and a composite key schema of the primary hash key plus
    /// the index's range attribute.
    ///
    /// Returns the created table's description.
    pub async fn create_table(
        &self,
        table: &str,
        schema: KeySchema,
        local_indexes: Vec<LocalIndex>,
        throughput: Throughput,
    ) -> Result<Option<TableDescription>, Error> {
        debug!(table, "create table");

        let hash_element = key_element(&schema.hash, KeyType::Hash)?;
        let mut attribute_definitions = vec![attribute_definition(&schema.hash)?];
        let mut key_schema = vec![hash_element.clone()];
        if let Some(range) = &schema.range {
            key_schema.push(key_element(range, KeyType::Range)?);
            attribute_definitions.push(attribute_definition(range)?);
        }

        let mut indexes = Vec::with_capacity(local_indexes.len());
        for index in local_indexes {
            attribute_definitions.push(attribute_definition(&index.attribute)?);
            indexes.push(
                LocalSecondaryIndex::builder()
                    .index_name(&index.name)
                    .key_schema(hash_element.clone())
                    .key_schema(key_element(&index.attribute, KeyType::Range)?)
                    .projection(index_projection(index.projection)?)
                    .build()?,
            );
        }

        let mut builder = self
            .client()
            .create_table()
            .table_name(table)
            .set_attribute_definitions(Some(attribute_definitions))
            .set_key_schema(Some(key_schema))
            .set_local_secondary_indexes((!indexes.is_empty()).then_some(indexes));
        if throughput.is_set() {
            builder = builder.provisioned_throughput(throughput.build()?);
        }

        let output = builder.send().await?;
        Ok(output.table_description)
    }

    /// Update a table's provisioned throughput.
    pub async fn update_table(
        &self,
        table: &str,
        throughput: Throughput,
    ) -> Result<Option<TableDescription>, Error> {
        debug!(table, "update table");

        let mut builder = self.client().update_table().table_name(table);
        if throughput.is_set() {
            builder = builder.provisioned_throughput(throughput.build()?);
        }
        let output = builder.send().await?;
        Ok(output.table_description)
    }

    /// Delete a table and all of its items.
    pub async fn delete_table(&self, table: &str) -> Result<Option<TableDescription>, Error> {
        debug!(table, "delete table");

        let output = self.client().delete_table().table_name(table).send().await?;
        Ok(output.table_description)
    }

    /// Describe a table: status, key schema, creation time.
    pub async fn describe_table(&self, table: &str) -> Result<Option<TableDescription>, Error> {
        let output = self
            .client()
            .describe_table()
            .table_name(table)
            .send()
            .await?;
        Ok(output.table)
    }

    /// List table names, with optional pagination.
    pub async fn list_tables(&self, options: ListTablesOptions) -> Result<TableList, Error> {
        let output = self
            .client()
            .list_tables()
            .set_limit(options.limit)
            .set_exclusive_start_table_name(options.exclusive_start_table_name)
            .send()
            .await?;
        Ok(TableList {
            names: output.table_names.unwrap_or_default(),
            last_evaluated_table_name: output.last_evaluated_table_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_schema_builder() {
        let schema = KeySchema::hash("id", KeyKind::String).range("ts", KeyKind::Number);
        assert_eq!(schema.hash.name, "id");
        assert_eq!(schema.range.as_ref().unwrap().kind, KeyKind::Number);
    }

    #[test]
    fn test_key_kind_tags() {
        assert_eq!(KeyKind::String.tag(), "S");
        assert_eq!(KeyKind::Number.tag(), "N");
    }

    #[test]
    fn test_empty_hash_name_is_a_validation_error() {
        let err = key_element(&KeyAttribute::new("", KeyKind::String), KeyType::Hash).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_include_projection_requires_attributes() {
        assert!(index_projection(IndexProjection::Include(vec![])).is_err());

        let projection =
            index_projection(IndexProjection::Include(vec!["price".to_string()])).unwrap();
        assert_eq!(projection.projection_type(), Some(&ProjectionType::Include));
        assert_eq!(projection.non_key_attributes(), ["price".to_string()]);
    }

    #[test]
    fn test_default_projection_is_keys_only() {
        let projection = index_projection(IndexProjection::default()).unwrap();
        assert_eq!(
            projection.projection_type(),
            Some(&ProjectionType::KeysOnly)
        );
    }

    #[test]
    fn test_throughput_halves_are_independent() {
        assert!(!Throughput::default().is_set());
        let read_only = Throughput {
            read: Some(5),
            write: None,
        };
        assert!(read_only.is_set());
        // incomplete pair surfaces the SDK's build error
        assert!(matches!(read_only.build(), Err(Error::BuildError(_))));
        assert!(Throughput::new(5, 10).build().is_ok());
    }
}
