use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::operation::batch_get_item::BatchGetItemError;
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::delete_table::DeleteTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::list_tables::ListTablesError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::operation::update_table::UpdateTableError;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_runtime_api::http::Response;
use std::error::Error as StdError;
use std::fmt;

use crate::value::ConversionError;

type DynamoGetError = SdkError<GetItemError, Response>;
type DynamoPutError = SdkError<PutItemError, Response>;
type DynamoDeleteItemError = SdkError<DeleteItemError, Response>;
type DynamoUpdateError = SdkError<UpdateItemError, Response>;
type DynamoQueryError = SdkError<QueryError, Response>;
type DynamoScanError = SdkError<ScanError, Response>;
type DynamoBatchGetItemError = SdkError<BatchGetItemError, Response>;
type DynamoBatchWriteItemError = SdkError<BatchWriteItemError, Response>;
type DynamoCreateTableError = SdkError<CreateTableError, Response>;
type DynamoUpdateTableError = SdkError<UpdateTableError, Response>;
type DynamoDeleteTableError = SdkError<DeleteTableError, Response>;
type DynamoDescribeTableError = SdkError<DescribeTableError, Response>;
type DynamoListTablesError = SdkError<ListTablesError, Response>;

/// DynamoDB adapter error
#[derive(Debug)]
pub enum Error {
    /// Native value could not be converted to or from the wire representation
    Conversion(ConversionError),
    /// Malformed operation arguments, reported before any network call
    Validation(String),
    /// DynamoDB request builder error
    BuildError(BuildError),
    /// DynamoDB GetItem operation error
    DynamoGetError(DynamoGetError),
    /// DynamoDB PutItem operation error
    DynamoPutError(DynamoPutError),
    /// DynamoDB DeleteItem operation error
    DynamoDeleteItemError(DynamoDeleteItemError),
    /// DynamoDB UpdateItem operation error
    DynamoUpdateError(DynamoUpdateError),
    /// DynamoDB Query operation error
    DynamoQueryError(DynamoQueryError),
    /// DynamoDB Scan operation error
    DynamoScanError(DynamoScanError),
    /// DynamoDB BatchGetItem operation error
    DynamoBatchGetItemError(DynamoBatchGetItemError),
    /// DynamoDB BatchWriteItem operation error
    DynamoBatchWriteItemError(DynamoBatchWriteItemError),
    /// DynamoDB CreateTable operation error
    DynamoCreateTableError(DynamoCreateTableError),
    /// DynamoDB UpdateTable operation error
    DynamoUpdateTableError(DynamoUpdateTableError),
    /// DynamoDB DeleteTable operation error
    DynamoDeleteTableError(DynamoDeleteTableError),
    /// DynamoDB DescribeTable operation error
    DynamoDescribeTableError(DynamoDescribeTableError),
    /// DynamoDB ListTables operation error
    DynamoListTablesError(DynamoListTablesError),
}

impl Error {
    /// Check if the error is a DynamoDB ConditionalCheckFailedException
    ///
    /// Conditional writes (`expected` clauses on put, delete and update)
    /// fail with this service error when the precondition does not hold.
    ///
    /// # Example
    /// ```no_run
    /// # use ddb::Error;
    /// # fn example(error: Error) {
    /// if error.is_conditional_check_failed() {
    ///     // The guarded write lost the race
    /// }
    /// # }
    /// ```
    pub fn is_conditional_check_failed(&self) -> bool {
        match self {
            Error::DynamoPutError(e) => matches!(
                e.as_service_error(),
                Some(PutItemError::ConditionalCheckFailedException(_))
            ),
            Error::DynamoDeleteItemError(e) => matches!(
                e.as_service_error(),
                Some(DeleteItemError::ConditionalCheckFailedException(_))
            ),
            Error::DynamoUpdateError(e) => matches!(
                e.as_service_error(),
                Some(UpdateItemError::ConditionalCheckFailedException(_))
            ),
            _ => false,
        }
    }

    /// Check if the error came from the value codec
    ///
    /// Conversion errors are always produced locally, either before the
    /// request is sent or while decoding a response; retrying with the same
    /// arguments cannot succeed.
    pub fn is_conversion_error(&self) -> bool {
        matches!(self, Error::Conversion(_))
    }

    /// Check if the error was reported by DynamoDB or its transport
    pub fn is_dynamodb_error(&self) -> bool {
        !matches!(self, Error::Conversion(_) | Error::Validation(_))
    }
}

macro_rules! impl_from_error {
    ($name:ident, $variant:ident) => {
        impl From<$name> for Error {
            fn from(e: $name) -> Self {
                Error::$variant(e)
            }
        }
    };
    ($name:ident) => {
        impl From<$name> for Error {
            fn from(e: $name) -> Self {
                Error::$name(e)
            }
        }
    };
}

impl_from_error!(ConversionError, Conversion);
impl_from_error!(BuildError);
impl_from_error!(DynamoGetError);
impl_from_error!(DynamoPutError);
impl_from_error!(DynamoDeleteItemError);
impl_from_error!(DynamoUpdateError);
impl_from_error!(DynamoQueryError);
impl_from_error!(DynamoScanError);
impl_from_error!(DynamoBatchGetItemError);
impl_from_error!(DynamoBatchWriteItemError);
impl_from_error!(DynamoCreateTableError);
impl_from_error!(DynamoUpdateTableError);
impl_from_error!(DynamoDeleteTableError);
impl_from_error!(DynamoDescribeTableError);
impl_from_error!(DynamoListTablesError);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Conversion(e) => write!(f, "DynamoDB value conversion error: {}", e),
            Error::Validation(msg) => write!(f, "invalid operation arguments: {}", msg),
            Error::BuildError(e) => write!(f, "DynamoDB request builder error: {}", e),
            Error::DynamoGetError(e) => {
                write!(f, "DynamoDB GetItem operation failed: {}", e)
            }
            Error::DynamoPutError(e) => {
                write!(f, "DynamoDB PutItem operation failed: {}", e)
            }
            Error::DynamoDeleteItemError(e) => {
                write!(f, "DynamoDB DeleteItem operation failed: {}", e)
            }
            Error::DynamoUpdateError(e) => {
                write!(f, "DynamoDB UpdateItem operation failed: {}", e)
            }
            Error::DynamoQueryError(e) => {
                write!(f, "DynamoDB Query operation failed: {}", e)
            }
            Error::DynamoScanError(e) => {
                write!(f, "DynamoDB Scan operation failed: {}", e)
            }
            Error::DynamoBatchGetItemError(e) => {
                write!(f, "DynamoDB BatchGetItem operation failed: {}", e)
            }
            Error::DynamoBatchWriteItemError(e) => {
                write!(f, "DynamoDB BatchWriteItem operation failed: {}", e)
            }
            Error::DynamoCreateTableError(e) => {
                write!(f, "DynamoDB CreateTable operation failed: {}", e)
            }
            Error::DynamoUpdateTableError(e) => {
                write!(f, "DynamoDB UpdateTable operation failed: {}", e)
            }
            Error::DynamoDeleteTableError(e) => {
                write!(f, "DynamoDB DeleteTable operation failed: {}", e)
            }
            Error::DynamoDescribeTableError(e) => {
                write!(f, "DynamoDB DescribeTable operation failed: {}", e)
            }
            Error::DynamoListTablesError(e) => {
                write!(f, "DynamoDB ListTables operation failed: {}", e)
            }
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_error_classification() {
        let err = Error::Conversion(ConversionError::NullScalar);
        assert!(err.is_conversion_error());
        assert!(!err.is_dynamodb_error());
        assert!(!err.is_conditional_check_failed());
    }

    #[test]
    fn test_validation_error_classification() {
        let err = Error::Validation("hash key attribute name is empty".into());
        assert!(!err.is_conversion_error());
        assert!(!err.is_dynamodb_error());
    }

    #[test]
    fn test_build_error_conversion() {
        let build_err = BuildError::other("test");
        let err: Error = build_err.into();
        assert!(matches!(err, Error::BuildError(_)));
        assert!(err.is_dynamodb_error());
    }

    #[test]
    fn test_error_display_names_operation() {
        let err = Error::BuildError(BuildError::other("boom"));
        assert!(err.to_string().contains("request builder"));
    }
}
