//! Native value model and the codec to DynamoDB's tagged attribute values.
//!
//! A [`Value`] is one of the four wire-representable scalars — number,
//! string, number set, string set — plus [`Value::Null`], which only exists
//! so that item encoding can drop null attributes. Numbers travel as their
//! decimal string form (`{"N": "1.5"}`) to preserve precision and come back
//! as `f64`.

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One record's attribute set, keyed by attribute name.
///
/// Keys are plain items restricted to the key attributes; pagination
/// cursors are plain items too, so a `last_evaluated_key` can be passed
/// straight back as an `exclusive_start_key`.
pub type Item = HashMap<String, Value>;

/// A native attribute value.
///
/// Sequences are homogeneous by construction; there is no way to express a
/// mixed number/string array, so the codec never has to guess a set type.
///
/// Serde serialization is untagged: items round-trip through JSON as plain
/// numbers, strings and arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A number, wire-encoded as its decimal string (`N`)
    N(f64),
    /// A string (`S`)
    S(String),
    /// A number set (`NS`)
    Ns(Vec<f64>),
    /// A string set (`SS`)
    Ss(Vec<String>),
    /// Absent value; dropped by item encoding, rejected in scalar positions
    Null,
}

impl Value {
    /// The wire type tag this value encodes under.
    pub fn tag(&self) -> &'static str {
        match self {
            Value::N(_) => "N",
            Value::S(_) => "S",
            Value::Ns(_) => "NS",
            Value::Ss(_) => "SS",
            Value::Null => "NULL",
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::N(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::N(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::N(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::N(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::S(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::S(s)
    }
}

impl From<Vec<f64>> for Value {
    fn from(ns: Vec<f64>) -> Self {
        Value::Ns(ns)
    }
}

impl From<Vec<String>> for Value {
    fn from(ss: Vec<String>) -> Self {
        Value::Ss(ss)
    }
}

impl From<Vec<&str>> for Value {
    fn from(ss: Vec<&str>) -> Self {
        Value::Ss(ss.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Build an [`Item`] from `(name, value)` pairs.
///
/// # Example
/// ```
/// use ddb::{item, Value};
///
/// let user = item([("id", Value::from("u1")), ("age", Value::from(31))]);
/// assert_eq!(user["age"], Value::N(31.0));
/// ```
pub fn item<K, V, I>(entries: I) -> Item
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Value codec failure.
///
/// Produced locally, never by the service: either a native value cannot be
/// represented on the wire, or a wire value does not fit the native model.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// A null value where a concrete scalar is required
    NullScalar,
    /// A number with no finite wire representation (NaN or infinity)
    NonFiniteNumber(f64),
    /// A wire value tagged with none of `S`, `SS`, `N`, `NS`
    UnsupportedType(&'static str),
    /// An `N`/`NS` payload that does not parse as a number
    InvalidNumber(String),
    /// A per-attribute failure, labeled with the attribute name
    Attribute {
        /// Name of the attribute that failed to convert
        name: String,
        /// The underlying failure
        source: Box<ConversionError>,
    },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::NullScalar => {
                write!(f, "null value in a position that requires a scalar")
            }
            ConversionError::NonFiniteNumber(n) => {
                write!(f, "number has no wire representation: {}", n)
            }
            ConversionError::UnsupportedType(tag) => {
                write!(f, "unsupported attribute type tag: {}", tag)
            }
            ConversionError::InvalidNumber(payload) => {
                write!(f, "invalid numeric payload: {:?}", payload)
            }
            ConversionError::Attribute { name, source } => {
                write!(f, "attribute {:?}: {}", name, source)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

fn encode_number(n: f64) -> Result<String, ConversionError> {
    if !n.is_finite() {
        return Err(ConversionError::NonFiniteNumber(n));
    }
    Ok(n.to_string())
}

fn decode_number(payload: &str) -> Result<f64, ConversionError> {
    payload
        .trim()
        .parse::<f64>()
        .map_err(|_| ConversionError::InvalidNumber(payload.to_string()))
}

/// Encode one native scalar or set as a tagged wire value.
///
/// `Null` is an error here; only [`encode_item`] treats null as "drop the
/// attribute".
pub fn encode_scalar(value: &Value) -> Result<AttributeValue, ConversionError> {
    match value {
        Value::N(n) => Ok(AttributeValue::N(encode_number(*n)?)),
        Value::S(s) => Ok(AttributeValue::S(s.clone())),
        Value::Ns(ns) => {
            let encoded = ns
                .iter()
                .map(|n| encode_number(*n))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AttributeValue::Ns(encoded))
        }
        Value::Ss(ss) => Ok(AttributeValue::Ss(ss.clone())),
        Value::Null => Err(ConversionError::NullScalar),
    }
}

/// Decode one tagged wire value back to a native value.
///
/// Presence is decided by the tag alone, so `{"N": "0"}` and `{"S": ""}`
/// decode to `0` and `""` rather than reading as absent. Tags outside the
/// native model (`B`, `BOOL`, `M`, `L`, …) are conversion errors.
pub fn decode_scalar(value: &AttributeValue) -> Result<Value, ConversionError> {
    match value {
        AttributeValue::S(s) => Ok(Value::S(s.clone())),
        AttributeValue::Ss(ss) => Ok(Value::Ss(ss.clone())),
        AttributeValue::N(n) => Ok(Value::N(decode_number(n)?)),
        AttributeValue::Ns(ns) => {
            let decoded = ns
                .iter()
                .map(|n| decode_number(n))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Ns(decoded))
        }
        other => Err(ConversionError::UnsupportedType(wire_tag(other))),
    }
}

fn wire_tag(value: &AttributeValue) -> &'static str {
    match value {
        AttributeValue::S(_) => "S",
        AttributeValue::N(_) => "N",
        AttributeValue::Ss(_) => "SS",
        AttributeValue::Ns(_) => "NS",
        AttributeValue::B(_) => "B",
        AttributeValue::Bs(_) => "BS",
        AttributeValue::Bool(_) => "BOOL",
        AttributeValue::Null(_) => "NULL",
        AttributeValue::M(_) => "M",
        AttributeValue::L(_) => "L",
        _ => "unknown",
    }
}

fn attribute_error(name: &str, source: ConversionError) -> ConversionError {
    ConversionError::Attribute {
        name: name.to_string(),
        source: Box::new(source),
    }
}

/// Encode a whole item, dropping null-valued attributes.
///
/// The first attribute that fails aborts the whole item; a partial encode
/// is never returned.
pub fn encode_item(item: &Item) -> Result<HashMap<String, AttributeValue>, ConversionError> {
    let mut encoded = HashMap::with_capacity(item.len());
    for (name, value) in item {
        if let Value::Null = value {
            continue;
        }
        let attr = encode_scalar(value).map_err(|e| attribute_error(name, e))?;
        encoded.insert(name.clone(), attr);
    }
    Ok(encoded)
}

/// Decode a whole wire item; any undecodable attribute fails the item.
pub fn decode_item(item: HashMap<String, AttributeValue>) -> Result<Item, ConversionError> {
    let mut decoded = HashMap::with_capacity(item.len());
    for (name, attr) in item {
        let value = decode_scalar(&attr).map_err(|e| attribute_error(&name, e))?;
        decoded.insert(name, value);
    }
    Ok(decoded)
}

/// Decode an ordered sequence of wire items, preserving order and aborting
/// on the first failure.
pub fn decode_items(
    items: Vec<HashMap<String, AttributeValue>>,
) -> Result<Vec<Item>, ConversionError> {
    items.into_iter().map(decode_item).collect()
}
