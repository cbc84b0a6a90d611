//! Comparison operators, conditional-write clauses and update actions.
//!
//! These are the typed forms of the request fragments that query, scan and
//! the conditional writes share: a comparison is an operator plus its
//! operand list, an expected clause is a per-attribute existence/value
//! precondition, an update is a value plus an action.

use aws_sdk_dynamodb::types::{
    AttributeAction, AttributeValueUpdate, ComparisonOperator, Condition, ExpectedAttributeValue,
};
use std::collections::HashMap;

use crate::error::Error;
use crate::value::{encode_scalar, Value};

/// A per-attribute comparison for query key conditions and scan filters.
///
/// A bare value means equality: `Comparison::from(value)` is
/// `Comparison::Eq(value)`, so condition maps can be built from plain
/// values where no other operator is wanted.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// Equal
    Eq(Value),
    /// Not equal
    Ne(Value),
    /// Less than or equal
    Le(Value),
    /// Less than
    Lt(Value),
    /// Greater than or equal
    Ge(Value),
    /// Greater than
    Gt(Value),
    /// String prefix match
    BeginsWith(Value),
    /// Set/substring containment
    Contains(Value),
    /// Negated containment
    NotContains(Value),
    /// Membership in a list of at least two candidates
    In(Vec<Value>),
    /// Inclusive range; operands stay in `(low, high)` order
    Between(Value, Value),
    /// Attribute exists; takes no operand
    NotNull,
    /// Attribute does not exist; takes no operand
    Null,
}

/// Attribute name to comparison, the native form of key conditions and
/// scan filters.
pub type Conditions = HashMap<String, Comparison>;

impl From<Value> for Comparison {
    fn from(value: Value) -> Self {
        Comparison::Eq(value)
    }
}

impl Comparison {
    fn operator(&self) -> ComparisonOperator {
        match self {
            Comparison::Eq(_) => ComparisonOperator::Eq,
            Comparison::Ne(_) => ComparisonOperator::Ne,
            Comparison::Le(_) => ComparisonOperator::Le,
            Comparison::Lt(_) => ComparisonOperator::Lt,
            Comparison::Ge(_) => ComparisonOperator::Ge,
            Comparison::Gt(_) => ComparisonOperator::Gt,
            Comparison::BeginsWith(_) => ComparisonOperator::BeginsWith,
            Comparison::Contains(_) => ComparisonOperator::Contains,
            Comparison::NotContains(_) => ComparisonOperator::NotContains,
            Comparison::In(_) => ComparisonOperator::In,
            Comparison::Between(_, _) => ComparisonOperator::Between,
            Comparison::NotNull => ComparisonOperator::NotNull,
            Comparison::Null => ComparisonOperator::Null,
        }
    }

    fn operands(&self) -> Result<Vec<&Value>, Error> {
        match self {
            Comparison::Eq(v)
            | Comparison::Ne(v)
            | Comparison::Le(v)
            | Comparison::Lt(v)
            | Comparison::Ge(v)
            | Comparison::Gt(v)
            | Comparison::BeginsWith(v)
            | Comparison::Contains(v)
            | Comparison::NotContains(v) => Ok(vec![v]),
            Comparison::In(vs) => {
                if vs.len() < 2 {
                    return Err(Error::Validation(
                        "IN comparison requires at least two operands".into(),
                    ));
                }
                Ok(vs.iter().collect())
            }
            Comparison::Between(low, high) => Ok(vec![low, high]),
            Comparison::NotNull | Comparison::Null => Ok(Vec::new()),
        }
    }

    pub(crate) fn into_condition(self) -> Result<Condition, Error> {
        let operands = self
            .operands()?
            .into_iter()
            .map(encode_scalar)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Condition::builder()
            .comparison_operator(self.operator())
            .set_attribute_value_list(Some(operands))
            .build()?)
    }
}

pub(crate) fn encode_conditions(
    conditions: Conditions,
) -> Result<HashMap<String, Condition>, Error> {
    conditions
        .into_iter()
        .map(|(name, cmp)| Ok((name, cmp.into_condition()?)))
        .collect()
}

/// A precondition on one attribute for a conditional write.
///
/// With neither field set the attribute is unconstrained, matching a
/// request that simply omits the clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expected {
    /// Require the attribute to exist (`true`) or be absent (`false`)
    pub exists: Option<bool>,
    /// Require the attribute to hold exactly this value
    pub value: Option<Value>,
}

impl Expected {
    /// Precondition: attribute holds exactly `value`.
    pub fn value(value: impl Into<Value>) -> Self {
        Expected {
            exists: None,
            value: Some(value.into()),
        }
    }

    /// Precondition: attribute exists or not.
    pub fn exists(exists: bool) -> Self {
        Expected {
            exists: Some(exists),
            value: None,
        }
    }
}

/// Attribute name to precondition, gating a put, delete or update.
pub type ExpectedClauses = HashMap<String, Expected>;

pub(crate) fn encode_expected(
    expected: ExpectedClauses,
) -> Result<HashMap<String, ExpectedAttributeValue>, Error> {
    let mut encoded = HashMap::with_capacity(expected.len());
    for (name, clause) in expected {
        let value = clause.value.as_ref().map(encode_scalar).transpose()?;
        encoded.insert(
            name,
            ExpectedAttributeValue::builder()
                .set_exists(clause.exists)
                .set_value(value)
                .build(),
        );
    }
    Ok(encoded)
}

/// What an update does with its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    /// Replace the attribute
    Put,
    /// Numeric add / set union
    Add,
    /// Remove the attribute, or subtract from a set
    Delete,
}

impl From<UpdateAction> for AttributeAction {
    fn from(action: UpdateAction) -> Self {
        match action {
            UpdateAction::Put => AttributeAction::Put,
            UpdateAction::Add => AttributeAction::Add,
            UpdateAction::Delete => AttributeAction::Delete,
        }
    }
}

/// One attribute's update order: a value and/or an action.
///
/// An absent action defers to the database default (`PUT`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeUpdate {
    /// New value, operand of the action
    pub value: Option<Value>,
    /// What to do with the value
    pub action: Option<UpdateAction>,
}

impl AttributeUpdate {
    /// Replace the attribute with `value`.
    pub fn put(value: impl Into<Value>) -> Self {
        AttributeUpdate {
            value: Some(value.into()),
            action: Some(UpdateAction::Put),
        }
    }

    /// Add `value` to the attribute (numeric add or set union).
    pub fn add(value: impl Into<Value>) -> Self {
        AttributeUpdate {
            value: Some(value.into()),
            action: Some(UpdateAction::Add),
        }
    }

    /// Remove the attribute entirely.
    pub fn delete() -> Self {
        AttributeUpdate {
            value: None,
            action: Some(UpdateAction::Delete),
        }
    }
}

/// Attribute name to update order.
pub type AttributeUpdates = HashMap<String, AttributeUpdate>;

pub(crate) fn encode_updates(
    updates: AttributeUpdates,
) -> Result<HashMap<String, AttributeValueUpdate>, Error> {
    let mut encoded = HashMap::with_capacity(updates.len());
    for (name, update) in updates {
        let value = update.value.as_ref().map(encode_scalar).transpose()?;
        encoded.insert(
            name,
            AttributeValueUpdate::builder()
                .set_value(value)
                .set_action(update.action.map(Into::into))
                .build(),
        );
    }
    Ok(encoded)
}
