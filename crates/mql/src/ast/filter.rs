use crate::{ast::operation::FilterOperation, error::MqlError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    Nor,
}

impl LogicalOperator {
    pub fn operator(&self) -> &'static str {
        match self {
            LogicalOperator::And => "$and",
            LogicalOperator::Or => "$or",
            LogicalOperator::Nor => "$nor",
        }
    }
}

/// Node of a document-store filter tree.
///
/// Trees are immutable once built; transformations such as
/// [`FilterNode::with_null_safety_enforced`] return new trees.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    FieldOperation(FieldOperationFilter),
    Logical(LogicalFilter),
}

/// A single comparison on one field path, e.g. `{"price": {"$gt": 0.5}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOperationFilter {
    field_path: String,
    nullness_sensitive: bool,
    operation: FilterOperation,
}

/// `$and`, `$or` or `$nor` over at least one operand.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalFilter {
    operator: LogicalOperator,
    operands: Vec<FilterNode>,
}

impl FieldOperationFilter {
    /// `nullness_sensitive` marks a comparison whose relational meaning
    /// requires the field to be non-null for the predicate to hold.
    pub fn new(
        field_path: impl Into<String>,
        nullness_sensitive: bool,
        operation: FilterOperation,
    ) -> Self {
        Self {
            field_path: field_path.into(),
            nullness_sensitive,
            operation,
        }
    }

    pub fn field_path(&self) -> &str {
        &self.field_path
    }

    pub fn is_nullness_sensitive(&self) -> bool {
        self.nullness_sensitive
    }

    pub fn operation(&self) -> &FilterOperation {
        &self.operation
    }

    /// Whether this filter is a not-null guard for `path`.
    pub fn is_guard_for(&self, path: &str) -> bool {
        !self.nullness_sensitive && self.operation.is_not_null() && self.field_path == path
    }
}

impl LogicalFilter {
    pub fn new(operator: LogicalOperator, operands: Vec<FilterNode>) -> Result<Self, MqlError> {
        if operands.is_empty() {
            return Err(MqlError::InvariantViolation(format!(
                "{} requires at least one operand",
                operator.operator()
            )));
        }

        Ok(Self { operator, operands })
    }

    /// Caller guarantees `operands` is non-empty.
    pub(crate) fn from_operands(operator: LogicalOperator, operands: Vec<FilterNode>) -> Self {
        debug_assert!(!operands.is_empty());
        Self { operator, operands }
    }

    pub fn operator(&self) -> LogicalOperator {
        self.operator
    }

    pub fn operands(&self) -> &[FilterNode] {
        &self.operands
    }
}

impl FilterNode {
    pub fn field(
        field_path: impl Into<String>,
        nullness_sensitive: bool,
        operation: FilterOperation,
    ) -> Self {
        FilterNode::FieldOperation(FieldOperationFilter::new(
            field_path,
            nullness_sensitive,
            operation,
        ))
    }

    /// `{<path>: {"$ne": null}}`. Guards are never nullness sensitive.
    pub fn not_null_guard(field_path: impl Into<String>) -> Self {
        FilterNode::field(field_path, false, FilterOperation::NotNull)
    }

    pub fn logical(operator: LogicalOperator, operands: Vec<FilterNode>) -> Result<Self, MqlError> {
        LogicalFilter::new(operator, operands).map(FilterNode::Logical)
    }

    pub fn and(operands: Vec<FilterNode>) -> Result<Self, MqlError> {
        FilterNode::logical(LogicalOperator::And, operands)
    }

    pub fn or(operands: Vec<FilterNode>) -> Result<Self, MqlError> {
        FilterNode::logical(LogicalOperator::Or, operands)
    }

    pub fn nor(operands: Vec<FilterNode>) -> Result<Self, MqlError> {
        FilterNode::logical(LogicalOperator::Nor, operands)
    }

    pub fn is_guard_for(&self, path: &str) -> bool {
        match self {
            FilterNode::FieldOperation(f) => f.is_guard_for(path),
            FilterNode::Logical(_) => false,
        }
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterNode::FieldOperation(op) => write!(f, "{op}"),
            FilterNode::Logical(logical) => write!(f, "{logical}"),
        }
    }
}

impl fmt::Display for FieldOperationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field_path, self.operation)
    }
}

impl fmt::Display for LogicalFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = self
            .operands
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}({})", self.operator.operator(), operands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::value::Value;

    #[test]
    fn test_empty_logical_filter_is_rejected() {
        let err = FilterNode::and(vec![]).unwrap_err();
        assert!(matches!(err, MqlError::InvariantViolation(_)));
        assert!(FilterNode::or(vec![]).is_err());
        assert!(FilterNode::nor(vec![]).is_err());
    }

    #[test]
    fn test_guard_shape() {
        let guard = FilterNode::not_null_guard("price");
        match &guard {
            FilterNode::FieldOperation(f) => {
                assert_eq!(f.field_path(), "price");
                assert!(!f.is_nullness_sensitive());
                assert_eq!(f.operation(), &FilterOperation::NotNull);
            }
            other => panic!("Expected field operation, got {:?}", other),
        }
        assert!(guard.is_guard_for("price"));
        assert!(!guard.is_guard_for("title"));

        // A sensitive `$ne null` written by the user is not a guard
        let user = FilterNode::field("price", true, FilterOperation::NotNull);
        assert!(!user.is_guard_for("price"));
    }

    #[test]
    fn test_display() {
        let node = FilterNode::and(vec![
            FilterNode::field("price", true, FilterOperation::Gt(Value::Double(0.5))),
            FilterNode::not_null_guard("price"),
        ])
        .unwrap();

        assert_eq!(node.to_string(), "$and(price $gt 0.5, price $ne null)");
    }
}
