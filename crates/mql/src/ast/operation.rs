use model::core::value::Value;
use std::fmt;

static NULL: Value = Value::Null;

/// Comparison applied to a single field of a document.
///
/// Unlike SQL comparisons these are two-valued: a missing field or an
/// explicit null simply does not match.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOperation {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    /// `{"$eq": null}`, matches null and absent fields.
    IsNull,
    /// `{"$ne": null}`, the form used for not-null guards.
    NotNull,
}

impl FilterOperation {
    /// Query operator name as it appears in the rendered document.
    pub fn operator(&self) -> &'static str {
        match self {
            FilterOperation::Eq(_) | FilterOperation::IsNull => "$eq",
            FilterOperation::Ne(_) | FilterOperation::NotNull => "$ne",
            FilterOperation::Gt(_) => "$gt",
            FilterOperation::Gte(_) => "$gte",
            FilterOperation::Lt(_) => "$lt",
            FilterOperation::Lte(_) => "$lte",
        }
    }

    pub fn operand(&self) -> &Value {
        match self {
            FilterOperation::Eq(v)
            | FilterOperation::Ne(v)
            | FilterOperation::Gt(v)
            | FilterOperation::Gte(v)
            | FilterOperation::Lt(v)
            | FilterOperation::Lte(v) => v,
            FilterOperation::IsNull | FilterOperation::NotNull => &NULL,
        }
    }

    pub fn is_not_null(&self) -> bool {
        matches!(self, FilterOperation::NotNull)
    }
}

impl fmt::Display for FilterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator(), self.operand())
    }
}
