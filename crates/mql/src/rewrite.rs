//! Null-safety rewrite of filter trees.
//!
//! Relational comparisons are ternary: `price > 0.5` is unknown when `price`
//! is null, and a predicate that is unknown does not select the row. The
//! document store is two-valued, so once a comparison sits under a negation
//! (`$nor`) a null field would start to match. Every nullness-sensitive
//! comparison is therefore paired with a `{<path>: {"$ne": null}}` guard.

use crate::ast::filter::{FilterNode, LogicalFilter, LogicalOperator};
use tracing::trace;

impl FilterNode {
    /// Returns a new tree in which every nullness-sensitive comparison
    /// reachable from this node is accompanied by a not-null guard.
    ///
    /// * a sensitive field operation becomes `$and(op, guard)`;
    /// * `$and`/`$nor` keep their operands untouched and are wrapped in
    ///   `$and(node, guards...)`, one guard per distinct sensitive path
    ///   found anywhere below them, nested `$or` included, in first-seen
    ///   order;
    /// * `$or` rewrites each operand on its own, since a guard shared by
    ///   all branches would change which branch may match.
    ///
    /// Applying the rewrite to its own output yields the same tree.
    pub fn with_null_safety_enforced(&self) -> FilterNode {
        match self {
            FilterNode::FieldOperation(op) => {
                if !op.is_nullness_sensitive() {
                    return self.clone();
                }
                guarded(self, vec![op.field_path()])
            }
            FilterNode::Logical(logical) => match logical.operator() {
                LogicalOperator::Or => {
                    let operands = logical
                        .operands()
                        .iter()
                        .map(FilterNode::with_null_safety_enforced)
                        .collect();
                    FilterNode::Logical(LogicalFilter::from_operands(
                        LogicalOperator::Or,
                        operands,
                    ))
                }
                operator @ (LogicalOperator::And | LogicalOperator::Nor) => {
                    let mut paths = Vec::new();
                    for operand in logical.operands() {
                        collect_sensitive_paths(operand, &mut paths);
                    }

                    // Negation flips the meaning of a direct operand, so only
                    // a conjunction can already carry its own guards.
                    if operator == LogicalOperator::And {
                        paths.retain(|path| {
                            !logical.operands().iter().any(|o| o.is_guard_for(path))
                        });
                    }

                    if paths.is_empty() {
                        return self.clone();
                    }
                    guarded(self, paths)
                }
            },
        }
    }
}

/// Depth-first, left-to-right collection of distinct sensitive paths
/// through every nested logical node. A guard placed inside a nested `$or`
/// would be negated along with it by an enclosing `$nor`, so its paths are
/// guarded from the outside.
fn collect_sensitive_paths<'a>(node: &'a FilterNode, paths: &mut Vec<&'a str>) {
    match node {
        FilterNode::FieldOperation(op) => {
            if op.is_nullness_sensitive() && !paths.contains(&op.field_path()) {
                paths.push(op.field_path());
            }
        }
        FilterNode::Logical(logical) => {
            for operand in logical.operands() {
                collect_sensitive_paths(operand, paths);
            }
        }
    }
}

fn guarded(node: &FilterNode, paths: Vec<&str>) -> FilterNode {
    let mut operands = Vec::with_capacity(paths.len() + 1);
    operands.push(node.clone());
    for path in paths {
        trace!(field_path = path, "Injecting not-null guard");
        operands.push(FilterNode::not_null_guard(path));
    }

    FilterNode::Logical(LogicalFilter::from_operands(LogicalOperator::And, operands))
}
