use crate::ast::{
    dotpath::DotPath,
    expr::{Expression, ExpressionKind},
    literal::Literal,
    operator::{ComparisonOperator, JunctionKind},
    predicate::{Predicate, PredicateKind},
    statement::SelectStatement,
};

/// Walker trait for query AST traversal.
///
/// Every method returns `()`: a walker that needs results from a sub-walk has
/// to carry them through its own state. The default bodies descend into child
/// nodes, so a walker only overrides the nodes it cares about.
pub trait SqlAstWalker {
    fn visit_select_statement(&mut self, statement: &SelectStatement) {
        if let Some(predicate) = &statement.where_clause {
            predicate.accept(self);
        }
    }

    fn visit_comparison(
        &mut self,
        left: &Expression,
        _operator: ComparisonOperator,
        right: &Expression,
    ) {
        left.accept(self);
        right.accept(self);
    }

    fn visit_junction(&mut self, _kind: JunctionKind, predicates: &[Predicate]) {
        for predicate in predicates {
            predicate.accept(self);
        }
    }

    fn visit_negation(&mut self, predicate: &Predicate) {
        predicate.accept(self);
    }

    fn visit_null_check(&mut self, expression: &Expression, _negated: bool) {
        expression.accept(self);
    }

    fn visit_grouped(&mut self, predicate: &Predicate) {
        predicate.accept(self);
    }

    fn visit_literal(&mut self, _literal: &Literal) {}

    fn visit_path(&mut self, _path: &DotPath) {}

    fn visit_function_call(&mut self, _name: &str, arguments: &[Expression]) {
        for argument in arguments {
            argument.accept(self);
        }
    }
}

impl SelectStatement {
    pub fn accept<W: SqlAstWalker + ?Sized>(&self, walker: &mut W) {
        walker.visit_select_statement(self);
    }
}

impl Predicate {
    pub fn accept<W: SqlAstWalker + ?Sized>(&self, walker: &mut W) {
        match &self.kind {
            PredicateKind::Comparison {
                left,
                operator,
                right,
            } => walker.visit_comparison(left, *operator, right),
            PredicateKind::Junction { kind, predicates } => {
                walker.visit_junction(*kind, predicates)
            }
            PredicateKind::Negated(inner) => walker.visit_negation(inner),
            PredicateKind::NullCheck {
                expression,
                negated,
            } => walker.visit_null_check(expression, *negated),
            PredicateKind::Grouped(inner) => walker.visit_grouped(inner),
        }
    }
}

impl Expression {
    pub fn accept<W: SqlAstWalker + ?Sized>(&self, walker: &mut W) {
        match &self.kind {
            ExpressionKind::Literal(literal) => walker.visit_literal(literal),
            ExpressionKind::Path(path) => walker.visit_path(path),
            ExpressionKind::FunctionCall { name, arguments } => {
                walker.visit_function_call(name, arguments)
            }
        }
    }
}
