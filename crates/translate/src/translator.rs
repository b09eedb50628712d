//! Translation of HQL select statements into aggregate commands.

use crate::{
    error::TranslateError,
    shelf::{AstWalkerShelf, TypeTag},
};
use hql_syntax::ast::{
    dotpath::DotPath,
    expr::Expression,
    literal::Literal,
    operator::{ComparisonOperator, JunctionKind},
    predicate::Predicate,
    statement::SelectStatement,
    visitor::SqlAstWalker,
};
use model::{core::value::Value, schema::EntitySchema};
use mql::{
    ast::{command::AggregateCommand, filter::FilterNode, operation::FilterOperation},
    builder::command::AggregateCommandBuilder,
};
use std::rc::Rc;
use tracing::debug;

/// Document field path an attribute reference resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub path: String,
    pub nullness_sensitive: bool,
}

pub const FILTER: TypeTag<FilterNode> = TypeTag::new("filter");
pub const FIELD_PATH: TypeTag<FieldPath> = TypeTag::new("field path");
pub const FIELD_VALUE: TypeTag<Value> = TypeTag::new("field value");
pub const COLLECTION_COMMAND: TypeTag<AggregateCommand> = TypeTag::new("collection command");

/// Walks an HQL AST and builds the equivalent aggregate command.
///
/// Each visit method shelves exactly one value under the tag its caller
/// expects. Errors cannot be returned from visit methods, so the first one
/// is kept here and handed back by the enclosing [`QueryTranslator::delegate`].
pub struct QueryTranslator<'a> {
    schema: &'a EntitySchema,
    shelf: Rc<AstWalkerShelf>,
    alias: Option<String>,
    failure: Option<TranslateError>,
}

impl<'a> QueryTranslator<'a> {
    pub fn new(schema: &'a EntitySchema) -> Self {
        Self {
            schema,
            shelf: Rc::new(AstWalkerShelf::new()),
            alias: None,
            failure: None,
        }
    }

    /// Translates a full statement. The `where` filter is made null-safe.
    pub fn translate(
        &mut self,
        statement: &SelectStatement,
    ) -> Result<AggregateCommand, TranslateError> {
        self.delegate(&COLLECTION_COMMAND, |t| statement.accept(t))
    }

    /// Translates a predicate as written, without null-safety enforcement.
    pub fn translate_predicate(
        &mut self,
        predicate: &Predicate,
    ) -> Result<FilterNode, TranslateError> {
        self.delegate(&FILTER, |t| predicate.accept(t))
    }

    /// Runs a sub-walk and collects the value it shelves under `tag`.
    /// An error raised during the walk takes precedence over the shelf's
    /// own complaint about the missing value.
    fn delegate<T: 'static>(
        &mut self,
        tag: &TypeTag<T>,
        walk: impl FnOnce(&mut Self),
    ) -> Result<T, TranslateError> {
        let shelf = Rc::clone(&self.shelf);
        let result = shelf.unshelve(tag, || walk(self));

        if let Some(failure) = self.failure.take() {
            return Err(failure);
        }
        Ok(result?)
    }

    fn fail(&mut self, error: TranslateError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    fn shelve_result<T: 'static>(&mut self, tag: &TypeTag<T>, result: Result<T, TranslateError>) {
        match result {
            Ok(value) => self.shelf.shelve(tag, value),
            Err(error) => self.fail(error),
        }
    }

    fn translate_select(
        &mut self,
        statement: &SelectStatement,
    ) -> Result<AggregateCommand, TranslateError> {
        if statement.entity.name != self.schema.name {
            return Err(TranslateError::EntityMismatch {
                expected: self.schema.name.clone(),
                found: statement.entity.name.clone(),
            });
        }
        self.alias = statement.alias.as_ref().map(|a| a.name.clone());

        let mut builder = AggregateCommandBuilder::new(self.schema.collection.as_str());

        if let Some(predicate) = &statement.where_clause {
            let filter = self.delegate(&FILTER, |t| predicate.accept(t))?;
            let enforced = filter.with_null_safety_enforced();
            debug!(
                entity = %self.schema.name,
                filter = %filter,
                enforced = %enforced,
                "Translated where clause"
            );
            builder = builder.filter(enforced);
        }

        Ok(builder.project(self.schema.field_paths()).build())
    }

    fn translate_comparison(
        &mut self,
        left: &Expression,
        operator: ComparisonOperator,
        right: &Expression,
    ) -> Result<FilterNode, TranslateError> {
        // Normalize to `<path> <op> <literal>`
        let (path, operator, literal) = if left.is_path() && right.is_literal() {
            (left, operator, right)
        } else if left.is_literal() && right.is_path() {
            (right, operator.mirrored(), left)
        } else {
            return Err(TranslateError::Unsupported(format!(
                "comparison at line {}, column {} must compare one attribute with one literal",
                left.span.line, left.span.column
            )));
        };

        let field = self.delegate(&FIELD_PATH, |t| path.accept(t))?;
        let value = self.delegate(&FIELD_VALUE, |t| literal.accept(t))?;

        let operation = match operator {
            ComparisonOperator::Equal => FilterOperation::Eq(value),
            ComparisonOperator::NotEqual => FilterOperation::Ne(value),
            ComparisonOperator::LessThan => FilterOperation::Lt(value),
            ComparisonOperator::LessOrEqual => FilterOperation::Lte(value),
            ComparisonOperator::GreaterThan => FilterOperation::Gt(value),
            ComparisonOperator::GreaterOrEqual => FilterOperation::Gte(value),
        };

        Ok(FilterNode::field(field.path, field.nullness_sensitive, operation))
    }

    fn translate_junction(
        &mut self,
        kind: JunctionKind,
        predicates: &[Predicate],
    ) -> Result<FilterNode, TranslateError> {
        let operands = predicates
            .iter()
            .map(|p| self.delegate(&FILTER, |t| p.accept(t)))
            .collect::<Result<Vec<_>, _>>()?;

        let node = match kind {
            JunctionKind::And => FilterNode::and(operands)?,
            JunctionKind::Or => FilterNode::or(operands)?,
        };
        Ok(node)
    }

    fn translate_negation(&mut self, predicate: &Predicate) -> Result<FilterNode, TranslateError> {
        let operand = self.delegate(&FILTER, |t| predicate.accept(t))?;
        Ok(FilterNode::nor(vec![operand])?)
    }

    fn translate_null_check(
        &mut self,
        expression: &Expression,
        negated: bool,
    ) -> Result<FilterNode, TranslateError> {
        let field = self.delegate(&FIELD_PATH, |t| expression.accept(t))?;
        let operation = if negated {
            FilterOperation::NotNull
        } else {
            FilterOperation::IsNull
        };

        // A presence check is two-valued already
        Ok(FilterNode::field(field.path, false, operation))
    }

    fn resolve_path(&self, path: &DotPath) -> Result<FieldPath, TranslateError> {
        let path = match &self.alias {
            Some(alias) => path.strip_alias(alias),
            None => path.clone(),
        };
        let name = path.to_string();

        let field = self
            .schema
            .field(&name)
            .ok_or_else(|| TranslateError::UnknownField {
                entity: self.schema.name.clone(),
                field: name.clone(),
            })?;

        Ok(FieldPath {
            path: field.field_path().to_string(),
            nullness_sensitive: field.is_nullness_sensitive(),
        })
    }
}

impl SqlAstWalker for QueryTranslator<'_> {
    fn visit_select_statement(&mut self, statement: &SelectStatement) {
        let result = self.translate_select(statement);
        self.shelve_result(&COLLECTION_COMMAND, result);
    }

    fn visit_comparison(
        &mut self,
        left: &Expression,
        operator: ComparisonOperator,
        right: &Expression,
    ) {
        let result = self.translate_comparison(left, operator, right);
        self.shelve_result(&FILTER, result);
    }

    fn visit_junction(&mut self, kind: JunctionKind, predicates: &[Predicate]) {
        let result = self.translate_junction(kind, predicates);
        self.shelve_result(&FILTER, result);
    }

    fn visit_negation(&mut self, predicate: &Predicate) {
        let result = self.translate_negation(predicate);
        self.shelve_result(&FILTER, result);
    }

    fn visit_null_check(&mut self, expression: &Expression, negated: bool) {
        let result = self.translate_null_check(expression, negated);
        self.shelve_result(&FILTER, result);
    }

    fn visit_grouped(&mut self, predicate: &Predicate) {
        // The inner predicate shelves under the caller's expectation
        predicate.accept(self);
    }

    fn visit_literal(&mut self, literal: &Literal) {
        let value = match literal {
            Literal::String(s) => Value::String(s.clone()),
            Literal::Integer(n) => Value::Int(*n),
            Literal::Long(n) => Value::Long(*n),
            Literal::Double(f) => Value::Double(*f),
            Literal::Decimal(d) => Value::Decimal(d.clone()),
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Null => Value::Null,
        };
        self.shelf.shelve(&FIELD_VALUE, value);
    }

    fn visit_path(&mut self, path: &DotPath) {
        let result = self.resolve_path(path);
        self.shelve_result(&FIELD_PATH, result);
    }

    fn visit_function_call(&mut self, name: &str, _arguments: &[Expression]) {
        self.fail(TranslateError::Unsupported(format!("function call '{name}'")));
    }
}

/// Translates a parsed statement against the schema of its entity.
pub fn translate_statement(
    statement: &SelectStatement,
    schema: &EntitySchema,
) -> Result<AggregateCommand, TranslateError> {
    schema.validate()?;

    let command = QueryTranslator::new(schema).translate(statement)?;
    debug!(
        entity = %schema.name,
        collection = %command.collection,
        stages = command.pipeline.len(),
        "Translated statement"
    );

    Ok(command)
}

/// Parses and translates an HQL query.
pub fn translate_query(
    query: &str,
    schema: &EntitySchema,
) -> Result<AggregateCommand, TranslateError> {
    let statement = hql_syntax::parse(query)?;
    translate_statement(&statement, schema)
}

/// Translates only the `where` clause of a statement, as written, without
/// null-safety enforcement. Returns `None` when there is no `where` clause.
pub fn translate_filter(
    statement: &SelectStatement,
    schema: &EntitySchema,
) -> Result<Option<FilterNode>, TranslateError> {
    schema.validate()?;
    if statement.entity.name != schema.name {
        return Err(TranslateError::EntityMismatch {
            expected: schema.name.clone(),
            found: statement.entity.name.clone(),
        });
    }

    let Some(predicate) = &statement.where_clause else {
        return Ok(None);
    };

    let mut translator = QueryTranslator::new(schema);
    translator.alias = statement.alias.as_ref().map(|a| a.name.clone());
    translator.translate_predicate(predicate).map(Some)
}
