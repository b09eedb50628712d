use crate::{
    ast::{
        dotpath::DotPath,
        expr::{Expression, ExpressionKind},
        ident::Identifier,
        literal::Literal,
        operator::{ComparisonOperator, JunctionKind},
        predicate::{Predicate, PredicateKind},
        span::Span,
        statement::SelectStatement,
    },
    errors::BuildError,
    parser::{HqlParser, Rule},
};
use bigdecimal::BigDecimal;
use pest::{
    Parser,
    iterators::{Pair, Pairs},
};
use std::str::FromStr;
use tracing::debug;

pub type BuildResult<T> = Result<T, BuildError>;

/// Parse HQL text into a typed AST
pub fn parse(input: &str) -> BuildResult<SelectStatement> {
    let mut pairs =
        HqlParser::parse(Rule::statement, input).map_err(BuildError::from_pest_error)?;
    let statement = pairs
        .next()
        .ok_or_else(|| BuildError::syntax("Empty input", Span::new(0, 0, 1, 1)))?;

    let statement = build_statement(statement)?;
    debug!(
        entity = %statement.entity,
        alias = ?statement.alias.as_ref().map(|a| a.name.as_str()),
        has_where = statement.where_clause.is_some(),
        "Parsed HQL statement"
    );

    Ok(statement)
}

fn pair_to_span(pair: &Pair<Rule>) -> Span {
    let span = pair.as_span();
    let (line, column) = span.start_pos().line_col();
    Span::new(span.start(), span.end(), line, column)
}

fn next_inner<'i>(
    pairs: &mut Pairs<'i, Rule>,
    span: Span,
    what: &str,
) -> BuildResult<Pair<'i, Rule>> {
    pairs
        .next()
        .ok_or_else(|| BuildError::syntax(format!("Expected {what}"), span))
}

fn build_statement(pair: Pair<Rule>) -> BuildResult<SelectStatement> {
    let span = pair_to_span(&pair);
    let mut entity = None;
    let mut alias = None;
    let mut where_clause = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::ident | Rule::quoted_ident => {
                let ident = Identifier::from_source(inner.as_str(), pair_to_span(&inner));
                if entity.is_none() {
                    entity = Some(ident);
                } else {
                    alias = Some(ident);
                }
            }
            Rule::where_clause => {
                where_clause = Some(build_where_clause(inner)?);
            }
            _ => {}
        }
    }

    let entity = entity.ok_or_else(|| BuildError::syntax("Missing entity name", span))?;

    Ok(SelectStatement {
        entity,
        alias,
        where_clause,
        span,
    })
}

fn build_where_clause(pair: Pair<Rule>) -> BuildResult<Predicate> {
    let span = pair_to_span(&pair);
    let predicate = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::predicate)
        .ok_or_else(|| BuildError::syntax("Expected predicate after 'where'", span))?;

    build_predicate(predicate)
}

fn build_predicate(pair: Pair<Rule>) -> BuildResult<Predicate> {
    let span = pair_to_span(&pair);

    match pair.as_rule() {
        Rule::predicate | Rule::atom => {
            let mut inner = pair.into_inner();
            build_predicate(next_inner(&mut inner, span, "predicate")?)
        }
        Rule::disjunction => build_junction(pair, JunctionKind::Or, span),
        Rule::conjunction => build_junction(pair, JunctionKind::And, span),
        Rule::negation => build_negation(pair, span),
        Rule::grouped => {
            let inner = pair
                .into_inner()
                .find(|p| p.as_rule() == Rule::predicate)
                .ok_or_else(|| BuildError::syntax("Expected predicate inside parentheses", span))?;
            Ok(Predicate::new(
                PredicateKind::Grouped(Box::new(build_predicate(inner)?)),
                span,
            ))
        }
        Rule::comparison => build_comparison(pair, span),
        Rule::null_check => build_null_check(pair, span),
        rule => Err(BuildError::syntax(
            format!("Unexpected rule in predicate: {:?}", rule),
            span,
        )),
    }
}

fn build_junction(pair: Pair<Rule>, kind: JunctionKind, span: Span) -> BuildResult<Predicate> {
    let mut predicates = pair
        .into_inner()
        .filter(|p| !matches!(p.as_rule(), Rule::kw_and | Rule::kw_or))
        .map(build_predicate)
        .collect::<BuildResult<Vec<_>>>()?;

    // A single operand is not a junction, just pass it through
    if predicates.len() == 1 {
        if let Some(single) = predicates.pop() {
            return Ok(single);
        }
    }

    Ok(Predicate::new(
        PredicateKind::Junction { kind, predicates },
        span,
    ))
}

fn build_negation(pair: Pair<Rule>, span: Span) -> BuildResult<Predicate> {
    let mut inner = pair.into_inner();
    let first = next_inner(&mut inner, span, "predicate")?;

    if first.as_rule() == Rule::kw_not {
        let negated = next_inner(&mut inner, span, "predicate after 'not'")?;
        Ok(Predicate::new(
            PredicateKind::Negated(Box::new(build_predicate(negated)?)),
            span,
        ))
    } else {
        build_predicate(first)
    }
}

fn build_comparison(pair: Pair<Rule>, span: Span) -> BuildResult<Predicate> {
    let mut inner = pair.into_inner();
    let left = build_expression(next_inner(&mut inner, span, "left operand")?)?;
    let op_pair = next_inner(&mut inner, span, "comparison operator")?;
    let operator = match op_pair.as_str() {
        "=" => ComparisonOperator::Equal,
        "<>" | "!=" => ComparisonOperator::NotEqual,
        "<" => ComparisonOperator::LessThan,
        "<=" => ComparisonOperator::LessOrEqual,
        ">" => ComparisonOperator::GreaterThan,
        ">=" => ComparisonOperator::GreaterOrEqual,
        op => {
            return Err(BuildError::syntax(
                format!("Unknown operator: {}", op),
                pair_to_span(&op_pair),
            ));
        }
    };
    let right = build_expression(next_inner(&mut inner, span, "right operand")?)?;

    Ok(Predicate::new(
        PredicateKind::Comparison {
            left,
            operator,
            right,
        },
        span,
    ))
}

fn build_null_check(pair: Pair<Rule>, span: Span) -> BuildResult<Predicate> {
    let mut inner = pair.into_inner();
    let expression = build_expression(next_inner(&mut inner, span, "operand")?)?;

    // "is" ~ "not"? ~ "null"
    let negated = inner.any(|p| p.as_rule() == Rule::kw_not);

    Ok(Predicate::new(
        PredicateKind::NullCheck {
            expression,
            negated,
        },
        span,
    ))
}

fn build_expression(pair: Pair<Rule>) -> BuildResult<Expression> {
    let span = pair_to_span(&pair);

    match pair.as_rule() {
        Rule::expression => {
            let mut inner = pair.into_inner();
            build_expression(next_inner(&mut inner, span, "expression")?)
        }
        Rule::literal => {
            let mut inner = pair.into_inner();
            let literal = build_literal(next_inner(&mut inner, span, "literal")?)?;
            Ok(Expression::new(ExpressionKind::Literal(literal), span))
        }
        Rule::dotted_ident => {
            // dotted_ident is atomic, so the segments are split by hand
            Ok(Expression::new(
                ExpressionKind::Path(DotPath::from_string(pair.as_str(), span)),
                span,
            ))
        }
        Rule::fn_call => build_function_call(pair, span),
        rule => Err(BuildError::syntax(
            format!("Unexpected rule in expression: {:?}", rule),
            span,
        )),
    }
}

fn build_function_call(pair: Pair<Rule>, span: Span) -> BuildResult<Expression> {
    let mut name = String::new();
    let mut arguments = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::ident => {
                name = inner.as_str().to_string();
            }
            Rule::expression => {
                arguments.push(build_expression(inner)?);
            }
            _ => {}
        }
    }

    Ok(Expression::new(
        ExpressionKind::FunctionCall { name, arguments },
        span,
    ))
}

fn build_literal(pair: Pair<Rule>) -> BuildResult<Literal> {
    let span = pair_to_span(&pair);

    match pair.as_rule() {
        Rule::lit_string => Ok(Literal::String(parse_string_literal(pair.as_str()))),
        Rule::lit_number => parse_number_literal(pair.as_str(), span),
        Rule::lit_boolean => {
            let mut inner = pair.into_inner();
            let keyword = next_inner(&mut inner, span, "boolean")?;
            Ok(Literal::Boolean(keyword.as_rule() == Rule::kw_true))
        }
        Rule::kw_null => Ok(Literal::Null),
        rule => Err(BuildError::syntax(
            format!("Unexpected literal: {:?}", rule),
            span,
        )),
    }
}

fn parse_string_literal(s: &str) -> String {
    // Remove the enclosing quotes and unescape doubled quotes
    for quote in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
            return inner.replace(&format!("{quote}{quote}"), &quote.to_string());
        }
    }
    s.to_string()
}

fn parse_number_literal(text: &str, span: Span) -> BuildResult<Literal> {
    let lower = text.to_ascii_lowercase();

    if let Some(digits) = lower.strip_suffix("bd") {
        return BigDecimal::from_str(digits)
            .map(Literal::Decimal)
            .map_err(|e| BuildError::invalid_literal(text, e.to_string(), span));
    }

    if let Some(digits) = lower.strip_suffix('l') {
        return digits
            .parse::<i64>()
            .map(Literal::Long)
            .map_err(|e| BuildError::invalid_literal(text, e.to_string(), span));
    }

    if let Some(digits) = lower.strip_suffix('d').or_else(|| lower.strip_suffix('f')) {
        return digits
            .parse::<f64>()
            .map(Literal::Double)
            .map_err(|e| BuildError::invalid_literal(text, e.to_string(), span));
    }

    if lower.contains('.') {
        return lower
            .parse::<f64>()
            .map(Literal::Double)
            .map_err(|e| BuildError::invalid_literal(text, e.to_string(), span));
    }

    let n = lower
        .parse::<i64>()
        .map_err(|e| BuildError::invalid_literal(text, e.to_string(), span))?;

    Ok(match i32::try_from(n) {
        Ok(n) => Literal::Integer(n),
        Err(_) => Literal::Long(n),
    })
}
