use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar/hql.pest"]
pub struct HqlParser;
