use crate::ast::filter::FilterNode;

/// Pipeline stage of an aggregate command.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// `{"$match": <filter>}`
    Match(FilterNode),
    /// `{"$project": {<path>: true, ...}}`
    Project(Vec<String>),
}

/// `{"aggregate": <collection>, "pipeline": [<stages>]}`
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCommand {
    pub collection: String,
    pub pipeline: Vec<Stage>,
}

impl AggregateCommand {
    pub fn new(collection: impl Into<String>, pipeline: Vec<Stage>) -> Self {
        Self {
            collection: collection.into(),
            pipeline,
        }
    }

    pub fn match_filter(&self) -> Option<&FilterNode> {
        self.pipeline.iter().find_map(|stage| match stage {
            Stage::Match(filter) => Some(filter),
            _ => None,
        })
    }

    pub fn projection(&self) -> Option<&[String]> {
        self.pipeline.iter().find_map(|stage| match stage {
            Stage::Project(paths) => Some(paths.as_slice()),
            _ => None,
        })
    }
}
