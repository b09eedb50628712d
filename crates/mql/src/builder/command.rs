use crate::ast::{
    command::{AggregateCommand, Stage},
    filter::FilterNode,
};

#[derive(Debug, Clone)]
pub struct AggregateCommandBuilder {
    collection: String,
    filter: Option<FilterNode>,
    projection: Vec<String>,
}

impl AggregateCommandBuilder {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filter: None,
            projection: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: FilterNode) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn project<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection.extend(paths.into_iter().map(Into::into));
        self
    }

    /// `$match` comes first when present; `$project` is omitted when no
    /// paths were given.
    pub fn build(self) -> AggregateCommand {
        let mut pipeline = Vec::with_capacity(2);
        if let Some(filter) = self.filter {
            pipeline.push(Stage::Match(filter));
        }
        if !self.projection.is_empty() {
            pipeline.push(Stage::Project(self.projection));
        }

        AggregateCommand::new(self.collection, pipeline)
    }
}
