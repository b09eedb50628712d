use crate::{
    ast::command::{AggregateCommand, Stage},
    renderer::{DocumentSink, Render},
};
use model::core::value::Value;

impl Render for AggregateCommand {
    fn render(&self, sink: &mut dyn DocumentSink) {
        sink.start_document();
        sink.write_name("aggregate");
        sink.write_value(&Value::String(self.collection.clone()));
        sink.write_name("pipeline");
        sink.start_array();
        for stage in &self.pipeline {
            stage.render(sink);
        }
        sink.end_array();
        sink.end_document();
    }
}

impl Render for Stage {
    fn render(&self, sink: &mut dyn DocumentSink) {
        sink.start_document();
        match self {
            Stage::Match(filter) => {
                sink.write_name("$match");
                filter.render(sink);
            }
            Stage::Project(paths) => {
                sink.write_name("$project");
                sink.start_document();
                for path in paths {
                    sink.write_name(path);
                    sink.write_value(&Value::Boolean(true));
                }
                sink.end_document();
            }
        }
        sink.end_document();
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{filter::FilterNode, operation::FilterOperation},
        builder::command::AggregateCommandBuilder,
        renderer::json::{JsonMode, to_json},
    };
    use model::core::value::Value;
    use serde_json::json;

    #[test]
    fn test_render_aggregate_command() {
        let command = AggregateCommandBuilder::new("books")
            .filter(FilterNode::field(
                "title",
                false,
                FilterOperation::Eq(Value::from("I, Robot")),
            ))
            .project(["_id", "price", "title"])
            .build();

        let doc = to_json(&command, JsonMode::Relaxed).unwrap();
        assert_eq!(
            doc,
            json!({
                "aggregate": "books",
                "pipeline": [
                    {"$match": {"title": {"$eq": "I, Robot"}}},
                    {"$project": {"_id": true, "price": true, "title": true}}
                ]
            })
        );
    }

    #[test]
    fn test_render_preserves_key_order() {
        let command = AggregateCommandBuilder::new("books")
            .project(["_id", "author", "title"])
            .build();

        let doc = to_json(&command, JsonMode::Relaxed).unwrap();
        let text = serde_json::to_string(&doc).unwrap();

        assert_eq!(
            text,
            r#"{"aggregate":"books","pipeline":[{"$project":{"_id":true,"author":true,"title":true}}]}"#
        );
    }
}
