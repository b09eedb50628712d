use crate::{
    ast::filter::{FieldOperationFilter, FilterNode, LogicalFilter},
    renderer::{DocumentSink, Render},
};

impl Render for FilterNode {
    fn render(&self, sink: &mut dyn DocumentSink) {
        match self {
            FilterNode::FieldOperation(op) => op.render(sink),
            FilterNode::Logical(logical) => logical.render(sink),
        }
    }
}

impl Render for FieldOperationFilter {
    fn render(&self, sink: &mut dyn DocumentSink) {
        sink.start_document();
        sink.write_name(self.field_path());
        sink.start_document();
        sink.write_name(self.operation().operator());
        sink.write_value(self.operation().operand());
        sink.end_document();
        sink.end_document();
    }
}

impl Render for LogicalFilter {
    fn render(&self, sink: &mut dyn DocumentSink) {
        sink.start_document();
        sink.write_name(self.operator().operator());
        sink.start_array();
        for operand in self.operands() {
            operand.render(sink);
        }
        sink.end_array();
        sink.end_document();
    }
}
