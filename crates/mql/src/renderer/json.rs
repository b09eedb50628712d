//! Extended JSON (v2) output for rendered documents.

use crate::{
    error::MqlError,
    renderer::{DocumentSink, Render},
};
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use model::core::value::Value;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue, json};

/// Extended JSON flavour used for typed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonMode {
    /// Plain JSON numbers where they round-trip, ISO-8601 dates.
    #[default]
    Relaxed,
    /// Every number and date wrapped in its type marker.
    Canonical,
}

enum Frame {
    Document {
        fields: Map<String, JsonValue>,
        pending_name: Option<String>,
    },
    Array(Vec<JsonValue>),
}

/// [`DocumentSink`] that builds a [`serde_json::Value`].
///
/// Sink methods cannot fail, so the first misuse is recorded and reported by
/// [`JsonDocumentWriter::into_document`].
pub struct JsonDocumentWriter {
    mode: JsonMode,
    stack: Vec<Frame>,
    root: Option<JsonValue>,
    fault: Option<String>,
}

impl JsonDocumentWriter {
    pub fn new(mode: JsonMode) -> Self {
        Self {
            mode,
            stack: Vec::new(),
            root: None,
            fault: None,
        }
    }

    /// Consumes the writer and returns the finished document.
    pub fn into_document(self) -> Result<JsonValue, MqlError> {
        if let Some(fault) = self.fault {
            return Err(MqlError::InvariantViolation(fault));
        }
        if !self.stack.is_empty() {
            return Err(MqlError::InvariantViolation(format!(
                "{} unclosed document or array frame(s)",
                self.stack.len()
            )));
        }

        self.root
            .ok_or_else(|| MqlError::InvariantViolation("No document was written".to_string()))
    }

    fn fail(&mut self, message: impl Into<String>) {
        if self.fault.is_none() {
            self.fault = Some(message.into());
        }
    }

    fn emit(&mut self, value: JsonValue) {
        let fault = match self.stack.last_mut() {
            None if self.root.is_some() => Some("Multiple top-level values written"),
            None => {
                self.root = Some(value);
                None
            }
            Some(Frame::Document {
                fields,
                pending_name,
            }) => match pending_name.take() {
                Some(name) => {
                    fields.insert(name, value);
                    None
                }
                None => Some("Value written inside a document without a name"),
            },
            Some(Frame::Array(items)) => {
                items.push(value);
                None
            }
        };

        if let Some(fault) = fault {
            self.fail(fault);
        }
    }

    fn convert(&self, value: &Value) -> JsonValue {
        let canonical = self.mode == JsonMode::Canonical;

        match value {
            Value::Null => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Int(n) if canonical => json!({ "$numberInt": n.to_string() }),
            Value::Int(n) => JsonValue::from(*n),
            Value::Long(n) if canonical => json!({ "$numberLong": n.to_string() }),
            Value::Long(n) => JsonValue::from(*n),
            Value::Double(f) => match Number::from_f64(*f) {
                Some(number) if !canonical => JsonValue::Number(number),
                _ => json!({ "$numberDouble": format_double(*f) }),
            },
            Value::Decimal(d) => json!({ "$numberDecimal": d.to_string() }),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Timestamp(ts) => convert_date(ts, canonical),
            Value::Uuid(u) => json!({ "$uuid": u.hyphenated().to_string() }),
        }
    }
}

impl DocumentSink for JsonDocumentWriter {
    fn start_document(&mut self) {
        let unnamed = matches!(
            self.stack.last(),
            Some(Frame::Document {
                pending_name: None,
                ..
            })
        );
        if unnamed {
            self.fail("Nested document started without a name");
        }

        self.stack.push(Frame::Document {
            fields: Map::new(),
            pending_name: None,
        });
    }

    fn write_name(&mut self, name: &str) {
        let fault = match self.stack.last_mut() {
            Some(Frame::Document { pending_name, .. }) if pending_name.is_none() => {
                *pending_name = Some(name.to_string());
                None
            }
            Some(Frame::Document { .. }) => {
                Some(format!("Name '{name}' written while another name is pending"))
            }
            _ => Some(format!("Name '{name}' written outside of a document")),
        };

        if let Some(fault) = fault {
            self.fail(fault);
        }
    }

    fn start_array(&mut self) {
        if !matches!(
            self.stack.last(),
            Some(Frame::Document {
                pending_name: Some(_),
                ..
            }) | Some(Frame::Array(_))
        ) {
            self.fail("Array started without a name");
        }

        self.stack.push(Frame::Array(Vec::new()));
    }

    fn end_array(&mut self) {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.emit(JsonValue::Array(items)),
            Some(frame) => {
                self.stack.push(frame);
                self.fail("end_array called while a document is open");
            }
            None => self.fail("end_array called with no open array"),
        }
    }

    fn end_document(&mut self) {
        match self.stack.pop() {
            Some(Frame::Document {
                fields,
                pending_name,
            }) => {
                if let Some(name) = pending_name {
                    self.fail(format!("Document closed with no value for '{name}'"));
                }
                self.emit(JsonValue::Object(fields));
            }
            Some(frame) => {
                self.stack.push(frame);
                self.fail("end_document called while an array is open");
            }
            None => self.fail("end_document called with no open document"),
        }
    }

    fn write_value(&mut self, value: &Value) {
        let converted = self.convert(value);
        self.emit(converted);
    }
}

/// Renders `node` into a JSON document.
pub fn to_json<R: Render + ?Sized>(node: &R, mode: JsonMode) -> Result<JsonValue, MqlError> {
    let mut writer = JsonDocumentWriter::new(mode);
    node.render(&mut writer);
    writer.into_document()
}

fn format_double(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{f:?}")
    }
}

fn convert_date(ts: &DateTime<Utc>, canonical: bool) -> JsonValue {
    // Relaxed form only covers years representable as ISO-8601 without sign
    if !canonical && (1970..=9999).contains(&ts.year()) {
        json!({ "$date": ts.to_rfc3339_opts(SecondsFormat::Millis, true) })
    } else {
        json!({ "$date": { "$numberLong": ts.timestamp_millis().to_string() } })
    }
}
