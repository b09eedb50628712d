use crate::error::CliError;
use serde_json::Value as JsonValue;

fn to_string(document: &JsonValue, pretty: bool) -> Result<String, CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    };
    text.map_err(CliError::JsonSerialize)
}

pub fn write_document(document: &JsonValue, pretty: bool, path: &str) -> Result<(), CliError> {
    let text = to_string(document, pretty)?;
    std::fs::write(path, text)?;
    Ok(())
}

pub fn print_document(document: &JsonValue, pretty: bool) -> Result<(), CliError> {
    let text = to_string(document, pretty)?;
    println!("{text}");
    Ok(())
}
