use crate::{error::CliError, settings::Settings};
use clap::Parser;
use commands::Commands;
use model::schema::EntitySchema;
use mql::renderer::json::{JsonMode, to_json};
use serde_json::{Value as JsonValue, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;
mod settings;

#[derive(Parser)]
#[command(
    name = "mqlt",
    version = "0.1.0",
    about = "Translate HQL queries into null-safe document-store commands"
)]
struct Cli {
    #[arg(long, global = true, help = "Settings file path (JSON)")]
    settings: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.settings.as_deref())?;

    // Initialize logger; stdout is reserved for documents
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Translate {
            schema,
            query,
            canonical,
            compact,
            output,
        } => {
            info!("Translating query against schema: {}", schema);

            let schema = load_schema(&schema)?;
            let document = translate_document(&query, &schema, settings.json_mode(canonical))?;
            let pretty = settings.pretty && !compact;

            match output {
                Some(path) => output::write_document(&document, pretty, &path)?,
                None => output::print_document(&document, pretty)?,
            }
        }
        Commands::Explain {
            schema,
            query,
            canonical,
        } => {
            let schema = load_schema(&schema)?;
            let document = explain_document(&query, &schema, settings.json_mode(canonical))?;
            output::print_document(&document, settings.pretty)?;
        }
        Commands::Ast { query } => {
            let statement = hql_syntax::parse(&query)?;
            let document = serde_json::to_value(&statement).map_err(CliError::JsonSerialize)?;
            output::print_document(&document, settings.pretty)?;
        }
    }

    Ok(())
}

fn load_schema(path: &str) -> Result<EntitySchema, CliError> {
    let source = std::fs::read_to_string(path)?;
    let schema: EntitySchema = serde_json::from_str(&source)?;
    Ok(schema)
}

fn translate_document(
    query: &str,
    schema: &EntitySchema,
    mode: JsonMode,
) -> Result<JsonValue, CliError> {
    let command = translate::translate_query(query, schema)?;
    Ok(to_json(&command, mode)?)
}

/// `{"filter": <as written>, "enforced": <null-safe>}`, both null when the
/// query has no `where` clause.
fn explain_document(
    query: &str,
    schema: &EntitySchema,
    mode: JsonMode,
) -> Result<JsonValue, CliError> {
    let statement = hql_syntax::parse(query)?;

    let Some(filter) = translate::translate_filter(&statement, schema)? else {
        return Ok(json!({ "filter": null, "enforced": null }));
    };
    let enforced = filter.with_null_safety_enforced();

    Ok(json!({
        "filter": to_json(&filter, mode)?,
        "enforced": to_json(&enforced, mode)?,
    }))
}
