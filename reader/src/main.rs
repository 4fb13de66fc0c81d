//! csvtag CLI - inspect how CSV headers bind to field annotations
//!
//! ```bash
//! csvtag tag "name" "-" "-," "id,omitempty"          # Parse annotations
//! csvtag bind input.csv --field Title=title          # Bind a header
//! csvtag bind input.csv -f Id=id -f Year=year --rows 5
//! ```
//!
//! Tokenizer options default to the `CSVTAG_*` environment variables (a
//! `.env` file is loaded first); flags override them.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::Level;

use csvtag::config::parse_byte;
use csvtag::{
    bind_header, open_path_auto, parse_annotation, Annotation, BindingReport, ColumnMap, Error,
    RowSource, SourceOptions,
};

#[derive(Parser)]
#[command(name = "csvtag")]
#[command(about = "Inspect how CSV headers bind to csv field annotations", long_about = None)]
struct Cli {
    /// Log binding details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse annotation strings and print them as JSON
    Tag {
        /// Annotation strings, as written inside #[csv("...")]
        #[arg(required = true, allow_hyphen_values = true)]
        tags: Vec<String>,
    },

    /// Bind the header of a CSV file to named field annotations
    Bind {
        /// Input CSV file
        input: PathBuf,

        /// Declared field as NAME=ANNOTATION, in declaration order
        #[arg(short, long = "field", value_parser = parse_field, allow_hyphen_values = true)]
        fields: Vec<(String, String)>,

        /// Also print the first N data rows projected onto the bound fields
        #[arg(long, default_value = "0")]
        rows: usize,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long, env = "CSVTAG_DELIMITER")]
        delimiter: Option<String>,

        /// Accept rows of differing lengths (`--flexible=false` overrides CSVTAG_FLEXIBLE)
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        flexible: Option<bool>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Tag { tags } => cmd_tag(&tags),

        Commands::Bind {
            input,
            fields,
            rows,
            delimiter,
            flexible,
            output,
        } => cmd_bind(
            &input,
            &fields,
            rows,
            delimiter.as_deref(),
            flexible,
            output.as_deref(),
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, tag)) if !name.is_empty() => Ok((name.to_string(), tag.to_string())),
        _ => Err(format!("expected NAME=ANNOTATION, got '{}'", s)),
    }
}

/// One parsed annotation, as printed by `csvtag tag`.
#[derive(Serialize)]
struct TagOutput<'a> {
    tag: &'a str,
    #[serde(flatten)]
    annotation: Annotation,
}

fn cmd_tag(tags: &[String]) -> Result<(), Error> {
    let parsed: Vec<TagOutput<'_>> = tags
        .iter()
        .map(|tag| TagOutput {
            tag: tag.as_str(),
            annotation: parse_annotation(tag),
        })
        .collect();

    let json = serde_json::to_string_pretty(&parsed)?;
    write_output(&json, None)
}

fn cmd_bind(
    input: &Path,
    fields: &[(String, String)],
    rows: usize,
    delimiter: Option<&str>,
    flexible: Option<bool>,
    output: Option<&Path>,
) -> Result<(), Error> {
    let options = apply_flags(SourceOptions::from_env()?, flexible);
    let delimiter = delimiter
        .map(|d| parse_byte("delimiter", d))
        .transpose()?;

    let result = bind_file(input, fields, rows, delimiter, &options)?;
    let json = serde_json::to_string_pretty(&result)?;
    write_output(&json, output)
}

/// Flags given on the command line win over environment values.
fn apply_flags(mut options: SourceOptions, flexible: Option<bool>) -> SourceOptions {
    if let Some(flexible) = flexible {
        options.flexible = flexible;
    }
    options
}

/// Header, binding report and up to `rows` projected data rows of `input`.
fn bind_file(
    input: &Path,
    fields: &[(String, String)],
    rows: usize,
    delimiter: Option<u8>,
    options: &SourceOptions,
) -> Result<Value, Error> {
    let (mut source, info) = open_path_auto(input, delimiter, options)?;
    tracing::info!(
        input = %input.display(),
        encoding = %info.encoding,
        delimiter = %info.delimiter.escape_default(),
        "opened csv"
    );

    let header = source.next_row()?.unwrap_or_default();
    let declared: Vec<(String, Annotation)> = fields
        .iter()
        .map(|(name, tag)| (name.clone(), parse_annotation(tag)))
        .collect();
    let map = bind_header(&header, declared.iter().map(|(_, annotation)| annotation));
    let report = BindingReport::new(&header, &declared, &map);

    let mut projected = Vec::new();
    for _ in 0..rows {
        let Some(row) = source.next_row()? else {
            break;
        };
        projected.push(project_row(&row, &map, &declared));
    }

    Ok(json!({
        "input": info,
        "header": header,
        "report": report,
        "rows": projected,
    }))
}

/// Field name → value for the bound columns of `row`. Bound columns the row
/// is too short to hold are left out.
fn project_row(row: &[String], map: &ColumnMap, declared: &[(String, Annotation)]) -> Value {
    let mut object = Map::new();
    for (column, field) in map.iter() {
        if let (Some(value), Some((name, _))) = (row.get(column), declared.get(field)) {
            object.insert(name.clone(), Value::String(value.clone()));
        }
    }
    Value::Object(object)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Error> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            tracing::info!(path = %p.display(), "output written");
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
