use clap::{Parser, Subcommand};
use policyql_config::{Config, is_identifier};
use policyql_core::{
    compile::Compiler,
    error::CompileError,
    expression::{ExpressionKind, create_default_expression, create_default_expression_of_kind},
    operator::operators_for,
    schema::{DataType, Schema, SchemaDocument, SchemaDocumentError},
    settings::{SettingsError, generate_for_query_settings, load_exported_query_settings_with},
};
use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// Cli
///

#[derive(Debug, Parser)]
#[command(
    name = "policyql",
    version,
    about = "Compile policy query trees into predicate source"
)]
pub(crate) struct Cli {
    /// Config file (default: ./policyql.toml when present).
    #[arg(long, global = true, env = "POLICYQL_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

///
/// Command
///

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Compile an exported query file against a schema document.
    Compile {
        #[arg(long)]
        schema: PathBuf,

        #[arg(long)]
        query: PathBuf,

        /// Subject alias (default: compiler.default_subject).
        #[arg(long)]
        subject: Option<String>,

        /// Also print the query fingerprint.
        #[arg(long)]
        fingerprint: bool,
    },

    /// Print the default expression for a type as JSON.
    Default {
        #[arg(long)]
        schema: PathBuf,

        #[arg(long = "type")]
        type_name: String,

        /// Expression kind, e.g. `property` or `typeSwitch` (default: best available).
        #[arg(long)]
        kind: Option<ExpressionKind>,
    },

    /// List the operators available for a data type.
    Operators { data_type: DataType },
}

///
/// CliError
///

#[derive(Debug, ThisError)]
pub(crate) enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid schema document: {0}")]
    Schema(#[from] SchemaDocumentError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("subject '{subject}' is not an identifier")]
    InvalidSubject { subject: String },

    #[error("type '{type_name}' has no default {kind} expression")]
    NoDefault { type_name: String, kind: String },

    #[error("cannot serialize expression: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

pub(crate) fn run(
    command: &Command,
    config: &Config,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Compile {
            schema,
            query,
            subject,
            fingerprint,
        } => {
            let subject = subject
                .as_deref()
                .unwrap_or(&config.compiler.default_subject);
            if !is_identifier(subject) {
                return Err(CliError::InvalidSubject {
                    subject: subject.to_string(),
                });
            }

            compile(config, schema, query, subject, *fingerprint, out)
        }
        Command::Default {
            schema,
            type_name,
            kind,
        } => default_expression(schema, type_name, *kind, out),
        Command::Operators { data_type } => list_operators(*data_type, out),
    }
}

fn compile(
    config: &Config,
    schema_path: &Path,
    query_path: &Path,
    subject: &str,
    with_fingerprint: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let schema = read_schema(schema_path)?;
    let compiler = Compiler::new(&schema).with_options(config.compile_options());
    let settings = load_exported_query_settings_with(&compiler, &read(query_path)?)?;

    let compiled = generate_for_query_settings(&compiler, &settings, subject)?;
    tracing::info!(
        object_type = %compiled.object_type,
        fingerprint = %compiled.fingerprint,
        "compiled query"
    );

    writeln!(out, "{}", compiled.code)?;
    if with_fingerprint {
        writeln!(out, "{}", compiled.fingerprint)?;
    }

    Ok(())
}

fn default_expression(
    schema_path: &Path,
    type_name: &str,
    kind: Option<ExpressionKind>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let schema = read_schema(schema_path)?;

    let expression = match kind {
        Some(kind) => create_default_expression_of_kind(&schema, type_name, kind)?,
        None => create_default_expression(&schema, type_name)?,
    };
    let expression = expression.ok_or_else(|| CliError::NoDefault {
        type_name: type_name.to_string(),
        kind: kind.map_or_else(|| "expression".to_string(), |kind| kind.to_string()),
    })?;

    writeln!(out, "{}", serde_json::to_string_pretty(&expression)?)?;

    Ok(())
}

fn list_operators(data_type: DataType, out: &mut impl Write) -> Result<(), CliError> {
    for support in operators_for(data_type) {
        writeln!(
            out,
            "{}\t{}\t{}",
            support.operator,
            support.display_name,
            support.operand_type_for(data_type)
        )?;
    }

    Ok(())
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn read_schema(path: &Path) -> Result<Schema, CliError> {
    let text = read(path)?;
    tracing::debug!(path = %path.display(), "loading schema document");

    Ok(SchemaDocument::parse_schema(&text)?)
}

///
/// TESTS
///
