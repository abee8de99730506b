//! Module: settings
//! Responsibility: persisted query settings (export, import with validation) and their compilation.
//! Does not own: the expression vocabulary or rendering rules.
//! Boundary: imported documents are fully validated before a `QuerySettings` is returned.

mod aggregation;


pub use aggregation::{
    AggregateFunction, AggregationColumn, AggregationDefinition, AggregationOptions,
    ResultColumn, ResultColumnType, aggregation_options, create_default_aggregation_column,
};

use crate::{
    compile::Compiler,
    error::CompileError,
    expression::{DecodeError, Expression, create_default_expression},
    fingerprint::{ExpressionFingerprint, expression_fingerprint},
    schema::Schema,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Document type tag of exported query settings.
pub const EXPORT_DOCUMENT_TYPE: &str = "explorer-schema";

/// Newest export version this crate reads and the one it writes.
pub const EXPORT_VERSION: u64 = 1;

/// Subject alias used when validating an imported query.
const VALIDATION_SUBJECT: &str = "s";

///
/// SettingsError
///

#[derive(Debug, ThisError)]
pub enum SettingsError {
    #[error("query definition is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid query definition file")]
    InvalidDocument { document_type: Option<String> },

    #[error("unsupported query definition version {version}")]
    UnsupportedVersion { version: u64 },

    #[error("invalid object type '{rowset}'")]
    UnknownRowset { rowset: String },

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl From<DecodeError> for SettingsError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Compile(err) => Self::Compile(err),
            DecodeError::Json(err) => Self::Json(err),
        }
    }
}

///
/// QuerySettings
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuerySettings {
    pub description: Option<String>,
    pub object_type: String,
    pub query: Expression,
    pub aggregation: Option<AggregationDefinition>,
}

///
/// ExportedQuerySettings
///

#[derive(Serialize)]
struct ExportedQuerySettings<'a> {
    #[serde(rename = "$type")]
    document_type: &'static str,

    #[serde(rename = "$version")]
    version: u64,

    rowset: &'a str,
    query: &'a Expression,

    #[serde(skip_serializing_if = "Option::is_none")]
    aggregation: Option<&'a AggregationDefinition>,
}

///
/// ImportedQuerySettings
///
/// Envelope read before the tree is decoded, so header problems are
/// reported ahead of tree problems.
///

#[derive(Deserialize)]
struct ImportedQuerySettings {
    #[serde(rename = "$type", default)]
    document_type: Option<String>,

    #[serde(rename = "$version", default)]
    version: Option<u64>,

    #[serde(default)]
    rowset: Option<String>,

    #[serde(default)]
    query: serde_json::Value,

    #[serde(default)]
    aggregation: Option<AggregationDefinition>,
}

///
/// CompiledQuery
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompiledQuery {
    pub object_type: String,
    pub code: String,
    pub fingerprint: ExpressionFingerprint,
}

/// Serialize `settings` in the export format, pretty-printed unless `compact`.
pub fn export_query_settings(
    settings: &QuerySettings,
    compact: bool,
) -> Result<String, SettingsError> {
    let exported = ExportedQuerySettings {
        document_type: EXPORT_DOCUMENT_TYPE,
        version: EXPORT_VERSION,
        rowset: &settings.object_type,
        query: &settings.query,
        aggregation: settings.aggregation.as_ref(),
    };

    let text = if compact {
        serde_json::to_string(&exported)?
    } else {
        serde_json::to_string_pretty(&exported)?
    };

    Ok(text)
}

/// Parse and validate exported settings against `schema` with default options.
///
/// The query is compiled once as a validation step; the generated code is
/// discarded.
pub fn load_exported_query_settings(
    schema: &Schema,
    text: &str,
) -> Result<QuerySettings, SettingsError> {
    load_exported_query_settings_with(&Compiler::new(schema), text)
}

/// Parse and validate exported settings using `compiler`'s schema and limits.
pub fn load_exported_query_settings_with(
    compiler: &Compiler<'_>,
    text: &str,
) -> Result<QuerySettings, SettingsError> {
    let result = import(compiler, text);
    if let Err(err) = &result {
        tracing::warn!(error = %err, "rejected query definition");
    }

    result
}

fn import(compiler: &Compiler<'_>, text: &str) -> Result<QuerySettings, SettingsError> {
    let imported: ImportedQuerySettings = serde_json::from_str(text)?;

    if imported.document_type.as_deref() != Some(EXPORT_DOCUMENT_TYPE) {
        return Err(SettingsError::InvalidDocument {
            document_type: imported.document_type,
        });
    }
    if let Some(version) = imported.version
        && version > EXPORT_VERSION
    {
        return Err(SettingsError::UnsupportedVersion { version });
    }

    let rowset = imported.rowset.unwrap_or_default();
    if compiler.schema().object_type(&rowset).is_none() {
        return Err(SettingsError::UnknownRowset { rowset });
    }

    let query = Expression::from_json_value(imported.query)?;
    compiler.generate_for_type(&rowset, VALIDATION_SUBJECT, &query)?;

    Ok(QuerySettings {
        description: None,
        object_type: rowset,
        query,
        aggregation: imported.aggregation,
    })
}

/// Compile the settings' query against its object type, reading it through `subject`.
pub fn generate_for_query_settings(
    compiler: &Compiler<'_>,
    settings: &QuerySettings,
    subject: &str,
) -> Result<CompiledQuery, CompileError> {
    let code = compiler.generate_for_type(&settings.object_type, subject, &settings.query)?;

    Ok(CompiledQuery {
        object_type: settings.object_type.clone(),
        code,
        fingerprint: expression_fingerprint(&settings.query),
    })
}

/// Fresh settings for `object_type` whose query is the best default.
///
/// `None` when the type cannot host any default expression.
pub fn new_query_settings(
    schema: &Schema,
    object_type: &str,
) -> Result<Option<QuerySettings>, CompileError> {
    let query = create_default_expression(schema, object_type)?;

    Ok(query.map(|query| QuerySettings {
        description: None,
        object_type: object_type.to_string(),
        query,
        aggregation: None,
    }))
}
