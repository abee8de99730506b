use crate::{
    error::CompileError,
    expression::{Expression, ExpressionKind},
};
use serde_json::Value;
use thiserror::Error as ThisError;

const MISSING_KIND: &str = "(missing)";

///
/// DecodeError
///

#[derive(Debug, ThisError)]
pub enum DecodeError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("malformed expression: {0}")]
    Json(#[from] serde_json::Error),
}

impl Expression {
    /// Decode a persisted tree.
    ///
    /// Every `type` tag is checked before the shape is, so a tree written by
    /// a newer producer reports the kind it does not understand rather than
    /// a generic shape error.
    pub fn from_json_value(value: Value) -> Result<Self, DecodeError> {
        check_kinds(&value)?;

        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(text)?;

        Self::from_json_value(value)
    }
}

fn check_kinds(value: &Value) -> Result<(), CompileError> {
    // non-objects are left to serde, which reports the shape
    let Value::Object(node) = value else {
        return Ok(());
    };

    let tag = node.get("type").and_then(Value::as_str);
    let kind = tag
        .and_then(|tag| tag.parse::<ExpressionKind>().ok())
        .ok_or_else(|| CompileError::UnrecognizedKind {
            kind: tag.unwrap_or(MISSING_KIND).to_string(),
        })?;

    match kind {
        ExpressionKind::Boolean => {
            if let Some(Value::Array(children)) = node.get("subExpressions") {
                for child in children {
                    check_kinds(child)?;
                }
            }
        }
        ExpressionKind::Relationship | ExpressionKind::NegatedRelationship => {
            if let Some(query) = node.get("relationshipQuery") {
                check_kinds(query)?;
            }
        }
        ExpressionKind::TypeSwitch => {
            if let Some(Value::Array(arms)) = node.get("typeQueries") {
                for query in arms.iter().filter_map(|arm| arm.get("query")) {
                    check_kinds(query)?;
                }
            }
        }
        ExpressionKind::Property
        | ExpressionKind::Name
        | ExpressionKind::HasInsight
        | ExpressionKind::NegatedHasInsight => {}
    }

    Ok(())
}
