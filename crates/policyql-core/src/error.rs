use crate::{expression::ExpressionKind, operator::Operator, schema::DataType};
use std::fmt;
use thiserror::Error as ThisError;

///
/// CompileError
///
/// Validation failure raised while compiling an expression tree.
/// Compilation aborts on the first error; there is no partial output.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CompileError {
    #[error("property '{property}' does not exist in object")]
    UnknownProperty { property: String },

    #[error("relationship '{relationship}' does not exist in object")]
    UnknownRelationship { relationship: String },

    #[error("object type '{type_name}' does not exist in schema")]
    UnknownType { type_name: String },

    #[error("object does not have a name")]
    NamingUnsupported,

    #[error("object does not have insights")]
    InsightsUnsupported,

    #[error("invalid operator {operator} for property type {data_type}")]
    UnsupportedOperator {
        operator: Operator,
        data_type: DataType,
    },

    #[error("no {data_type} constant")]
    UnsupportedConstant { data_type: DataType },

    #[error("invalid {data_type} literal '{value}'")]
    InvalidLiteral { data_type: DataType, value: String },

    #[error("unrecognized expression kind '{kind}'")]
    UnrecognizedKind { kind: String },

    #[error("{kind} expression must contain at least one entry")]
    EmptyGroup { kind: ExpressionKind },

    #[error("expression nesting exceeds the limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}

impl CompileError {
    pub(crate) fn unknown_property(property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            property: property.into(),
        }
    }

    pub(crate) fn unknown_relationship(relationship: impl Into<String>) -> Self {
        Self::UnknownRelationship {
            relationship: relationship.into(),
        }
    }

    pub(crate) fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
        }
    }

    pub(crate) fn invalid_literal(data_type: DataType, value: impl Into<String>) -> Self {
        Self::InvalidLiteral {
            data_type,
            value: value.into(),
        }
    }

    /// Stable classification of this error.
    #[must_use]
    pub const fn kind(&self) -> CompileErrorKind {
        match self {
            Self::UnknownProperty { .. }
            | Self::UnknownRelationship { .. }
            | Self::UnknownType { .. } => CompileErrorKind::UnknownIdentifier,
            Self::NamingUnsupported | Self::InsightsUnsupported => {
                CompileErrorKind::UnsupportedCapability
            }
            Self::UnsupportedOperator { .. } => CompileErrorKind::UnsupportedOperator,
            Self::UnsupportedConstant { .. } | Self::InvalidLiteral { .. } => {
                CompileErrorKind::InvalidLiteral
            }
            Self::UnrecognizedKind { .. } | Self::EmptyGroup { .. } => {
                CompileErrorKind::UnrecognizedKind
            }
            Self::DepthLimitExceeded { .. } => CompileErrorKind::DepthLimitExceeded,
        }
    }

    /// The schema identifier or tag the tree referenced, when there is one.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::UnknownProperty { property } => Some(property),
            Self::UnknownRelationship { relationship } => Some(relationship),
            Self::UnknownType { type_name } => Some(type_name),
            Self::UnsupportedOperator { operator, .. } => Some(operator.token()),
            Self::UnrecognizedKind { kind } => Some(kind),
            Self::InvalidLiteral { value, .. } => Some(value),
            Self::NamingUnsupported
            | Self::InsightsUnsupported
            | Self::UnsupportedConstant { .. }
            | Self::EmptyGroup { .. }
            | Self::DepthLimitExceeded { .. } => None,
        }
    }
}

///
/// CompileErrorKind
///
/// Coarse classification callers map onto user-facing validation messages.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompileErrorKind {
    UnknownIdentifier,
    UnsupportedCapability,
    UnsupportedOperator,
    InvalidLiteral,
    UnrecognizedKind,
    DepthLimitExceeded,
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UnknownIdentifier => "unknown_identifier",
            Self::UnsupportedCapability => "unsupported_capability",
            Self::UnsupportedOperator => "unsupported_operator",
            Self::InvalidLiteral => "invalid_literal",
            Self::UnrecognizedKind => "unrecognized_kind",
            Self::DepthLimitExceeded => "depth_limit_exceeded",
        };
        write!(f, "{label}")
    }
}
