//! Core of PolicyQL: a schema-driven compiler from predicate expression trees
//! to target-language source.
//!
//! Trees are built by an authoring surface or loaded from persisted query
//! settings, validated against an externally supplied object schema, and
//! rendered deterministically into a single predicate string for a separate
//! evaluation engine.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod compile;
pub mod constant;
pub mod error;
pub mod expression;
pub mod fingerprint;
pub mod operator;
pub mod schema;
pub mod settings;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Default nesting limit applied by the compiler when no options are supplied.
///
/// Trees can arrive from persisted records rather than the authoring UI, so
/// recursion is bounded regardless of where the tree came from.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Subject alias used when compiling top-level query settings.
pub const DEFAULT_SUBJECT: &str = "subject";

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, serializers, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        compile::{CompileOptions, Compiler},
        expression::{Combiner, Expression, ExpressionKind},
        operator::Operator,
        schema::{
            DataType, Naming, ObjectSchema, PropertyDescriptor, RelationshipDescriptor, Schema,
        },
    };
}
