//! Deterministic expression fingerprinting.
//!
//! Structurally equal trees hash equal; any change to a kind, identifier,
//! operator or operand changes the digest. Used as a cache key for
//! regenerated code.
#![allow(clippy::cast_possible_truncation)]

use crate::expression::{Combiner, Expression, RelationshipPredicate};
use sha2::{Digest, Sha256};
use std::fmt;

///
/// ExpressionFingerprint
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExpressionFingerprint([u8; 32]);

impl ExpressionFingerprint {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn as_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            use std::fmt::Write as _;
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

impl fmt::Display for ExpressionFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

/// Compute the stable fingerprint of `expression`.
#[must_use]
pub fn expression_fingerprint(expression: &Expression) -> ExpressionFingerprint {
    let mut hasher = Sha256::new();
    hasher.update(b"exprfp:v1");
    hash_expression(&mut hasher, expression);

    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);

    ExpressionFingerprint(out)
}

fn hash_expression(hasher: &mut Sha256, expression: &Expression) {
    match expression {
        Expression::Boolean(group) => {
            write_tag(hasher, 0x10);
            write_tag(hasher, combiner_tag(group.combiner));
            write_u32(hasher, group.sub_expressions.len() as u32);
            for child in &group.sub_expressions {
                hash_expression(hasher, child);
            }
        }
        Expression::Property(predicate) => {
            write_tag(hasher, 0x11);
            write_str(hasher, &predicate.property);
            write_str(hasher, predicate.operator.token());
            write_str(hasher, &predicate.operand);
        }
        Expression::Relationship(predicate) => {
            write_tag(hasher, 0x12);
            hash_relationship(hasher, predicate);
        }
        Expression::NegatedRelationship(predicate) => {
            write_tag(hasher, 0x13);
            hash_relationship(hasher, predicate);
        }
        Expression::Name(predicate) => {
            write_tag(hasher, 0x14);
            write_str(hasher, predicate.operator.token());
            write_str(hasher, &predicate.operand);
        }
        Expression::HasInsight(predicate) => {
            write_tag(hasher, 0x15);
            write_str(hasher, &predicate.insight_badge);
        }
        Expression::NegatedHasInsight(predicate) => {
            write_tag(hasher, 0x16);
            write_str(hasher, &predicate.insight_badge);
        }
        Expression::TypeSwitch(switch) => {
            write_tag(hasher, 0x17);
            write_u32(hasher, switch.type_queries.len() as u32);
            for arm in &switch.type_queries {
                write_str(hasher, &arm.type_selector);
                hash_optional(hasher, arm.query.as_deref());
            }
        }
    }
}

fn hash_relationship(hasher: &mut Sha256, predicate: &RelationshipPredicate) {
    write_str(hasher, &predicate.relationship_name);
    hash_optional(hasher, predicate.relationship_query.as_deref());
}

fn hash_optional(hasher: &mut Sha256, query: Option<&Expression>) {
    match query {
        Some(query) => {
            write_tag(hasher, 0x01);
            hash_expression(hasher, query);
        }
        None => write_tag(hasher, 0x00),
    }
}

fn write_str(hasher: &mut Sha256, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}

fn write_u32(hasher: &mut Sha256, value: u32) {
    hasher.update(value.to_be_bytes());
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}

const fn combiner_tag(combiner: Combiner) -> u8 {
    match combiner {
        Combiner::And => 0x01,
        Combiner::Or => 0x02,
    }
}

///
/// TESTS
///
