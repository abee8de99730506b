//! Module: expression
//! Responsibility: the closed predicate-tree vocabulary and its persisted JSON shape.
//! Does not own: schema validation or code generation.
//! Boundary: trees are immutable input to the compiler and the fingerprint.

mod decode;
mod defaults;


pub use decode::DecodeError;
pub use defaults::{create_default_expression, create_default_expression_of_kind};

use crate::operator::Operator;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

///
/// Combiner
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Combiner {
    #[default]
    And,
    Or,
}

impl Combiner {
    /// Infix operator joining the members of a group.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

///
/// BooleanCombination
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanCombination {
    pub combiner: Combiner,
    pub sub_expressions: Vec<Expression>,
}

///
/// PropertyPredicate
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPredicate {
    pub property: String,
    pub operator: Operator,
    pub operand: String,
}

///
/// RelationshipPredicate
///
/// Shared by the positive and negated relationship kinds.
/// A missing query means "the relationship is non-empty".
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipPredicate {
    pub relationship_name: String,

    #[serde(default)]
    pub relationship_query: Option<Box<Expression>>,
}

///
/// NamePredicate
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamePredicate {
    pub operator: Operator,
    pub operand: String,
}

///
/// InsightPredicate
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightPredicate {
    pub insight_badge: String,
}

///
/// TypeQuery
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeQuery {
    pub type_selector: String,

    #[serde(default)]
    pub query: Option<Box<Expression>>,
}

///
/// TypeSwitchPredicate
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSwitchPredicate {
    pub type_queries: Vec<TypeQuery>,
}

///
/// Expression
///
/// One node of a predicate tree, tagged by `type` in persisted form.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Expression {
    Boolean(BooleanCombination),
    Property(PropertyPredicate),
    Relationship(RelationshipPredicate),
    NegatedRelationship(RelationshipPredicate),
    Name(NamePredicate),
    HasInsight(InsightPredicate),
    NegatedHasInsight(InsightPredicate),
    TypeSwitch(TypeSwitchPredicate),
}

impl Expression {
    #[must_use]
    pub const fn and(sub_expressions: Vec<Self>) -> Self {
        Self::Boolean(BooleanCombination {
            combiner: Combiner::And,
            sub_expressions,
        })
    }

    #[must_use]
    pub const fn or(sub_expressions: Vec<Self>) -> Self {
        Self::Boolean(BooleanCombination {
            combiner: Combiner::Or,
            sub_expressions,
        })
    }

    #[must_use]
    pub fn property(
        property: impl Into<String>,
        operator: Operator,
        operand: impl Into<String>,
    ) -> Self {
        Self::Property(PropertyPredicate {
            property: property.into(),
            operator,
            operand: operand.into(),
        })
    }

    #[must_use]
    pub fn relationship(relationship_name: impl Into<String>, query: Option<Self>) -> Self {
        Self::Relationship(RelationshipPredicate {
            relationship_name: relationship_name.into(),
            relationship_query: query.map(Box::new),
        })
    }

    #[must_use]
    pub fn negated_relationship(relationship_name: impl Into<String>, query: Option<Self>) -> Self {
        Self::NegatedRelationship(RelationshipPredicate {
            relationship_name: relationship_name.into(),
            relationship_query: query.map(Box::new),
        })
    }

    #[must_use]
    pub fn name(operator: Operator, operand: impl Into<String>) -> Self {
        Self::Name(NamePredicate {
            operator,
            operand: operand.into(),
        })
    }

    #[must_use]
    pub fn has_insight(insight_badge: impl Into<String>) -> Self {
        Self::HasInsight(InsightPredicate {
            insight_badge: insight_badge.into(),
        })
    }

    #[must_use]
    pub fn negated_has_insight(insight_badge: impl Into<String>) -> Self {
        Self::NegatedHasInsight(InsightPredicate {
            insight_badge: insight_badge.into(),
        })
    }

    #[must_use]
    pub fn type_switch<I, S>(arms: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<Self>)>,
        S: Into<String>,
    {
        Self::TypeSwitch(TypeSwitchPredicate {
            type_queries: arms
                .into_iter()
                .map(|(type_selector, query)| TypeQuery {
                    type_selector: type_selector.into(),
                    query: query.map(Box::new),
                })
                .collect(),
        })
    }

    #[must_use]
    pub const fn kind(&self) -> ExpressionKind {
        match self {
            Self::Boolean(_) => ExpressionKind::Boolean,
            Self::Property(_) => ExpressionKind::Property,
            Self::Relationship(_) => ExpressionKind::Relationship,
            Self::NegatedRelationship(_) => ExpressionKind::NegatedRelationship,
            Self::Name(_) => ExpressionKind::Name,
            Self::HasInsight(_) => ExpressionKind::HasInsight,
            Self::NegatedHasInsight(_) => ExpressionKind::NegatedHasInsight,
            Self::TypeSwitch(_) => ExpressionKind::TypeSwitch,
        }
    }
}

///
/// ExpressionKind
///
/// Tag of an expression node, as written in the persisted `type` field.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpressionKind {
    Boolean,
    Property,
    Relationship,
    NegatedRelationship,
    Name,
    HasInsight,
    NegatedHasInsight,
    TypeSwitch,
}

impl ExpressionKind {
    pub const ALL: [Self; 8] = [
        Self::Boolean,
        Self::Property,
        Self::Relationship,
        Self::NegatedRelationship,
        Self::Name,
        Self::HasInsight,
        Self::NegatedHasInsight,
        Self::TypeSwitch,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Property => "property",
            Self::Relationship => "relationship",
            Self::NegatedRelationship => "negatedRelationship",
            Self::Name => "name",
            Self::HasInsight => "hasInsight",
            Self::NegatedHasInsight => "negatedHasInsight",
            Self::TypeSwitch => "typeSwitch",
        }
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpressionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown expression kind '{s}'"))
    }
}
