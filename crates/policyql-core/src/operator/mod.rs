//! Module: operator
//! Responsibility: operator vocabulary, per-type operator tables, and operator application.
//! Does not own: literal escaping (see `constant`) or schema lookup.
//! Boundary: the compiler renders every comparison through `apply_operator`.

mod registry;


pub use registry::{
    OperandStereotype, OperatorSupport, OperatorTemplate, find_operator, operators_for,
};

use crate::{constant::render_constant, error::CompileError, schema::DataType};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

///
/// Operator
///
/// Operator tokens as they appear in persisted trees.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "ct")]
    Contains,
    #[serde(rename = "nct")]
    NotContains,
    #[serde(rename = "stw")]
    StartsWith,
    #[serde(rename = "enw")]
    EndsWith,
    #[serde(rename = "nstw")]
    NotStartsWith,
    #[serde(rename = "nenw")]
    NotEndsWith,
    #[serde(rename = "itl")]
    InTheLast,
    #[serde(rename = "nitl")]
    NotInTheLast,
    #[serde(rename = "itn")]
    InTheNext,
    #[serde(rename = "nitn")]
    NotInTheNext,
    #[serde(rename = "inc")]
    Includes,
    #[serde(rename = "ninc")]
    NotIncludes,
}

impl Operator {
    pub const ALL: [Self; 18] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Gte,
        Self::Lte,
        Self::Lt,
        Self::Contains,
        Self::NotContains,
        Self::StartsWith,
        Self::EndsWith,
        Self::NotStartsWith,
        Self::NotEndsWith,
        Self::InTheLast,
        Self::NotInTheLast,
        Self::InTheNext,
        Self::NotInTheNext,
        Self::Includes,
        Self::NotIncludes,
    ];

    /// Token used in persisted trees.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Lt => "<",
            Self::Contains => "ct",
            Self::NotContains => "nct",
            Self::StartsWith => "stw",
            Self::EndsWith => "enw",
            Self::NotStartsWith => "nstw",
            Self::NotEndsWith => "nenw",
            Self::InTheLast => "itl",
            Self::NotInTheLast => "nitl",
            Self::InTheNext => "itn",
            Self::NotInTheNext => "nitn",
            Self::Includes => "inc",
            Self::NotIncludes => "ninc",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|operator| operator.token() == s)
            .ok_or_else(|| format!("unknown operator '{s}'"))
    }
}

/// Apply `operator` to a rendered property access and a raw operand.
///
/// The operand is rendered as the entry's operand type when it overrides
/// the property type (time comparisons, time spans, list membership).
pub fn apply_operator(
    data_type: DataType,
    subject_code: &str,
    operator: Operator,
    operand: &str,
) -> Result<String, CompileError> {
    let support = find_operator(data_type, operator)?;
    let operand_type = support.operand_type_for(data_type);
    let rendered = render_constant(operand_type, operand, support.operand_stereotype)?;

    Ok(support.generate(subject_code, &rendered))
}
