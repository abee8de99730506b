//! Operator registry: ordered operator tables per data type.
//!
//! Order is significant. The first entry of a table is the operator a freshly
//! created property predicate uses.

use crate::{error::CompileError, operator::Operator, schema::DataType};

const QUERY_TIME: &str = "Dates.queryTime()";

///
/// OperandStereotype
///
/// Refines how an operand is interpreted beyond its data type.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperandStereotype {
    /// A whole-day count, not a date.
    TimeSpan,
}

///
/// OperatorTemplate
///
/// Code shape an operator renders to, given left and right operands.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperatorTemplate {
    Infix(&'static str),
    Call {
        function: &'static str,
        negated: bool,
    },
    WithinPast,
    BeforePast,
    WithinFuture,
    AfterFuture,
    Includes {
        negated: bool,
    },
}

impl OperatorTemplate {
    #[must_use]
    pub fn render(self, left: &str, right: &str) -> String {
        match self {
            Self::Infix(symbol) => format!("{left} {symbol} {right}"),
            Self::Call { function, negated } => {
                format!("{}{function}({left}, {right})", negation(negated))
            }
            Self::WithinPast => format!(
                "({left} <= {QUERY_TIME}) && ({left} >= Dates.add(\"day\", -{right}, {QUERY_TIME}))"
            ),
            Self::BeforePast => format!("{left} < Dates.add(\"day\", -{right}, {QUERY_TIME})"),
            Self::WithinFuture => format!(
                "({left} >= {QUERY_TIME}) && ({left} <= Dates.add(\"day\", {right}, {QUERY_TIME}))"
            ),
            Self::AfterFuture => format!("{left} > Dates.add(\"day\", {right}, {QUERY_TIME})"),
            Self::Includes { negated } => {
                format!("{}{left}.any((s) => s == {right})", negation(negated))
            }
        }
    }
}

const fn negation(negated: bool) -> &'static str {
    if negated { "!" } else { "" }
}

///
/// OperatorSupport
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OperatorSupport {
    pub operator: Operator,
    pub display_name: &'static str,

    /// Overrides the property type when rendering the operand.
    pub operand_type: Option<DataType>,
    pub operand_stereotype: Option<OperandStereotype>,
    pub template: OperatorTemplate,
}

impl OperatorSupport {
    const fn infix(
        operator: Operator,
        display_name: &'static str,
        symbol: &'static str,
        operand_type: Option<DataType>,
    ) -> Self {
        Self {
            operator,
            display_name,
            operand_type,
            operand_stereotype: None,
            template: OperatorTemplate::Infix(symbol),
        }
    }

    const fn call(
        operator: Operator,
        display_name: &'static str,
        function: &'static str,
        negated: bool,
    ) -> Self {
        Self {
            operator,
            display_name,
            operand_type: None,
            operand_stereotype: None,
            template: OperatorTemplate::Call { function, negated },
        }
    }

    const fn time_span(
        operator: Operator,
        display_name: &'static str,
        template: OperatorTemplate,
    ) -> Self {
        Self {
            operator,
            display_name,
            operand_type: Some(DataType::Number),
            operand_stereotype: Some(OperandStereotype::TimeSpan),
            template,
        }
    }

    const fn includes(operator: Operator, display_name: &'static str, negated: bool) -> Self {
        Self {
            operator,
            display_name,
            operand_type: Some(DataType::String),
            operand_stereotype: None,
            template: OperatorTemplate::Includes { negated },
        }
    }

    /// Type the operand is rendered as for a property of `property_type`.
    #[must_use]
    pub fn operand_type_for(&self, property_type: DataType) -> DataType {
        self.operand_type.unwrap_or(property_type)
    }

    #[must_use]
    pub fn generate(&self, left: &str, right: &str) -> String {
        self.template.render(left, right)
    }
}

// Six ordering/equality comparisons shared by number, string and time,
// followed by any type-specific entries.
macro_rules! comparison_operators {
    ($operand_type:expr; $( $extra:expr ),* $(,)?) => {
        &[
            OperatorSupport::infix(Operator::Eq, "=", "==", $operand_type),
            OperatorSupport::infix(Operator::Ne, "\u{2260}", "!=", $operand_type),
            OperatorSupport::infix(Operator::Gt, ">", ">", $operand_type),
            OperatorSupport::infix(Operator::Gte, "\u{2265}", ">=", $operand_type),
            OperatorSupport::infix(Operator::Lte, "\u{2264}", "<=", $operand_type),
            OperatorSupport::infix(Operator::Lt, "<", "<", $operand_type),
            $( $extra, )*
        ]
    };
}

const NUMBER_OPERATORS: &[OperatorSupport] = comparison_operators!(None;);

const STRING_OPERATORS: &[OperatorSupport] = comparison_operators!(
    None;
    OperatorSupport::call(Operator::Contains, "contains", "Strings.contains", false),
    OperatorSupport::call(Operator::NotContains, "does not contain", "Strings.contains", true),
    OperatorSupport::call(Operator::StartsWith, "starts with", "Strings.startsWith", false),
    OperatorSupport::call(Operator::EndsWith, "ends with", "Strings.endsWith", false),
    OperatorSupport::call(
        Operator::NotStartsWith,
        "does not start with",
        "Strings.startsWith",
        true
    ),
    OperatorSupport::call(Operator::NotEndsWith, "does not end with", "Strings.endsWith", true),
);

const BOOLEAN_OPERATORS: &[OperatorSupport] =
    &[OperatorSupport::infix(Operator::Eq, "=", "==", None)];

const TIME_OPERATORS: &[OperatorSupport] = comparison_operators!(
    Some(DataType::Time);
    OperatorSupport::time_span(Operator::InTheLast, "in the last", OperatorTemplate::WithinPast),
    OperatorSupport::time_span(
        Operator::NotInTheLast,
        "not in the last",
        OperatorTemplate::BeforePast
    ),
    OperatorSupport::time_span(Operator::InTheNext, "in the next", OperatorTemplate::WithinFuture),
    OperatorSupport::time_span(
        Operator::NotInTheNext,
        "not in the next",
        OperatorTemplate::AfterFuture
    ),
);

const STRING_LIST_OPERATORS: &[OperatorSupport] = &[
    OperatorSupport::includes(Operator::Includes, "includes", false),
    OperatorSupport::includes(Operator::NotIncludes, "does not include", true),
];

/// Ordered operator table for `data_type`.
#[must_use]
pub const fn operators_for(data_type: DataType) -> &'static [OperatorSupport] {
    match data_type {
        DataType::Number => NUMBER_OPERATORS,
        DataType::String => STRING_OPERATORS,
        DataType::Boolean => BOOLEAN_OPERATORS,
        DataType::Time => TIME_OPERATORS,
        DataType::StringList => STRING_LIST_OPERATORS,
    }
}

/// Linear lookup of `operator` in the table for `data_type`.
pub fn find_operator(
    data_type: DataType,
    operator: Operator,
) -> Result<&'static OperatorSupport, CompileError> {
    operators_for(data_type)
        .iter()
        .find(|support| support.operator == operator)
        .ok_or(CompileError::UnsupportedOperator {
            operator,
            data_type,
        })
}
