//! Aggregation model for query results.
//!
//! A query's result columns decide which aggregate functions can be offered
//! and which columns can be grouped on.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

///
/// ResultColumnType
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultColumnType {
    Number,
    String,
    Boolean,
    DataModelObject,
    Insights,
    RiskTriggerInsights,
}

impl ResultColumnType {
    #[must_use]
    pub const fn is_groupable(self) -> bool {
        matches!(self, Self::Number | Self::String | Self::Boolean)
    }
}

///
/// ResultColumn
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ResultColumn {
    pub key: String,

    #[serde(rename = "type")]
    pub column_type: ResultColumnType,
}

impl ResultColumn {
    #[must_use]
    pub fn new(key: impl Into<String>, column_type: ResultColumnType) -> Self {
        Self {
            key: key.into(),
            column_type,
        }
    }
}

const NUMERIC: &[ResultColumnType] = &[ResultColumnType::Number];

const ANY_VALUE: &[ResultColumnType] = &[
    ResultColumnType::Boolean,
    ResultColumnType::DataModelObject,
    ResultColumnType::Insights,
    ResultColumnType::RiskTriggerInsights,
    ResultColumnType::String,
    ResultColumnType::Number,
];

///
/// AggregateFunction
///
/// Declaration order is offer order; the first available function is the
/// one a new aggregation column starts with.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunction {
    Average,
    Max,
    Min,
    #[serde(rename = "pctcount")]
    PercentCount,
    #[serde(rename = "pctsum")]
    PercentSum,
    #[serde(rename = "some")]
    Sample,
    Sum,
    Count,
}

impl AggregateFunction {
    pub const ALL: [Self; 8] = [
        Self::Average,
        Self::Max,
        Self::Min,
        Self::PercentCount,
        Self::PercentSum,
        Self::Sample,
        Self::Sum,
        Self::Count,
    ];

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Max => "max",
            Self::Min => "min",
            Self::PercentCount => "pctcount",
            Self::PercentSum => "pctsum",
            Self::Sample => "some",
            Self::Sum => "sum",
            Self::Count => "count",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Average => "Average",
            Self::Max => "Maximum",
            Self::Min => "Minimum",
            Self::PercentCount => "% of occurrences",
            Self::PercentSum => "% of total",
            Self::Sample => "Sample value",
            Self::Sum => "Sum",
            Self::Count => "Count",
        }
    }

    #[must_use]
    pub const fn supported_types(self) -> &'static [ResultColumnType] {
        match self {
            Self::Average | Self::Max | Self::Min | Self::PercentSum | Self::Sum => NUMERIC,
            Self::PercentCount | Self::Sample | Self::Count => ANY_VALUE,
        }
    }

    #[must_use]
    pub fn supports(self, column_type: ResultColumnType) -> bool {
        self.supported_types().contains(&column_type)
    }

    /// Suggested output column name for this function over `input_column`.
    #[must_use]
    pub fn column_name(self, input_column: &str) -> String {
        match self {
            Self::Average => format!("Average {input_column}"),
            Self::Max => format!("Maximum of {input_column}"),
            Self::Min => format!("Minimum of {input_column}"),
            Self::PercentCount => format!("% of occurrences of {input_column}"),
            Self::PercentSum => format!("% of {input_column}"),
            Self::Sample => format!("Sample of {input_column}"),
            Self::Sum => format!("Total {input_column}"),
            Self::Count => format!("# of {input_column}"),
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

///
/// AggregationColumn
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationColumn {
    #[serde(rename = "$type")]
    pub function: AggregateFunction,
    pub column_name: String,
    pub input_column: String,
}

impl AggregationColumn {
    #[must_use]
    pub fn suggested_name(&self) -> String {
        self.function.column_name(&self.input_column)
    }
}

///
/// AggregationDefinition
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationDefinition {
    pub group_by_fields: Vec<String>,
    pub aggregation_columns: Vec<AggregationColumn>,
}

///
/// AggregationOptions
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AggregationOptions<'a> {
    /// Supported columns per function; functions with none are absent.
    pub columns_by_function: BTreeMap<AggregateFunction, Vec<&'a ResultColumn>>,
    pub available_functions: Vec<AggregateFunction>,
    pub groupable_columns: Vec<&'a ResultColumn>,
}

/// What can be aggregated and grouped over `columns`.
#[must_use]
pub fn aggregation_options(columns: &[ResultColumn]) -> AggregationOptions<'_> {
    let columns_by_function: BTreeMap<_, _> = AggregateFunction::ALL
        .into_iter()
        .filter_map(|function| {
            let supported: Vec<_> = columns
                .iter()
                .filter(|column| function.supports(column.column_type))
                .collect();

            (!supported.is_empty()).then_some((function, supported))
        })
        .collect();

    AggregationOptions {
        available_functions: columns_by_function.keys().copied().collect(),
        columns_by_function,
        groupable_columns: columns
            .iter()
            .filter(|column| column.column_type.is_groupable())
            .collect(),
    }
}

/// First available function over its first supported column, with the
/// suggested name. `None` when nothing in `columns` can be aggregated.
#[must_use]
pub fn create_default_aggregation_column(columns: &[ResultColumn]) -> Option<AggregationColumn> {
    let options = aggregation_options(columns);
    let (function, supported) = options.columns_by_function.into_iter().next()?;
    let input = supported.first()?;

    Some(AggregationColumn {
        function,
        column_name: function.column_name(&input.key),
        input_column: input.key.clone(),
    })
}
