//! Module: compile
//! Responsibility: schema-validated rendering of expression trees into target-language source.
//! Does not own: operator tables, literal escaping, or accessor shapes.
//! Boundary: pure and deterministic; the same inputs always yield the same string.


use crate::{
    DEFAULT_MAX_DEPTH,
    error::CompileError,
    expression::{
        BooleanCombination, Expression, ExpressionKind, InsightPredicate, NamePredicate,
        PropertyPredicate, RelationshipPredicate, TypeSwitchPredicate,
    },
    fingerprint::expression_fingerprint,
    operator::{Operator, apply_operator},
    schema::{DataType, INSIGHTS_RELATIONSHIP, ObjectSchema, Schema},
};

/// Variable bound to the narrowed subject inside a type-switch arm.
const NARROWED_SUBJECT: &str = "ts";

/// Variable bound to each insight inside an insight predicate.
const INSIGHT_SUBJECT: &str = "insight";

///
/// CompileOptions
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompileOptions {
    /// Maximum number of expression nodes on any root-to-leaf path.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

///
/// Compiler
///
/// Borrowed view of a schema plus limits.
/// Holds no mutable state, so one compiler can serve any number of trees.
///

#[derive(Clone, Copy, Debug)]
pub struct Compiler<'a> {
    schema: &'a Schema,
    options: CompileOptions,
}

impl<'a> Compiler<'a> {
    #[must_use]
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            options: CompileOptions::default(),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn schema(&self) -> &'a Schema {
        self.schema
    }

    #[must_use]
    pub const fn options(&self) -> CompileOptions {
        self.options
    }

    /// Compile `expression` against `object`, reading it through `subject`.
    pub fn generate(
        &self,
        object: &ObjectSchema,
        subject: &str,
        expression: &Expression,
    ) -> Result<String, CompileError> {
        self.node(object, subject, expression, 1)
    }

    /// Resolve `type_name` in the schema, then compile against it.
    pub fn generate_for_type(
        &self,
        type_name: &str,
        subject: &str,
        expression: &Expression,
    ) -> Result<String, CompileError> {
        let object = self.schema.require(type_name)?;

        match self.generate(object, subject, expression) {
            Ok(code) => {
                tracing::debug!(
                    object_type = type_name,
                    fingerprint = %expression_fingerprint(expression),
                    len = code.len(),
                    "compiled predicate"
                );
                Ok(code)
            }
            Err(err) => {
                tracing::debug!(object_type = type_name, error = %err, "predicate rejected");
                Err(err)
            }
        }
    }

    fn node(
        &self,
        object: &ObjectSchema,
        subject: &str,
        expression: &Expression,
        depth: usize,
    ) -> Result<String, CompileError> {
        if depth > self.options.max_depth {
            return Err(CompileError::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }

        match expression {
            Expression::Boolean(group) => self.boolean(object, subject, group, depth),
            Expression::Property(predicate) => property(object, subject, predicate),
            Expression::Relationship(predicate) => {
                self.relationship(object, subject, predicate, depth)
            }
            Expression::NegatedRelationship(predicate) => {
                Ok(negate(&self.relationship(object, subject, predicate, depth)?))
            }
            Expression::Name(predicate) => name(object, subject, predicate),
            Expression::HasInsight(predicate) => has_insight(object, subject, predicate),
            Expression::NegatedHasInsight(predicate) => {
                Ok(negate(&has_insight(object, subject, predicate)?))
            }
            Expression::TypeSwitch(switch) => self.type_switch(subject, switch, depth),
        }
    }

    fn boolean(
        &self,
        object: &ObjectSchema,
        subject: &str,
        group: &BooleanCombination,
        depth: usize,
    ) -> Result<String, CompileError> {
        if group.sub_expressions.is_empty() {
            return Err(CompileError::EmptyGroup {
                kind: ExpressionKind::Boolean,
            });
        }

        let parts = group
            .sub_expressions
            .iter()
            .map(|child| self.node(object, subject, child, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;
        let separator = format!(" {} ", group.combiner.symbol());

        Ok(format!("({})", parts.join(&separator)))
    }

    fn relationship(
        &self,
        object: &ObjectSchema,
        subject: &str,
        predicate: &RelationshipPredicate,
        depth: usize,
    ) -> Result<String, CompileError> {
        let descriptor = object
            .relationship(&predicate.relationship_name)
            .ok_or_else(|| CompileError::unknown_relationship(&predicate.relationship_name))?;

        // exists never reads the target, so it may be absent from the schema
        match &predicate.relationship_query {
            Some(query) => {
                let target = self.schema.require(&descriptor.target_type)?;
                descriptor.render_matches(subject, &|inner: &str| {
                    self.node(target, inner, query, depth + 1)
                })
            }
            None => Ok(descriptor.render_exists(subject)),
        }
    }

    fn type_switch(
        &self,
        subject: &str,
        switch: &TypeSwitchPredicate,
        depth: usize,
    ) -> Result<String, CompileError> {
        if switch.type_queries.is_empty() {
            return Err(CompileError::EmptyGroup {
                kind: ExpressionKind::TypeSwitch,
            });
        }

        let arms = switch
            .type_queries
            .iter()
            .map(|arm| {
                let object = self.schema.require(&arm.type_selector)?;
                let guard = match &arm.query {
                    Some(query) => self.node(object, NARROWED_SUBJECT, query, depth + 1)?,
                    None => "true".to_string(),
                };

                Ok(format!(
                    "{} {NARROWED_SUBJECT} => (!!{NARROWED_SUBJECT} && {guard})",
                    arm.type_selector
                ))
            })
            .collect::<Result<Vec<_>, CompileError>>()?;

        Ok(format!("({subject} match {}, else false)", arms.join(", ")))
    }
}

/// Compile with default options.
pub fn generate(
    object: &ObjectSchema,
    schema: &Schema,
    subject: &str,
    expression: &Expression,
) -> Result<String, CompileError> {
    Compiler::new(schema).generate(object, subject, expression)
}

fn property(
    object: &ObjectSchema,
    subject: &str,
    predicate: &PropertyPredicate,
) -> Result<String, CompileError> {
    let descriptor = object
        .property(&predicate.property)
        .ok_or_else(|| CompileError::unknown_property(&predicate.property))?;

    apply_operator(
        descriptor.data_type,
        &descriptor.access(subject),
        predicate.operator,
        &predicate.operand,
    )
}

fn name(
    object: &ObjectSchema,
    subject: &str,
    predicate: &NamePredicate,
) -> Result<String, CompileError> {
    let naming = object
        .naming
        .as_ref()
        .ok_or(CompileError::NamingUnsupported)?;

    apply_operator(
        DataType::String,
        &naming.access(subject),
        predicate.operator,
        &predicate.operand,
    )
}

fn has_insight(
    object: &ObjectSchema,
    subject: &str,
    predicate: &InsightPredicate,
) -> Result<String, CompileError> {
    if !object.supports_has_insight() {
        return Err(CompileError::InsightsUnsupported);
    }

    let badge = apply_operator(
        DataType::String,
        &format!("{INSIGHT_SUBJECT}.badge"),
        Operator::Eq,
        &predicate.insight_badge,
    )?;

    Ok(format!(
        "{subject}.{INSIGHTS_RELATIONSHIP}.any(({INSIGHT_SUBJECT}) => {badge})"
    ))
}

fn negate(code: &str) -> String {
    format!("!({code})")
}
