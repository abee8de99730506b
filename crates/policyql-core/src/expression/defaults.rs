//! Default expression synthesis.
//!
//! Authoring surfaces ask for a minimal valid node when a user adds a
//! predicate. Every constructor returns `None` when the type cannot host
//! the requested kind.

use crate::{
    error::CompileError,
    expression::{Expression, ExpressionKind},
    operator::{Operator, operators_for},
    schema::{DataType, ObjectSchema, Schema},
};

/// Best default for `type_name`: property, then relationship, then type switch.
pub fn create_default_expression(
    schema: &Schema,
    type_name: &str,
) -> Result<Option<Expression>, CompileError> {
    let object = schema.require(type_name)?;

    Ok(best_default(schema, type_name, object))
}

/// Default for a specific `kind`, or `None` when `type_name` cannot host it.
pub fn create_default_expression_of_kind(
    schema: &Schema,
    type_name: &str,
    kind: ExpressionKind,
) -> Result<Option<Expression>, CompileError> {
    let object = schema.require(type_name)?;

    let expression = match kind {
        ExpressionKind::Boolean => {
            best_default(schema, type_name, object).map(|inner| Expression::and(vec![inner]))
        }
        ExpressionKind::Property => property_default(object),
        ExpressionKind::Relationship => first_relationship(object)
            .map(|relationship| Expression::relationship(relationship, None)),
        ExpressionKind::NegatedRelationship => first_relationship(object)
            .map(|relationship| Expression::negated_relationship(relationship, None)),
        ExpressionKind::Name => object
            .naming
            .is_some()
            .then(|| Expression::name(Operator::Eq, "")),
        ExpressionKind::HasInsight => object
            .supports_has_insight()
            .then(|| Expression::has_insight("")),
        ExpressionKind::NegatedHasInsight => object
            .supports_has_insight()
            .then(|| Expression::negated_has_insight("")),
        ExpressionKind::TypeSwitch => type_switch_default(schema, type_name),
    };

    Ok(expression)
}

fn best_default(schema: &Schema, type_name: &str, object: &ObjectSchema) -> Option<Expression> {
    property_default(object)
        .or_else(|| {
            first_relationship(object)
                .map(|relationship| Expression::relationship(relationship, None))
        })
        .or_else(|| type_switch_default(schema, type_name))
}

fn property_default(object: &ObjectSchema) -> Option<Expression> {
    let property = object.properties.first()?;
    let support = operators_for(property.data_type).first()?;
    let operand = property
        .enum_values
        .as_ref()
        .and_then(|values| values.first())
        .map_or_else(|| placeholder_operand(property.data_type), Clone::clone);

    Some(Expression::property(
        property.id.clone(),
        support.operator,
        operand,
    ))
}

// empty, except where the empty string is not a literal of the type
fn placeholder_operand(data_type: DataType) -> String {
    match data_type {
        DataType::Number => "0".to_string(),
        _ => String::new(),
    }
}

fn first_relationship(object: &ObjectSchema) -> Option<String> {
    object
        .relationships
        .first()
        .map(|relationship| relationship.id.clone())
}

fn type_switch_default(schema: &Schema, type_name: &str) -> Option<Expression> {
    let subtype = schema.subtypes(type_name).into_iter().next()?;

    Some(Expression::type_switch([(subtype, None)]))
}
