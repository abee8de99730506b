//! Module: schema::document
//! Responsibility: serialized, data-only form of the object schema contract.
//! Does not own: accessor rendering beyond the standard member/collection/singular shapes.
//! Boundary: JSON catalogs become a `Schema` here, with every reference checked.

use crate::schema::{
    DataType, Naming, ObjectSchema, PropertyDescriptor, RelationshipDescriptor, Schema,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// SchemaDocumentError
///

#[derive(Debug, ThisError)]
pub enum SchemaDocumentError {
    #[error("schema document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("type '{type_name}' declares unknown supertype '{supertype}'")]
    UnknownSupertype {
        type_name: String,
        supertype: String,
    },

    #[error("relationship '{type_name}.{relationship}' targets unknown type '{target}'")]
    UnknownTargetType {
        type_name: String,
        relationship: String,
        target: String,
    },

    #[error("type '{type_name}' names unknown naming property '{property}'")]
    UnknownNamingProperty { type_name: String, property: String },

    #[error("type '{type_name}' repeats member '{member}'")]
    DuplicateMember { type_name: String, member: String },
}

///
/// Cardinality
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Cardinality {
    #[default]
    Collection,
    Singular,
}

///
/// PropertyDocument
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyDocument {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: String,

    pub data_type: DataType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,

    #[serde(default)]
    pub open_enum: bool,

    #[serde(default)]
    pub unordered_enum: bool,
}

///
/// RelationshipDocument
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RelationshipDocument {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: String,

    pub target_type: String,

    #[serde(default)]
    pub cardinality: Cardinality,
}

///
/// ObjectDocument
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectDocument {
    #[serde(default)]
    pub supertypes: Vec<String>,

    #[serde(default)]
    pub properties: Vec<PropertyDocument>,

    #[serde(default)]
    pub relationships: Vec<RelationshipDocument>,

    /// Property id read as the object's display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naming: Option<String>,
}

///
/// SchemaDocument
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SchemaDocument {
    pub types: BTreeMap<String, ObjectDocument>,
}

impl SchemaDocument {
    /// Parse a JSON catalog and build the schema it describes.
    pub fn parse_schema(text: &str) -> Result<Schema, SchemaDocumentError> {
        let document: Self = serde_json::from_str(text)?;

        document.into_schema()
    }

    /// Validate every cross-reference and build the schema with standard accessors.
    pub fn into_schema(self) -> Result<Schema, SchemaDocumentError> {
        self.validate()?;

        Ok(self
            .types
            .into_iter()
            .map(|(name, object)| (name, build_object(object)))
            .collect())
    }

    fn validate(&self) -> Result<(), SchemaDocumentError> {
        for (type_name, object) in &self.types {
            if let Some(supertype) = object
                .supertypes
                .iter()
                .find(|supertype| !self.types.contains_key(*supertype))
            {
                return Err(SchemaDocumentError::UnknownSupertype {
                    type_name: type_name.clone(),
                    supertype: supertype.clone(),
                });
            }

            let mut seen = BTreeSet::new();
            let members = object
                .properties
                .iter()
                .map(|property| &property.id)
                .chain(object.relationships.iter().map(|relationship| &relationship.id));
            for member in members {
                if !seen.insert(member) {
                    return Err(SchemaDocumentError::DuplicateMember {
                        type_name: type_name.clone(),
                        member: member.clone(),
                    });
                }
            }

            for relationship in &object.relationships {
                if !self.types.contains_key(&relationship.target_type) {
                    return Err(SchemaDocumentError::UnknownTargetType {
                        type_name: type_name.clone(),
                        relationship: relationship.id.clone(),
                        target: relationship.target_type.clone(),
                    });
                }
            }

            if let Some(naming) = &object.naming
                && !object.properties.iter().any(|property| &property.id == naming)
            {
                return Err(SchemaDocumentError::UnknownNamingProperty {
                    type_name: type_name.clone(),
                    property: naming.clone(),
                });
            }
        }

        Ok(())
    }
}

fn build_object(object: ObjectDocument) -> ObjectSchema {
    let naming = object.naming.as_deref().map(Naming::member);

    ObjectSchema {
        supertypes: object.supertypes,
        properties: object.properties.into_iter().map(build_property).collect(),
        relationships: object
            .relationships
            .into_iter()
            .map(build_relationship)
            .collect(),
        naming,
    }
}

fn build_property(document: PropertyDocument) -> PropertyDescriptor {
    let mut property = PropertyDescriptor::member(document.id, document.data_type)
        .with_description(document.description)
        .with_open_enum(document.open_enum)
        .with_unordered_enum(document.unordered_enum);

    if let Some(display_name) = document.display_name {
        property = property.with_display_name(display_name);
    }
    if let Some(values) = document.enum_values {
        property = property.with_enum_values(values);
    }

    property
}

fn build_relationship(document: RelationshipDocument) -> RelationshipDescriptor {
    let relationship = match document.cardinality {
        Cardinality::Collection => {
            RelationshipDescriptor::collection(document.id, document.target_type)
        }
        Cardinality::Singular => {
            RelationshipDescriptor::singular(document.id, document.target_type)
        }
    }
    .with_description(document.description);

    match document.display_name {
        Some(display_name) => relationship.with_display_name(display_name),
        None => relationship,
    }
}
