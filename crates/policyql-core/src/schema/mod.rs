//! Module: schema
//! Responsibility: the object schema contract the compiler validates trees against.
//! Does not own: schema discovery; the catalog is supplied by the caller.
//! Boundary: the only schema surface the compiler and default constructors depend on.

mod descriptor;
mod document;

#[cfg(test)]
mod tests;

pub use descriptor::{
    AccessorFn, ExistsFn, MatchesFn, Naming, NestedPredicate, PropertyDescriptor,
    RelationshipDescriptor,
};
pub use document::{
    Cardinality, ObjectDocument, PropertyDocument, RelationshipDocument, SchemaDocument,
    SchemaDocumentError,
};

use crate::error::CompileError;
use derive_more::{Deref, IntoIterator};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt,
    str::FromStr,
};

/// Relationship id that carries insight annotations.
pub const INSIGHTS_RELATIONSHIP: &str = "insights";

/// Target types an `insights` relationship must point at for insight predicates.
pub const INSIGHT_TARGET_TYPES: [&str; 2] = ["DiffableInsight", "RiskTriggerInsight"];

///
/// DataType
///
/// Scalar and collection types a property can carry.
/// Each type owns a distinct operator table and literal renderer.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    Number,
    String,
    Boolean,
    Time,
    StringList,
}

impl DataType {
    pub const ALL: [Self; 5] = [
        Self::Number,
        Self::String,
        Self::Boolean,
        Self::Time,
        Self::StringList,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Time => "time",
            Self::StringList => "stringList",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|data_type| data_type.as_str() == s)
            .ok_or_else(|| format!("unknown data type '{s}'"))
    }
}

///
/// ObjectSchema
///
/// One queryable object type: its properties, relationships, optional
/// naming capability and declared supertypes.
///

#[derive(Clone, Debug, Default)]
pub struct ObjectSchema {
    pub supertypes: Vec<String>,
    pub properties: Vec<PropertyDescriptor>,
    pub relationships: Vec<RelationshipDescriptor>,
    pub naming: Option<Naming>,
}

impl ObjectSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        let supertype = supertype.into();
        if !self.supertypes.contains(&supertype) {
            self.supertypes.push(supertype);
        }
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn with_relationship(mut self, relationship: RelationshipDescriptor) -> Self {
        self.relationships.push(relationship);
        self
    }

    #[must_use]
    pub fn with_naming(mut self, naming: Naming) -> Self {
        self.naming = Some(naming);
        self
    }

    #[must_use]
    pub fn property(&self, id: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|property| property.id == id)
    }

    #[must_use]
    pub fn relationship(&self, id: &str) -> Option<&RelationshipDescriptor> {
        self.relationships
            .iter()
            .find(|relationship| relationship.id == id)
    }

    /// Insight predicates need an `insights` relationship onto a recognized insight type.
    #[must_use]
    pub fn supports_has_insight(&self) -> bool {
        self.relationship(INSIGHTS_RELATIONSHIP)
            .is_some_and(|insights| INSIGHT_TARGET_TYPES.contains(&insights.target_type.as_str()))
    }
}

///
/// Schema
///
/// Full catalog: type name → object schema.
/// Ordered so that subtype discovery, and every default built from it, is
/// deterministic.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator)]
pub struct Schema {
    #[into_iterator(owned, ref)]
    types: BTreeMap<String, ObjectSchema>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_type(mut self, name: impl Into<String>, object: ObjectSchema) -> Self {
        self.insert(name, object);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        object: ObjectSchema,
    ) -> Option<ObjectSchema> {
        self.types.insert(name.into(), object)
    }

    #[must_use]
    pub fn object_type(&self, name: &str) -> Option<&ObjectSchema> {
        self.types.get(name)
    }

    /// Resolve a type name, failing with the offending name when absent.
    pub fn require(&self, name: &str) -> Result<&ObjectSchema, CompileError> {
        self.object_type(name)
            .ok_or_else(|| CompileError::unknown_type(name))
    }

    /// All transitive subtypes of `type_name`, breadth-first, without duplicates.
    ///
    /// A type is expanded at most once, so cyclic supertype declarations
    /// terminate. The queried type itself is never reported.
    #[must_use]
    pub fn subtypes(&self, type_name: &str) -> Vec<String> {
        let mut found = Vec::new();
        let mut visited = BTreeSet::from([type_name]);
        let mut queue = VecDeque::from([type_name]);

        while let Some(current) = queue.pop_front() {
            for (name, object) in &self.types {
                let is_child = object.supertypes.iter().any(|parent| parent == current);
                if is_child && visited.insert(name.as_str()) {
                    found.push(name.clone());
                    queue.push_back(name.as_str());
                }
            }
        }

        found
    }
}

impl FromIterator<(String, ObjectSchema)> for Schema {
    fn from_iter<I: IntoIterator<Item = (String, ObjectSchema)>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}
