//! Shared fixture catalog for unit tests.

use crate::schema::{
    DataType, Naming, ObjectSchema, PropertyDescriptor, RelationshipDescriptor, Schema,
};

/// A small source-control catalog.
///
/// - `Repository`: every data type, naming, collection + singular relationships, insights.
/// - `Finding` → `SecretFinding`, `SastFinding` → `CriticalSastFinding`: a subtype hierarchy
///   whose root has no members.
/// - `Package`: an `insights` relationship onto a type that is not an insight.
pub(crate) fn fixture_schema() -> Schema {
    Schema::new()
        .with_type(
            "Repository",
            ObjectSchema::new()
                .with_property(
                    PropertyDescriptor::member("visibility", DataType::String)
                        .with_enum_values(["Public", "Private"]),
                )
                .with_property(PropertyDescriptor::member("name", DataType::String))
                .with_property(PropertyDescriptor::member("riskScore", DataType::Number))
                .with_property(PropertyDescriptor::member("isArchived", DataType::Boolean))
                .with_property(PropertyDescriptor::member("lastCommit", DataType::Time))
                .with_property(PropertyDescriptor::member("languages", DataType::StringList))
                .with_relationship(RelationshipDescriptor::collection(
                    "contributors",
                    "Contributor",
                ))
                .with_relationship(RelationshipDescriptor::singular("owner", "Team"))
                .with_relationship(RelationshipDescriptor::collection("findings", "Finding"))
                .with_relationship(RelationshipDescriptor::collection(
                    "insights",
                    "DiffableInsight",
                ))
                .with_naming(Naming::member("name")),
        )
        .with_type(
            "Contributor",
            ObjectSchema::new()
                .with_property(PropertyDescriptor::member("email", DataType::String))
                .with_property(PropertyDescriptor::member("commitCount", DataType::Number))
                .with_relationship(RelationshipDescriptor::singular("team", "Team")),
        )
        .with_type(
            "Team",
            ObjectSchema::new()
                .with_property(PropertyDescriptor::member("name", DataType::String))
                .with_naming(Naming::member("name")),
        )
        .with_type(
            "DiffableInsight",
            ObjectSchema::new()
                .with_property(PropertyDescriptor::member("badge", DataType::String)),
        )
        .with_type("Finding", ObjectSchema::new())
        .with_type(
            "SecretFinding",
            ObjectSchema::new()
                .with_supertype("Finding")
                .with_property(PropertyDescriptor::member("secretType", DataType::String)),
        )
        .with_type(
            "SastFinding",
            ObjectSchema::new()
                .with_supertype("Finding")
                .with_property(PropertyDescriptor::member("severity", DataType::String)),
        )
        .with_type(
            "CriticalSastFinding",
            ObjectSchema::new()
                .with_supertype("SastFinding")
                .with_property(PropertyDescriptor::member("cve", DataType::String)),
        )
        .with_type(
            "Package",
            ObjectSchema::new()
                .with_relationship(RelationshipDescriptor::collection("insights", "Contributor")),
        )
}
