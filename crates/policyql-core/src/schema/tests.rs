use super::*;
use crate::test_support::fixture_schema;

// ---------------------------------------------------------------------
// Subtype discovery
// ---------------------------------------------------------------------

#[test]
fn subtypes_are_breadth_first_in_key_order() {
    let schema = fixture_schema();

    assert_eq!(
        schema.subtypes("Finding"),
        ["SastFinding", "SecretFinding", "CriticalSastFinding"]
    );
    assert_eq!(schema.subtypes("SastFinding"), ["CriticalSastFinding"]);
    assert!(schema.subtypes("Repository").is_empty());
    assert!(schema.subtypes("Ghost").is_empty());
}

#[test]
fn diamond_hierarchy_reports_each_subtype_once() {
    let schema = Schema::new()
        .with_type("Base", ObjectSchema::new())
        .with_type("Left", ObjectSchema::new().with_supertype("Base"))
        .with_type("Right", ObjectSchema::new().with_supertype("Base"))
        .with_type(
            "Both",
            ObjectSchema::new()
                .with_supertype("Left")
                .with_supertype("Right"),
        );

    assert_eq!(schema.subtypes("Base"), ["Left", "Right", "Both"]);
}

#[test]
fn cyclic_supertypes_terminate() {
    let schema = Schema::new()
        .with_type("A", ObjectSchema::new().with_supertype("B"))
        .with_type("B", ObjectSchema::new().with_supertype("A"))
        .with_type("Self", ObjectSchema::new().with_supertype("Self"));

    assert_eq!(schema.subtypes("A"), ["B"]);
    assert!(schema.subtypes("Self").is_empty());
}

#[test]
fn repeated_supertype_is_recorded_once() {
    let object = ObjectSchema::new()
        .with_supertype("Base")
        .with_supertype("Base");

    assert_eq!(object.supertypes, ["Base"]);
}

// ---------------------------------------------------------------------
// Lookup and capabilities
// ---------------------------------------------------------------------

#[test]
fn members_resolve_by_id() {
    let schema = fixture_schema();
    let repository = schema.require("Repository").unwrap();

    assert_eq!(
        repository.property("riskScore").map(|p| p.data_type),
        Some(DataType::Number)
    );
    assert_eq!(
        repository.relationship("owner").map(|r| r.target_type.as_str()),
        Some("Team")
    );
    assert!(repository.property("owner").is_none());
    assert_eq!(
        schema.require("Ghost").unwrap_err(),
        CompileError::unknown_type("Ghost")
    );
}

#[test]
fn insight_support_needs_recognized_target() {
    let schema = fixture_schema();

    assert!(schema.require("Repository").unwrap().supports_has_insight());
    assert!(!schema.require("Package").unwrap().supports_has_insight());
    assert!(!schema.require("Team").unwrap().supports_has_insight());

    let risk = ObjectSchema::new().with_relationship(RelationshipDescriptor::collection(
        INSIGHTS_RELATIONSHIP,
        "RiskTriggerInsight",
    ));
    assert!(risk.supports_has_insight());
}

#[test]
fn boolean_members_enumerate_both_values() {
    let flag = PropertyDescriptor::member("enabled", DataType::Boolean);
    let label = PropertyDescriptor::member("label", DataType::String);

    assert_eq!(
        flag.enum_values.as_deref(),
        Some(["true".to_string(), "false".to_string()].as_slice())
    );
    assert_eq!(label.enum_values, None);
}

#[test]
fn custom_accessors_are_used() {
    let property = PropertyDescriptor::new("age", DataType::Number, |subject| {
        format!("Dates.daysSince({subject}.createdAt)")
    });

    assert_eq!(property.access("r"), "Dates.daysSince(r.createdAt)");
    assert_eq!(Naming::member("title").access("r"), "r.title");
}

#[test]
fn collection_relationship_renders_any_and_exists() {
    let relationship = RelationshipDescriptor::collection("tags", "Tag");

    let matches = relationship
        .render_matches("r", &|inner: &str| Ok(format!("{inner}.ok")))
        .unwrap();

    assert_eq!(matches, "r.tags.any((s) => s.ok)");
    assert_eq!(relationship.render_exists("r"), "!r.tags.empty()");
}

#[test]
fn singular_relationship_guards_presence() {
    let relationship = RelationshipDescriptor::singular("owner", "Team");

    let matches = relationship
        .render_matches("r", &|inner: &str| Ok(format!("{inner}.ok")))
        .unwrap();

    assert_eq!(matches, "(!!r.owner && r.owner.ok)");
    assert_eq!(relationship.render_exists("r"), "!!(r.owner)");
}

#[test]
fn nested_errors_propagate_through_descriptors() {
    let relationship = RelationshipDescriptor::collection("tags", "Tag");

    let err = relationship
        .render_matches("r", &|_: &str| Err::<String, _>(CompileError::NamingUnsupported))
        .unwrap_err();

    assert_eq!(err, CompileError::NamingUnsupported);
}

#[test]
fn data_type_tokens_parse_back() {
    for data_type in DataType::ALL {
        assert_eq!(data_type.as_str().parse::<DataType>(), Ok(data_type));
    }
    assert_eq!(
        serde_json::to_value(DataType::StringList).unwrap(),
        serde_json::json!("stringList")
    );
}

// ---------------------------------------------------------------------
// Schema documents
// ---------------------------------------------------------------------

const CATALOG: &str = r#"{
    "types": {
        "Repository": {
            "properties": [
                { "id": "name", "dataType": "string", "displayName": "Name" },
                { "id": "isPublic", "dataType": "boolean" }
            ],
            "relationships": [
                { "id": "owner", "targetType": "Team", "cardinality": "singular" },
                { "id": "insights", "targetType": "DiffableInsight" }
            ],
            "naming": "name"
        },
        "Team": { "properties": [{ "id": "name", "dataType": "string" }] },
        "DiffableInsight": {},
        "GitRepository": { "supertypes": ["Repository"] }
    }
}"#;

#[test]
fn document_builds_standard_accessors() {
    let schema = SchemaDocument::parse_schema(CATALOG).unwrap();
    let repository = schema.require("Repository").unwrap();

    assert_eq!(schema.len(), 4);
    assert_eq!(repository.property("name").unwrap().display_name, "Name");
    assert_eq!(repository.property("isPublic").unwrap().access("r"), "r.isPublic");
    assert_eq!(
        repository.relationship("owner").unwrap().render_exists("r"),
        "!!(r.owner)"
    );
    assert_eq!(repository.naming.as_ref().unwrap().access("r"), "r.name");
    assert!(repository.supports_has_insight());
    assert_eq!(schema.subtypes("Repository"), ["GitRepository"]);
}

#[test]
fn document_rejects_dangling_references() {
    let unknown_target =
        r#"{ "types": { "A": { "relationships": [{ "id": "b", "targetType": "B" }] } } }"#;
    let unknown_supertype = r#"{ "types": { "A": { "supertypes": ["Z"] } } }"#;
    let unknown_naming = r#"{ "types": { "A": { "naming": "title" } } }"#;

    assert!(matches!(
        SchemaDocument::parse_schema(unknown_target),
        Err(SchemaDocumentError::UnknownTargetType { target, .. }) if target == "B"
    ));
    assert!(matches!(
        SchemaDocument::parse_schema(unknown_supertype),
        Err(SchemaDocumentError::UnknownSupertype { supertype, .. }) if supertype == "Z"
    ));
    assert!(matches!(
        SchemaDocument::parse_schema(unknown_naming),
        Err(SchemaDocumentError::UnknownNamingProperty { property, .. }) if property == "title"
    ));
}

#[test]
fn document_rejects_duplicate_members() {
    let text = r#"{ "types": { "A": {
        "properties": [{ "id": "x", "dataType": "number" }],
        "relationships": [{ "id": "x", "targetType": "A" }]
    } } }"#;

    assert!(matches!(
        SchemaDocument::parse_schema(text),
        Err(SchemaDocumentError::DuplicateMember { member, .. }) if member == "x"
    ));
}

#[test]
fn document_rejects_unknown_fields() {
    let text = r#"{ "types": { "A": { "properties": [{ "id": "x", "type": "number" }] } } }"#;

    assert!(matches!(
        SchemaDocument::parse_schema(text),
        Err(SchemaDocumentError::Json(_))
    ));
}
