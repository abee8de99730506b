//! End to end: schema document, exported query, compiled predicate.

use policyql_core::{
    compile::{CompileOptions, Compiler},
    error::CompileErrorKind,
    expression::{ExpressionKind, create_default_expression_of_kind},
    fingerprint::expression_fingerprint,
    schema::SchemaDocument,
    settings::{
        SettingsError, export_query_settings, generate_for_query_settings,
        load_exported_query_settings, new_query_settings,
    },
};

const CATALOG: &str = r#"{
    "types": {
        "Repository": {
            "properties": [
                { "id": "name", "dataType": "string" },
                { "id": "riskScore", "dataType": "number" },
                { "id": "lastCommit", "dataType": "time" },
                { "id": "languages", "dataType": "stringList" }
            ],
            "relationships": [
                { "id": "apis", "targetType": "Api" },
                { "id": "owner", "targetType": "Team", "cardinality": "singular" },
                { "id": "insights", "targetType": "RiskTriggerInsight" }
            ],
            "naming": "name"
        },
        "Api": {
            "properties": [{ "id": "path", "dataType": "string" }],
            "relationships": [{ "id": "findings", "targetType": "Finding" }]
        },
        "Team": { "properties": [{ "id": "name", "dataType": "string" }], "naming": "name" },
        "Metric": {
            "properties": [
                { "id": "value", "dataType": "number" },
                { "id": "label", "dataType": "string" }
            ]
        },
        "Event": { "properties": [{ "id": "at", "dataType": "time" }] },
        "RiskTriggerInsight": {},
        "Finding": {},
        "SecretFinding": {
            "supertypes": ["Finding"],
            "properties": [{ "id": "secretType", "dataType": "string" }]
        }
    }
}"#;

const TYPES: [&str; 7] = [
    "Repository",
    "Api",
    "Team",
    "Metric",
    "Event",
    "Finding",
    "SecretFinding",
];

const EXPORT: &str = r#"{
    "$type": "explorer-schema",
    "$version": 1,
    "rowset": "Repository",
    "query": {
        "type": "boolean",
        "combiner": "and",
        "subExpressions": [
            { "type": "property", "property": "lastCommit", "operator": "itl", "operand": "90" },
            { "type": "property", "property": "languages", "operator": "inc", "operand": "Java" },
            { "type": "negatedHasInsight", "insightBadge": "Archived" },
            {
                "type": "relationship",
                "relationshipName": "apis",
                "relationshipQuery": {
                    "type": "relationship",
                    "relationshipName": "findings",
                    "relationshipQuery": {
                        "type": "typeSwitch",
                        "typeQueries": [{
                            "typeSelector": "SecretFinding",
                            "query": { "type": "property", "property": "secretType", "operator": "=", "operand": "AWS" }
                        }]
                    }
                }
            },
            {
                "type": "relationship",
                "relationshipName": "owner",
                "relationshipQuery": { "type": "name", "operator": "nct", "operand": "legacy" }
            }
        ]
    },
    "aggregation": {
        "groupByFields": ["name"],
        "aggregationColumns": [{ "$type": "max", "columnName": "Maximum of riskScore", "inputColumn": "riskScore" }]
    }
}"#;

const EXPECTED: &str = concat!(
    "((subject.lastCommit <= Dates.queryTime()) && ",
    "(subject.lastCommit >= Dates.add(\"day\", -90, Dates.queryTime())) && ",
    "subject.languages.any((s) => s == \"Java\") && ",
    "!(subject.insights.any((insight) => insight.badge == \"Archived\")) && ",
    "subject.apis.any((s) => s.findings.any((s) => ",
    "(s match SecretFinding ts => (!!ts && ts.secretType == \"AWS\"), else false))) && ",
    "(!!subject.owner && !Strings.contains(subject.owner.name, \"legacy\")))",
);

#[test]
fn exported_query_compiles_end_to_end() {
    let schema = SchemaDocument::parse_schema(CATALOG).unwrap();
    let settings = load_exported_query_settings(&schema, EXPORT).unwrap();
    let compiler = Compiler::new(&schema);

    let compiled = generate_for_query_settings(&compiler, &settings, "subject").unwrap();

    assert_eq!(compiled.code, EXPECTED);
    assert_eq!(compiled.fingerprint, expression_fingerprint(&settings.query));
}

#[test]
fn re_export_is_stable() {
    let schema = SchemaDocument::parse_schema(CATALOG).unwrap();
    let settings = load_exported_query_settings(&schema, EXPORT).unwrap();

    let first = export_query_settings(&settings, false).unwrap();
    let reloaded = load_exported_query_settings(&schema, &first).unwrap();
    let second = export_query_settings(&reloaded, false).unwrap();

    assert_eq!(first, second);
}

#[test]
fn tight_depth_limit_rejects_deep_query() {
    let schema = SchemaDocument::parse_schema(CATALOG).unwrap();
    let settings = load_exported_query_settings(&schema, EXPORT).unwrap();
    let compiler = Compiler::new(&schema).with_options(CompileOptions { max_depth: 4 });

    let err = generate_for_query_settings(&compiler, &settings, "subject").unwrap_err();

    assert_eq!(err.kind(), CompileErrorKind::DepthLimitExceeded);
}

#[test]
fn import_validates_against_the_schema_it_is_given() {
    // same export, catalog without the singular owner relationship
    let schema = SchemaDocument::parse_schema(&CATALOG.replace(
        r#"{ "id": "owner", "targetType": "Team", "cardinality": "singular" },"#,
        "",
    ))
    .unwrap();

    let err = load_exported_query_settings(&schema, EXPORT).unwrap_err();

    assert!(matches!(
        err,
        SettingsError::Compile(ref inner) if inner.identifier() == Some("owner")
    ));
}

#[test]
fn every_default_kind_compiles() {
    let schema = SchemaDocument::parse_schema(CATALOG).unwrap();
    let compiler = Compiler::new(&schema);

    for type_name in TYPES {
        for kind in ExpressionKind::ALL {
            let Some(tree) = create_default_expression_of_kind(&schema, type_name, kind).unwrap()
            else {
                continue;
            };

            assert!(
                compiler.generate_for_type(type_name, "x", &tree).is_ok(),
                "{type_name} {kind}"
            );
        }
    }
}

#[test]
fn new_settings_export_and_reload() {
    let schema = SchemaDocument::parse_schema(CATALOG).unwrap();
    let compiler = Compiler::new(&schema);

    for type_name in TYPES {
        let fresh = new_query_settings(&schema, type_name).unwrap().unwrap();

        let text = export_query_settings(&fresh, true).unwrap();
        let loaded = load_exported_query_settings(&schema, &text).unwrap();

        assert_eq!(loaded.query, fresh.query, "{type_name}");
        assert!(
            generate_for_query_settings(&compiler, &loaded, "x").is_ok(),
            "{type_name}"
        );
    }
}
