#![allow(missing_docs)]

use std::fs;

use sombra_cypher::query::{
    document::{DocumentError, Element, QueryDocument, Step},
    BuilderOptions, Direction, PropertyOrder, QueryBuilder, Value,
};
use sombra_cypher::QueryError;
use tempfile::TempDir;

fn friend_request() -> QueryDocument {
    QueryDocument {
        steps: vec![
            Step::Match {
                pattern: vec![Element::Node {
                    alias: "a".into(),
                    label: Some("User".into()),
                    props: [("email".to_string(), Value::from("a@example.com"))]
                        .into_iter()
                        .collect(),
                }],
            },
            Step::Match {
                pattern: vec![Element::Node {
                    alias: "b".into(),
                    label: Some("User".into()),
                    props: [("email".to_string(), Value::from("b@example.com"))]
                        .into_iter()
                        .collect(),
                }],
            },
            Step::Create {
                pattern: vec![
                    Element::Node {
                        alias: "a".into(),
                        label: None,
                        props: Default::default(),
                    },
                    Element::Rel {
                        alias: "r".into(),
                        rel_type: Some("REQUESTED".into()),
                        direction: Direction::Outgoing,
                        props: [("at".to_string(), Value::Int(1_700_000_000))]
                            .into_iter()
                            .collect(),
                    },
                    Element::Node {
                        alias: "b".into(),
                        label: None,
                        props: Default::default(),
                    },
                ],
            },
            Step::Return {
                aliases: vec!["r".into()],
            },
        ],
    }
}

const EXPECTED: &str = "MATCH (a:User {email: $pemail_0})\n\
                        MATCH (b:User {email: $pemail_1})\n\
                        CREATE (a)-[r:REQUESTED {at: $pat_2}]->(b)\n\
                        RETURN r";

#[test]
fn document_survives_toml_and_json_files() {
    let dir = TempDir::new().expect("tempdir");
    let doc = friend_request();

    let toml_path = dir.path().join("request.toml");
    fs::write(&toml_path, toml::to_string(&doc).expect("toml")).expect("write toml");
    let json_path = dir.path().join("request.json");
    fs::write(&json_path, serde_json::to_string(&doc).expect("json")).expect("write json");

    for path in [toml_path, json_path] {
        let loaded = QueryDocument::load(&path).expect("load document");
        assert_eq!(loaded, doc);
        let query = loaded.apply(QueryBuilder::new()).finish().expect("query");
        assert_eq!(query.text, EXPECTED);
        assert_eq!(query.params.get("pat_2"), Some(&Value::Int(1_700_000_000)));
    }
}

#[test]
fn document_honours_builder_options() {
    let doc = QueryDocument::from_toml_str(
        r#"
        [[steps]]
        op = "merge"
        pattern = [{ kind = "node", alias = "u", label = "User", props = { zip = "12345", city = "Oslo" } }]

        [[steps]]
        op = "set"
        updates = { "u.visits" = 3, "u.active" = true }
        "#,
    )
    .expect("parse");
    let opts = BuilderOptions::new().property_order(PropertyOrder::Sorted);
    let query = doc
        .apply(QueryBuilder::with_options(opts))
        .finish()
        .expect("query");
    assert_eq!(
        query.text,
        "MERGE (u:User {city: $pcity_0, zip: $pzip_1})\nSET u.active = $setu_active_2, u.visits = $setu_visits_3"
    );
}

#[test]
fn document_params_step_rejects_bad_names() {
    let doc = QueryDocument::from_json_str(
        r#"{"steps": [
            {"op": "params", "params": {"bad-name": 1}},
            {"op": "create", "pattern": [{"kind": "node", "alias": "u", "label": "User"}]}
        ]}"#,
    )
    .expect("parse");
    let err = doc.apply(QueryBuilder::new()).finish().unwrap_err();
    assert_eq!(
        err,
        QueryError::InvalidParameterName {
            name: "bad-name".into()
        }
    );
}

#[test]
fn missing_document_reports_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("absent.json");
    let err = QueryDocument::load(&path).unwrap_err();
    assert!(matches!(err, DocumentError::Read { path: ref p, .. } if *p == path));
}
