// tests/manifest.rs

mod common;
use crate::common::builders::{DescriptorBuilder, ManifestBuilder};
use crate::common::init_tracing;

use std::io::Write;

use tempfile::NamedTempFile;

use syncgraph::config::{DependencyDescriptor, Manifest, load_and_validate, parse_str};
use syncgraph::engine::{Engine, EngineConfig, SyncContext, instantiate};
use syncgraph::errors::{ConfigError, SyncError};
use syncgraph::resource::{Dependency, FactoryRegistry};
use syncgraph::types::WaveScan;

const KINESIS: &str = r#"
[engine]
wave_scan = "full"
max_attempts = 5

[[resource]]
name = "kin"
type = "static"
properties = { Arn = "hello123" }

[[resource]]
name = "dyn"
type = "static"

[[resource]]
name = "dep"
type = "static"
depends_on = ["dyn", { resource = "kin", from_field = "Arn", to_field = "KinesisArn" }]
properties = { KinesisArn = "", status_field = "KinesisArn" }
"#;

#[test]
fn manifest_file_loads_with_sections_and_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{KINESIS}").unwrap();

    let manifest = load_and_validate(file.path()).unwrap();

    assert_eq!(manifest.engine.wave_scan, WaveScan::Full);
    assert_eq!(manifest.engine.max_attempts, Some(5));

    let names: Vec<&str> = manifest.resource.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["kin", "dyn", "dep"]);

    let dep = &manifest.resource[2];
    assert_eq!(dep.depends_on[0], DependencyDescriptor::Name("dyn".into()));
    assert_eq!(
        dep.dependencies()[1],
        Dependency::with_value("kin", "Arn", "KinesisArn")
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("nope.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn bad_toml_is_a_parse_error() {
    let result = parse_str("[[resource]\nname = ");
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn unknown_sections_are_rejected() {
    let text = "[pool]\nworkers = 7\n[[resource]]\nname = \"a\"\ntype = \"static\"\n";
    match parse_str(text) {
        Err(ConfigError::Toml(e)) => assert!(e.to_string().contains("pool"), "{e}"),
        other => panic!("expected a TOML error for [pool], got {other:?}"),
    }
}

#[test]
fn structural_checks_reject_bad_manifests() {
    let cases = [
        ("", "at least one"),
        (
            "[engine]\nmax_attempts = 0\n[[resource]]\nname = \"a\"\ntype = \"static\"\n",
            "max_attempts",
        ),
        (
            concat!(
                "[[resource]]\nname = \"a\"\ntype = \"static\"\n",
                "[[resource]]\nname = \"a\"\ntype = \"static\"\n",
            ),
            "more than once",
        ),
        ("[[resource]]\nname = \"a\"\ntype = \"\"\n", "empty type"),
    ];

    for (text, needle) in cases {
        let raw = parse_str(text).unwrap();
        match Manifest::try_from(raw) {
            Err(ConfigError::Invalid(msg)) => {
                assert!(msg.contains(needle), "{msg:?} should mention {needle:?}")
            }
            other => panic!("expected Invalid for {text:?}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn static_manifest_syncs_end_to_end() {
    init_tracing();
    let manifest = Manifest::try_from(parse_str(KINESIS).unwrap()).unwrap();
    let engine = Engine::new(EngineConfig::from(&manifest.engine));

    let report = engine
        .sync_descriptors(
            &SyncContext::new(),
            &manifest.resource,
            &FactoryRegistry::with_builtins(),
            false,
        )
        .await
        .unwrap();

    assert_eq!(report.status("dep"), Some("hello123"));
    assert_eq!(report.statuses.len(), 1);
}

#[tokio::test]
async fn unknown_resource_type_fails_before_running() {
    let manifest = ManifestBuilder::new()
        .with_resource(DescriptorBuilder::static_resource("a").build())
        .with_resource(DescriptorBuilder::new("b", "lambda").after("a").build())
        .build();

    let err = Engine::default()
        .sync_descriptors(
            &SyncContext::new(),
            &manifest.resource,
            &FactoryRegistry::with_builtins(),
            false,
        )
        .await
        .unwrap_err();

    match err {
        SyncError::UnknownResourceType { name, kind } => {
            assert_eq!(name, "b");
            assert_eq!(kind, "lambda");
        }
        other => panic!("expected UnknownResourceType, got {other:?}"),
    }
}

#[test]
fn custom_kinds_can_be_registered() {
    let mut registry = FactoryRegistry::with_builtins();
    registry.register("bucket", |desc| {
        std::sync::Arc::new(syncgraph::resource::StaticResource::from_descriptor(desc))
            as std::sync::Arc<dyn syncgraph::Resource>
    });

    let descriptors = vec![
        DescriptorBuilder::new("logs", "bucket").build(),
        DescriptorBuilder::static_resource("app").after("logs").build(),
    ];
    let resources = instantiate(&descriptors, &registry).unwrap();

    assert_eq!(resources.len(), 2);
    assert_eq!(resources[1].dependencies(), &[Dependency::on("logs")]);

    let mut kinds: Vec<&str> = registry.kinds().collect();
    kinds.sort_unstable();
    assert_eq!(kinds, vec!["bucket", "static"]);
}

#[test]
fn plan_orders_without_running() {
    let manifest = ManifestBuilder::new()
        .with_resource(DescriptorBuilder::static_resource("app").after("db").build())
        .with_resource(DescriptorBuilder::static_resource("db").after("net").build())
        .with_resource(DescriptorBuilder::static_resource("net").build())
        .with_resource(DescriptorBuilder::static_resource("x").after("y").build())
        .with_resource(DescriptorBuilder::static_resource("y").after("x").build())
        .build();
    let resources = instantiate(&manifest.resource, &FactoryRegistry::with_builtins()).unwrap();

    let plan = Engine::default().plan(&resources).unwrap();

    assert_eq!(plan.construction, vec!["net", "db", "app"]);
    assert_eq!(plan.deletion, vec!["app", "db", "net"]);
    assert_eq!(plan.unordered, vec!["x", "y"]);
}

#[test]
fn static_property_values_survive_the_builder() {
    let desc = DescriptorBuilder::static_resource("kin")
        .property("Arn", "abc")
        .property("Shards", 4i64)
        .build();
    let resources = instantiate(&[desc], &FactoryRegistry::with_builtins()).unwrap();

    assert_eq!(
        resources[0].read_field("Arn"),
        Some(toml_string("abc"))
    );
    assert!(resources[0].has_field("Shards"));
    assert!(!resources[0].has_field("Missing"));
}

fn toml_string(s: &str) -> syncgraph::resource::FieldValue {
    syncgraph::resource::FieldValue::String(s.to_string())
}
