//! Classification integration tests
//!
//! These tests drive the usage classifier through the graph reader the same
//! way the pipeline does, one variant at a time.

use depadvisor::analysis::AdvicePolicy;
use depadvisor::graph::{DependencyGraphView, GraphKind};
use depadvisor::model::{
    Bucket, Capability, ClassCapability, Classification, CodeSource, Coordinates, Dependency,
    DependencyUsageReport, InferredCapability, Location, NativeLibCapability, ProjectVariant,
    Reason, ServiceLoaderCapability, Source, SourceKind,
};
use depadvisor::visitor::{DependencySet, GraphViewReader};
use depadvisor::{AnalysisError, UsageClassifier};
use std::collections::BTreeSet;

fn strings(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn code(class_name: &str, used: &[&str], exposed: &[&str], imports: &[&str]) -> Source {
    Source::Code(CodeSource {
        relative_path: format!("src/main/kotlin/{}.kt", class_name.replace('.', "/")),
        kind: SourceKind::Kotlin,
        class_name: class_name.to_string(),
        imports: strings(imports),
        used_classes: strings(used),
        exposed_classes: strings(exposed),
    })
}

fn classes(coordinates: &Coordinates, classes: &[&str]) -> Dependency {
    Dependency::new(coordinates.clone(), "lib.jar")
        .with_capability(Capability::Class(ClassCapability { classes: strings(classes) }))
}

/// Classify `dependencies` for a project with the given sources
fn classify(
    sources: Vec<Source>,
    dependencies: Vec<Dependency>,
    locations: &[Location],
    policy: AdvicePolicy,
) -> DependencyUsageReport {
    let classpath = dependencies.iter().map(|d| d.coordinates.clone()).collect();
    let project = ProjectVariant::new(
        "debug",
        Coordinates::project(":app"),
        sources.into_iter().collect(),
        classpath,
    );
    let dependencies: DependencySet = dependencies.into_iter().collect();
    let locations: BTreeSet<Location> = locations.iter().cloned().collect();
    let graph = DependencyGraphView::new("debug", GraphKind::CompileTime);

    let mut classifier = UsageClassifier::new("debug", policy);
    GraphViewReader::new(&project, &dependencies, &graph, &locations)
        .accept(&mut classifier)
        .unwrap();
    classifier.into_report()
}

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn test_exposed_class_is_abi() {
    let foo = Coordinates::module("lib:foo", "1.0");
    let report = classify(
        vec![code("com.app.Api", &["com.foo.Bar"], &["com.foo.Bar"], &[])],
        vec![classes(&foo, &["com.foo.Bar"])],
        &[Location::new("lib:foo", "implementation")],
        AdvicePolicy::default(),
    );

    assert_eq!(
        report.classification_of(&foo),
        Some(Classification::Used(Bucket::Api))
    );
    assert_eq!(report.trace_of(&foo).unwrap().reasons, BTreeSet::from([Reason::Abi]));
}

#[test]
fn test_service_loader_with_unreferenced_classes_is_runtime_only() {
    let bar = Coordinates::module("lib:bar", "2.0");
    let dependency = classes(&bar, &["com.bar.BarDriver"]).with_capability(
        Capability::ServiceLoader(ServiceLoaderCapability {
            provider_file: "META-INF/services/java.sql.Driver".into(),
            provider_classes: strings(&["com.bar.BarDriver"]),
        }),
    );

    let report = classify(
        vec![code("com.app.Main", &["java.sql.DriverManager"], &[], &[])],
        vec![dependency],
        &[Location::new("lib:bar", "implementation")],
        AdvicePolicy::default(),
    );

    assert_eq!(
        report.classification_of(&bar),
        Some(Classification::Used(Bucket::RuntimeOnly))
    );
    assert_eq!(
        report.trace_of(&bar).unwrap().reasons,
        BTreeSet::from([Reason::ServiceLoader])
    );
}

#[test]
fn test_compile_only_annotations_override_usage() {
    let baz = Coordinates::module("lib:baz", "3.0");
    let dependency = classes(&baz, &["com.baz.Nullable"]).with_capability(Capability::Inferred(
        InferredCapability {
            is_compile_only_annotations: true,
        },
    ));

    let report = classify(
        vec![code("com.app.Main", &["com.baz.Nullable"], &["com.baz.Nullable"], &[])],
        vec![dependency],
        &[Location::new("lib:baz", "api")],
        AdvicePolicy::default(),
    );

    assert_eq!(
        report.classification_of(&baz),
        Some(Classification::Used(Bucket::CompileOnly))
    );
    let reasons = &report.trace_of(&baz).unwrap().reasons;
    assert!(reasons.contains(&Reason::CompileOnly));
    assert!(reasons.contains(&Reason::Abi));
}

#[test]
fn test_compile_only_api_policy() {
    let baz = Coordinates::module("lib:baz", "3.0");
    let dependency = classes(&baz, &["com.baz.Nullable"]).with_capability(Capability::Inferred(
        InferredCapability {
            is_compile_only_annotations: true,
        },
    ));
    let policy = AdvicePolicy {
        compile_only_api: true,
        ..Default::default()
    };

    let report = classify(
        vec![code("com.app.Main", &["com.baz.Nullable"], &["com.baz.Nullable"], &[])],
        vec![dependency],
        &[Location::new("lib:baz", "api")],
        policy,
    );

    assert_eq!(
        report.classification_of(&baz),
        Some(Classification::Used(Bucket::CompileOnlyApi))
    );
}

#[test]
fn test_declared_and_unused_is_unused() {
    let unused = Coordinates::module("lib:unused", "1.0");
    let report = classify(
        vec![code("com.app.Main", &["com.foo.Bar"], &[], &[])],
        vec![classes(&unused, &["com.unused.Thing"])],
        &[Location::new("lib:unused", "implementation")],
        AdvicePolicy::default(),
    );

    assert_eq!(report.classification_of(&unused), Some(Classification::Unused));
    assert!(report.trace_of(&unused).unwrap().reasons.is_empty());
}

#[test]
fn test_declared_without_capabilities_is_not_classified() {
    // A pom-only aggregator contributes no classes but its transitives are needed
    let bom = Coordinates::module("lib:aggregator", "1.0");
    let report = classify(
        vec![code("com.app.Main", &["com.foo.Bar"], &[], &[])],
        vec![Dependency::new(bom.clone(), "aggregator.pom")],
        &[Location::new("lib:aggregator", "implementation")],
        AdvicePolicy::default(),
    );

    assert_eq!(report.classification_of(&bom), None);
    assert!(report.unused.is_empty());
}

#[test]
fn test_inferred_only_is_compile_only() {
    let annotations = Coordinates::module("lib:annotations", "1.0");
    let dependency = Dependency::new(annotations.clone(), "annotations.jar").with_capability(
        Capability::Inferred(InferredCapability {
            is_compile_only_annotations: true,
        }),
    );

    let report = classify(
        vec![code("com.app.Main", &[], &[], &[])],
        vec![dependency],
        &[Location::new("lib:annotations", "implementation")],
        AdvicePolicy::default(),
    );

    assert_eq!(
        report.classification_of(&annotations),
        Some(Classification::Used(Bucket::CompileOnly))
    );
    assert_eq!(
        report.trace_of(&annotations).unwrap().reasons,
        BTreeSet::from([Reason::CompileOnly])
    );
}

#[test]
fn test_runtime_capability_without_classes_is_not_classified() {
    let bar = Coordinates::module("lib:bar", "2.0");
    let dependency = Dependency::new(bar.clone(), "bar.jar").with_capability(
        Capability::ServiceLoader(ServiceLoaderCapability {
            provider_file: "META-INF/services/java.sql.Driver".into(),
            provider_classes: strings(&["com.bar.BarDriver"]),
        }),
    );

    let report = classify(
        vec![code("com.app.Main", &[], &[], &[])],
        vec![dependency],
        &[Location::new("lib:bar", "implementation")],
        AdvicePolicy::default(),
    );

    assert_eq!(report.classification_of(&bar), None);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_runtime_evidence_is_never_unused() {
    let native = Coordinates::module("lib:native", "1.0");
    let dependency = classes(&native, &["com.native.Bridge"]).with_capability(
        Capability::NativeLib(NativeLibCapability {
            file_names: strings(&["libnative.so"]),
        }),
    );

    let report = classify(
        vec![code("com.app.Main", &[], &[], &[])],
        vec![dependency],
        &[Location::new("lib:native", "implementation")],
        AdvicePolicy::default(),
    );

    assert!(report.unused.is_empty());
    assert_eq!(
        report.classification_of(&native),
        Some(Classification::Used(Bucket::RuntimeOnly))
    );
}

#[test]
fn test_every_coordinate_lands_in_exactly_one_bucket() {
    let deps = [
        classes(&Coordinates::module("a:api", "1"), &["a.Api"]),
        classes(&Coordinates::module("b:impl", "1"), &["b.Impl"]),
        classes(&Coordinates::module("c:imported", "1"), &["c.Generic"]),
        classes(&Coordinates::module("d:unused", "1"), &["d.Nothing"]),
        classes(&Coordinates::project(":core"), &["core.Thing"]),
    ];
    let locations = [
        Location::new("a:api", "implementation"),
        Location::new("d:unused", "implementation"),
        Location::new(":core", "api"),
    ];

    let report = classify(
        vec![code(
            "com.app.Main",
            &["a.Api", "b.Impl", "core.Thing"],
            &["a.Api"],
            &["c.Generic"],
        )],
        deps.to_vec(),
        &locations,
        AdvicePolicy::default(),
    );

    let mut seen = BTreeSet::new();
    for (_, trace) in report.traces() {
        assert!(seen.insert(trace.coordinates.clone()), "{} twice", trace.coordinates);
    }
    assert_eq!(seen.len(), 5);
    assert_eq!(report.abi.len(), 1);
    assert_eq!(report.implementation.len(), 3);
    assert_eq!(report.unused.len(), 1);
}

#[test]
fn test_missing_dependency_record_is_fatal() {
    let project = ProjectVariant::new(
        "debug",
        Coordinates::project(":app"),
        BTreeSet::new(),
        [Coordinates::module("lib:ghost", "1.0")].into_iter().collect(),
    );
    let dependencies = DependencySet::new();
    let locations = BTreeSet::new();
    let graph = DependencyGraphView::new("debug", GraphKind::CompileTime);

    let mut classifier = UsageClassifier::new("debug", AdvicePolicy::default());
    let result =
        GraphViewReader::new(&project, &dependencies, &graph, &locations).accept(&mut classifier);

    assert!(matches!(result, Err(AnalysisError::MissingDependency(_))));
}
