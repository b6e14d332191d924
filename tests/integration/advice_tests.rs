//! Advice integration tests
//!
//! Usage reports are built by hand so each test pins one merge rule.

use depadvisor::analysis::{recommended_bucket, AdvicePolicy};
use depadvisor::model::{
    Advice, Attribute, Bucket, Classification, Coordinates, DependencyUsageReport, Location,
    ProcessorUsageReport, ProjectAdvice, Reason, Trace,
};
use depadvisor::AdviceMerger;
use std::collections::BTreeSet;

fn module(id: &str) -> Coordinates {
    Coordinates::module(id, "1.0")
}

fn report(variant: &str, entries: &[(&Coordinates, Classification)]) -> DependencyUsageReport {
    let mut report = DependencyUsageReport::new(variant);
    for (coordinates, classification) in entries {
        report.insert(*classification, Trace::new((*coordinates).clone(), BTreeSet::new()));
    }
    report
}

fn merge(
    locations: &[Location],
    reports: &[DependencyUsageReport],
    policy: AdvicePolicy,
) -> ProjectAdvice {
    let locations: BTreeSet<Location> = locations.iter().cloned().collect();
    AdviceMerger::new(&locations, policy).merge(reports, &[])
}

fn used(bucket: Bucket) -> Classification {
    Classification::Used(bucket)
}

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn test_runtime_only_on_implementation_depends_on_policy() {
    let bar = Coordinates::module("lib:bar", "2.0");
    let locations = [Location::new("lib:bar", "implementation")];
    let reports = [report("debug", &[(&bar, used(Bucket::RuntimeOnly))])];

    let lenient = merge(&locations, &reports, AdvicePolicy::default());
    assert!(lenient.is_empty());

    let strict = merge(
        &locations,
        &reports,
        AdvicePolicy {
            strict_runtime_only: true,
            ..Default::default()
        },
    );
    assert_eq!(
        strict.dependency_advice,
        BTreeSet::from([Advice::of_change(bar, "implementation", "runtimeOnly")])
    );
}

#[test]
fn test_compile_only_on_api_is_a_downgrade() {
    let baz = Coordinates::module("lib:baz", "3.0");
    let advice = merge(
        &[Location::new("lib:baz", "api")],
        &[report("debug", &[(&baz, used(Bucket::CompileOnly))])],
        AdvicePolicy::default(),
    );

    let expected = Advice::of_change(baz, "api", "compileOnly");
    assert_eq!(advice.dependency_advice, BTreeSet::from([expected.clone()]));
    assert!(expected.is_downgrade());
    assert!(expected.is_compile_only());
}

#[test]
fn test_unused_declaration_is_removed() {
    let unused = module("lib:unused");
    let advice = merge(
        &[Location::new("lib:unused", "implementation")],
        &[
            report("debug", &[(&unused, Classification::Unused)]),
            report("release", &[(&unused, Classification::Unused)]),
        ],
        AdvicePolicy::default(),
    );

    assert_eq!(
        advice.dependency_advice,
        BTreeSet::from([Advice::of_remove(unused, "implementation")])
    );
}

// ============================================================================
// Merge Rules
// ============================================================================

#[test]
fn test_used_in_one_variant_is_kept() {
    let foo = module("lib:foo");
    let advice = merge(
        &[Location::new("lib:foo", "implementation")],
        &[
            report("debug", &[(&foo, used(Bucket::Implementation))]),
            report("release", &[(&foo, Classification::Unused)]),
        ],
        AdvicePolicy::default(),
    );
    assert!(advice.is_empty());
}

#[test]
fn test_api_in_any_variant_wins() {
    let foo = module("lib:foo");
    let advice = merge(
        &[Location::new("lib:foo", "implementation")],
        &[
            report("debug", &[(&foo, used(Bucket::Api))]),
            report("release", &[(&foo, used(Bucket::Implementation))]),
        ],
        AdvicePolicy::default(),
    );
    assert_eq!(
        advice.dependency_advice,
        BTreeSet::from([Advice::of_change(foo, "implementation", "api")])
    );
}

#[test]
fn test_change_keeps_variant_prefix() {
    let foo = module("lib:foo");
    let advice = merge(
        &[Location::new("lib:foo", "debugImplementation")],
        &[report("debug", &[(&foo, used(Bucket::Api))])],
        AdvicePolicy::default(),
    );
    assert_eq!(
        advice.dependency_advice,
        BTreeSet::from([Advice::of_change(foo, "debugImplementation", "debugApi")])
    );
}

#[test]
fn test_transitive_use_is_added_but_unused_transitives_are_not_removed() {
    let trans = module("lib:trans");
    let idle = module("lib:idle");
    let advice = merge(
        &[],
        &[report(
            "debug",
            &[(&trans, used(Bucket::Implementation)), (&idle, Classification::Unused)],
        )],
        AdvicePolicy::default(),
    );
    assert_eq!(
        advice.dependency_advice,
        BTreeSet::from([Advice::of_add(trans, "implementation")])
    );
}

#[test]
fn test_compile_only_and_runtime_only_are_never_added() {
    let annotations = module("lib:annotations");
    let driver = module("lib:driver");
    let advice = merge(
        &[],
        &[report(
            "debug",
            &[
                (&annotations, used(Bucket::CompileOnly)),
                (&driver, used(Bucket::RuntimeOnly)),
            ],
        )],
        AdvicePolicy::default(),
    );
    assert!(advice.is_empty());
}

#[test]
fn test_declared_compile_only_is_trusted() {
    let foo = module("lib:foo");
    let advice = merge(
        &[Location::new("lib:foo", "compileOnly")],
        &[report("debug", &[(&foo, used(Bucket::CompileOnlyApi))])],
        AdvicePolicy::default(),
    );
    assert!(advice.is_empty());
}

#[test]
fn test_redundant_declarations_are_removed() {
    let foo = module("lib:foo");
    let advice = merge(
        &[
            Location::new("lib:foo", "implementation"),
            Location::new("lib:foo", "api"),
        ],
        &[report("debug", &[(&foo, used(Bucket::Implementation))])],
        AdvicePolicy::default(),
    );
    assert_eq!(
        advice.dependency_advice,
        BTreeSet::from([Advice::of_remove(foo, "api")])
    );
}

#[test]
fn test_ambiguous_declarations_are_left_alone() {
    let foo = module("lib:foo");
    let advice = merge(
        &[
            Location::new("lib:foo", "debugImplementation"),
            Location::new("lib:foo", "releaseImplementation"),
        ],
        &[
            report("debug", &[(&foo, used(Bucket::Api))]),
            report("release", &[(&foo, used(Bucket::Api))]),
        ],
        AdvicePolicy::default(),
    );
    assert!(advice.is_empty());
}

#[test]
fn test_declarations_outside_analyzed_variants_are_ignored() {
    let junit = Coordinates::module("junit:junit", "4.13");
    let foo = module("lib:foo");
    let locations = [
        Location::new("junit:junit", "testImplementation"),
        Location::new("lib:foo", "implementation"),
        Location::new("lib:foo", "androidTestImplementation"),
    ];

    // Unused on the main classpath; the test declaration must survive
    let advice = merge(
        &locations,
        &[report(
            "debug",
            &[(&junit, Classification::Unused), (&foo, Classification::Unused)],
        )],
        AdvicePolicy::default(),
    );
    assert_eq!(
        advice.dependency_advice,
        BTreeSet::from([Advice::of_remove(foo.clone(), "implementation")])
    );

    // Used by main code but only declared for tests
    let advice = merge(
        &locations,
        &[report(
            "release",
            &[
                (&junit, used(Bucket::Implementation)),
                (&foo, used(Bucket::Implementation)),
            ],
        )],
        AdvicePolicy::default(),
    );
    assert_eq!(
        advice.dependency_advice,
        BTreeSet::from([Advice::of_add(junit, "implementation")])
    );
}

#[test]
fn test_platform_declarations_are_ignored() {
    let bom = module("androidx.compose:compose-bom");
    let advice = merge(
        &[Location::new("androidx.compose:compose-bom", "implementation")
            .with_attribute(Attribute::JavaPlatform)],
        &[report("debug", &[(&bom, Classification::Unused)])],
        AdvicePolicy::default(),
    );
    assert!(advice.is_empty());
}

#[test]
fn test_recommended_bucket_table() {
    let set = |buckets: &[Bucket]| buckets.iter().copied().collect::<BTreeSet<_>>();

    assert_eq!(recommended_bucket(&set(&[])), None);
    assert_eq!(
        recommended_bucket(&set(&[Bucket::Implementation, Bucket::Api])),
        Some(Bucket::Api)
    );
    assert_eq!(
        recommended_bucket(&set(&[Bucket::RuntimeOnly, Bucket::Implementation])),
        Some(Bucket::Implementation)
    );
    assert_eq!(
        recommended_bucket(&set(&[Bucket::RuntimeOnly, Bucket::CompileOnlyApi])),
        Some(Bucket::Api)
    );
    assert_eq!(
        recommended_bucket(&set(&[Bucket::RuntimeOnly, Bucket::CompileOnly])),
        Some(Bucket::Implementation)
    );
    assert_eq!(
        recommended_bucket(&set(&[Bucket::CompileOnly])),
        Some(Bucket::CompileOnly)
    );
}

// ============================================================================
// Annotation Processors
// ============================================================================

#[test]
fn test_processor_unused_everywhere_is_removed() {
    let dagger = Coordinates::module("com.google.dagger:dagger-compiler", "2.50");
    let room = Coordinates::module("androidx.room:room-compiler", "2.6.1");
    let locations: BTreeSet<Location> = [
        Location::new("com.google.dagger:dagger-compiler", "kapt"),
        Location::new("com.google.dagger:dagger-compiler", "kaptTest"),
        Location::new("androidx.room:room-compiler", "annotationProcessor"),
    ]
    .into_iter()
    .collect();

    let processor_reports = [
        ProcessorUsageReport {
            variant: "debug".into(),
            used: BTreeSet::new(),
            unused: [
                Trace::new(dagger.clone(), BTreeSet::new()),
                Trace::new(room.clone(), BTreeSet::new()),
            ]
            .into(),
        },
        ProcessorUsageReport {
            variant: "release".into(),
            used: [Trace::new(room, [Reason::AnnotationProcessor].into())].into(),
            unused: [Trace::new(dagger.clone(), BTreeSet::new())].into(),
        },
    ];

    let advice =
        AdviceMerger::new(&locations, AdvicePolicy::default()).merge(&[], &processor_reports);
    assert!(advice.dependency_advice.is_empty());
    let kapt = Advice::of_remove(dagger.clone(), "kapt");
    assert!(kapt.is_processor());
    // kaptTest only runs for test sources, which were not analyzed
    assert_eq!(advice.processor_advice, BTreeSet::from([kapt]));
}
