//! End-to-end pipeline tests
//!
//! These tests load the fixture input directory, run the full analysis and
//! check the advice that comes out.

use depadvisor::analysis::AdvicePolicy;
use depadvisor::model::{Advice, Bucket, Classification, Coordinates};
use depadvisor::{load_input, AnalysisInput, Config, ProjectAnalyzer};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn input() -> AnalysisInput {
    load_input(&fixtures_path().join("app")).expect("fixture input loads")
}

fn lib(id: &str, version: &str) -> Coordinates {
    Coordinates::module(id, version)
}

#[test]
fn test_fixture_advice() {
    let outcome = ProjectAnalyzer::default().analyze(&input()).unwrap();

    assert_eq!(
        outcome.advice.dependency_advice,
        BTreeSet::from([
            Advice::of_change(lib("lib:baz", "3.0"), "api", "compileOnly"),
            Advice::of_change(lib("lib:foo", "1.0"), "implementation", "api"),
            Advice::of_add(lib("lib:trans", "1.2"), "implementation"),
            Advice::of_remove(lib("lib:unused", "1.0"), "implementation"),
        ])
    );
    assert_eq!(
        outcome.advice.processor_advice,
        BTreeSet::from([Advice::of_remove(
            lib("com.google.dagger:dagger-compiler", "2.50"),
            "kapt"
        )])
    );
}

#[test]
fn test_fixture_reports_per_variant() {
    let outcome = ProjectAnalyzer::default().analyze(&input()).unwrap();
    let variants: Vec<_> = outcome.reports.iter().map(|r| r.variant.as_str()).collect();
    assert_eq!(variants, vec!["debug", "release"]);

    let debug = &outcome.reports[0];
    let release = &outcome.reports[1];
    let foo = lib("lib:foo", "1.0");
    assert_eq!(debug.classification_of(&foo), Some(Classification::Used(Bucket::Api)));
    assert_eq!(
        release.classification_of(&foo),
        Some(Classification::Used(Bucket::Implementation))
    );
    assert_eq!(
        debug.classification_of(&lib("lib:bar", "2.0")),
        Some(Classification::Used(Bucket::RuntimeOnly))
    );
}

#[test]
fn test_strict_runtime_only_moves_service_loader() {
    let policy = AdvicePolicy {
        strict_runtime_only: true,
        ..Default::default()
    };
    let outcome = ProjectAnalyzer::new(policy).analyze(&input()).unwrap();

    assert!(outcome.advice.dependency_advice.contains(&Advice::of_change(
        lib("lib:bar", "2.0"),
        "implementation",
        "runtimeOnly"
    )));
}

#[test]
fn test_output_is_deterministic() {
    let input = input();
    let first = ProjectAnalyzer::default().analyze(&input).unwrap();

    let mut reversed = input.clone();
    reversed.variants.reverse();
    for _ in 0..5 {
        let again = ProjectAnalyzer::default().analyze(&reversed).unwrap();
        assert_eq!(again.advice, first.advice);
        assert_eq!(again.reports, first.reports);
        assert_eq!(again.processor_reports, first.processor_reports);
    }
}

#[test]
fn test_config_ignore_and_variants() {
    let config = Config {
        ignore: vec!["lib:u*".to_string(), "com.google.dagger:*".to_string()],
        variants: vec!["release".to_string()],
        ..Default::default()
    };
    let outcome = ProjectAnalyzer::from_config(&config).analyze(&input()).unwrap();

    assert_eq!(outcome.reports.len(), 1);
    assert!(outcome.advice.processor_advice.is_empty());
    // Release never exposes foo, so it stays on implementation
    assert_eq!(
        outcome.advice.dependency_advice,
        BTreeSet::from([
            Advice::of_change(lib("lib:baz", "3.0"), "api", "compileOnly"),
            Advice::of_add(lib("lib:trans", "1.2"), "implementation"),
        ])
    );
}
