//! Helpers for reasoning about configuration (bucket) names such as
//! `debugImplementation` or `kaptRelease`

use crate::model::Bucket;

/// Suffixes of dependency buckets, longest first so `compileOnlyApi` is not read as `api`
const MAIN_SUFFIXES: [&str; 5] = [
    "compileOnlyApi",
    "implementation",
    "compileOnly",
    "runtimeOnly",
    "api",
];

const ANNOTATION_PROCESSOR_PREFIXES: [&str; 2] = ["kapt", "annotationProcessor"];

fn ends_with_ignore_case(value: &str, suffix: &str) -> bool {
    value.len() >= suffix.len()
        && value.as_bytes()[value.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}

/// `api`, `debugImplementation`, `testRuntimeOnly`, ...
pub fn is_main(configuration_name: &str) -> bool {
    find_main_suffix(configuration_name).is_some()
}

/// `kapt`, `kaptDebug`, `annotationProcessor`, `testAnnotationProcessor`, ...
pub fn is_annotation_processor(configuration_name: &str) -> bool {
    find_processor_prefix(configuration_name).is_some()
        || ANNOTATION_PROCESSOR_PREFIXES
            .iter()
            .any(|prefix| ends_with_ignore_case(configuration_name, prefix))
}

/// Whether the configuration is specific to a variant or source set.
///
/// Names that are neither dependency buckets nor processor configurations are not variants.
pub fn is_variant(configuration_name: &str) -> bool {
    !source_set_of(configuration_name).is_empty()
}

/// The bucket or processor configuration the name is derived from
pub fn find_main(configuration_name: &str) -> Option<&'static str> {
    find_main_suffix(configuration_name).or_else(|| find_processor_prefix(configuration_name))
}

/// Source set part of a configuration: `debug` for `debugApi`, `Debug` for `kaptDebug`,
/// `test` for `testAnnotationProcessor`
fn source_set_of(configuration_name: &str) -> &str {
    let len = configuration_name.len();
    match find_main(configuration_name) {
        Some(main) if is_main(configuration_name) => &configuration_name[..len - main.len()],
        Some(prefix) => &configuration_name[prefix.len()..],
        None => ANNOTATION_PROCESSOR_PREFIXES
            .iter()
            .copied()
            .find(|suffix| ends_with_ignore_case(configuration_name, suffix))
            .map_or("", |suffix| &configuration_name[..len - suffix.len()]),
    }
}

/// Whether a declaration on the configuration is part of the variant's build.
///
/// `debugApi` belongs to `debug` and `freeDebug`; `testImplementation` belongs to neither.
pub fn applies_to_variant(configuration_name: &str, variant: &str) -> bool {
    if !is_variant(configuration_name) {
        return true;
    }
    let source_set = source_set_of(configuration_name);
    if source_set.eq_ignore_ascii_case(variant) {
        return true;
    }

    // A variant is built from its flavor and build type source sets
    let bytes = variant.as_bytes();
    let n = source_set.len();
    if n >= bytes.len() {
        return false;
    }
    let leading = bytes[..n].eq_ignore_ascii_case(source_set.as_bytes())
        && bytes[n].is_ascii_uppercase();
    let trailing = bytes[bytes.len() - n..].eq_ignore_ascii_case(source_set.as_bytes())
        && bytes[bytes.len() - n].is_ascii_uppercase();
    leading || trailing
}

fn find_main_suffix(configuration_name: &str) -> Option<&'static str> {
    MAIN_SUFFIXES
        .iter()
        .copied()
        .find(|suffix| ends_with_ignore_case(configuration_name, suffix))
}

fn find_processor_prefix(configuration_name: &str) -> Option<&'static str> {
    ANNOTATION_PROCESSOR_PREFIXES
        .iter()
        .copied()
        .find(|prefix| configuration_name.starts_with(prefix))
}

/// Variant part of a bucket configuration: `debug` for `debugApi`, empty for `api`
pub fn variant_prefix(configuration_name: &str) -> &str {
    match find_main_suffix(configuration_name) {
        Some(suffix) => &configuration_name[..configuration_name.len() - suffix.len()],
        None => "",
    }
}

/// Inverse of [`variant_prefix`]: `("debug", Api)` is `debugApi`
pub fn configuration_name(prefix: &str, bucket: Bucket) -> String {
    let value = bucket.value();
    if prefix.is_empty() {
        return value.to_string();
    }

    let mut name = String::with_capacity(prefix.len() + value.len());
    name.push_str(prefix);
    let mut chars = value.chars();
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
    name
}
