use super::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Why a dependency was placed in a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    Abi,
    Impl,
    CompileOnly,
    Constant,
    Imported,
    Inline,
    LintJar,
    NativeLib,
    ResBySrc,
    ResByRes,
    RuntimeAndroid,
    SecurityProvider,
    ServiceLoader,
    /// Only used by processor reports
    AnnotationProcessor,
}

impl Reason {
    /// Evidence of use that is invisible to bytecode analysis
    pub fn is_runtime(&self) -> bool {
        matches!(
            self,
            Reason::Constant
                | Reason::Inline
                | Reason::ResBySrc
                | Reason::ResByRes
                | Reason::LintJar
                | Reason::RuntimeAndroid
                | Reason::ServiceLoader
                | Reason::SecurityProvider
                | Reason::NativeLib
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Abi => "ABI",
            Reason::Impl => "IMPL",
            Reason::CompileOnly => "COMPILE_ONLY",
            Reason::Constant => "CONSTANT",
            Reason::Imported => "IMPORTED",
            Reason::Inline => "INLINE",
            Reason::LintJar => "LINT_JAR",
            Reason::NativeLib => "NATIVE_LIB",
            Reason::ResBySrc => "RES_BY_SRC",
            Reason::ResByRes => "RES_BY_RES",
            Reason::RuntimeAndroid => "RUNTIME_ANDROID",
            Reason::SecurityProvider => "SECURITY_PROVIDER",
            Reason::ServiceLoader => "SERVICE_LOADER",
            Reason::AnnotationProcessor => "ANNOTATION_PROCESSOR",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dependency within a usage report, with every reason that contributed
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Trace {
    pub coordinates: Coordinates,
    pub reasons: BTreeSet<Reason>,
}

impl Trace {
    pub fn new(coordinates: Coordinates, reasons: BTreeSet<Reason>) -> Self {
        Self { coordinates, reasons }
    }
}

/// Declaration category a dependency belongs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Api,
    Implementation,
    CompileOnlyApi,
    CompileOnly,
    RuntimeOnly,
}

impl Bucket {
    /// Main configuration name for this bucket
    pub fn value(&self) -> &'static str {
        match self {
            Bucket::Api => "api",
            Bucket::Implementation => "implementation",
            Bucket::CompileOnlyApi => "compileOnlyApi",
            Bucket::CompileOnly => "compileOnly",
            Bucket::RuntimeOnly => "runtimeOnly",
        }
    }

    pub fn is_compile_only_like(&self) -> bool {
        matches!(self, Bucket::CompileOnly | Bucket::CompileOnlyApi)
    }

    /// Bucket of a (possibly variant-specific) configuration such as `debugApi`.
    ///
    /// Returns `None` for configurations that are not dependency buckets,
    /// including annotation processor configurations.
    pub fn of_configuration(configuration_name: &str) -> Option<Bucket> {
        let lower = configuration_name.to_ascii_lowercase();
        // compileOnlyApi also ends with "api"; check the longer suffixes first
        [
            Bucket::CompileOnlyApi,
            Bucket::CompileOnly,
            Bucket::RuntimeOnly,
            Bucket::Implementation,
            Bucket::Api,
        ]
        .into_iter()
        .find(|bucket| lower.ends_with(&bucket.value().to_ascii_lowercase()))
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// How one dependency was classified within one variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Classification {
    Used(Bucket),
    Unused,
}

/// Per-variant classification output. A coordinate appears in at most one set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyUsageReport {
    pub variant: String,
    pub abi: BTreeSet<Trace>,
    pub implementation: BTreeSet<Trace>,
    pub compile_only: BTreeSet<Trace>,
    pub runtime_only: BTreeSet<Trace>,
    pub compile_only_api: BTreeSet<Trace>,
    pub unused: BTreeSet<Trace>,
}

impl DependencyUsageReport {
    pub fn new(variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            ..Default::default()
        }
    }

    pub fn insert(&mut self, classification: Classification, trace: Trace) {
        let set = match classification {
            Classification::Used(Bucket::Api) => &mut self.abi,
            Classification::Used(Bucket::Implementation) => &mut self.implementation,
            Classification::Used(Bucket::CompileOnly) => &mut self.compile_only,
            Classification::Used(Bucket::CompileOnlyApi) => &mut self.compile_only_api,
            Classification::Used(Bucket::RuntimeOnly) => &mut self.runtime_only,
            Classification::Unused => &mut self.unused,
        };
        set.insert(trace);
    }

    /// Every trace paired with its classification, grouped by bucket
    pub fn traces(&self) -> impl Iterator<Item = (Classification, &Trace)> {
        let sets: [(Classification, &BTreeSet<Trace>); 6] = [
            (Classification::Used(Bucket::Api), &self.abi),
            (Classification::Used(Bucket::Implementation), &self.implementation),
            (Classification::Used(Bucket::CompileOnlyApi), &self.compile_only_api),
            (Classification::Used(Bucket::CompileOnly), &self.compile_only),
            (Classification::Used(Bucket::RuntimeOnly), &self.runtime_only),
            (Classification::Unused, &self.unused),
        ];
        sets.into_iter().flat_map(|(classification, set)| {
            set.iter().map(move |trace| (classification, trace))
        })
    }

    pub fn classification_of(&self, coordinates: &Coordinates) -> Option<Classification> {
        self.traces()
            .find(|(_, trace)| &trace.coordinates == coordinates)
            .map(|(classification, _)| classification)
    }

    pub fn trace_of(&self, coordinates: &Coordinates) -> Option<&Trace> {
        self.traces()
            .find(|(_, trace)| &trace.coordinates == coordinates)
            .map(|(_, trace)| trace)
    }

    pub fn len(&self) -> usize {
        self.traces().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-variant annotation processor usage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorUsageReport {
    pub variant: String,
    pub used: BTreeSet<Trace>,
    pub unused: BTreeSet<Trace>,
}
