use super::{AndroidResSource, Coordinates, Source};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Aggregated facts about the module under analysis, for one variant.
///
/// Derived sets are computed once at construction (and again after
/// deserialization) so lookups during classification are plain set reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProjectVariantRepr", into = "ProjectVariantRepr")]
pub struct ProjectVariant {
    variant: String,
    coordinates: Coordinates,
    sources: BTreeSet<Source>,
    classpath: BTreeSet<Coordinates>,

    used_classes: BTreeSet<String>,
    exposed_classes: BTreeSet<String>,
    implementation_classes: BTreeSet<String>,
    imports: BTreeSet<String>,
    android_res_sources: Vec<AndroidResSource>,
}

impl ProjectVariant {
    pub fn new(
        variant: impl Into<String>,
        coordinates: Coordinates,
        sources: BTreeSet<Source>,
        classpath: BTreeSet<Coordinates>,
    ) -> Self {
        let mut used_classes = BTreeSet::new();
        let mut exposed_classes = BTreeSet::new();
        let mut imports = BTreeSet::new();
        let mut android_res_sources = Vec::new();

        for source in &sources {
            match source {
                Source::Code(code) => {
                    used_classes.extend(code.used_classes.iter().cloned());
                    exposed_classes.extend(code.exposed_classes.iter().cloned());
                    imports.extend(code.imports.iter().cloned());
                }
                Source::AndroidRes(res) => android_res_sources.push(res.clone()),
            }
        }

        let implementation_classes = used_classes
            .difference(&exposed_classes)
            .cloned()
            .collect();

        Self {
            variant: variant.into(),
            coordinates,
            sources,
            classpath,
            used_classes,
            exposed_classes,
            implementation_classes,
            imports,
            android_res_sources,
        }
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn sources(&self) -> &BTreeSet<Source> {
        &self.sources
    }

    pub fn classpath(&self) -> &BTreeSet<Coordinates> {
        &self.classpath
    }

    pub fn used_classes(&self) -> &BTreeSet<String> {
        &self.used_classes
    }

    /// Classes that are part of this module's ABI
    pub fn exposed_classes(&self) -> &BTreeSet<String> {
        &self.exposed_classes
    }

    /// `used_classes - exposed_classes`
    pub fn implementation_classes(&self) -> &BTreeSet<String> {
        &self.implementation_classes
    }

    /// Union of all Java and Kotlin import statements
    pub fn imports(&self) -> &BTreeSet<String> {
        &self.imports
    }

    pub fn android_res_sources(&self) -> &[AndroidResSource] {
        &self.android_res_sources
    }
}

#[derive(Serialize, Deserialize)]
struct ProjectVariantRepr {
    variant: String,
    coordinates: Coordinates,
    #[serde(default)]
    sources: BTreeSet<Source>,
    #[serde(default)]
    classpath: BTreeSet<Coordinates>,
}

impl From<ProjectVariantRepr> for ProjectVariant {
    fn from(repr: ProjectVariantRepr) -> Self {
        ProjectVariant::new(repr.variant, repr.coordinates, repr.sources, repr.classpath)
    }
}

impl From<ProjectVariant> for ProjectVariantRepr {
    fn from(project: ProjectVariant) -> Self {
        Self {
            variant: project.variant,
            coordinates: project.coordinates,
            sources: project.sources,
            classpath: project.classpath,
        }
    }
}
