use crate::error::{AnalysisError, Result};
use crate::graph::DependencyGraphView;
use crate::model::{AndroidResSource, CodeSource, Coordinates, ProjectVariant, Source, SourceKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Classes referenced from one compiled class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplodingBytecode {
    pub relative_path: String,
    pub class_name: String,
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub used_classes: BTreeSet<String>,
}

/// Classes exposed in the public signature of one compiled class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplodingAbi {
    pub class_name: String,
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub exposed_classes: BTreeSet<String>,
}

/// Import statements of one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplodingSourceCode {
    pub relative_path: String,
    pub class_name: String,
    pub kind: SourceKind,
    #[serde(default)]
    pub imports: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct CodeSourceBuilder {
    relative_path: Option<String>,
    kind: Option<SourceKind>,
    used_classes: BTreeSet<String>,
    exposed_classes: BTreeSet<String>,
    imports: BTreeSet<String>,
}

impl CodeSourceBuilder {
    fn build(self, class_name: String) -> Result<CodeSource> {
        let relative_path = self
            .relative_path
            .ok_or_else(|| AnalysisError::MissingRelativePath(class_name.clone()))?;
        let kind = self.kind.unwrap_or_else(|| kind_of(&relative_path));

        Ok(CodeSource {
            relative_path,
            kind,
            class_name,
            imports: self.imports,
            used_classes: self.used_classes,
            exposed_classes: self.exposed_classes,
        })
    }
}

fn kind_of(relative_path: &str) -> SourceKind {
    if relative_path.ends_with(".kt") {
        SourceKind::Kotlin
    } else {
        SourceKind::Java
    }
}

/// Folds bytecode, ABI and import reports into one [`ProjectVariant`]
#[derive(Debug)]
pub struct ProjectVariantSynthesizer {
    variant: String,
    coordinates: Coordinates,
    builders: BTreeMap<String, CodeSourceBuilder>,
    android_res: Vec<AndroidResSource>,
}

impl ProjectVariantSynthesizer {
    pub fn new(variant: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            variant: variant.into(),
            coordinates,
            builders: BTreeMap::new(),
            android_res: Vec::new(),
        }
    }

    pub fn add_bytecode(&mut self, bytecode: ExplodingBytecode) {
        let builder = self.builders.entry(bytecode.class_name).or_default();
        builder.relative_path = Some(bytecode.relative_path);
        builder.used_classes.extend(bytecode.used_classes);
    }

    pub fn add_abi(&mut self, abi: ExplodingAbi) {
        self.builders
            .entry(abi.class_name)
            .or_default()
            .exposed_classes
            .extend(abi.exposed_classes);
    }

    pub fn add_source_code(&mut self, source: ExplodingSourceCode) {
        let builder = self.builders.entry(source.class_name).or_default();
        builder.relative_path = Some(source.relative_path);
        builder.kind = Some(source.kind);
        builder.imports.extend(source.imports);
    }

    pub fn add_android_res(&mut self, source: AndroidResSource) {
        self.android_res.push(source);
    }

    /// Build the variant; its classpath is every graph node except the project itself
    pub fn build(self, graph: &DependencyGraphView) -> Result<ProjectVariant> {
        let mut sources = BTreeSet::new();
        for (class_name, builder) in self.builders {
            sources.insert(Source::Code(builder.build(class_name)?));
        }
        sources.extend(self.android_res.into_iter().map(Source::AndroidRes));

        let classpath = graph.classpath(&self.coordinates);

        debug!(
            "[{}] {} sources, {} classpath entries",
            self.variant,
            sources.len(),
            classpath.len()
        );

        Ok(ProjectVariant::new(
            self.variant,
            self.coordinates,
            sources,
            classpath,
        ))
    }
}
