// Per-project analysis pipeline using rayon

use super::{AdviceMerger, AdvicePolicy, ProcessorDetector, UsageClassifier};
use crate::config::{glob_match, Config};
use crate::error::Result;
use crate::graph::DependencyGraphView;
use crate::model::{
    DependencyUsageReport, Location, ProcessorUsageReport, ProjectAdvice, ProjectVariant,
};
use crate::visitor::{DependencySet, GraphViewReader};
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// One variant of the project together with its resolved graph
#[derive(Debug, Clone)]
pub struct VariantInput {
    pub project: ProjectVariant,
    pub graph: DependencyGraphView,
}

/// Everything needed to compute advice for one project
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    pub dependencies: DependencySet,
    pub locations: BTreeSet<Location>,
    pub variants: Vec<VariantInput>,
}

/// Result of a run: the per-variant reports and the advice merged from them
#[derive(Debug, Clone, Default)]
pub struct AnalysisOutcome {
    pub reports: Vec<DependencyUsageReport>,
    pub processor_reports: Vec<ProcessorUsageReport>,
    pub advice: ProjectAdvice,
}

/// Classifies every variant and merges the results into advice
#[derive(Debug, Clone, Default)]
pub struct ProjectAnalyzer {
    policy: AdvicePolicy,
    ignore: Vec<String>,
    variants: Vec<String>,
}

impl ProjectAnalyzer {
    pub fn new(policy: AdvicePolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.advice)
            .with_ignore(config.ignore.clone())
            .with_variants(config.variants.clone())
    }

    /// Identifier patterns that never receive advice
    pub fn with_ignore(mut self, patterns: Vec<String>) -> Self {
        self.ignore = patterns;
        self
    }

    /// Restrict analysis to these variants; empty means all
    pub fn with_variants(mut self, variants: Vec<String>) -> Self {
        self.variants = variants;
        self
    }

    fn is_selected(&self, variant: &str) -> bool {
        self.variants.is_empty() || self.variants.iter().any(|v| v == variant)
    }

    fn is_ignored(&self, identifier: &str) -> bool {
        self.ignore.iter().any(|pattern| glob_match(pattern, identifier))
    }

    pub fn analyze(&self, input: &AnalysisInput) -> Result<AnalysisOutcome> {
        let selected: Vec<&VariantInput> = input
            .variants
            .iter()
            .filter(|variant| self.is_selected(variant.project.variant()))
            .collect();

        info!(
            "Analyzing {} of {} variants against {} dependencies",
            selected.len(),
            input.variants.len(),
            input.dependencies.len()
        );

        let mut results = selected
            .par_iter()
            .map(|variant| self.classify_variant(variant, input))
            .collect::<Result<Vec<_>>>()?;

        // Output must not depend on scheduling
        results.sort_by(|a, b| a.0.variant.cmp(&b.0.variant));
        let (reports, processor_reports): (Vec<_>, Vec<_>) = results.into_iter().unzip();

        let mut advice = AdviceMerger::new(&input.locations, self.policy)
            .merge(&reports, &processor_reports);

        let before = advice.len();
        advice.retain(|advice| !self.is_ignored(advice.coordinates.identifier()));
        if advice.len() < before {
            debug!("Dropped {} ignored advice", before - advice.len());
        }

        Ok(AnalysisOutcome {
            reports,
            processor_reports,
            advice,
        })
    }

    fn classify_variant(
        &self,
        variant: &VariantInput,
        input: &AnalysisInput,
    ) -> Result<(DependencyUsageReport, ProcessorUsageReport)> {
        let project = &variant.project;
        let reader =
            GraphViewReader::new(project, &input.dependencies, &variant.graph, &input.locations);

        let mut classifier = UsageClassifier::new(project.variant(), self.policy);
        reader.accept(&mut classifier)?;
        let report = classifier.into_report();

        let processors = ProcessorDetector::detect(project, &input.dependencies, &input.locations);

        info!(
            "[{}] {} api, {} implementation, {} compileOnly, {} runtimeOnly, {} unused",
            project.variant(),
            report.abi.len(),
            report.implementation.len(),
            report.compile_only.len() + report.compile_only_api.len(),
            report.runtime_only.len(),
            report.unused.len()
        );

        Ok((report, processors))
    }
}
