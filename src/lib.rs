//! depadvisor - Dependency usage classification and declaration advice for JVM/Android modules
//!
//! Given what a module's code uses and what each dependency on its classpath
//! supplies, decide for every dependency whether it belongs on `api`,
//! `implementation`, `compileOnly`, `runtimeOnly`, or nowhere, and compare
//! that against how it is declared.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Input** - Load extraction reports and resolved graphs from an input directory
//! 2. **Synthesis** - Fold the reports into dependency and project variant records
//! 3. **Graph Building** - Walk each variant's resolution result into a graph view
//! 4. **Classification** - Visit every classpath dependency and bucket it
//! 5. **Advice** - Merge per-variant reports and compare against declarations
//! 6. **Reporting** - Output advice as terminal text or JSON

pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod input;
pub mod model;
pub mod report;
pub mod synthesis;
pub mod visitor;

pub use analysis::{
    AdviceMerger, AdvicePolicy, AnalysisInput, AnalysisOutcome, ProjectAnalyzer, UsageClassifier,
};
pub use cache::{CacheKey, FactCache};
pub use config::Config;
pub use error::{AnalysisError, Result};
pub use graph::{DependencyGraphView, GraphKind, GraphViewBuilder};
pub use input::{load_input, InputLoader};
pub use model::{
    Advice, Coordinates, Dependency, DependencyUsageReport, ProjectAdvice, ProjectVariant,
};
pub use report::{ReportFormat, Reporter};
pub use visitor::{GraphViewReader, GraphViewVisitor};
