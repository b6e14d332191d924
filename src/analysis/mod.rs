//! Usage classification and advice computation

mod advice;
mod classifier;
pub mod configurations;
mod pipeline;
mod processors;

pub use advice::{recommended_bucket, AdviceMerger};
pub use classifier::UsageClassifier;
pub use pipeline::{AnalysisInput, AnalysisOutcome, ProjectAnalyzer, VariantInput};
pub use processors::ProcessorDetector;

use serde::{Deserialize, Serialize};

/// Knobs for the places where the advice rules leave room for judgement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvicePolicy {
    /// Advise moving `implementation`/`api` declarations that are only needed
    /// at runtime to `runtimeOnly`
    pub strict_runtime_only: bool,

    /// Classify compile-only dependencies that appear in the ABI as `compileOnlyApi`
    pub compile_only_api: bool,
}
