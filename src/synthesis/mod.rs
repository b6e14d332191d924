//! Folds per-file extraction reports into the records the classifier reads

mod dependencies;
mod project;

pub use dependencies::{CapabilityRecord, DependencySynthesizer, PhysicalArtifact};
pub use project::{ExplodingAbi, ExplodingBytecode, ExplodingSourceCode, ProjectVariantSynthesizer};
