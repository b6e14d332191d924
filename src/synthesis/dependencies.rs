use crate::error::{AnalysisError, Result};
use crate::model::{Capability, Coordinates, Dependency};
use crate::visitor::DependencySet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// The file backing a dependency (jar, aar, or class directory)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalArtifact {
    pub coordinates: Coordinates,
    pub file: PathBuf,
}

/// One capability extracted from a dependency by some analysis stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRecord {
    pub coordinates: Coordinates,
    pub capability: Capability,
}

#[derive(Debug, Default)]
struct DependencyBuilder {
    file: Option<PathBuf>,
    capabilities: Vec<Capability>,
}

/// Collects artifacts and capabilities per coordinates, then builds the dependency records
#[derive(Debug, Default)]
pub struct DependencySynthesizer {
    builders: BTreeMap<Coordinates, DependencyBuilder>,
}

impl DependencySynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the backing file; a later artifact for the same coordinates replaces it
    pub fn add_artifact(&mut self, artifact: PhysicalArtifact) {
        let builder = self.builders.entry(artifact.coordinates).or_default();
        builder.file = Some(artifact.file);
    }

    pub fn add_capability(&mut self, record: CapabilityRecord) {
        self.builders
            .entry(record.coordinates)
            .or_default()
            .capabilities
            .push(record.capability);
    }

    pub fn extend_artifacts(&mut self, artifacts: impl IntoIterator<Item = PhysicalArtifact>) {
        for artifact in artifacts {
            self.add_artifact(artifact);
        }
    }

    pub fn extend_capabilities(&mut self, records: impl IntoIterator<Item = CapabilityRecord>) {
        for record in records {
            self.add_capability(record);
        }
    }

    /// Build one record per coordinates seen.
    ///
    /// Fails if any coordinates never received an artifact, or if a
    /// capability breaks its own invariants.
    pub fn build(self) -> Result<DependencySet> {
        let mut dependencies = DependencySet::new();

        for (coordinates, builder) in self.builders {
            let file = builder
                .file
                .ok_or_else(|| AnalysisError::MissingArtifact(coordinates.clone()))?;

            let mut dependency = Dependency::new(coordinates, file);
            for capability in builder.capabilities {
                capability.validate()?;
                dependency.add_capability(capability);
            }
            dependencies.insert(dependency);
        }

        debug!("Synthesized {} dependency records", dependencies.len());
        Ok(dependencies)
    }
}
