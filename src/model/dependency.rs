use super::{Capability, CapabilityKind, Coordinates, DependencyKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A node on the classpath together with everything known about its contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DependencyRepr", into = "DependencyRepr")]
pub struct Dependency {
    pub coordinates: Coordinates,
    pub capabilities: BTreeMap<CapabilityKind, Capability>,
    /// Physical artifact backing this dependency (jar, aar, or class directory)
    pub file: PathBuf,
}

impl Dependency {
    pub fn new(coordinates: Coordinates, file: impl Into<PathBuf>) -> Self {
        Self {
            coordinates,
            capabilities: BTreeMap::new(),
            file: file.into(),
        }
    }

    /// Add a capability, merging with any existing capability of the same kind
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.add_capability(capability);
        self
    }

    pub fn add_capability(&mut self, capability: Capability) {
        let kind = capability.kind();
        let merged = match self.capabilities.remove(&kind) {
            Some(existing) => existing.merge(capability),
            None => capability,
        };
        self.capabilities.insert(kind, merged);
    }

    pub fn capability(&self, kind: CapabilityKind) -> Option<&Capability> {
        self.capabilities.get(&kind)
    }

    pub fn kind(&self) -> DependencyKind {
        self.coordinates.kind()
    }
}

#[derive(Serialize, Deserialize)]
struct DependencyRepr {
    coordinates: Coordinates,
    #[serde(default)]
    capabilities: Vec<Capability>,
    file: PathBuf,
}

impl From<DependencyRepr> for Dependency {
    fn from(repr: DependencyRepr) -> Self {
        let mut dependency = Dependency::new(repr.coordinates, repr.file);
        for capability in repr.capabilities {
            dependency.add_capability(capability);
        }
        dependency
    }
}

impl From<Dependency> for DependencyRepr {
    fn from(dependency: Dependency) -> Self {
        Self {
            coordinates: dependency.coordinates,
            capabilities: dependency.capabilities.into_values().collect(),
            file: dependency.file,
        }
    }
}
