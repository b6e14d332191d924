//! Walks a project's classpath and hands each resolved dependency to a visitor
//!
//! The reader decides *what* gets visited and in which order; visitors decide
//! what to conclude. Visiting is deterministic: coordinates are walked in
//! their natural order so identical inputs always produce identical output.

use crate::analysis::configurations::applies_to_variant;
use crate::error::{AnalysisError, Result};
use crate::graph::DependencyGraphView;
use crate::model::{Coordinates, Dependency, Location, ProjectVariant};
use std::collections::{BTreeSet, HashMap};
use tracing::trace;

/// Receives every dependency on a project variant's classpath exactly once
pub trait GraphViewVisitor {
    fn visit(&mut self, dependency: &Dependency, context: &Context<'_>);
}

/// Read-only view of everything known about the variant being visited
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub project: &'a ProjectVariant,
    pub dependencies: &'a DependencySet,
    pub graph: &'a DependencyGraphView,
    pub locations: &'a BTreeSet<Location>,
}

impl Context<'_> {
    /// Whether the dependency is declared for this variant
    pub fn is_declared(&self, coordinates: &Coordinates) -> bool {
        self.locations_of(coordinates).next().is_some()
    }

    /// Declarations of the dependency that are part of this variant's build
    pub fn locations_of<'l>(
        &'l self,
        coordinates: &'l Coordinates,
    ) -> impl Iterator<Item = &'l Location> {
        let variant = self.project.variant();
        self.locations.iter().filter(move |location| {
            location.identifier == coordinates.identifier()
                && applies_to_variant(&location.configuration_name, variant)
        })
    }
}

/// Dependency records keyed by coordinates
#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    inner: HashMap<Coordinates, Dependency>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any earlier record with the same coordinates
    pub fn insert(&mut self, dependency: Dependency) {
        self.inner.insert(dependency.coordinates.clone(), dependency);
    }

    pub fn get(&self, coordinates: &Coordinates) -> Option<&Dependency> {
        self.inner.get(coordinates)
    }

    pub fn contains(&self, coordinates: &Coordinates) -> bool {
        self.inner.contains_key(coordinates)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Records in coordinate order
    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        let mut dependencies: Vec<_> = self.inner.values().collect();
        dependencies.sort_by(|a, b| a.coordinates.cmp(&b.coordinates));
        dependencies.into_iter()
    }
}

impl FromIterator<Dependency> for DependencySet {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        let mut set = DependencySet::new();
        for dependency in iter {
            set.insert(dependency);
        }
        set
    }
}

/// Drives a [`GraphViewVisitor`] over one project variant
pub struct GraphViewReader<'a> {
    context: Context<'a>,
}

impl<'a> GraphViewReader<'a> {
    pub fn new(
        project: &'a ProjectVariant,
        dependencies: &'a DependencySet,
        graph: &'a DependencyGraphView,
        locations: &'a BTreeSet<Location>,
    ) -> Self {
        Self {
            context: Context {
                project,
                dependencies,
                graph,
                locations,
            },
        }
    }

    pub fn context(&self) -> &Context<'a> {
        &self.context
    }

    /// Visit every dependency on the classpath in coordinate order.
    ///
    /// Fails before visiting anything if a classpath entry has no record.
    pub fn accept<V: GraphViewVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        let dependencies = self
            .context
            .project
            .classpath()
            .iter()
            .map(|coordinates| {
                self.context
                    .dependencies
                    .get(coordinates)
                    .ok_or_else(|| AnalysisError::MissingDependency(coordinates.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        for dependency in dependencies {
            trace!("Visiting {}", dependency.coordinates);
            visitor.visit(dependency, &self.context);
        }
        Ok(())
    }
}
