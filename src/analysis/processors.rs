use super::configurations;
use crate::model::{
    AnnotationProcessorCapability, Capability, CapabilityKind, Location, ProcessorUsageReport,
    ProjectVariant, Reason, Trace,
};
use crate::visitor::DependencySet;
use std::collections::BTreeSet;
use tracing::debug;

/// Finds annotation processors declared on `kapt` or `annotationProcessor`
/// configurations that none of the project's sources need.
///
/// A processor is used when one of its supported annotation types is imported
/// or referenced from bytecode. Source-retention annotations only show up as
/// imports, which is why both are consulted.
pub struct ProcessorDetector;

impl ProcessorDetector {
    pub fn detect(
        project: &ProjectVariant,
        dependencies: &DependencySet,
        locations: &BTreeSet<Location>,
    ) -> ProcessorUsageReport {
        let mut report = ProcessorUsageReport {
            variant: project.variant().to_string(),
            ..Default::default()
        };

        for dependency in dependencies.iter() {
            let Some(Capability::AnnotationProcessor(processor)) =
                dependency.capability(CapabilityKind::AnnotationProcessor)
            else {
                continue;
            };

            let identifier = dependency.coordinates.identifier();
            let is_processor_declaration = locations.iter().any(|location| {
                let name = &location.configuration_name;
                location.identifier == identifier
                    && configurations::is_annotation_processor(name)
                    && configurations::applies_to_variant(name, project.variant())
            });
            if !is_processor_declaration {
                continue;
            }

            if is_used(processor, project) {
                report.used.insert(Trace::new(
                    dependency.coordinates.clone(),
                    [Reason::AnnotationProcessor].into(),
                ));
            } else {
                debug!(
                    "[{}] processor {} ({}) is unused",
                    report.variant, processor.processor, dependency.coordinates
                );
                report
                    .unused
                    .insert(Trace::new(dependency.coordinates.clone(), BTreeSet::new()));
            }
        }

        report
    }
}

fn is_used(processor: &AnnotationProcessorCapability, project: &ProjectVariant) -> bool {
    let referenced = |name: &str| {
        project.imports().contains(name) || project.used_classes().contains(name)
    };
    let referenced_in = |package: &str| {
        project
            .imports()
            .iter()
            .chain(project.used_classes())
            .any(|name| name.strip_prefix(package).is_some_and(|rest| rest.starts_with('.')))
    };

    processor.supported_annotation_types.iter().any(|annotation_type| {
        if annotation_type == "*" {
            // Claims every annotation; cannot be proven unused
            return true;
        }
        match annotation_type.strip_suffix(".*") {
            Some(package) => referenced_in(package),
            None => referenced(annotation_type),
        }
    })
}
