use super::configurations::{
    applies_to_variant, configuration_name, is_annotation_processor, is_main, variant_prefix,
};
use super::AdvicePolicy;
use crate::model::{
    Advice, Bucket, Classification, Coordinates, DependencyUsageReport, Location,
    ProcessorUsageReport, ProjectAdvice,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Turns per-variant usage reports and the declared locations into advice
pub struct AdviceMerger<'a> {
    locations: &'a BTreeSet<Location>,
    policy: AdvicePolicy,
}

impl<'a> AdviceMerger<'a> {
    pub fn new(locations: &'a BTreeSet<Location>, policy: AdvicePolicy) -> Self {
        Self { locations, policy }
    }

    pub fn merge(
        &self,
        reports: &[DependencyUsageReport],
        processor_reports: &[ProcessorUsageReport],
    ) -> ProjectAdvice {
        let variants: BTreeSet<&str> = reports
            .iter()
            .map(|report| report.variant.as_str())
            .chain(processor_reports.iter().map(|report| report.variant.as_str()))
            .collect();
        let declarations = self.declarations(&variants);

        let mut usages: BTreeMap<&Coordinates, Vec<Classification>> = BTreeMap::new();
        for report in reports {
            for (classification, trace) in report.traces() {
                usages.entry(&trace.coordinates).or_default().push(classification);
            }
        }

        let mut advice = ProjectAdvice::default();
        for (coordinates, classifications) in usages {
            let locations = declarations
                .get(coordinates.identifier())
                .map_or(&[][..], Vec::as_slice);
            advice
                .dependency_advice
                .extend(self.advise(coordinates, &classifications, locations));
        }
        advice.processor_advice = self.advise_processors(processor_reports, &declarations);

        info!(
            "Merged {} variant reports into {} dependency and {} processor advice",
            reports.len(),
            advice.dependency_advice.len(),
            advice.processor_advice.len()
        );
        advice
    }

    /// Declarations that belong to at least one analyzed variant, by identifier.
    ///
    /// Platform and other attributed declarations are included.
    fn declarations(&self, variants: &BTreeSet<&str>) -> BTreeMap<&'a str, Vec<&'a Location>> {
        let mut declarations: BTreeMap<&str, Vec<&Location>> = BTreeMap::new();
        for location in self.locations {
            let name = &location.configuration_name;
            if variants.iter().any(|variant| applies_to_variant(name, variant)) {
                declarations
                    .entry(location.identifier.as_str())
                    .or_default()
                    .push(location);
            } else {
                debug!("{} on {} is outside the analyzed variants", location.identifier, name);
            }
        }
        declarations
    }

    fn advise(
        &self,
        coordinates: &Coordinates,
        classifications: &[Classification],
        locations: &[&Location],
    ) -> Vec<Advice> {
        let declared: Vec<(&Location, Bucket)> = locations
            .iter()
            .filter(|location| {
                location.attributes.is_empty() && is_main(&location.configuration_name)
            })
            .filter_map(|&location| {
                Bucket::of_configuration(&location.configuration_name)
                    .map(|bucket| (location, bucket))
            })
            .collect();

        let used: BTreeSet<Bucket> = classifications
            .iter()
            .filter_map(|classification| match classification {
                Classification::Used(bucket) => Some(*bucket),
                Classification::Unused => None,
            })
            .collect();

        let Some(recommended) = recommended_bucket(&used) else {
            // Unused in every variant
            return declared
                .iter()
                .map(|(location, _)| {
                    Advice::of_remove(coordinates.clone(), &location.configuration_name)
                })
                .collect();
        };

        match declared.as_slice() {
            [] => {
                if !locations.is_empty() {
                    debug!("{} is only declared on ignored configurations", coordinates);
                    return Vec::new();
                }
                // Compile-only and runtime-only dependencies are not worth adding
                if recommended.is_compile_only_like() || recommended == Bucket::RuntimeOnly {
                    return Vec::new();
                }
                vec![Advice::of_add(coordinates.clone(), recommended.value())]
            }
            [(location, declared_bucket)] => self
                .advise_change(coordinates, location, *declared_bucket, recommended)
                .into_iter()
                .collect(),
            many => {
                if !many.iter().any(|(_, bucket)| *bucket == recommended) {
                    debug!(
                        "{} is declared on {} configurations, none of them {}; leaving it alone",
                        coordinates,
                        many.len(),
                        recommended
                    );
                    return Vec::new();
                }
                many.iter()
                    .filter(|(_, bucket)| *bucket != recommended)
                    .map(|(location, _)| {
                        Advice::of_remove(coordinates.clone(), &location.configuration_name)
                    })
                    .collect()
            }
        }
    }

    fn advise_change(
        &self,
        coordinates: &Coordinates,
        location: &Location,
        declared: Bucket,
        recommended: Bucket,
    ) -> Option<Advice> {
        if declared == recommended {
            return None;
        }
        // Explicit compileOnly declarations are trusted while usage agrees
        if declared.is_compile_only_like() && recommended.is_compile_only_like() {
            return None;
        }
        if recommended == Bucket::RuntimeOnly
            && matches!(declared, Bucket::Api | Bucket::Implementation)
            && !self.policy.strict_runtime_only
        {
            return None;
        }

        let from = &location.configuration_name;
        let to = configuration_name(variant_prefix(from), recommended);
        Some(Advice::of_change(coordinates.clone(), from, to))
    }

    fn advise_processors(
        &self,
        reports: &[ProcessorUsageReport],
        declarations: &BTreeMap<&str, Vec<&Location>>,
    ) -> BTreeSet<Advice> {
        let mut used: BTreeSet<&Coordinates> = BTreeSet::new();
        let mut unused: BTreeSet<&Coordinates> = BTreeSet::new();
        for report in reports {
            used.extend(report.used.iter().map(|trace| &trace.coordinates));
            unused.extend(report.unused.iter().map(|trace| &trace.coordinates));
        }

        unused
            .difference(&used)
            .flat_map(move |&coordinates| {
                declarations
                    .get(coordinates.identifier())
                    .into_iter()
                    .flatten()
                    .filter(|location| is_annotation_processor(&location.configuration_name))
                    .map(move |location| {
                        Advice::of_remove(coordinates.clone(), &location.configuration_name)
                    })
            })
            .collect()
    }
}

/// The single declaration that satisfies every variant's usage
pub fn recommended_bucket(used: &BTreeSet<Bucket>) -> Option<Bucket> {
    let has = |bucket| used.contains(&bucket);

    let bucket = if has(Bucket::Api) {
        Bucket::Api
    } else if has(Bucket::Implementation) {
        Bucket::Implementation
    } else if has(Bucket::RuntimeOnly) && has(Bucket::CompileOnlyApi) {
        Bucket::Api
    } else if has(Bucket::RuntimeOnly) && has(Bucket::CompileOnly) {
        Bucket::Implementation
    } else if has(Bucket::CompileOnlyApi) {
        Bucket::CompileOnlyApi
    } else {
        return used.iter().next().copied();
    };
    Some(bucket)
}
