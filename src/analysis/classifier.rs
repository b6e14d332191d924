use super::AdvicePolicy;
use crate::model::{
    AndroidManifestCapability, AndroidResCapability, Bucket, Capability, Classification,
    ClassCapability, ConstantCapability, Dependency, DependencyUsageReport, InlineMemberCapability,
    ManifestComponent, ProjectVariant, Reason, Trace,
};
use crate::visitor::{Context, GraphViewVisitor};
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// What a dependency's [`ClassCapability`] says about its use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ClassUsage {
    /// No class capability, so no claim either way
    #[default]
    Unknown,
    /// ABI, IMPL or IMPORTED
    Used(Reason),
    /// None of its classes are referenced
    Unreferenced,
}

/// Everything the capability checks found out about one dependency.
///
/// Every check runs; conflicts are resolved afterwards in [`Evidence::classify`].
#[derive(Debug, Default)]
struct Evidence {
    class_usage: ClassUsage,
    is_compile_only: bool,
    is_android: bool,
    reasons: BTreeSet<Reason>,
}

impl Evidence {
    fn is_unused_candidate(&self) -> bool {
        self.class_usage == ClassUsage::Unreferenced
    }

    fn has_runtime_reason(&self) -> bool {
        self.reasons.iter().any(Reason::is_runtime)
    }

    fn classify(
        mut self,
        is_declared: bool,
        policy: &AdvicePolicy,
    ) -> Option<(Classification, BTreeSet<Reason>)> {
        if let ClassUsage::Used(reason) = self.class_usage {
            self.reasons.insert(reason);
        }

        let classification = if self.is_compile_only && !self.is_unused_candidate() {
            let is_abi = self.class_usage == ClassUsage::Used(Reason::Abi);
            let bucket = if policy.compile_only_api && is_abi {
                Bucket::CompileOnlyApi
            } else {
                Bucket::CompileOnly
            };
            self.reasons.insert(Reason::CompileOnly);
            Classification::Used(bucket)
        } else {
            match self.class_usage {
                ClassUsage::Used(Reason::Abi) => Classification::Used(Bucket::Api),
                ClassUsage::Used(_) => Classification::Used(Bucket::Implementation),
                // Undetectable runtime use is never reported as unused
                ClassUsage::Unreferenced if self.has_runtime_reason() => {
                    Classification::Used(Bucket::RuntimeOnly)
                }
                // Nothing to remove if it was never declared
                ClassUsage::Unreferenced if is_declared => Classification::Unused,
                ClassUsage::Unreferenced | ClassUsage::Unknown => return None,
            }
        };

        Some((classification, self.reasons))
    }
}

/// Classifies every dependency of one project variant into a bucket
pub struct UsageClassifier {
    policy: AdvicePolicy,
    report: DependencyUsageReport,
}

impl UsageClassifier {
    pub fn new(variant: impl Into<String>, policy: AdvicePolicy) -> Self {
        Self {
            policy,
            report: DependencyUsageReport::new(variant),
        }
    }

    pub fn into_report(self) -> DependencyUsageReport {
        self.report
    }
}

impl GraphViewVisitor for UsageClassifier {
    fn visit(&mut self, dependency: &Dependency, context: &Context<'_>) {
        let mut evidence = Evidence::default();
        for capability in dependency.capabilities.values() {
            inspect(capability, context.project, &mut evidence);
        }

        if evidence.is_android {
            trace!("{} is an Android library", dependency.coordinates);
        }

        let is_declared = context.is_declared(&dependency.coordinates);
        match evidence.classify(is_declared, &self.policy) {
            Some((classification, reasons)) => {
                debug!(
                    "[{}] {} -> {:?} {:?}",
                    self.report.variant, dependency.coordinates, classification, reasons
                );
                self.report
                    .insert(classification, Trace::new(dependency.coordinates.clone(), reasons));
            }
            None => trace!(
                "[{}] {} is transitive and unused",
                self.report.variant,
                dependency.coordinates
            ),
        }
    }
}

fn inspect(capability: &Capability, project: &ProjectVariant, evidence: &mut Evidence) {
    match capability {
        Capability::AndroidLinter(linter) => {
            if linter.is_lint_jar {
                evidence.reasons.insert(Reason::LintJar);
            }
        }
        Capability::AndroidManifest(manifest) => inspect_manifest(manifest, evidence),
        Capability::AndroidRes(res) => inspect_res(res, project, evidence),
        Capability::AnnotationProcessor(_) => {
            // Handled by ProcessorDetector
        }
        Capability::Class(class) => evidence.class_usage = class_usage(class, project),
        Capability::Constant(constant) => {
            if uses_constant(constant, project) {
                evidence.reasons.insert(Reason::Constant);
            }
        }
        Capability::Inferred(inferred) => {
            evidence.is_compile_only = inferred.is_compile_only_annotations;
        }
        Capability::InlineMember(inline) => {
            if uses_inline_member(inline, project) {
                evidence.reasons.insert(Reason::Inline);
            }
        }
        Capability::NativeLib(native) => {
            if !native.file_names.is_empty() {
                evidence.reasons.insert(Reason::NativeLib);
            }
        }
        Capability::SecurityProvider(provider) => {
            if !provider.security_providers.is_empty() {
                evidence.reasons.insert(Reason::SecurityProvider);
            }
        }
        Capability::ServiceLoader(loader) => {
            if !loader.provider_classes.is_empty() {
                evidence.reasons.insert(Reason::ServiceLoader);
            }
        }
    }
}

fn class_usage(capability: &ClassCapability, project: &ProjectVariant) -> ClassUsage {
    let classes = &capability.classes;
    if !classes.is_disjoint(project.exposed_classes()) {
        ClassUsage::Used(Reason::Abi)
    } else if !classes.is_disjoint(project.implementation_classes()) {
        ClassUsage::Used(Reason::Impl)
    } else if !classes.is_disjoint(project.imports()) {
        // Erased generic types only show up as imports
        ClassUsage::Used(Reason::Imported)
    } else {
        ClassUsage::Unreferenced
    }
}

fn uses_constant(capability: &ConstantCapability, project: &ProjectVariant) -> bool {
    let imports = project.imports();
    capability.constants.iter().any(|(fqcn, names)| {
        // Top-level Kotlin constants are imported without the facade class name
        let facade_prefix = capability
            .kt_files
            .iter()
            .find(|kt_file| &kt_file.fqcn == fqcn)
            .and_then(|kt_file| fqcn.strip_suffix(kt_file.name.as_str()));

        imports.contains(&format!("{}.*", fqcn))
            || names.iter().any(|name| {
                let by_facade = facade_prefix
                    .is_some_and(|prefix| imports.contains(&format!("{}{}", prefix, name)));
                by_facade || imports.contains(&format!("{}.{}", fqcn, name))
            })
    })
}

fn uses_inline_member(capability: &InlineMemberCapability, project: &ProjectVariant) -> bool {
    let imports = project.imports();
    capability.inline_members.iter().any(|member| {
        imports.contains(&format!("{}.*", member.package_name))
            || member
                .inline_members
                .iter()
                .any(|name| imports.contains(&format!("{}.{}", member.package_name, name)))
    })
}

fn inspect_manifest(capability: &AndroidManifestCapability, evidence: &mut Evidence) {
    // Activities and receivers alone are not enough to call the library used
    let is_runtime_android =
        capability.has(ManifestComponent::Service) || capability.has(ManifestComponent::Provider);
    if is_runtime_android {
        evidence.reasons.insert(Reason::RuntimeAndroid);
    }
    evidence.is_android = is_runtime_android
        || capability.has(ManifestComponent::Activity)
        || capability.has(ManifestComponent::Receiver);
}

fn inspect_res(capability: &AndroidResCapability, project: &ProjectVariant, evidence: &mut Evidence) {
    evidence.is_android = true;

    let imports = project.imports();
    let wildcard = capability
        .r_import
        .strip_suffix('R')
        .map(|package| format!("{}*", package));
    let by_source = imports.contains(&capability.r_import)
        || wildcard.is_some_and(|wildcard| imports.contains(&wildcard));
    if by_source {
        evidence.reasons.insert(Reason::ResBySrc);
    }

    let by_res = capability.lines.iter().any(|line| {
        project.android_res_sources().iter().any(|source| {
            source
                .style_parent_refs
                .iter()
                .any(|style| style.style_parent == line.value)
                || source
                    .attr_refs
                    .iter()
                    .any(|attr| attr.attr_type == line.res_type && attr.id == line.value)
        })
    });
    if by_res {
        evidence.reasons.insert(Reason::ResByRes);
    }
}
