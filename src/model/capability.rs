use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Discriminant of a [`Capability`]; a dependency holds at most one capability per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    AndroidLinter,
    AndroidManifest,
    AndroidRes,
    AnnotationProcessor,
    Class,
    Constant,
    Inferred,
    InlineMember,
    NativeLib,
    SecurityProvider,
    ServiceLoader,
}

/// One fact about what a dependency supplies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Capability {
    AndroidLinter(AndroidLinterCapability),
    AndroidManifest(AndroidManifestCapability),
    AndroidRes(AndroidResCapability),
    AnnotationProcessor(AnnotationProcessorCapability),
    Class(ClassCapability),
    Constant(ConstantCapability),
    Inferred(InferredCapability),
    InlineMember(InlineMemberCapability),
    NativeLib(NativeLibCapability),
    SecurityProvider(SecurityProviderCapability),
    ServiceLoader(ServiceLoaderCapability),
}

impl Capability {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            Capability::AndroidLinter(_) => CapabilityKind::AndroidLinter,
            Capability::AndroidManifest(_) => CapabilityKind::AndroidManifest,
            Capability::AndroidRes(_) => CapabilityKind::AndroidRes,
            Capability::AnnotationProcessor(_) => CapabilityKind::AnnotationProcessor,
            Capability::Class(_) => CapabilityKind::Class,
            Capability::Constant(_) => CapabilityKind::Constant,
            Capability::Inferred(_) => CapabilityKind::Inferred,
            Capability::InlineMember(_) => CapabilityKind::InlineMember,
            Capability::NativeLib(_) => CapabilityKind::NativeLib,
            Capability::SecurityProvider(_) => CapabilityKind::SecurityProvider,
            Capability::ServiceLoader(_) => CapabilityKind::ServiceLoader,
        }
    }

    /// Combine with a later fact of the same kind.
    ///
    /// Set- and map-valued fields are unioned; scalar fields take the later value.
    /// Facts of a different kind are returned unchanged as the later value.
    pub fn merge(self, later: Capability) -> Capability {
        match (self, later) {
            (Capability::AndroidLinter(_), later @ Capability::AndroidLinter(_)) => later,
            (Capability::AndroidManifest(mut a), Capability::AndroidManifest(b)) => {
                a.package_name = b.package_name;
                for (component, classes) in b.component_map {
                    a.component_map.entry(component).or_default().extend(classes);
                }
                Capability::AndroidManifest(a)
            }
            (Capability::AndroidRes(mut a), Capability::AndroidRes(b)) => {
                a.r_import = b.r_import;
                for line in b.lines {
                    if !a.lines.contains(&line) {
                        a.lines.push(line);
                    }
                }
                Capability::AndroidRes(a)
            }
            (Capability::AnnotationProcessor(mut a), Capability::AnnotationProcessor(b)) => {
                a.processor = b.processor;
                a.supported_annotation_types.extend(b.supported_annotation_types);
                Capability::AnnotationProcessor(a)
            }
            (Capability::Class(mut a), Capability::Class(b)) => {
                a.classes.extend(b.classes);
                Capability::Class(a)
            }
            (Capability::Constant(mut a), Capability::Constant(b)) => {
                for (class, names) in b.constants {
                    a.constants.entry(class).or_default().extend(names);
                }
                a.kt_files.extend(b.kt_files);
                Capability::Constant(a)
            }
            (Capability::Inferred(_), later @ Capability::Inferred(_)) => later,
            (Capability::InlineMember(mut a), Capability::InlineMember(b)) => {
                for member in b.inline_members {
                    match a
                        .inline_members
                        .iter_mut()
                        .find(|m| m.package_name == member.package_name)
                    {
                        Some(existing) => existing.inline_members.extend(member.inline_members),
                        None => a.inline_members.push(member),
                    }
                }
                Capability::InlineMember(a)
            }
            (Capability::NativeLib(mut a), Capability::NativeLib(b)) => {
                a.file_names.extend(b.file_names);
                Capability::NativeLib(a)
            }
            (Capability::SecurityProvider(mut a), Capability::SecurityProvider(b)) => {
                a.security_providers.extend(b.security_providers);
                Capability::SecurityProvider(a)
            }
            (Capability::ServiceLoader(mut a), Capability::ServiceLoader(b)) => {
                a.provider_file = b.provider_file;
                a.provider_classes.extend(b.provider_classes);
                Capability::ServiceLoader(a)
            }
            (_, later) => later,
        }
    }

    /// Check invariants that extraction stages must uphold
    pub fn validate(&self) -> Result<()> {
        match self {
            Capability::AndroidLinter(linter) => linter.validate(),
            _ => Ok(()),
        }
    }
}

/// A dependency that ships an Android lint registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidLinterCapability {
    /// e.g. `nl.littlerobots.rxlint.RxIssueRegistry`
    pub lint_registry: String,
    /// True if the dependency contains _only_ a lint jar
    pub is_lint_jar: bool,
}

impl AndroidLinterCapability {
    pub fn new(lint_registry: impl Into<String>, is_lint_jar: bool) -> Result<Self> {
        let capability = Self {
            lint_registry: lint_registry.into(),
            is_lint_jar,
        };
        capability.validate()?;
        Ok(capability)
    }

    fn validate(&self) -> Result<()> {
        if self.is_lint_jar && self.lint_registry.trim().is_empty() {
            return Err(AnalysisError::LintJarWithoutRegistry(
                self.lint_registry.clone(),
            ));
        }
        Ok(())
    }
}

/// Manifest component types that can be declared by an Android library
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ManifestComponent {
    #[serde(rename = "activities")]
    Activity,
    #[serde(rename = "services")]
    Service,
    #[serde(rename = "receivers")]
    Receiver,
    #[serde(rename = "providers")]
    Provider,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidManifestCapability {
    /// Package name per `<manifest package="...">`
    pub package_name: String,
    #[serde(default)]
    pub component_map: BTreeMap<ManifestComponent, BTreeSet<String>>,
}

impl AndroidManifestCapability {
    pub fn has(&self, component: ManifestComponent) -> bool {
        self.component_map
            .get(&component)
            .is_some_and(|classes| !classes.is_empty())
    }
}

/// A resource declared in a dependency's `R.txt`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResLine {
    #[serde(rename = "type")]
    pub res_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidResCapability {
    /// The `R` import that indicates use of this dependency's resources, e.g. `com.foo.R`
    pub r_import: String,
    #[serde(default)]
    pub lines: Vec<ResLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationProcessorCapability {
    pub processor: String,
    #[serde(default)]
    pub supported_annotation_types: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCapability {
    pub classes: BTreeSet<String>,
}

/// A Kotlin file facade, e.g. `fqcn = com.foo.ConstantsKt`, `name = ConstantsKt`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KtFile {
    pub fqcn: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantCapability {
    /// Declaring class to the constants it defines
    pub constants: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub kt_files: BTreeSet<KtFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferredCapability {
    /// True if the dependency contains only annotations with `CLASS` or `SOURCE` retention
    pub is_compile_only_annotations: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InlineMember {
    pub package_name: String,
    pub inline_members: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineMemberCapability {
    pub inline_members: Vec<InlineMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeLibCapability {
    pub file_names: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityProviderCapability {
    pub security_providers: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLoaderCapability {
    /// e.g. `META-INF/services/java.sql.Driver`
    pub provider_file: String,
    pub provider_classes: BTreeSet<String>,
}
