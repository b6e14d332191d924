//! Records exchanged between the analysis stages

mod advice;
mod capability;
mod coordinates;
mod dependency;
mod location;
mod project;
mod source;
mod usage;

pub use advice::{Advice, ProjectAdvice};
pub use capability::{
    AndroidLinterCapability, AndroidManifestCapability, AndroidResCapability,
    AnnotationProcessorCapability, Capability, CapabilityKind, ClassCapability,
    ConstantCapability, InferredCapability, InlineMember, InlineMemberCapability, KtFile,
    ManifestComponent, NativeLibCapability, ResLine, SecurityProviderCapability,
    ServiceLoaderCapability,
};
pub use coordinates::{Coordinates, DependencyKind};
pub use dependency::Dependency;
pub use location::{Attribute, Location};
pub use project::ProjectVariant;
pub use source::{AndroidResSource, AttrRef, CodeSource, Source, SourceKind, StyleParentRef};
pub use usage::{
    Bucket, Classification, DependencyUsageReport, ProcessorUsageReport, Reason, Trace,
};
