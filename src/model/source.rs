use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single file of the project being analyzed.
///
/// Code sources sort before resource sources; within a kind, by path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Source {
    Code(CodeSource),
    AndroidRes(AndroidResSource),
}

impl Source {
    /// Path relative to the project directory (e.g. `src/main/kotlin/com/foo/Bar.kt`)
    pub fn relative_path(&self) -> &str {
        match self {
            Source::Code(code) => &code.relative_path,
            Source::AndroidRes(res) => &res.relative_path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Java,
    Kotlin,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CodeSource {
    pub relative_path: String,
    pub kind: SourceKind,
    pub class_name: String,
    #[serde(default)]
    pub imports: BTreeSet<String>,
    /// Every class referenced from this file's bytecode
    #[serde(default)]
    pub used_classes: BTreeSet<String>,
    /// The subset of referenced classes that are part of the ABI
    #[serde(default)]
    pub exposed_classes: BTreeSet<String>,
}

/// `<style parent="...">` in the project's resource XML
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StyleParentRef {
    pub style_parent: String,
}

/// `?attr/foo` or `@color/foo` style reference in the project's resource XML
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttrRef {
    #[serde(rename = "type")]
    pub attr_type: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AndroidResSource {
    pub relative_path: String,
    #[serde(default)]
    pub style_parent_refs: BTreeSet<StyleParentRef>,
    #[serde(default)]
    pub attr_refs: BTreeSet<AttrRef>,
}
