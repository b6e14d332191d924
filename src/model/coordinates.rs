use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Unique identity of a dependency
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Coordinates {
    /// A sibling module, identified by its build path (e.g. `:core`)
    Project { identifier: String },
    /// An external artifact, `group:name` plus the version the resolver picked
    Module {
        identifier: String,
        resolved_version: String,
    },
    /// No version information, e.g. a loose jar or a platform-supplied artifact
    Flat { identifier: String },
}

/// Kind of a dependency, shared by coordinates and dependency records
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    Project,
    Module,
    Flat,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Project => "project",
            DependencyKind::Module => "module",
            DependencyKind::Flat => "flat",
        }
    }
}

impl Coordinates {
    pub fn project(identifier: impl Into<String>) -> Self {
        Coordinates::Project {
            identifier: identifier.into(),
        }
    }

    pub fn module(identifier: impl Into<String>, resolved_version: impl Into<String>) -> Self {
        Coordinates::Module {
            identifier: identifier.into(),
            resolved_version: resolved_version.into(),
        }
    }

    pub fn flat(identifier: impl Into<String>) -> Self {
        Coordinates::Flat {
            identifier: identifier.into(),
        }
    }

    /// The identity used to match declarations; never includes a version
    pub fn identifier(&self) -> &str {
        match self {
            Coordinates::Project { identifier }
            | Coordinates::Module { identifier, .. }
            | Coordinates::Flat { identifier } => identifier,
        }
    }

    pub fn kind(&self) -> DependencyKind {
        match self {
            Coordinates::Project { .. } => DependencyKind::Project,
            Coordinates::Module { .. } => DependencyKind::Module,
            Coordinates::Flat { .. } => DependencyKind::Flat,
        }
    }

    /// Canonical `group:artifact[:version]` string
    pub fn gav(&self) -> String {
        match self {
            Coordinates::Project { identifier } | Coordinates::Flat { identifier } => {
                identifier.clone()
            }
            Coordinates::Module {
                identifier,
                resolved_version,
            } => format!("{}:{}", identifier, resolved_version),
        }
    }

    /// File name under which this dependency's record is stored.
    ///
    /// The encoding is reversible through [`Coordinates::from_file_name`].
    pub fn file_name(&self) -> String {
        match self {
            Coordinates::Project { identifier } => {
                format!("project_{}.json", escape(identifier))
            }
            Coordinates::Module {
                identifier,
                resolved_version,
            } => format!(
                "module_{}@{}.json",
                escape(identifier),
                escape(resolved_version)
            ),
            Coordinates::Flat { identifier } => format!("flat_{}.json", escape(identifier)),
        }
    }

    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let invalid = || AnalysisError::InvalidFileName(file_name.to_string());

        let stem = file_name.strip_suffix(".json").ok_or_else(invalid)?;
        let (kind, body) = stem.split_once('_').ok_or_else(invalid)?;

        match kind {
            "project" => Ok(Coordinates::project(unescape(body).ok_or_else(invalid)?)),
            "flat" => Ok(Coordinates::flat(unescape(body).ok_or_else(invalid)?)),
            "module" => {
                let (identifier, version) = body.rsplit_once('@').ok_or_else(invalid)?;
                Ok(Coordinates::module(
                    unescape(identifier).ok_or_else(invalid)?,
                    unescape(version).ok_or_else(invalid)?,
                ))
            }
            _ => Err(invalid()),
        }
    }
}

impl Ord for Coordinates {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind()
            .cmp(&other.kind())
            .then_with(|| self.gav().cmp(&other.gav()))
            // keeps Ord consistent with Eq when two modules share a gav string
            .then_with(|| self.identifier().cmp(other.identifier()))
    }
}

impl PartialOrd for Coordinates {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gav())
    }
}

const ESCAPED: [(char, &str); 5] = [
    ('%', "%25"),
    (':', "%3A"),
    ('/', "%2F"),
    ('\\', "%5C"),
    ('@', "%40"),
];

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match ESCAPED.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

fn unescape(encoded: &str) -> Option<String> {
    let mut out = String::with_capacity(encoded.len());
    let mut rest = encoded;
    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let code = rest.get(idx..idx + 3)?;
        let (c, _) = ESCAPED.iter().find(|(_, to)| *to == code)?;
        out.push(*c);
        rest = &rest[idx + 3..];
    }
    out.push_str(rest);
    Some(out)
}
