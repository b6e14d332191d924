use super::Coordinates;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// A single recommended change to a dependency declaration.
///
/// * `from == None`: add the dependency on `to`
/// * `to == None`: remove the dependency from `from`
/// * both present: move the dependency from `from` to `to`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Advice {
    pub coordinates: Coordinates,
    /// Configuration the dependency is currently declared on; `None` for transitive dependencies
    pub from_configuration: Option<String>,
    /// Configuration it should be declared on; `None` if it should be removed
    pub to_configuration: Option<String>,
}

impl Advice {
    pub fn of_add(coordinates: Coordinates, to_configuration: impl Into<String>) -> Self {
        Self {
            coordinates,
            from_configuration: None,
            to_configuration: Some(to_configuration.into()),
        }
    }

    pub fn of_remove(coordinates: Coordinates, from_configuration: impl Into<String>) -> Self {
        Self {
            coordinates,
            from_configuration: Some(from_configuration.into()),
            to_configuration: None,
        }
    }

    pub fn of_change(
        coordinates: Coordinates,
        from_configuration: impl Into<String>,
        to_configuration: impl Into<String>,
    ) -> Self {
        Self {
            coordinates,
            from_configuration: Some(from_configuration.into()),
            to_configuration: Some(to_configuration.into()),
        }
    }

    /// Advice whose target is a compileOnly-like configuration.
    ///
    /// Declared compileOnly dependencies are trusted, and transitive ones are
    /// never recommended for addition, so this kind of advice is reported apart.
    pub fn is_compile_only(&self) -> bool {
        self.to_configuration
            .as_deref()
            .is_some_and(|to| ends_with_ignore_case(to, "compileOnly"))
    }

    pub fn is_add(&self) -> bool {
        self.from_configuration.is_none()
            && self.to_configuration.is_some()
            && !self.is_compile_only()
    }

    pub fn is_remove(&self) -> bool {
        self.to_configuration.is_none() && !self.is_compile_only() && !self.is_processor()
    }

    pub fn is_change(&self) -> bool {
        self.from_configuration.is_some()
            && self.to_configuration.is_some()
            && !self.is_compile_only()
    }

    /// Removal advice for a dependency declared on a kapt or annotationProcessor configuration
    pub fn is_processor(&self) -> bool {
        self.to_configuration.is_none()
            && self.from_configuration.as_deref().is_some_and(|from| {
                ends_with_ignore_case(from, "kapt")
                    || ends_with_ignore_case(from, "annotationProcessor")
            })
    }

    /// Advice that removes or narrows an api-like declaration
    pub fn is_downgrade(&self) -> bool {
        (self.is_remove() || self.is_change() || self.is_compile_only())
            && self
                .from_configuration
                .as_deref()
                .is_some_and(|from| ends_with_ignore_case(from, "api"))
    }

    pub fn is_to_api_like(&self) -> bool {
        self.to_configuration
            .as_deref()
            .is_some_and(|to| ends_with_ignore_case(to, "api"))
    }
}

fn ends_with_ignore_case(value: &str, suffix: &str) -> bool {
    value.len() >= suffix.len()
        && value.as_bytes()[value.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}

/// `None` sorts after any configuration name
fn cmp_configuration(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

impl Ord for Advice {
    fn cmp(&self, other: &Self) -> Ordering {
        self.coordinates
            .cmp(&other.coordinates)
            .then_with(|| cmp_configuration(&self.to_configuration, &other.to_configuration))
            .then_with(|| cmp_configuration(&self.from_configuration, &other.from_configuration))
    }
}

impl PartialOrd for Advice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.from_configuration, &self.to_configuration) {
            (None, Some(to)) => write!(f, "{}(\"{}\")", to, self.coordinates),
            (Some(from), None) => write!(f, "{}(\"{}\")", from, self.coordinates),
            (Some(from), Some(to)) => {
                write!(f, "{}(\"{}\") (was {})", to, self.coordinates, from)
            }
            (None, None) => write!(f, "{}", self.coordinates),
        }
    }
}

/// All advice computed for one project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAdvice {
    pub dependency_advice: BTreeSet<Advice>,
    /// Unused annotation processors, reported apart from general dependency advice
    pub processor_advice: BTreeSet<Advice>,
}

impl ProjectAdvice {
    pub fn is_empty(&self) -> bool {
        self.dependency_advice.is_empty() && self.processor_advice.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dependency_advice.len() + self.processor_advice.len()
    }

    /// Drop advice about dependencies matching `predicate`
    pub fn retain(&mut self, mut predicate: impl FnMut(&Advice) -> bool) {
        self.dependency_advice.retain(|advice| predicate(advice));
        self.processor_advice.retain(|advice| predicate(advice));
    }
}
