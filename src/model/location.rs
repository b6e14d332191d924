use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where a dependency is declared: the configuration ("bucket") it is attached to.
///
/// A dependency may be declared on more than one configuration; that is not an error.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub identifier: String,
    pub configuration_name: String,
    #[serde(default)]
    pub attributes: BTreeSet<Attribute>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Attribute {
    JavaPlatform,
}

impl Location {
    pub fn new(identifier: impl Into<String>, configuration_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            configuration_name: configuration_name.into(),
            attributes: BTreeSet::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.insert(attribute);
        self
    }
}
