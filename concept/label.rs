/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    collections::BTreeSet,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use resource::constants::schema::{
    HAS_OWNER_ROLE_SUFFIX, HAS_RELATION_PREFIX, HAS_VALUE_ROLE_SUFFIX, IMPLICIT_LABEL_PREFIX, META_ROLE_LABEL,
};

/// Type labels are sorted by name so that label sets print and compare the same way on every run.
pub type LabelSet = BTreeSet<Label>;

#[derive(Clone)]
pub struct Label {
    name: Arc<str>,
}

impl Label {
    pub fn new(name: &str) -> Label {
        Label { name: Arc::from(name) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_implicit(&self) -> bool {
        self.name.starts_with(IMPLICIT_LABEL_PREFIX)
    }

    pub fn is_meta_role(&self) -> bool {
        &*self.name == META_ROLE_LABEL
    }

    pub fn has_relation(attribute_type: &Label) -> Label {
        Label::new(&format!("{}{}", HAS_RELATION_PREFIX, attribute_type.name()))
    }

    pub fn has_owner_role(attribute_type: &Label) -> Label {
        Label::new(&format!("{}{}{}", HAS_RELATION_PREFIX, attribute_type.name(), HAS_OWNER_ROLE_SUFFIX))
    }

    pub fn has_value_role(attribute_type: &Label) -> Label {
        Label::new(&format!("{}{}{}", HAS_RELATION_PREFIX, attribute_type.name(), HAS_VALUE_ROLE_SUFFIX))
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Label::new(name)
    }
}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

impl Eq for Label {}

impl PartialEq<Self> for Label {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label[{}]", self.name)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Identifier of one stored concept instance, opaque to the planner.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConceptId(Arc<str>);

impl ConceptId {
    pub fn new(id: &str) -> ConceptId {
        ConceptId(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConceptId[{}]", self.0)
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
