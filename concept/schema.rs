/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{cell::RefCell, collections::HashMap, hash::Hash};

use crate::{
    error::SchemaReadError,
    label::{Label, LabelSet},
};

/// Read-only view of the type hierarchy consulted while planning.
///
/// Closures are reflexive: the closure of an existing label contains the label itself.
/// Labels absent from the schema have an empty closure and resolve to `None`.
pub trait SchemaOracle {
    fn exists(&self, label: &Label) -> Result<bool, SchemaReadError>;

    fn direct_subtypes_exist(&self, label: &Label) -> Result<bool, SchemaReadError>;

    fn subtype_closure(&self, label: &Label) -> Result<LabelSet, SchemaReadError>;

    fn resolve_role(&self, label: &Label) -> Result<Option<RoleMeta>, SchemaReadError>;

    fn resolve_relation_type(&self, label: &Label) -> Result<Option<RelationTypeMeta>, SchemaReadError>;
}

impl<T: SchemaOracle + ?Sized> SchemaOracle for &T {
    fn exists(&self, label: &Label) -> Result<bool, SchemaReadError> {
        (**self).exists(label)
    }

    fn direct_subtypes_exist(&self, label: &Label) -> Result<bool, SchemaReadError> {
        (**self).direct_subtypes_exist(label)
    }

    fn subtype_closure(&self, label: &Label) -> Result<LabelSet, SchemaReadError> {
        (**self).subtype_closure(label)
    }

    fn resolve_role(&self, label: &Label) -> Result<Option<RoleMeta>, SchemaReadError> {
        (**self).resolve_role(label)
    }

    fn resolve_relation_type(&self, label: &Label) -> Result<Option<RelationTypeMeta>, SchemaReadError> {
        (**self).resolve_relation_type(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMeta {
    label: Label,
    sub_roles: LabelSet,
}

impl RoleMeta {
    pub fn new(label: Label, sub_roles: LabelSet) -> Self {
        Self { label, sub_roles }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// The role and all of its transitive sub-roles.
    pub fn sub_role_closure(&self) -> &LabelSet {
        &self.sub_roles
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTypeMeta {
    label: Label,
    subtypes: LabelSet,
    roles: LabelSet,
}

impl RelationTypeMeta {
    pub fn new(label: Label, subtypes: LabelSet, roles: LabelSet) -> Self {
        Self { label, subtypes, roles }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// The relation type and all of its transitive subtypes.
    pub fn subtype_closure(&self) -> &LabelSet {
        &self.subtypes
    }

    pub fn roles(&self) -> &LabelSet {
        &self.roles
    }
}

/// Memoises every successful answer of the wrapped oracle, so that one planning call observes
/// one logical schema snapshot even if the backend changes underneath it. Failures are not cached.
pub struct SchemaSnapshot<O> {
    oracle: O,
    exists: RefCell<HashMap<Label, bool>>,
    direct_subtypes_exist: RefCell<HashMap<Label, bool>>,
    subtype_closures: RefCell<HashMap<Label, LabelSet>>,
    roles: RefCell<HashMap<Label, Option<RoleMeta>>>,
    relation_types: RefCell<HashMap<Label, Option<RelationTypeMeta>>>,
}

impl<O: SchemaOracle> SchemaSnapshot<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            exists: RefCell::new(HashMap::new()),
            direct_subtypes_exist: RefCell::new(HashMap::new()),
            subtype_closures: RefCell::new(HashMap::new()),
            roles: RefCell::new(HashMap::new()),
            relation_types: RefCell::new(HashMap::new()),
        }
    }

    pub fn into_inner(self) -> O {
        self.oracle
    }
}

fn memoised<K, V, E>(cache: &RefCell<HashMap<K, V>>, key: &K, read: impl FnOnce() -> Result<V, E>) -> Result<V, E>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    if let Some(cached) = cache.borrow().get(key) {
        return Ok(cached.clone());
    }
    let value = read()?;
    cache.borrow_mut().insert(key.clone(), value.clone());
    Ok(value)
}

impl<O: SchemaOracle> SchemaOracle for SchemaSnapshot<O> {
    fn exists(&self, label: &Label) -> Result<bool, SchemaReadError> {
        memoised(&self.exists, label, || self.oracle.exists(label))
    }

    fn direct_subtypes_exist(&self, label: &Label) -> Result<bool, SchemaReadError> {
        memoised(&self.direct_subtypes_exist, label, || self.oracle.direct_subtypes_exist(label))
    }

    fn subtype_closure(&self, label: &Label) -> Result<LabelSet, SchemaReadError> {
        memoised(&self.subtype_closures, label, || self.oracle.subtype_closure(label))
    }

    fn resolve_role(&self, label: &Label) -> Result<Option<RoleMeta>, SchemaReadError> {
        memoised(&self.roles, label, || self.oracle.resolve_role(label))
    }

    fn resolve_relation_type(&self, label: &Label) -> Result<Option<RelationTypeMeta>, SchemaReadError> {
        memoised(&self.relation_types, label, || self.oracle.resolve_relation_type(label))
    }
}
