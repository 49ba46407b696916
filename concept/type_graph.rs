/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use resource::constants::schema::{
    META_ATTRIBUTE_LABEL, META_ENTITY_LABEL, META_RELATION_LABEL, META_ROLE_LABEL, META_THING_LABEL,
};

use crate::{
    error::SchemaReadError,
    label::{Label, LabelSet},
    schema::{RelationTypeMeta, RoleMeta, SchemaOracle},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Thing,
    Entity,
    Relation,
    Attribute,
    Role,
}

#[derive(Debug, Clone)]
struct TypeEntry {
    kind: TypeKind,
    supertype: Option<Label>,
    relates: LabelSet,
}

/// An in-memory type hierarchy. Definitions are taken as given: nothing checks that a supertype
/// exists or has a compatible kind.
#[derive(Debug, Clone)]
pub struct TypeGraph {
    types: BTreeMap<Label, TypeEntry>,
}

impl TypeGraph {
    pub fn new() -> Self {
        let mut graph = Self { types: BTreeMap::new() };
        graph.insert(META_THING_LABEL, TypeKind::Thing, None, LabelSet::new());
        graph.insert(META_ENTITY_LABEL, TypeKind::Entity, Some(META_THING_LABEL), LabelSet::new());
        graph.insert(META_RELATION_LABEL, TypeKind::Relation, Some(META_THING_LABEL), LabelSet::new());
        graph.insert(META_ATTRIBUTE_LABEL, TypeKind::Attribute, Some(META_THING_LABEL), LabelSet::new());
        graph.insert(META_ROLE_LABEL, TypeKind::Role, None, LabelSet::new());
        graph
    }

    fn insert(&mut self, label: &str, kind: TypeKind, supertype: Option<&str>, relates: LabelSet) {
        let entry = TypeEntry { kind, supertype: supertype.map(Label::new), relates };
        self.types.insert(Label::new(label), entry);
    }

    pub fn define_entity_type(&mut self, label: &str, supertype: Option<&str>) -> &mut Self {
        self.insert(label, TypeKind::Entity, Some(supertype.unwrap_or(META_ENTITY_LABEL)), LabelSet::new());
        self
    }

    pub fn define_attribute_type(&mut self, label: &str, supertype: Option<&str>) -> &mut Self {
        self.insert(label, TypeKind::Attribute, Some(supertype.unwrap_or(META_ATTRIBUTE_LABEL)), LabelSet::new());
        self
    }

    /// Defines a relation type relating the given roles. Roles not yet defined are created directly below `role`.
    pub fn define_relation_type(&mut self, label: &str, supertype: Option<&str>, roles: &[&str]) -> &mut Self {
        for role in roles {
            if !self.types.contains_key(&Label::new(role)) {
                self.define_role(role, None);
            }
        }
        let relates = roles.iter().map(|role| Label::new(role)).collect();
        self.insert(label, TypeKind::Relation, Some(supertype.unwrap_or(META_RELATION_LABEL)), relates);
        self
    }

    pub fn define_role(&mut self, label: &str, supertype: Option<&str>) -> &mut Self {
        self.insert(label, TypeKind::Role, Some(supertype.unwrap_or(META_ROLE_LABEL)), LabelSet::new());
        self
    }

    /// Defines the implicit relation type linking owners of `attribute_type` to its instances.
    pub fn define_has(&mut self, attribute_type: &str) -> &mut Self {
        let attribute_type = Label::new(attribute_type);
        let relation = Label::has_relation(&attribute_type);
        let owner = Label::has_owner_role(&attribute_type);
        let value = Label::has_value_role(&attribute_type);
        self.define_relation_type(relation.name(), None, &[owner.name(), value.name()])
    }

    pub fn kind(&self, label: &Label) -> Option<TypeKind> {
        self.types.get(label).map(|entry| entry.kind)
    }

    pub fn supertype(&self, label: &Label) -> Option<&Label> {
        self.types.get(label).and_then(|entry| entry.supertype.as_ref())
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> + '_ {
        self.types.keys()
    }

    /// Reflexive and transitive.
    pub fn is_subtype_of(&self, subtype: &Label, supertype: &Label) -> bool {
        let mut current = Some(subtype);
        let mut visited = BTreeSet::new();
        while let Some(label) = current {
            if label == supertype {
                return self.types.contains_key(label);
            }
            if !visited.insert(label) {
                return false;
            }
            current = self.supertype(label);
        }
        false
    }

    fn direct_subtypes<'a>(&'a self, label: &'a Label) -> impl Iterator<Item = &'a Label> + 'a {
        self.types
            .iter()
            .filter(move |(_, entry)| entry.supertype.as_ref() == Some(label))
            .map(|(subtype, _)| subtype)
    }

    fn closure(&self, label: &Label) -> LabelSet {
        let mut closure = LabelSet::new();
        if !self.types.contains_key(label) {
            return closure;
        }
        let mut queue = VecDeque::from([label]);
        while let Some(next) = queue.pop_front() {
            if closure.insert(next.clone()) {
                queue.extend(self.direct_subtypes(next));
            }
        }
        closure
    }

    fn inherited_roles(&self, label: &Label) -> Result<LabelSet, SchemaReadError> {
        let mut roles = LabelSet::new();
        let mut current = Some(label);
        let mut steps = 0;
        while let Some(next) = current {
            if steps > self.types.len() {
                return Err(SchemaReadError::InconsistentHierarchy { label: label.name().to_owned() });
            }
            if let Some(entry) = self.types.get(next) {
                roles.extend(entry.relates.iter().cloned());
            }
            current = self.supertype(next);
            steps += 1;
        }
        Ok(roles)
    }
}

impl Default for TypeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaOracle for TypeGraph {
    fn exists(&self, label: &Label) -> Result<bool, SchemaReadError> {
        Ok(self.types.contains_key(label))
    }

    fn direct_subtypes_exist(&self, label: &Label) -> Result<bool, SchemaReadError> {
        Ok(self.direct_subtypes(label).next().is_some())
    }

    fn subtype_closure(&self, label: &Label) -> Result<LabelSet, SchemaReadError> {
        Ok(self.closure(label))
    }

    fn resolve_role(&self, label: &Label) -> Result<Option<RoleMeta>, SchemaReadError> {
        match self.kind(label) {
            Some(TypeKind::Role) => Ok(Some(RoleMeta::new(label.clone(), self.closure(label)))),
            _ => Ok(None),
        }
    }

    fn resolve_relation_type(&self, label: &Label) -> Result<Option<RelationTypeMeta>, SchemaReadError> {
        match self.kind(label) {
            Some(TypeKind::Relation) => {
                let roles = self.inherited_roles(label)?;
                Ok(Some(RelationTypeMeta::new(label.clone(), self.closure(label), roles)))
            }
            _ => Ok(None),
        }
    }
}
