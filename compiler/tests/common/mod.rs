/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![allow(dead_code)]

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
};

use compiler::{fragment::Fragment, fragment_set::FragmentSets};
use concept::{
    label::Label,
    schema::SchemaOracle,
    type_graph::{TypeGraph, TypeKind},
};
use ir::{
    pattern::value::{Comparator, Literal, Operand},
    variable::Variable,
};

pub fn label(name: &str) -> Label {
    Label::new(name)
}

pub fn schema() -> TypeGraph {
    let mut schema = TypeGraph::new();
    schema
        .define_entity_type("person", None)
        .define_entity_type("movie", None)
        .define_entity_type("animal", None)
        .define_entity_type("dog", Some("animal"))
        .define_attribute_type("name", None)
        .define_attribute_type("title", None)
        .define_role("partner", None)
        .define_role("husband", Some("partner"))
        .define_role("wife", Some("partner"))
        .define_relation_type("marriage", None, &["husband", "wife"])
        .define_relation_type("civil-marriage", Some("marriage"), &[])
        .define_relation_type("rel", None, &["role1", "role2"])
        .define_has("name")
        .define_has("title");
    schema
}

/// Small data set over `schema()`, shaped so that every fragment kind has matching and non-matching instances.
pub fn instances() -> InstanceGraph {
    let mut graph = InstanceGraph::new(schema());
    graph
        .entity("alice", "person")
        .entity("bob", "person")
        .entity("carol", "person")
        .entity("heat", "movie")
        .entity("rex", "dog")
        .entity("felix", "animal")
        .attribute("name-alice", "name", "Alice")
        .attribute("name-bob", "name", "Bob")
        .attribute("name-rex", "name", "Rex")
        .attribute("title-heat", "title", "Heat")
        .has("alice", "name-alice")
        .has("carol", "name-alice")
        .has("bob", "name-bob")
        .has("rex", "name-rex")
        .has("heat", "title-heat")
        .relation("wedding", "marriage", &[("husband", "bob"), ("wife", "alice")])
        .relation("registry-wedding", "civil-marriage", &[("husband", "bob"), ("wife", "carol")])
        .relation("fan", "rel", &[("role1", "alice"), ("role2", "heat")])
        .relation("self-rel", "rel", &[("role1", "rex"), ("role2", "rex")])
        .relation("crowd", "rel", &[("role1", "alice"), ("role2", "bob"), ("role2", "carol")]);
    graph
}

/// `instances()` plus relations that play roles in relations, one of them in itself.
pub fn nested_instances() -> InstanceGraph {
    let mut graph = instances();
    graph
        .relation("citation", "rel", &[("role1", "wedding"), ("role2", "fan")])
        .relation("loop", "rel", &[("role1", "loop"), ("role2", "alice")]);
    graph
}

struct CastingFact {
    id: String,
    relation: String,
    role: Label,
    player: String,
}

type Row = HashMap<Variable, String>;

/// Answer set of a pattern: the bindings of its named variables, by variable id.
pub type Answers = BTreeSet<Vec<(u16, String)>>;

/// In-memory data graph with a brute-force evaluator for fragment sets. Types and roles are nodes named
/// by their label; instances and castings are nodes named by their id.
pub struct InstanceGraph {
    schema: TypeGraph,
    things: BTreeMap<String, Label>,
    values: HashMap<String, Literal>,
    castings: Vec<CastingFact>,
}

impl InstanceGraph {
    pub fn new(schema: TypeGraph) -> Self {
        Self { schema, things: BTreeMap::new(), values: HashMap::new(), castings: Vec::new() }
    }

    pub fn schema(&self) -> &TypeGraph {
        &self.schema
    }

    pub fn entity(&mut self, id: &str, type_: &str) -> &mut Self {
        self.things.insert(id.to_owned(), label(type_));
        self
    }

    pub fn attribute(&mut self, id: &str, type_: &str, value: impl Into<Literal>) -> &mut Self {
        self.things.insert(id.to_owned(), label(type_));
        self.values.insert(id.to_owned(), value.into());
        self
    }

    pub fn relation(&mut self, id: &str, type_: &str, role_players: &[(&str, &str)]) -> &mut Self {
        self.things.insert(id.to_owned(), label(type_));
        for (index, (role, player)) in role_players.iter().enumerate() {
            self.castings.push(CastingFact {
                id: format!("{id}#{index}"),
                relation: id.to_owned(),
                role: label(role),
                player: (*player).to_owned(),
            });
        }
        self
    }

    pub fn has(&mut self, owner: &str, attribute: &str) -> &mut Self {
        let attribute_type = self.things[attribute].clone();
        let owner_role = Label::has_owner_role(&attribute_type);
        let value_role = Label::has_value_role(&attribute_type);
        self.relation(
            &format!("{owner}-has-{attribute}"),
            Label::has_relation(&attribute_type).name(),
            &[(owner_role.name(), owner), (value_role.name(), attribute)],
        )
    }

    pub fn answers(&self, sets: &FragmentSets) -> Answers {
        let mut generators = Vec::new();
        let mut filters = Vec::new();
        for set in sets.iter() {
            let fragment = &set.fragments()[0];
            match fragment {
                Fragment::Neq(_) => filters.push(fragment),
                Fragment::Value(value) if value.predicate().inner_variable().is_some() => filters.push(fragment),
                _ => generators.push((fragment.variables(), self.rows(fragment))),
            }
        }

        let mut rows = vec![Row::new()];
        let mut bound: HashSet<Variable> = HashSet::new();
        while !generators.is_empty() {
            let next = generators
                .iter()
                .position(|(variables, _)| variables.iter().any(|var| bound.contains(var)))
                .unwrap_or(0);
            let (variables, generated) = generators.remove(next);
            rows = join(&rows, &generated);
            rows.retain(|row| filters.iter().all(|filter| self.check(filter, row)));
            bound.extend(variables);
        }
        rows.into_iter()
            .map(|row| {
                let mut answer = row
                    .into_iter()
                    .filter(|(var, _)| var.is_named())
                    .map(|(var, node)| (var.id(), node))
                    .collect::<Vec<_>>();
                answer.sort();
                answer
            })
            .collect()
    }

    fn rows(&self, fragment: &Fragment) -> Vec<Row> {
        match fragment {
            Fragment::Isa(isa) => self
                .things
                .iter()
                .filter_map(|(thing, type_)| bind(&[(isa.thing(), thing.as_str()), (isa.type_(), type_.name())]))
                .collect(),
            Fragment::Sub(sub) => {
                let mut rows = Vec::new();
                for subtype in self.schema.labels() {
                    for supertype in self.schema.labels() {
                        if self.schema.is_subtype_of(subtype, supertype) {
                            rows.extend(bind(&[(sub.subtype(), subtype.name()), (sub.supertype(), supertype.name())]));
                        }
                    }
                }
                rows
            }
            Fragment::Label(filter) => filter
                .labels()
                .iter()
                .filter(|label| self.schema.exists(label).unwrap_or(false))
                .filter_map(|label| bind(&[(filter.var(), label.name())]))
                .collect(),
            Fragment::Id(id) => {
                if self.things.contains_key(id.id().as_str()) {
                    bind(&[(id.var(), id.id().as_str())]).into_iter().collect()
                } else {
                    Vec::new()
                }
            }
            Fragment::Value(value) => {
                let Operand::Literal(literal) = value.predicate().operand() else {
                    unreachable!("variable comparisons are evaluated as filters")
                };
                self.values
                    .iter()
                    .filter(|(_, held)| compare(held, value.predicate().comparator(), literal))
                    .filter_map(|(thing, _)| bind(&[(value.var(), thing)]))
                    .collect()
            }
            // no type in the fixture is abstract or carries a data type or regex annotation
            Fragment::Abstract(_) | Fragment::DataType(_) | Fragment::Regex(_) => Vec::new(),
            Fragment::Casting(casting) => self
                .castings
                .iter()
                .filter_map(|fact| {
                    bind(&[
                        (casting.relation(), fact.relation.as_str()),
                        (casting.edge(), fact.id.as_str()),
                        (casting.player(), fact.player.as_str()),
                    ])
                })
                .collect(),
            Fragment::IsaCastings(isa_castings) => {
                let mut rows = Vec::new();
                for fact in &self.castings {
                    for role in self.super_roles(&fact.role) {
                        rows.extend(bind(&[(isa_castings.edge(), fact.id.as_str()), (isa_castings.role(), role.name())]));
                    }
                }
                rows
            }
            Fragment::RolePlayer(role_player) => {
                let mut rows = Vec::new();
                for fact in &self.castings {
                    if role_player.role_labels().is_some_and(|roles| !roles.contains(&fact.role)) {
                        continue;
                    }
                    let relation_type = &self.things[&fact.relation];
                    if role_player.relation_type_labels().is_some_and(|types| !types.contains(relation_type)) {
                        continue;
                    }
                    let base = [
                        (role_player.relation(), fact.relation.as_str()),
                        (role_player.edge(), fact.id.as_str()),
                        (role_player.player(), fact.player.as_str()),
                    ];
                    match role_player.role() {
                        None => rows.extend(bind(&base)),
                        Some(role_var) => {
                            for role in self.super_roles(&fact.role) {
                                let mut bindings = base.to_vec();
                                bindings.push((role_var, role.name()));
                                rows.extend(bind(&bindings));
                            }
                        }
                    }
                }
                rows
            }
            Fragment::ShortcutEdge(shortcut) => {
                let mut rows = Vec::new();
                for first in &self.castings {
                    for second in &self.castings {
                        if first.relation != second.relation || first.id == second.id {
                            continue;
                        }
                        let relation_type = &self.things[&first.relation];
                        let matches = shortcut.role_a().map_or(true, |role| self.schema.is_subtype_of(&first.role, role))
                            && shortcut.role_b().map_or(true, |role| self.schema.is_subtype_of(&second.role, role))
                            && shortcut
                                .relation_type()
                                .map_or(true, |type_| self.schema.is_subtype_of(relation_type, type_));
                        if matches {
                            rows.extend(bind(&[
                                (shortcut.player_a(), first.player.as_str()),
                                (shortcut.player_b(), second.player.as_str()),
                            ]));
                        }
                    }
                }
                rows
            }
            Fragment::ResourceIndex(index) => self
                .things
                .iter()
                .filter(|(thing, type_)| {
                    *type_ == index.label() && self.values.get(*thing).is_some_and(|held| held == index.value())
                })
                .filter_map(|(thing, _)| bind(&[(index.var(), thing)]))
                .collect(),
            Fragment::Neq(_) => unreachable!("inequalities are evaluated as filters"),
        }
    }

    /// Filters pass until all of their variables are bound.
    fn check(&self, filter: &Fragment, row: &Row) -> bool {
        match filter {
            Fragment::Neq(neq) => match (row.get(&neq.var()), row.get(&neq.other())) {
                (Some(lhs), Some(rhs)) => lhs != rhs,
                _ => true,
            },
            Fragment::Value(value) => {
                let other = value.predicate().inner_variable().and_then(|other| row.get(&other));
                let (Some(held), Some(compared)) = (row.get(&value.var()), other) else {
                    return true;
                };
                match (self.values.get(held), self.values.get(compared)) {
                    (Some(held), Some(compared)) => compare(held, value.predicate().comparator(), compared),
                    _ => false,
                }
            }
            _ => true,
        }
    }

    fn super_roles<'a>(&'a self, role: &'a Label) -> impl Iterator<Item = &'a Label> + 'a {
        self.schema
            .labels()
            .filter(move |candidate| {
                self.schema.kind(candidate) == Some(TypeKind::Role) && self.schema.is_subtype_of(role, candidate)
            })
    }
}

fn bind<S: AsRef<str>>(bindings: &[(Variable, S)]) -> Option<Row> {
    let mut row = Row::new();
    for (var, node) in bindings {
        let node = node.as_ref();
        match row.get(var) {
            Some(existing) if existing != node => return None,
            _ => {
                row.insert(*var, node.to_owned());
            }
        }
    }
    Some(row)
}

fn join(left: &[Row], right: &[Row]) -> Vec<Row> {
    let mut joined = Vec::new();
    for lhs in left {
        for rhs in right {
            if rhs.iter().all(|(var, node)| lhs.get(var).map_or(true, |existing| existing == node)) {
                let mut row = lhs.clone();
                row.extend(rhs.iter().map(|(var, node)| (*var, node.clone())));
                joined.push(row);
            }
        }
    }
    joined
}

fn compare(lhs: &Literal, comparator: Comparator, rhs: &Literal) -> bool {
    match comparator {
        Comparator::Equal => lhs == rhs,
        Comparator::NotEqual => lhs != rhs,
        Comparator::Less => order(lhs, rhs) == Some(Ordering::Less),
        Comparator::LessOrEqual => matches!(order(lhs, rhs), Some(Ordering::Less | Ordering::Equal)),
        Comparator::Greater => order(lhs, rhs) == Some(Ordering::Greater),
        Comparator::GreaterOrEqual => matches!(order(lhs, rhs), Some(Ordering::Greater | Ordering::Equal)),
        Comparator::Contains => match (lhs, rhs) {
            (Literal::String(lhs), Literal::String(rhs)) => lhs.contains(rhs.as_str()),
            _ => false,
        },
        Comparator::Like => unimplemented!("pattern matching is not evaluated by the reference evaluator"),
    }
}

fn order(lhs: &Literal, rhs: &Literal) -> Option<Ordering> {
    match (lhs, rhs) {
        (Literal::Boolean(lhs), Literal::Boolean(rhs)) => lhs.partial_cmp(rhs),
        (Literal::Long(lhs), Literal::Long(rhs)) => lhs.partial_cmp(rhs),
        (Literal::Double(lhs), Literal::Double(rhs)) => lhs.partial_cmp(rhs),
        (Literal::String(lhs), Literal::String(rhs)) => lhs.partial_cmp(rhs),
        (Literal::DateTime(lhs), Literal::DateTime(rhs)) => lhs.partial_cmp(rhs),
        _ => None,
    }
}

/// Number of sets in the bag whose fragments are of the given kind.
pub fn count_kind(sets: &FragmentSets, name: &str) -> usize {
    sets.iter().filter(|set| set.name() == name).count()
}
