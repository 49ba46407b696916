/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashMap;

use compiler::{lower_conjunction, plan, transformation::apply_transformations};
use ir::{
    pattern::{
        conjunction::{Conjunction, ConjunctionBuilder},
        constraint::IsaKind,
        value::{Comparator, Literal, Operand},
    },
    variable::{Variable, VariableRegistry},
};
use options::PlannerOptions;
use proptest::prelude::*;

mod common;
use common::{instances, nested_instances, Answers, InstanceGraph};

/// A variable as templates refer to it: by a user-visible name, or through an anonymous variable shared by every
/// template naming the same slot.
#[derive(Debug, Clone, Copy)]
enum Var {
    Named(&'static str),
    Anonymous(&'static str),
}

const X: Var = Var::Named("x");
const Y: Var = Var::Named("y");
const Z: Var = Var::Named("z");
const N: Var = Var::Named("n");

#[derive(Debug, Clone, Copy)]
enum TypeRef {
    Label(&'static str),
    Variable(Var, Option<&'static str>),
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Unspecified,
    Label(&'static str),
    Variable(Var, Option<&'static str>),
}

#[derive(Debug, Clone)]
enum Template {
    Isa { thing: Var, type_: TypeRef, exact: bool },
    Sub { subtype: Var, supertype: &'static str },
    Has { owner: Var, attribute: Var, value: Option<&'static str> },
    Links { relation: Var, players: Vec<(Var, Role)>, relation_type: Option<TypeRef> },
    Neq { lhs: Var, rhs: Var },
}

struct PatternBuilder<'b, 'reg> {
    builder: &'b mut ConjunctionBuilder<'reg>,
    shared: HashMap<&'static str, Variable>,
}

impl PatternBuilder<'_, '_> {
    fn variable(&mut self, var: Var) -> Variable {
        match var {
            Var::Named(name) => self.builder.get_or_declare_variable(name).unwrap(),
            Var::Anonymous(slot) => {
                if let Some(variable) = self.shared.get(slot) {
                    return *variable;
                }
                let variable = self.builder.create_anonymous_variable().unwrap();
                self.shared.insert(slot, variable);
                variable
            }
        }
    }

    fn labelled(&mut self, var: Var, label: Option<&str>) -> Variable {
        let variable = self.variable(var);
        if let Some(label) = label {
            self.builder.add_label(variable, label).unwrap();
        }
        variable
    }

    fn type_(&mut self, type_: TypeRef) -> Variable {
        match type_ {
            TypeRef::Label(label) => {
                let variable = self.builder.create_anonymous_variable().unwrap();
                self.builder.add_label(variable, label).unwrap();
                variable
            }
            TypeRef::Variable(var, label) => self.labelled(var, label),
        }
    }

    fn add(&mut self, template: &Template) {
        match template {
            Template::Isa { thing, type_, exact } => {
                let thing = self.variable(*thing);
                let type_ = self.type_(*type_);
                let kind = if *exact { IsaKind::Exact } else { IsaKind::Subtype };
                self.builder.add_isa(kind, thing, type_);
            }
            Template::Sub { subtype, supertype } => {
                let subtype = self.variable(*subtype);
                let supertype = self.type_(TypeRef::Label(*supertype));
                self.builder.add_sub(subtype, supertype);
            }
            Template::Has { owner, attribute, value } => {
                let owner = self.variable(*owner);
                let attribute = self.variable(*attribute);
                self.builder.add_has(owner, attribute, "name").unwrap();
                if let Some(value) = value {
                    self.builder.add_value(attribute, Comparator::Equal, Operand::Literal(Literal::from(*value)));
                }
            }
            Template::Links { relation, players, relation_type } => {
                let relation = self.variable(*relation);
                for (player, role) in players {
                    let player = self.variable(*player);
                    match role {
                        Role::Unspecified => {
                            self.builder.add_links(relation, player, None);
                        }
                        Role::Label(label) => {
                            self.builder.add_links_role_label(relation, player, label).unwrap();
                        }
                        Role::Variable(var, label) => {
                            let role = self.labelled(*var, *label);
                            self.builder.add_links(relation, player, Some(role));
                        }
                    }
                }
                if let Some(relation_type) = relation_type {
                    let type_ = self.type_(*relation_type);
                    self.builder.add_isa(IsaKind::Subtype, relation, type_);
                }
            }
            Template::Neq { lhs, rhs } => {
                let (lhs, rhs) = (self.variable(*lhs), self.variable(*rhs));
                self.builder.add_neq(lhs, rhs);
            }
        }
    }
}

fn build(templates: &[Template]) -> (VariableRegistry, Conjunction) {
    let mut registry = VariableRegistry::new();
    let mut builder = ConjunctionBuilder::new(&mut registry);
    let mut pattern = PatternBuilder { builder: &mut builder, shared: HashMap::new() };
    for template in templates {
        pattern.add(template);
    }
    let conjunction = builder.finish();
    (registry, conjunction)
}

/// Answers before and after rewriting, plus the number of rule firings.
fn evaluate(graph: &InstanceGraph, templates: &[Template]) -> (Answers, Answers, usize, usize) {
    let (mut registry, conjunction) = build(templates);
    let lowered = lower_conjunction(&conjunction, &mut registry).unwrap();
    let mut rewritten = lowered.clone();
    let firings = apply_transformations(&mut rewritten, graph.schema()).unwrap();
    (graph.answers(&lowered), graph.answers(&rewritten), firings, lowered.len())
}

fn assert_sound_over(graph: &InstanceGraph, templates: &[Template]) -> Answers {
    let (before, after, _, _) = evaluate(graph, templates);
    assert_eq!(before, after, "{templates:?}");
    after
}

fn assert_sound(templates: &[Template]) -> Answers {
    assert_sound_over(&instances(), templates)
}

fn binary(relation_type: &'static str, first: (Var, Role), second: (Var, Role)) -> Template {
    Template::Links {
        relation: Var::Anonymous("_r"),
        players: vec![first, second],
        relation_type: Some(TypeRef::Label(relation_type)),
    }
}

#[test]
fn has_with_value_is_sound() {
    let answers = assert_sound(&[
        Template::Isa { thing: X, type_: TypeRef::Label("person"), exact: false },
        Template::Has { owner: X, attribute: N, value: Some("Alice") },
    ]);
    assert_eq!(answers.len(), 2);
}

#[test]
fn marriage_with_role_hierarchy_is_sound() {
    let answers = assert_sound(&[binary("marriage", (X, Role::Label("partner")), (Y, Role::Unspecified))]);
    // both spouses of both weddings, from either side
    assert_eq!(answers.len(), 4);
}

#[test]
fn relation_type_subtypes_are_kept() {
    let answers = assert_sound(&[binary("marriage", (X, Role::Label("husband")), (Y, Role::Label("wife")))]);
    assert_eq!(answers.len(), 2);
}

#[test]
fn visible_relation_is_sound() {
    let answers = assert_sound(&[Template::Links {
        relation: Var::Named("r"),
        players: vec![(X, Role::Label("role1")), (Y, Role::Label("role2"))],
        relation_type: Some(TypeRef::Label("rel")),
    }]);
    assert_eq!(answers.len(), 4);
}

#[test]
fn repeated_player_and_meta_role_are_sound() {
    let answers = assert_sound(&[binary("rel", (X, Role::Label("role")), (X, Role::Label("role2")))]);
    assert_eq!(answers.len(), 1);
}

#[test]
fn ternary_relation_is_sound() {
    let answers = assert_sound(&[Template::Links {
        relation: Var::Anonymous("_r"),
        players: vec![(X, Role::Label("role1")), (Y, Role::Label("role2")), (Z, Role::Label("role2"))],
        relation_type: Some(TypeRef::Label("rel")),
    }]);
    assert_eq!(answers.len(), 2);
}

#[test]
fn subtype_isa_is_sound() {
    let answers = assert_sound(&[Template::Isa { thing: X, type_: TypeRef::Label("animal"), exact: false }]);
    assert_eq!(answers.len(), 2);
    let answers = assert_sound(&[Template::Isa { thing: X, type_: TypeRef::Label("animal"), exact: true }]);
    assert_eq!(answers.len(), 1);
}

#[test]
fn relation_playing_in_itself_is_sound() {
    let relation = Var::Anonymous("_w");
    let answers = assert_sound_over(
        &nested_instances(),
        &[Template::Links {
            relation,
            players: vec![(X, Role::Unspecified), (relation, Role::Unspecified)],
            relation_type: None,
        }],
    );
    assert_eq!(answers.len(), 1);
}

#[test]
fn relation_playing_in_another_relation_is_sound() {
    let cited = Var::Named("r");
    let answers = assert_sound_over(
        &nested_instances(),
        &[
            binary("rel", (cited, Role::Label("role1")), (Y, Role::Label("role2"))),
            Template::Links {
                relation: cited,
                players: vec![(X, Role::Label("husband")), (Z, Role::Unspecified)],
                relation_type: None,
            },
        ],
    );
    // the wedding, cited by the fan relation
    assert_eq!(answers.len(), 1);
}

#[test]
fn shared_role_and_type_variables_are_sound() {
    let role = Var::Named("p");
    assert_sound(&[
        binary("marriage", (X, Role::Variable(role, None)), (Y, Role::Variable(role, Some("partner")))),
        Template::Sub { subtype: role, supertype: "partner" },
        Template::Neq { lhs: X, rhs: Z },
        Template::Isa { thing: Z, type_: TypeRef::Variable(Var::Anonymous("_t"), Some("person")), exact: false },
        Template::Isa { thing: Y, type_: TypeRef::Variable(Var::Anonymous("_t"), None), exact: false },
    ]);
}

fn player() -> impl Strategy<Value = Var> {
    prop::sample::select(vec![X, Y, Z, Var::Named("r"), Var::Anonymous("_r"), Var::Anonymous("_s")])
}

fn relation() -> impl Strategy<Value = Var> {
    prop::sample::select(vec![Var::Named("r"), Var::Named("s"), Var::Anonymous("_r"), Var::Anonymous("_s")])
}

fn type_variable() -> impl Strategy<Value = Var> {
    prop::sample::select(vec![Var::Named("t"), Var::Anonymous("_t"), Var::Anonymous("_u")])
}

fn type_ref(labels: Vec<&'static str>) -> impl Strategy<Value = TypeRef> {
    prop_oneof![
        3 => prop::sample::select(labels.clone()).prop_map(TypeRef::Label),
        1 => (type_variable(), prop::option::of(prop::sample::select(labels)))
            .prop_map(|(var, label)| TypeRef::Variable(var, label)),
    ]
}

fn role() -> impl Strategy<Value = Role> {
    let labels = vec!["role1", "role2", "husband", "wife", "partner", "role", "ghost"];
    // `_t` is also drawn as a type variable
    let variable =
        prop::sample::select(vec![Var::Named("p"), Var::Anonymous("_p"), Var::Anonymous("_q"), Var::Anonymous("_t")]);
    prop_oneof![
        Just(Role::Unspecified),
        prop::sample::select(labels.clone()).prop_map(Role::Label),
        (variable, prop::option::of(prop::sample::select(labels)))
            .prop_map(|(var, label)| Role::Variable(var, label)),
    ]
}

fn template() -> impl Strategy<Value = Template> {
    let thing_labels = vec!["person", "animal", "dog", "name", "movie", "unicorn", "rel", "marriage"];
    let relation_labels = vec!["rel", "marriage", "civil-marriage", "person", "ghost-rel"];
    let supertypes = vec!["animal", "dog", "marriage", "partner", "role1", "ghost"];
    let subtype = prop::sample::select(vec![Var::Named("t"), Var::Anonymous("_t"), Var::Anonymous("_p")]);
    let attribute = prop::sample::select(vec![N, Var::Named("m")]);
    let value = prop::option::of(prop::sample::select(vec!["Alice", "Bob", "Zed"]));
    prop_oneof![
        (player(), type_ref(thing_labels), any::<bool>())
            .prop_map(|(thing, type_, exact)| Template::Isa { thing, type_, exact }),
        (subtype, prop::sample::select(supertypes))
            .prop_map(|(subtype, supertype)| Template::Sub { subtype, supertype }),
        (player(), attribute, value).prop_map(|(owner, attribute, value)| Template::Has { owner, attribute, value }),
        (relation(), prop::collection::vec((player(), role()), 1..4), prop::option::of(type_ref(relation_labels)))
            .prop_map(|(relation, players, relation_type)| Template::Links { relation, players, relation_type }),
        (player(), player()).prop_map(|(lhs, rhs)| Template::Neq { lhs, rhs }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn rewriting_preserves_answers(templates in prop::collection::vec(template(), 1..4)) {
        let (before, after, firings, lowered) = evaluate(&nested_instances(), &templates);
        prop_assert!(firings <= 8 * lowered.max(1), "{} firings for {} sets", firings, lowered);
        prop_assert_eq!(before, after);
    }

    #[test]
    fn rewriting_reaches_a_fixpoint(templates in prop::collection::vec(template(), 1..4)) {
        let graph = nested_instances();
        let (mut registry, conjunction) = build(&templates);
        let mut sets = lower_conjunction(&conjunction, &mut registry).unwrap();
        apply_transformations(&mut sets, graph.schema()).unwrap();
        let stable = sets.clone();
        prop_assert_eq!(apply_transformations(&mut sets, graph.schema()).unwrap(), 0);
        prop_assert_eq!(sets, stable);
    }

    #[test]
    fn planning_is_repeatable(templates in prop::collection::vec(template(), 1..4)) {
        let graph = nested_instances();
        let (registry, conjunction) = build(&templates);
        let options = PlannerOptions::default();
        let first = plan(&conjunction, &mut registry.clone(), graph.schema(), &options);
        let second = plan(&conjunction, &mut registry.clone(), graph.schema(), &options);
        prop_assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }
}
