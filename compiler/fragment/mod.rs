/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::HashSet, fmt};

use concept::label::{ConceptId, Label as TypeLabel, LabelSet};
use ir::{
    pattern::value::{DataType as ValueDataType, Literal, ValuePredicate},
    variable::Variable,
};
use itertools::Itertools;
use options::CostModel;

pub mod cost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Canonical,
    Reverse,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Canonical => Direction::Reverse,
            Direction::Reverse => Direction::Canonical,
        }
    }
}

pub trait Costed {
    fn cost(&self, bound: &HashSet<Variable>, model: &CostModel) -> f64;
}

/// One primitive traversal or filter step. Edge fragments carry the direction they are walked in:
/// the start variable is read first and the end variable is reached through the edge.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Isa(Isa),
    Sub(Sub),
    Label(Label),
    Id(Id),
    Value(Value),
    Neq(Neq),
    Abstract(Abstract),
    DataType(DataType),
    Regex(Regex),
    RolePlayer(RolePlayer),
    Casting(Casting),
    IsaCastings(IsaCastings),
    ShortcutEdge(ShortcutEdge),
    ResourceIndex(ResourceIndex),
}

impl Fragment {
    pub fn name(&self) -> &'static str {
        match self {
            Fragment::Isa(_) => "isa",
            Fragment::Sub(_) => "sub",
            Fragment::Label(_) => "label",
            Fragment::Id(_) => "id",
            Fragment::Value(_) => "value",
            Fragment::Neq(_) => "neq",
            Fragment::Abstract(_) => "abstract",
            Fragment::DataType(_) => "datatype",
            Fragment::Regex(_) => "regex",
            Fragment::RolePlayer(_) => "role-player",
            Fragment::Casting(_) => "casting",
            Fragment::IsaCastings(_) => "isa-castings",
            Fragment::ShortcutEdge(_) => "shortcut-edge",
            Fragment::ResourceIndex(_) => "resource-index",
        }
    }

    pub fn start(&self) -> Variable {
        match self {
            Fragment::Isa(isa) => isa.oriented().0,
            Fragment::Sub(sub) => sub.oriented().0,
            Fragment::Label(label) => label.var,
            Fragment::Id(id) => id.var,
            Fragment::Value(value) => value.var,
            Fragment::Neq(neq) => neq.var,
            Fragment::Abstract(abstract_) => abstract_.type_,
            Fragment::DataType(data_type) => data_type.type_,
            Fragment::Regex(regex) => regex.type_,
            Fragment::RolePlayer(role_player) => role_player.oriented().0,
            Fragment::Casting(casting) => casting.oriented().0,
            Fragment::IsaCastings(isa_castings) => isa_castings.oriented().0,
            Fragment::ShortcutEdge(shortcut) => shortcut.oriented().0,
            Fragment::ResourceIndex(index) => index.var,
        }
    }

    /// The variable reached by walking an edge. Filters have no end.
    pub fn end(&self) -> Option<Variable> {
        match self {
            Fragment::Isa(isa) => Some(isa.oriented().1),
            Fragment::Sub(sub) => Some(sub.oriented().1),
            Fragment::RolePlayer(role_player) => Some(role_player.oriented().1),
            Fragment::Casting(casting) => Some(casting.oriented().1),
            Fragment::IsaCastings(isa_castings) => Some(isa_castings.oriented().1),
            Fragment::ShortcutEdge(shortcut) => Some(shortcut.oriented().1),
            Fragment::Label(_)
            | Fragment::Id(_)
            | Fragment::Value(_)
            | Fragment::Neq(_)
            | Fragment::Abstract(_)
            | Fragment::DataType(_)
            | Fragment::Regex(_)
            | Fragment::ResourceIndex(_) => None,
        }
    }

    /// Variables that must already be bound before this fragment may be placed.
    pub fn dependencies(&self) -> Option<Variable> {
        match self {
            Fragment::Neq(neq) => Some(neq.other),
            Fragment::Value(value) => value.predicate.inner_variable(),
            _ => None,
        }
    }

    /// Whether the fragment can begin a traversal from an unbound start variable.
    pub fn can_start(&self) -> bool {
        !matches!(self, Fragment::Neq(_))
    }

    /// Whether an unbound start is found through an index instead of a scan.
    pub fn is_indexed(&self) -> bool {
        matches!(self, Fragment::Label(_) | Fragment::Id(_) | Fragment::ResourceIndex(_))
    }

    /// Every variable bound once this fragment has run, start first.
    pub fn variables(&self) -> Vec<Variable> {
        let mut variables = vec![self.start()];
        match self {
            Fragment::RolePlayer(role_player) => {
                variables.push(role_player.oriented().1);
                variables.push(role_player.edge);
                variables.extend(role_player.role);
            }
            Fragment::Casting(casting) => {
                variables.push(casting.oriented().1);
                variables.push(casting.edge);
            }
            _ => variables.extend(self.end()),
        }
        variables.extend(self.dependencies());
        variables
    }

    /// Number of label restrictions applied while walking the fragment.
    pub fn label_filter_count(&self) -> usize {
        match self {
            Fragment::RolePlayer(role_player) => {
                role_player.role_labels.is_some() as usize + role_player.relation_type_labels.is_some() as usize
            }
            Fragment::ShortcutEdge(shortcut) => {
                shortcut.role_a.is_some() as usize
                    + shortcut.role_b.is_some() as usize
                    + shortcut.relation_type.is_some() as usize
            }
            _ => 0,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Fragment::Isa(isa) => Some(isa.direction),
            Fragment::Sub(sub) => Some(sub.direction),
            Fragment::RolePlayer(role_player) => Some(role_player.direction),
            Fragment::Casting(casting) => Some(casting.direction),
            Fragment::IsaCastings(isa_castings) => Some(isa_castings.direction),
            Fragment::ShortcutEdge(shortcut) => Some(shortcut.direction),
            _ => None,
        }
    }
}

impl Costed for Fragment {
    fn cost(&self, bound: &HashSet<Variable>, model: &CostModel) -> f64 {
        cost::fragment_cost(self, bound, model)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Isa(isa) => write_edge(f, isa.direction, isa.thing, "isa", isa.type_),
            Fragment::Sub(sub) => write_edge(f, sub.direction, sub.subtype, "sub", sub.supertype),
            Fragment::Label(label) => write!(f, "{}[label:{}]", label.var, label.labels.iter().join(",")),
            Fragment::Id(id) => write!(f, "{}[id:{}]", id.var, id.id),
            Fragment::Value(value) => write!(f, "{}[value:{}]", value.var, value.predicate),
            Fragment::Neq(neq) => write!(f, "{}[neq:{}]", neq.var, neq.other),
            Fragment::Abstract(abstract_) => write!(f, "{}[abstract]", abstract_.type_),
            Fragment::DataType(data_type) => write!(f, "{}[datatype:{}]", data_type.type_, data_type.data_type),
            Fragment::Regex(regex) => write!(f, "{}[regex:{:?}]", regex.type_, regex.pattern),
            Fragment::RolePlayer(role_player) => {
                let mut edge = format!("role-player:{}", role_player.edge);
                if let Some(role) = role_player.role {
                    edge.push_str(&format!(" role:{}", role));
                }
                if let Some(labels) = &role_player.role_labels {
                    edge.push_str(&format!(" roles:{}", labels.iter().join(",")));
                }
                if let Some(labels) = &role_player.relation_type_labels {
                    edge.push_str(&format!(" rels:{}", labels.iter().join(",")));
                }
                write_edge(f, role_player.direction, role_player.relation, &edge, role_player.player)
            }
            Fragment::Casting(casting) => {
                write_edge(f, casting.direction, casting.relation, &format!("casting:{}", casting.edge), casting.player)
            }
            Fragment::IsaCastings(isa_castings) => {
                write_edge(f, isa_castings.direction, isa_castings.edge, "isa-casting", isa_castings.role)
            }
            Fragment::ShortcutEdge(shortcut) => {
                let label_or_any = |label: &Option<TypeLabel>| match label {
                    Some(label) => label.to_string(),
                    None => "_".to_owned(),
                };
                let edge = format!(
                    "shortcut:{}:{} rel:{}",
                    label_or_any(&shortcut.role_a),
                    label_or_any(&shortcut.role_b),
                    label_or_any(&shortcut.relation_type)
                );
                write_edge(f, shortcut.direction, shortcut.player_a, &edge, shortcut.player_b)
            }
            Fragment::ResourceIndex(index) => write!(f, "{}[index:{}={}]", index.var, index.label, index.value),
        }
    }
}

fn write_edge(
    f: &mut fmt::Formatter<'_>,
    direction: Direction,
    from: Variable,
    edge: &str,
    to: Variable,
) -> fmt::Result {
    match direction {
        Direction::Canonical => write!(f, "{}-[{}]->{}", from, edge, to),
        Direction::Reverse => write!(f, "{}<-[{}]-{}", to, edge, from),
    }
}

macro_rules! fragment_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Fragment {
                fn from(val: $variant) -> Self {
                    Fragment::$variant(val)
                }
            }
        )*
    };
}

fragment_from!(
    Isa,
    Sub,
    Label,
    Id,
    Value,
    Neq,
    Abstract,
    DataType,
    Regex,
    RolePlayer,
    Casting,
    IsaCastings,
    ShortcutEdge,
    ResourceIndex,
);

/// Instance to direct type. Canonical walks from the instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isa {
    thing: Variable,
    type_: Variable,
    direction: Direction,
}

impl Isa {
    pub fn new(thing: Variable, type_: Variable, direction: Direction) -> Self {
        Self { thing, type_, direction }
    }

    pub fn thing(&self) -> Variable {
        self.thing
    }

    pub fn type_(&self) -> Variable {
        self.type_
    }

    fn oriented(&self) -> (Variable, Variable) {
        match self.direction {
            Direction::Canonical => (self.thing, self.type_),
            Direction::Reverse => (self.type_, self.thing),
        }
    }
}

/// Subtype to supertype, reflexive and transitive. Canonical walks from the subtype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sub {
    subtype: Variable,
    supertype: Variable,
    direction: Direction,
}

impl Sub {
    pub fn new(subtype: Variable, supertype: Variable, direction: Direction) -> Self {
        Self { subtype, supertype, direction }
    }

    pub fn subtype(&self) -> Variable {
        self.subtype
    }

    pub fn supertype(&self) -> Variable {
        self.supertype
    }

    fn oriented(&self) -> (Variable, Variable) {
        match self.direction {
            Direction::Canonical => (self.subtype, self.supertype),
            Direction::Reverse => (self.supertype, self.subtype),
        }
    }
}

/// Restricts a type variable to one of a fixed set of labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    var: Variable,
    labels: LabelSet,
}

impl Label {
    pub fn new(var: Variable, labels: LabelSet) -> Self {
        Self { var, labels }
    }

    pub fn var(&self) -> Variable {
        self.var
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// The label, if the filter names exactly one.
    pub fn single_label(&self) -> Option<&TypeLabel> {
        self.labels.iter().exactly_one().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id {
    var: Variable,
    id: ConceptId,
}

impl Id {
    pub fn new(var: Variable, id: ConceptId) -> Self {
        Self { var, id }
    }

    pub fn var(&self) -> Variable {
        self.var
    }

    pub fn id(&self) -> &ConceptId {
        &self.id
    }
}

/// Compares the value of `var` against the predicate operand.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    var: Variable,
    predicate: ValuePredicate,
}

impl Value {
    pub fn new(var: Variable, predicate: ValuePredicate) -> Self {
        Self { var, predicate }
    }

    pub fn var(&self) -> Variable {
        self.var
    }

    pub fn predicate(&self) -> &ValuePredicate {
        &self.predicate
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Neq {
    var: Variable,
    other: Variable,
}

impl Neq {
    pub fn new(var: Variable, other: Variable) -> Self {
        Self { var, other }
    }

    pub fn var(&self) -> Variable {
        self.var
    }

    pub fn other(&self) -> Variable {
        self.other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Abstract {
    type_: Variable,
}

impl Abstract {
    pub fn new(type_: Variable) -> Self {
        Self { type_ }
    }

    pub fn type_(&self) -> Variable {
        self.type_
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataType {
    type_: Variable,
    data_type: ValueDataType,
}

impl DataType {
    pub fn new(type_: Variable, data_type: ValueDataType) -> Self {
        Self { type_, data_type }
    }

    pub fn type_(&self) -> Variable {
        self.type_
    }

    pub fn data_type(&self) -> ValueDataType {
        self.data_type
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Regex {
    type_: Variable,
    pattern: String,
}

impl Regex {
    pub fn new(type_: Variable, pattern: String) -> Self {
        Self { type_, pattern }
    }

    pub fn type_(&self) -> Variable {
        self.type_
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Relation instance to role player through the casting `edge`.
///
/// With a role variable, the casting's role must be that role or one of its sub-roles.
/// `role_labels` and `relation_type_labels` further restrict the casting role and the relation's type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RolePlayer {
    relation: Variable,
    edge: Variable,
    player: Variable,
    role: Option<Variable>,
    role_labels: Option<LabelSet>,
    relation_type_labels: Option<LabelSet>,
    direction: Direction,
}

impl RolePlayer {
    pub fn new(
        relation: Variable,
        edge: Variable,
        player: Variable,
        role: Option<Variable>,
        role_labels: Option<LabelSet>,
        relation_type_labels: Option<LabelSet>,
        direction: Direction,
    ) -> Self {
        Self { relation, edge, player, role, role_labels, relation_type_labels, direction }
    }

    pub fn relation(&self) -> Variable {
        self.relation
    }

    pub fn edge(&self) -> Variable {
        self.edge
    }

    pub fn player(&self) -> Variable {
        self.player
    }

    pub fn role(&self) -> Option<Variable> {
        self.role
    }

    pub fn role_labels(&self) -> Option<&LabelSet> {
        self.role_labels.as_ref()
    }

    pub fn relation_type_labels(&self) -> Option<&LabelSet> {
        self.relation_type_labels.as_ref()
    }

    fn oriented(&self) -> (Variable, Variable) {
        match self.direction {
            Direction::Canonical => (self.relation, self.player),
            Direction::Reverse => (self.player, self.relation),
        }
    }
}

/// Relation instance to role player through the casting node `edge`, without role information.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Casting {
    relation: Variable,
    edge: Variable,
    player: Variable,
    direction: Direction,
}

impl Casting {
    pub fn new(relation: Variable, edge: Variable, player: Variable, direction: Direction) -> Self {
        Self { relation, edge, player, direction }
    }

    pub fn relation(&self) -> Variable {
        self.relation
    }

    pub fn edge(&self) -> Variable {
        self.edge
    }

    pub fn player(&self) -> Variable {
        self.player
    }

    fn oriented(&self) -> (Variable, Variable) {
        match self.direction {
            Direction::Canonical => (self.relation, self.player),
            Direction::Reverse => (self.player, self.relation),
        }
    }
}

/// Casting node to a role it plays: its own role or any super-role of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IsaCastings {
    edge: Variable,
    role: Variable,
    direction: Direction,
}

impl IsaCastings {
    pub fn new(edge: Variable, role: Variable, direction: Direction) -> Self {
        Self { edge, role, direction }
    }

    pub fn edge(&self) -> Variable {
        self.edge
    }

    pub fn role(&self) -> Variable {
        self.role
    }

    fn oriented(&self) -> (Variable, Variable) {
        match self.direction {
            Direction::Canonical => (self.edge, self.role),
            Direction::Reverse => (self.role, self.edge),
        }
    }
}

/// Two role players of the same binary relation instance, reached in one hop.
///
/// Role labels match the label or any sub-role; the relation type label matches the type or any subtype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortcutEdge {
    role_a: Option<TypeLabel>,
    player_a: Variable,
    role_b: Option<TypeLabel>,
    player_b: Variable,
    relation_type: Option<TypeLabel>,
    direction: Direction,
}

impl ShortcutEdge {
    pub fn new(
        role_a: Option<TypeLabel>,
        player_a: Variable,
        role_b: Option<TypeLabel>,
        player_b: Variable,
        relation_type: Option<TypeLabel>,
        direction: Direction,
    ) -> Self {
        Self { role_a, player_a, role_b, player_b, relation_type, direction }
    }

    pub fn role_a(&self) -> Option<&TypeLabel> {
        self.role_a.as_ref()
    }

    pub fn player_a(&self) -> Variable {
        self.player_a
    }

    pub fn role_b(&self) -> Option<&TypeLabel> {
        self.role_b.as_ref()
    }

    pub fn player_b(&self) -> Variable {
        self.player_b
    }

    pub fn relation_type(&self) -> Option<&TypeLabel> {
        self.relation_type.as_ref()
    }

    fn oriented(&self) -> (Variable, Variable) {
        match self.direction {
            Direction::Canonical => (self.player_a, self.player_b),
            Direction::Reverse => (self.player_b, self.player_a),
        }
    }
}

/// Attribute instances of exactly type `label` holding `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceIndex {
    var: Variable,
    label: TypeLabel,
    value: Literal,
}

impl ResourceIndex {
    pub fn new(var: Variable, label: TypeLabel, value: Literal) -> Self {
        Self { var, label, value }
    }

    pub fn var(&self) -> Variable {
        self.var
    }

    pub fn label(&self) -> &TypeLabel {
        &self.label
    }

    pub fn value(&self) -> &Literal {
        &self.value
    }
}
