/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use concept::label::{ConceptId, Label as TypeLabel};

use crate::{
    pattern::value::{DataType as ValueDataType, ValuePredicate},
    variable::Variable,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Isa(Isa),
    Sub(Sub),
    Label(Label),
    Id(Id),
    Value(Value),
    Neq(Neq),
    Links(Links),
    Has(Has),
    Abstract(Abstract),
    DataType(DataType),
    Regex(Regex),
    When(RuleBody),
    Then(RuleBody),
}

impl Constraint {
    /// Variables in the order they are written in the constraint.
    pub fn ids(&self) -> Box<dyn Iterator<Item = Variable> + '_> {
        match self {
            Constraint::Isa(isa) => Box::new([isa.thing, isa.type_].into_iter()),
            Constraint::Sub(sub) => Box::new([sub.subtype, sub.supertype].into_iter()),
            Constraint::Label(label) => Box::new([label.type_].into_iter()),
            Constraint::Id(id) => Box::new([id.var].into_iter()),
            Constraint::Value(value) => {
                Box::new([value.attribute].into_iter().chain(value.predicate.inner_variable()))
            }
            Constraint::Neq(neq) => Box::new([neq.lhs, neq.rhs].into_iter()),
            Constraint::Links(links) => Box::new([links.relation, links.player].into_iter().chain(links.role)),
            Constraint::Has(has) => Box::new([has.owner, has.attribute].into_iter()),
            Constraint::Abstract(abstract_) => Box::new([abstract_.type_].into_iter()),
            Constraint::DataType(data_type) => Box::new([data_type.type_].into_iter()),
            Constraint::Regex(regex) => Box::new([regex.type_].into_iter()),
            Constraint::When(_) | Constraint::Then(_) => Box::new(std::iter::empty()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Constraint::Isa(_) => "isa",
            Constraint::Sub(_) => "sub",
            Constraint::Label(_) => "label",
            Constraint::Id(_) => "id",
            Constraint::Value(_) => "value",
            Constraint::Neq(_) => "neq",
            Constraint::Links(_) => "links",
            Constraint::Has(_) => "has",
            Constraint::Abstract(_) => "abstract",
            Constraint::DataType(_) => "datatype",
            Constraint::Regex(_) => "regex",
            Constraint::When(_) => "when",
            Constraint::Then(_) => "then",
        }
    }

    pub fn as_isa(&self) -> Option<&Isa> {
        match self {
            Constraint::Isa(isa) => Some(isa),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Constraint::Label(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_links(&self) -> Option<&Links> {
        match self {
            Constraint::Links(links) => Some(links),
            _ => None,
        }
    }

    pub fn as_has(&self) -> Option<&Has> {
        match self {
            Constraint::Has(has) => Some(has),
            _ => None,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Isa(constraint) => fmt::Display::fmt(constraint, f),
            Constraint::Sub(constraint) => fmt::Display::fmt(constraint, f),
            Constraint::Label(constraint) => fmt::Display::fmt(constraint, f),
            Constraint::Id(constraint) => fmt::Display::fmt(constraint, f),
            Constraint::Value(constraint) => fmt::Display::fmt(constraint, f),
            Constraint::Neq(constraint) => fmt::Display::fmt(constraint, f),
            Constraint::Links(constraint) => fmt::Display::fmt(constraint, f),
            Constraint::Has(constraint) => fmt::Display::fmt(constraint, f),
            Constraint::Abstract(constraint) => fmt::Display::fmt(constraint, f),
            Constraint::DataType(constraint) => fmt::Display::fmt(constraint, f),
            Constraint::Regex(constraint) => fmt::Display::fmt(constraint, f),
            Constraint::When(body) => write!(f, "when {{ {} }}", body.text),
            Constraint::Then(body) => write!(f, "then {{ {} }}", body.text),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum IsaKind {
    Exact,
    Subtype,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Isa {
    kind: IsaKind,
    thing: Variable,
    type_: Variable,
}

impl Isa {
    pub fn new(kind: IsaKind, thing: Variable, type_: Variable) -> Self {
        Self { kind, thing, type_ }
    }

    pub fn thing(&self) -> Variable {
        self.thing
    }

    pub fn type_(&self) -> Variable {
        self.type_
    }

    pub fn isa_kind(&self) -> IsaKind {
        self.kind
    }
}

impl From<Isa> for Constraint {
    fn from(val: Isa) -> Self {
        Constraint::Isa(val)
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IsaKind::Exact => write!(f, "{} isa! {}", self.thing, self.type_),
            IsaKind::Subtype => write!(f, "{} isa {}", self.thing, self.type_),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Sub {
    subtype: Variable,
    supertype: Variable,
}

impl Sub {
    pub fn new(subtype: Variable, supertype: Variable) -> Self {
        Self { subtype, supertype }
    }

    pub fn subtype(&self) -> Variable {
        self.subtype
    }

    pub fn supertype(&self) -> Variable {
        self.supertype
    }
}

impl From<Sub> for Constraint {
    fn from(val: Sub) -> Self {
        Constraint::Sub(val)
    }
}

impl fmt::Display for Sub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sub {}", self.subtype, self.supertype)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Label {
    type_: Variable,
    label: TypeLabel,
}

impl Label {
    pub fn new(type_: Variable, label: TypeLabel) -> Self {
        Self { type_, label }
    }

    pub fn type_(&self) -> Variable {
        self.type_
    }

    pub fn type_label(&self) -> &TypeLabel {
        &self.label
    }
}

impl From<Label> for Constraint {
    fn from(val: Label) -> Self {
        Constraint::Label(val)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} label {}", self.type_, self.label)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
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

impl From<Id> for Constraint {
    fn from(val: Id) -> Self {
        Constraint::Id(val)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} id {}", self.var, self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    attribute: Variable,
    predicate: ValuePredicate,
}

impl Value {
    pub fn new(attribute: Variable, predicate: ValuePredicate) -> Self {
        Self { attribute, predicate }
    }

    pub fn attribute(&self) -> Variable {
        self.attribute
    }

    pub fn predicate(&self) -> &ValuePredicate {
        &self.predicate
    }
}

impl From<Value> for Constraint {
    fn from(val: Value) -> Self {
        Constraint::Value(val)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.attribute, self.predicate)
    }
}

/// The two variables denote different concepts.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Neq {
    lhs: Variable,
    rhs: Variable,
}

impl Neq {
    pub fn new(lhs: Variable, rhs: Variable) -> Self {
        Self { lhs, rhs }
    }

    pub fn lhs(&self) -> Variable {
        self.lhs
    }

    pub fn rhs(&self) -> Variable {
        self.rhs
    }
}

impl From<Neq> for Constraint {
    fn from(val: Neq) -> Self {
        Constraint::Neq(val)
    }
}

impl fmt::Display for Neq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is-not {}", self.lhs, self.rhs)
    }
}

/// One role player of a relation, optionally naming the role it plays.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Links {
    relation: Variable,
    player: Variable,
    role: Option<Variable>,
}

impl Links {
    pub fn new(relation: Variable, player: Variable, role: Option<Variable>) -> Self {
        Self { relation, player, role }
    }

    pub fn relation(&self) -> Variable {
        self.relation
    }

    pub fn player(&self) -> Variable {
        self.player
    }

    pub fn role(&self) -> Option<Variable> {
        self.role
    }
}

impl From<Links> for Constraint {
    fn from(val: Links) -> Self {
        Constraint::Links(val)
    }
}

impl fmt::Display for Links {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            Some(role) => write!(f, "{} links ({}: {})", self.relation, role, self.player),
            None => write!(f, "{} links ({})", self.relation, self.player),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Has {
    owner: Variable,
    attribute: Variable,
    attribute_type: TypeLabel,
}

impl Has {
    pub fn new(owner: Variable, attribute: Variable, attribute_type: TypeLabel) -> Self {
        Self { owner, attribute, attribute_type }
    }

    pub fn owner(&self) -> Variable {
        self.owner
    }

    pub fn attribute(&self) -> Variable {
        self.attribute
    }

    pub fn attribute_type(&self) -> &TypeLabel {
        &self.attribute_type
    }
}

impl From<Has> for Constraint {
    fn from(val: Has) -> Self {
        Constraint::Has(val)
    }
}

impl fmt::Display for Has {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has {} {}", self.owner, self.attribute_type, self.attribute)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
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

impl From<Abstract> for Constraint {
    fn from(val: Abstract) -> Self {
        Constraint::Abstract(val)
    }
}

impl fmt::Display for Abstract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} abstract", self.type_)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
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

impl From<DataType> for Constraint {
    fn from(val: DataType) -> Self {
        Constraint::DataType(val)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} datatype {}", self.type_, self.data_type)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
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

impl From<Regex> for Constraint {
    fn from(val: Regex) -> Self {
        Constraint::Regex(val)
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} regex {:?}", self.type_, self.pattern)
    }
}

/// The body of a rule definition. Rule bodies describe inference, not matching.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RuleBody {
    text: String,
}

impl RuleBody {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
