/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    cell::OnceCell,
    collections::{HashMap, HashSet},
    fmt,
};

use concept::label::{ConceptId, Label as TypeLabel, LabelSet};
use ir::{
    pattern::value::{DataType as ValueDataType, Literal, Operand, ValuePredicate},
    variable::Variable,
};
use itertools::Itertools;

use crate::{
    filter_variants,
    fragment::{
        Abstract, Casting, DataType, Direction, Fragment, Id, Isa, IsaCastings, Label, Neq, Regex, ResourceIndex,
        RolePlayer, ShortcutEdge, Sub, Value,
    },
};

/// The interchangeable realisations of one logical constraint. Never empty, and every variant is of the same kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EquivalentFragmentSet {
    fragments: Vec<Fragment>,
}

impl EquivalentFragmentSet {
    fn single(fragment: impl Into<Fragment>) -> Self {
        Self { fragments: vec![fragment.into()] }
    }

    fn both_directions(build: impl Fn(Direction) -> Fragment) -> Self {
        Self { fragments: vec![build(Direction::Canonical), build(Direction::Reverse)] }
    }

    pub fn isa(thing: Variable, type_: Variable) -> Self {
        Self::both_directions(|direction| Isa::new(thing, type_, direction).into())
    }

    pub fn sub(subtype: Variable, supertype: Variable) -> Self {
        Self::both_directions(|direction| Sub::new(subtype, supertype, direction).into())
    }

    pub fn label(var: Variable, labels: LabelSet) -> Self {
        Self::single(Label::new(var, labels))
    }

    pub fn single_label(var: Variable, label: TypeLabel) -> Self {
        Self::label(var, LabelSet::from([label]))
    }

    pub fn id(var: Variable, id: ConceptId) -> Self {
        Self::single(Id::new(var, id))
    }

    /// A comparison against another variable can be run from either side, unless the comparator has no mirror.
    pub fn value(var: Variable, predicate: ValuePredicate) -> Self {
        let mut fragments = vec![Fragment::from(Value::new(var, predicate.clone()))];
        if let (Operand::Variable(other), Some(flipped)) = (predicate.operand(), predicate.comparator().flip()) {
            fragments.push(Value::new(*other, ValuePredicate::new(flipped, Operand::Variable(var))).into());
        }
        Self { fragments }
    }

    pub fn neq(lhs: Variable, rhs: Variable) -> Self {
        Self { fragments: vec![Neq::new(lhs, rhs).into(), Neq::new(rhs, lhs).into()] }
    }

    pub fn abstract_(type_: Variable) -> Self {
        Self::single(Abstract::new(type_))
    }

    pub fn data_type(type_: Variable, data_type: ValueDataType) -> Self {
        Self::single(DataType::new(type_, data_type))
    }

    pub fn regex(type_: Variable, pattern: &str) -> Self {
        Self::single(Regex::new(type_, pattern.to_owned()))
    }

    pub fn role_player(
        relation: Variable,
        edge: Variable,
        player: Variable,
        role: Option<Variable>,
        role_labels: Option<LabelSet>,
        relation_type_labels: Option<LabelSet>,
    ) -> Self {
        Self::both_directions(|direction| {
            RolePlayer::new(
                relation,
                edge,
                player,
                role,
                role_labels.clone(),
                relation_type_labels.clone(),
                direction,
            )
            .into()
        })
    }

    pub fn casting(relation: Variable, edge: Variable, player: Variable) -> Self {
        Self::both_directions(|direction| Casting::new(relation, edge, player, direction).into())
    }

    pub fn isa_castings(edge: Variable, role: Variable) -> Self {
        Self::both_directions(|direction| IsaCastings::new(edge, role, direction).into())
    }

    pub fn shortcut_edge(
        role_a: Option<TypeLabel>,
        player_a: Variable,
        role_b: Option<TypeLabel>,
        player_b: Variable,
        relation_type: Option<TypeLabel>,
    ) -> Self {
        Self::both_directions(|direction| {
            ShortcutEdge::new(role_a.clone(), player_a, role_b.clone(), player_b, relation_type.clone(), direction)
                .into()
        })
    }

    pub fn resource_index(var: Variable, label: TypeLabel, value: Literal) -> Self {
        Self::single(ResourceIndex::new(var, label, value))
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn name(&self) -> &'static str {
        self.fragments[0].name()
    }

    /// Every variable any variant touches, in first-appearance order.
    pub fn variables(&self) -> Vec<Variable> {
        let mut seen = HashSet::new();
        self.fragments.iter().flat_map(|fragment| fragment.variables()).filter(|var| seen.insert(*var)).collect()
    }

    pub fn as_isa(&self) -> Option<&Isa> {
        filter_variants!(Fragment::Isa : self.fragments).next()
    }

    pub fn as_sub(&self) -> Option<&Sub> {
        filter_variants!(Fragment::Sub : self.fragments).next()
    }

    pub fn as_label(&self) -> Option<&Label> {
        filter_variants!(Fragment::Label : self.fragments).next()
    }

    pub fn as_value(&self) -> Option<&Value> {
        filter_variants!(Fragment::Value : self.fragments).next()
    }

    pub fn as_neq(&self) -> Option<&Neq> {
        filter_variants!(Fragment::Neq : self.fragments).next()
    }

    pub fn as_role_player(&self) -> Option<&RolePlayer> {
        filter_variants!(Fragment::RolePlayer : self.fragments).next()
    }

    pub fn as_casting(&self) -> Option<&Casting> {
        filter_variants!(Fragment::Casting : self.fragments).next()
    }

    pub fn as_isa_castings(&self) -> Option<&IsaCastings> {
        filter_variants!(Fragment::IsaCastings : self.fragments).next()
    }

    pub fn as_shortcut_edge(&self) -> Option<&ShortcutEdge> {
        filter_variants!(Fragment::ShortcutEdge : self.fragments).next()
    }

    pub fn as_resource_index(&self) -> Option<&ResourceIndex> {
        filter_variants!(Fragment::ResourceIndex : self.fragments).next()
    }
}

impl fmt::Display for EquivalentFragmentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ {} }}", self.name(), self.fragments.iter().join(" | "))
    }
}

/// The mutable bag of fragment sets shared by the rewrite rules and read by the plan builder.
/// Insertion order is kept so that every consumer of the bag is deterministic.
#[derive(Debug, Clone, Default)]
pub struct FragmentSets {
    sets: Vec<EquivalentFragmentSet>,
    variable_index: OnceCell<HashMap<Variable, Vec<usize>>>,
}

impl FragmentSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EquivalentFragmentSet> {
        self.sets.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EquivalentFragmentSet> {
        self.sets.iter()
    }

    pub fn push(&mut self, set: EquivalentFragmentSet) {
        self.sets.push(set);
        self.variable_index.take();
    }

    /// Removes the sets at the given positions, keeping the relative order of the rest.
    pub fn remove(&mut self, indices: &[usize]) {
        for index in indices.iter().copied().sorted_by(|lhs, rhs| rhs.cmp(lhs)).dedup() {
            self.sets.remove(index);
        }
        self.variable_index.take();
    }

    /// Removes the sets at the given positions and appends their replacement.
    pub fn replace(&mut self, indices: &[usize], replacement: EquivalentFragmentSet) {
        self.remove(indices);
        self.push(replacement);
    }

    /// Positions of the sets mentioning `var`, ascending.
    pub fn sets_referencing(&self, var: Variable) -> &[usize] {
        self.variable_index.get_or_init(|| self.build_variable_index()).get(&var).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `var` is mentioned only by sets at the given positions.
    pub fn referenced_only_by(&self, var: Variable, allowed: &[usize]) -> bool {
        self.sets_referencing(var).iter().all(|index| allowed.contains(index))
    }

    /// The first label filter on `var`.
    pub fn find_label(&self, var: Variable) -> Option<(usize, &Label)> {
        self.sets_referencing(var)
            .iter()
            .find_map(|&index| self.sets[index].as_label().filter(|label| label.var() == var).map(|label| (index, label)))
    }

    fn build_variable_index(&self) -> HashMap<Variable, Vec<usize>> {
        let mut index: HashMap<Variable, Vec<usize>> = HashMap::new();
        for (position, set) in self.sets.iter().enumerate() {
            for var in set.variables() {
                index.entry(var).or_default().push(position);
            }
        }
        index
    }

    /// Every variable in the bag, in first-appearance order.
    pub fn variables(&self) -> Vec<Variable> {
        let mut seen = HashSet::new();
        self.sets.iter().flat_map(|set| set.variables()).filter(|var| seen.insert(*var)).collect()
    }

    pub fn into_sets(self) -> Vec<EquivalentFragmentSet> {
        self.sets
    }
}

impl FromIterator<EquivalentFragmentSet> for FragmentSets {
    fn from_iter<T: IntoIterator<Item = EquivalentFragmentSet>>(iter: T) -> Self {
        Self { sets: iter.into_iter().collect(), variable_index: OnceCell::new() }
    }
}

impl PartialEq for FragmentSets {
    fn eq(&self, other: &Self) -> bool {
        self.sets == other.sets
    }
}

impl fmt::Display for FragmentSets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for set in &self.sets {
            writeln!(f, "{}", set)?;
        }
        Ok(())
    }
}
