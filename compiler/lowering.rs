/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use concept::label::Label as TypeLabel;
use ir::{
    pattern::{
        conjunction::Conjunction,
        constraint::{Constraint, Has, IsaKind, Links},
    },
    variable::{Variable, VariableRegistry},
};
use itertools::Itertools;
use tracing::{event, Level};

use crate::{
    error::PlanningError,
    fragment_set::{EquivalentFragmentSet, FragmentSets},
};

/// Lowers every constraint of the conjunction into fragment sets. Composite constraints are desugared first,
/// synthesising anonymous variables from `registry`. The schema is never consulted.
pub fn lower_conjunction(
    conjunction: &Conjunction,
    registry: &mut VariableRegistry,
) -> Result<FragmentSets, PlanningError> {
    let mut lowering = Lowering { registry, sets: FragmentSets::new(), castings: Vec::new() };
    for (constraint, clause) in conjunction.iter() {
        lowering.lower_constraint(constraint, clause)?;
    }
    lowering.add_distinct_castings();
    event!(Level::TRACE, sets = lowering.sets.len(), "lowered conjunction");
    Ok(lowering.sets)
}

struct Lowering<'a> {
    registry: &'a mut VariableRegistry,
    sets: FragmentSets,
    // (relation, casting edge) for every role player, in pattern order
    castings: Vec<(Variable, Variable)>,
}

impl Lowering<'_> {
    fn anonymous(&mut self) -> Result<Variable, PlanningError> {
        self.registry
            .create_anonymous_variable()
            .map_err(|source| PlanningError::PatternDefinition { typedb_source: source })
    }

    fn lower_constraint(&mut self, constraint: &Constraint, clause: Option<&str>) -> Result<(), PlanningError> {
        match constraint {
            Constraint::Isa(isa) => self.lower_isa(isa.isa_kind(), isa.thing(), isa.type_())?,
            Constraint::Sub(sub) => self.sets.push(EquivalentFragmentSet::sub(sub.subtype(), sub.supertype())),
            Constraint::Label(label) => {
                self.sets.push(EquivalentFragmentSet::single_label(label.type_(), label.type_label().clone()))
            }
            Constraint::Id(id) => self.sets.push(EquivalentFragmentSet::id(id.var(), id.id().clone())),
            Constraint::Value(value) => {
                self.sets.push(EquivalentFragmentSet::value(value.attribute(), value.predicate().clone()))
            }
            Constraint::Neq(neq) => self.sets.push(EquivalentFragmentSet::neq(neq.lhs(), neq.rhs())),
            Constraint::Links(links) => self.lower_links(links)?,
            Constraint::Has(has) => self.lower_has(has)?,
            Constraint::Abstract(abstract_) => self.sets.push(EquivalentFragmentSet::abstract_(abstract_.type_())),
            Constraint::DataType(data_type) => {
                self.sets.push(EquivalentFragmentSet::data_type(data_type.type_(), data_type.data_type()))
            }
            Constraint::Regex(regex) => self.sets.push(EquivalentFragmentSet::regex(regex.type_(), regex.pattern())),
            Constraint::When(_) | Constraint::Then(_) => {
                return Err(PlanningError::UnsupportedConstraint {
                    constraint: constraint.to_string(),
                    clause: clause.unwrap_or("<unknown>").to_owned(),
                });
            }
        }
        Ok(())
    }

    fn lower_isa(&mut self, kind: IsaKind, thing: Variable, type_: Variable) -> Result<(), PlanningError> {
        match kind {
            IsaKind::Exact => self.sets.push(EquivalentFragmentSet::isa(thing, type_)),
            IsaKind::Subtype => {
                let direct_type = self.anonymous()?;
                self.sets.push(EquivalentFragmentSet::isa(thing, direct_type));
                self.sets.push(EquivalentFragmentSet::sub(direct_type, type_));
            }
        }
        Ok(())
    }

    fn lower_links(&mut self, links: &Links) -> Result<(), PlanningError> {
        let edge = self.anonymous()?;
        self.sets.push(EquivalentFragmentSet::casting(links.relation(), edge, links.player()));
        if let Some(role) = links.role() {
            self.sets.push(EquivalentFragmentSet::isa_castings(edge, role));
        }
        self.castings.push((links.relation(), edge));
        Ok(())
    }

    /// `$x has A $a` is the implicit binary relation `@has-A` between the owner and the attribute,
    /// plus `$a isa A`.
    fn lower_has(&mut self, has: &Has) -> Result<(), PlanningError> {
        let attribute_type = has.attribute_type();
        let relation = self.anonymous()?;
        let relation_type = self.anonymous()?;
        let owner_edge = self.add_labelled_casting(relation, has.owner(), TypeLabel::has_owner_role(attribute_type))?;
        let value_edge =
            self.add_labelled_casting(relation, has.attribute(), TypeLabel::has_value_role(attribute_type))?;
        self.sets.push(EquivalentFragmentSet::isa(relation, relation_type));
        self.sets.push(EquivalentFragmentSet::single_label(relation_type, TypeLabel::has_relation(attribute_type)));
        self.sets.push(EquivalentFragmentSet::neq(owner_edge, value_edge));

        let attribute_type_var = self.anonymous()?;
        self.lower_isa(IsaKind::Subtype, has.attribute(), attribute_type_var)?;
        self.sets.push(EquivalentFragmentSet::single_label(attribute_type_var, attribute_type.clone()));
        Ok(())
    }

    fn add_labelled_casting(
        &mut self,
        relation: Variable,
        player: Variable,
        role_label: TypeLabel,
    ) -> Result<Variable, PlanningError> {
        let edge = self.anonymous()?;
        let role = self.anonymous()?;
        self.sets.push(EquivalentFragmentSet::casting(relation, edge, player));
        self.sets.push(EquivalentFragmentSet::isa_castings(edge, role));
        self.sets.push(EquivalentFragmentSet::single_label(role, role_label));
        Ok(edge)
    }

    /// Two role players of one relation are distinct castings, even when they are the same player.
    fn add_distinct_castings(&mut self) {
        let by_relation = self.castings.iter().into_group_map_by(|(relation, _)| *relation);
        let relations = self.castings.iter().map(|(relation, _)| *relation).unique().collect_vec();
        for relation in relations {
            for ((_, first), (_, second)) in by_relation[&relation].iter().tuple_combinations() {
                self.sets.push(EquivalentFragmentSet::neq(*first, *second));
            }
        }
    }
}
