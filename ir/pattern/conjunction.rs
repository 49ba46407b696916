/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::HashSet, fmt, sync::Arc};

use concept::label::{ConceptId, Label as TypeLabel};

use crate::{
    pattern::{
        constraint::{
            Abstract, Constraint, DataType, Has, Id, Isa, IsaKind, Label, Links, Neq, Regex, RuleBody, Sub, Value,
        },
        value::{Comparator, DataType as ValueDataType, Operand, ValuePredicate},
    },
    variable::{Variable, VariableRegistry},
    PatternDefinitionError,
};

/// A conjunction of constraints, each remembering the clause of the query it was written in.
#[derive(Debug, Clone, Default)]
pub struct Conjunction {
    constraints: Vec<Constraint>,
    clauses: Vec<Option<Arc<str>>>,
}

impl Conjunction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn clause_of(&self, index: usize) -> Option<&str> {
        self.clauses.get(index).and_then(|clause| clause.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Constraint, Option<&str>)> + '_ {
        self.constraints.iter().zip(self.clauses.iter().map(|clause| clause.as_deref()))
    }

    /// Every variable mentioned, in order of first appearance.
    pub fn variables(&self) -> Vec<Variable> {
        let mut seen = HashSet::new();
        self.constraints.iter().flat_map(|constraint| constraint.ids()).filter(|var| seen.insert(*var)).collect()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    fn add_constraint(&mut self, constraint: Constraint, clause: Option<Arc<str>>) -> &Constraint {
        self.constraints.push(constraint);
        self.clauses.push(clause);
        &self.constraints[self.constraints.len() - 1]
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for constraint in &self.constraints {
            let indent = " ".repeat(f.width().unwrap_or(0));
            writeln!(f, "{}{};", indent, constraint)?
        }
        Ok(())
    }
}

pub struct ConjunctionBuilder<'reg> {
    registry: &'reg mut VariableRegistry,
    conjunction: Conjunction,
    clause: Option<Arc<str>>,
}

impl<'reg> ConjunctionBuilder<'reg> {
    pub fn new(registry: &'reg mut VariableRegistry) -> Self {
        Self { registry, conjunction: Conjunction::new(), clause: None }
    }

    /// Tags constraints added from now on with the query text they came from.
    pub fn set_clause(&mut self, clause: &str) -> &mut Self {
        self.clause = Some(Arc::from(clause));
        self
    }

    pub fn get_or_declare_variable(&mut self, name: &str) -> Result<Variable, PatternDefinitionError> {
        self.registry.get_or_declare_variable(name)
    }

    pub fn create_anonymous_variable(&mut self) -> Result<Variable, PatternDefinitionError> {
        self.registry.create_anonymous_variable()
    }

    pub fn add_constraint(&mut self, constraint: impl Into<Constraint>) -> &Constraint {
        self.conjunction.add_constraint(constraint.into(), self.clause.clone())
    }

    pub fn add_isa(&mut self, kind: IsaKind, thing: Variable, type_: Variable) -> &Constraint {
        self.add_constraint(Isa::new(kind, thing, type_))
    }

    pub fn add_sub(&mut self, subtype: Variable, supertype: Variable) -> &Constraint {
        self.add_constraint(Sub::new(subtype, supertype))
    }

    pub fn add_label(&mut self, type_: Variable, label: &str) -> Result<&Constraint, PatternDefinitionError> {
        if label.is_empty() {
            return Err(PatternDefinitionError::EmptyLabel { variable: type_.to_string() });
        }
        Ok(self.add_constraint(Label::new(type_, TypeLabel::new(label))))
    }

    /// Shorthand for `thing isa $t; $t label <label>` through a fresh anonymous type variable.
    pub fn add_isa_label(
        &mut self,
        kind: IsaKind,
        thing: Variable,
        label: &str,
    ) -> Result<Variable, PatternDefinitionError> {
        let type_ = self.create_anonymous_variable()?;
        self.add_isa(kind, thing, type_);
        self.add_label(type_, label)?;
        Ok(type_)
    }

    pub fn add_id(&mut self, var: Variable, id: &str) -> &Constraint {
        self.add_constraint(Id::new(var, ConceptId::new(id)))
    }

    pub fn add_value(&mut self, attribute: Variable, comparator: Comparator, operand: Operand) -> &Constraint {
        self.add_constraint(Value::new(attribute, ValuePredicate::new(comparator, operand)))
    }

    pub fn add_neq(&mut self, lhs: Variable, rhs: Variable) -> &Constraint {
        self.add_constraint(Neq::new(lhs, rhs))
    }

    pub fn add_links(&mut self, relation: Variable, player: Variable, role: Option<Variable>) -> &Constraint {
        self.add_constraint(Links::new(relation, player, role))
    }

    /// Shorthand for a role player whose role is given by label, through a fresh anonymous role variable.
    pub fn add_links_role_label(
        &mut self,
        relation: Variable,
        player: Variable,
        role_label: &str,
    ) -> Result<Variable, PatternDefinitionError> {
        let role = self.create_anonymous_variable()?;
        self.add_links(relation, player, Some(role));
        self.add_label(role, role_label)?;
        Ok(role)
    }

    pub fn add_has(
        &mut self,
        owner: Variable,
        attribute: Variable,
        attribute_type: &str,
    ) -> Result<&Constraint, PatternDefinitionError> {
        if attribute_type.is_empty() {
            return Err(PatternDefinitionError::EmptyLabel { variable: attribute.to_string() });
        }
        Ok(self.add_constraint(Has::new(owner, attribute, TypeLabel::new(attribute_type))))
    }

    pub fn add_abstract(&mut self, type_: Variable) -> &Constraint {
        self.add_constraint(Abstract::new(type_))
    }

    pub fn add_data_type(&mut self, type_: Variable, data_type: ValueDataType) -> &Constraint {
        self.add_constraint(DataType::new(type_, data_type))
    }

    pub fn add_regex(&mut self, type_: Variable, pattern: &str) -> &Constraint {
        self.add_constraint(Regex::new(type_, pattern.to_owned()))
    }

    pub fn add_rule_when(&mut self, body: &str) -> &Constraint {
        self.add_constraint(Constraint::When(RuleBody::new(body.to_owned())))
    }

    pub fn add_rule_then(&mut self, body: &str) -> &Constraint {
        self.add_constraint(Constraint::Then(RuleBody::new(body.to_owned())))
    }

    pub fn finish(self) -> Conjunction {
        self.conjunction
    }
}
