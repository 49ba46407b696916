/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use chrono::NaiveDate;
use error::TypeDBError;
use ir::{
    pattern::{
        conjunction::ConjunctionBuilder,
        constraint::{Constraint, IsaKind},
        value::{Comparator, Literal, Operand, ValuePredicate},
    },
    variable::{Variable, VariableRegistry},
    PatternDefinitionError,
};

#[test]
fn named_variables_are_reused_by_name() {
    let mut registry = VariableRegistry::new();
    let x = registry.get_or_declare_variable("x").unwrap();
    let anonymous = registry.create_anonymous_variable().unwrap();
    let x_again = registry.get_or_declare_variable("x").unwrap();
    assert_eq!(x, x_again);
    assert!(x.is_named());
    assert!(anonymous.is_anonymous());
    assert_ne!(x.id(), anonymous.id());
    assert_eq!(registry.name_of(x), Some("x"));
    assert_eq!(registry.name_of(anonymous), None);
    assert_eq!(registry.len(), 2);
}

#[test]
fn variables_display_with_anonymous_marker() {
    assert_eq!(Variable::new(3).to_string(), "$3");
    assert_eq!(Variable::new_anonymous(4).to_string(), "$_4");
}

#[test]
fn empty_names_and_labels_are_rejected() {
    let mut registry = VariableRegistry::new();
    let error = registry.get_or_declare_variable("").unwrap_err();
    assert!(matches!(error, PatternDefinitionError::EmptyVariableName { .. }));
    assert_eq!(error.code(), "PAT3");

    let mut builder = ConjunctionBuilder::new(&mut registry);
    let t = builder.get_or_declare_variable("t").unwrap();
    assert!(matches!(builder.add_label(t, ""), Err(PatternDefinitionError::EmptyLabel { .. })));
}

#[test]
fn builder_records_clauses_and_first_appearance_order() {
    let mut registry = VariableRegistry::new();
    let mut builder = ConjunctionBuilder::new(&mut registry);
    let x = builder.get_or_declare_variable("x").unwrap();
    let n = builder.get_or_declare_variable("n").unwrap();
    builder.set_clause("$x isa person");
    let person = builder.add_isa_label(IsaKind::Subtype, x, "person").unwrap();
    builder.set_clause("$x has name $n");
    builder.add_has(x, n, "name").unwrap();
    let conjunction = builder.finish();

    assert_eq!(conjunction.len(), 3);
    assert_eq!(conjunction.clause_of(0), Some("$x isa person"));
    assert_eq!(conjunction.clause_of(2), Some("$x has name $n"));
    assert_eq!(conjunction.variables(), vec![x, person, n]);
    assert!(matches!(conjunction.constraints()[1], Constraint::Label(_)));
    assert_eq!(conjunction.constraints()[1].to_string(), format!("{person} label person"));
}

#[test]
fn comparators_flip_except_string_matching() {
    assert_eq!(Comparator::Less.flip(), Some(Comparator::Greater));
    assert_eq!(Comparator::GreaterOrEqual.flip(), Some(Comparator::LessOrEqual));
    assert_eq!(Comparator::Equal.flip(), Some(Comparator::Equal));
    assert_eq!(Comparator::Contains.flip(), None);
    assert_eq!(Comparator::Like.flip(), None);
}

#[test]
fn only_literal_equality_pins_a_value() {
    let pinned = ValuePredicate::new(Comparator::Equal, Operand::Literal(Literal::from("Alice")));
    assert_eq!(pinned.equality_literal(), Some(&Literal::String("Alice".to_owned())));
    assert_eq!(pinned.to_string(), "== \"Alice\"");

    let ranged = ValuePredicate::new(Comparator::Greater, Operand::Literal(Literal::Long(3)));
    assert_eq!(ranged.equality_literal(), None);

    let other = Variable::new(7);
    let compared = ValuePredicate::new(Comparator::Equal, Operand::Variable(other));
    assert_eq!(compared.equality_literal(), None);
    assert_eq!(compared.inner_variable(), Some(other));
}

#[test]
fn datetime_literals_print_in_iso_form() {
    let date = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap().and_hms_opt(12, 30, 0).unwrap();
    assert_eq!(Literal::from(date).to_string(), "2020-01-31T12:30:00");
}

#[test]
fn value_constraints_mention_compared_variables() {
    let mut registry = VariableRegistry::new();
    let mut builder = ConjunctionBuilder::new(&mut registry);
    let a = builder.get_or_declare_variable("a").unwrap();
    let b = builder.get_or_declare_variable("b").unwrap();
    let r = builder.get_or_declare_variable("r").unwrap();
    builder.add_value(a, Comparator::Less, Operand::Variable(b));
    builder.add_links_role_label(r, a, "husband").unwrap();
    let conjunction = builder.finish();
    assert_eq!(conjunction.constraints()[0].ids().collect::<Vec<_>>(), vec![a, b]);
    let links = conjunction.constraints()[1].as_links().unwrap();
    assert_eq!(links.relation(), r);
    assert!(links.role().unwrap().is_anonymous());
}
