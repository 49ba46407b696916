/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/*
Optimisation pass to collapse a binary relation traversal into a single hop between its role players:

Given:
$r role-player $e1 $x (role filter: $role1)
$r role-player $e2 $y (role filter: $role2)
$e1 is-not $e2

Where $r, $e1, $e2 and any resolved type and role variables are anonymous and not used elsewhere
Then we can collapse these into:

$x shortcut $y (role labels: role1, role2, relation type label)
 */

use concept::{error::SchemaReadError, label::Label as TypeLabel, schema::SchemaOracle};
use ir::variable::Variable;
use itertools::Itertools;

use crate::{
    fragment::RolePlayer,
    fragment_set::{EquivalentFragmentSet, FragmentSets},
};

enum Resolution {
    Absent,
    Resolved(TypeLabel),
    Unresolvable,
}

/// Precondition:
///   1) $r role-player $e1 $x
///   2) $r role-player $e2 $y
///   3) $e1 is-not $e2
/// where these are the only role players of $r, neither $x nor $y is $r itself, and each role and the relation type is either fully resolvable
/// to one existing label or not constrained at all
///
/// Then
///   replace 1), 2), 3) and the sets used for resolution with
///   4) $x shortcut $y
pub fn shortcut_edge_fusion(sets: &mut FragmentSets, schema: &impl SchemaOracle) -> Result<bool, SchemaReadError> {
    match find_fusion(sets, schema)? {
        Some((matched, replacement)) => {
            sets.replace(&matched, replacement);
            Ok(true)
        }
        None => Ok(false),
    }
}

fn find_fusion(
    sets: &FragmentSets,
    schema: &impl SchemaOracle,
) -> Result<Option<(Vec<usize>, EquivalentFragmentSet)>, SchemaReadError> {
    let relations = sets.iter().filter_map(|set| set.as_role_player()).map(RolePlayer::relation).unique().collect_vec();
    for relation in relations {
        if relation.is_named() {
            continue;
        }
        let role_players = sets
            .sets_referencing(relation)
            .iter()
            .filter_map(|&index| {
                let role_player = sets.get(index)?.as_role_player()?;
                (role_player.relation() == relation).then_some((index, role_player))
            })
            .collect_vec();
        let [(first_index, first), (second_index, second)] = role_players[..] else {
            continue;
        };
        // a relation playing in itself must stay bound to its own instance
        if first.player() == relation || second.player() == relation {
            continue;
        }
        let (first_edge, second_edge) = (first.edge(), second.edge());
        if first_edge == second_edge || first_edge.is_named() || second_edge.is_named() {
            continue;
        }
        let Some(neq_index) = find_distinct_castings(sets, first_edge, second_edge) else {
            continue;
        };
        if !sets.referenced_only_by(first_edge, &[first_index, neq_index])
            || !sets.referenced_only_by(second_edge, &[second_index, neq_index])
        {
            continue;
        }

        let mut matched = vec![first_index, second_index, neq_index];
        let relation_type = match resolve_relation_type(sets, relation, schema, &mut matched)? {
            Resolution::Absent if first.relation_type_labels().is_some() || second.relation_type_labels().is_some() => {
                continue
            }
            Resolution::Absent => None,
            Resolution::Resolved(label) => Some(label),
            Resolution::Unresolvable => continue,
        };
        let first_role = match resolve_role(sets, first_index, first, schema, &mut matched)? {
            Resolution::Absent => None,
            Resolution::Resolved(label) => Some(label),
            Resolution::Unresolvable => continue,
        };
        let second_role = match resolve_role(sets, second_index, second, schema, &mut matched)? {
            Resolution::Absent => None,
            Resolution::Resolved(label) => Some(label),
            Resolution::Unresolvable => continue,
        };
        if !sets.referenced_only_by(relation, &matched) {
            continue;
        }

        let replacement =
            EquivalentFragmentSet::shortcut_edge(first_role, first.player(), second_role, second.player(), relation_type);
        return Ok(Some((matched, replacement)));
    }
    Ok(None)
}

fn find_distinct_castings(sets: &FragmentSets, first_edge: Variable, second_edge: Variable) -> Option<usize> {
    sets.sets_referencing(first_edge).iter().copied().find(|&index| {
        sets.get(index).and_then(|set| set.as_neq()).is_some_and(|neq| {
            (neq.var() == first_edge && neq.other() == second_edge)
                || (neq.var() == second_edge && neq.other() == first_edge)
        })
    })
}

/// The relation type may only come from a single `$r isa $t; $t label L` pair with L a relation type that has no
/// subtypes, since the isa edge points at the direct type.
fn resolve_relation_type(
    sets: &FragmentSets,
    relation: Variable,
    schema: &impl SchemaOracle,
    matched: &mut Vec<usize>,
) -> Result<Resolution, SchemaReadError> {
    let isas = sets
        .sets_referencing(relation)
        .iter()
        .filter_map(|&index| {
            let isa = sets.get(index)?.as_isa()?;
            (isa.thing() == relation).then_some((index, isa.type_()))
        })
        .collect_vec();
    let (isa_index, type_) = match isas[..] {
        [] => return Ok(Resolution::Absent),
        [isa] => isa,
        _ => return Ok(Resolution::Unresolvable),
    };
    if type_.is_named() {
        return Ok(Resolution::Unresolvable);
    }
    let Some((label_index, label)) = sets.find_label(type_) else {
        return Ok(Resolution::Unresolvable);
    };
    let Some(label) = label.single_label() else {
        return Ok(Resolution::Unresolvable);
    };
    if !sets.referenced_only_by(type_, &[isa_index, label_index])
        || schema.resolve_relation_type(label)?.is_none()
        || schema.direct_subtypes_exist(label)?
    {
        return Ok(Resolution::Unresolvable);
    }
    matched.extend([isa_index, label_index]);
    Ok(Resolution::Resolved(label.clone()))
}

/// A role comes either from a role variable with a label, or from a single role label already on the fragment.
/// The meta role is no restriction at all.
fn resolve_role(
    sets: &FragmentSets,
    role_player_index: usize,
    role_player: &RolePlayer,
    schema: &impl SchemaOracle,
    matched: &mut Vec<usize>,
) -> Result<Resolution, SchemaReadError> {
    match (role_player.role(), role_player.role_labels()) {
        (None, None) => Ok(Resolution::Absent),
        (None, Some(role_labels)) => match role_labels.iter().exactly_one() {
            Ok(label) => Ok(Resolution::Resolved(label.clone())),
            Err(_) => Ok(Resolution::Unresolvable),
        },
        (Some(_), Some(_)) => Ok(Resolution::Unresolvable),
        (Some(role), None) => {
            if role.is_named() {
                return Ok(Resolution::Unresolvable);
            }
            let Some((label_index, label)) = sets.find_label(role) else {
                return Ok(Resolution::Unresolvable);
            };
            let Some(label) = label.single_label() else {
                return Ok(Resolution::Unresolvable);
            };
            if !sets.referenced_only_by(role, &[role_player_index, label_index]) {
                return Ok(Resolution::Unresolvable);
            }
            if label.is_meta_role() {
                matched.push(label_index);
                return Ok(Resolution::Absent);
            }
            if schema.resolve_role(label)?.is_none() {
                return Ok(Resolution::Unresolvable);
            }
            matched.push(label_index);
            Ok(Resolution::Resolved(label.clone()))
        }
    }
}
