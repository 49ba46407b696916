/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use concept::{error::SchemaReadError, label::LabelSet, schema::SchemaOracle};
use ir::variable::Variable;

use crate::fragment_set::{EquivalentFragmentSet, FragmentSets};

/// Precondition:
///   1) $r casting $e $p
///   2) $e isa-castings $role (optional, first one found)
///
/// Then
///   replace 1) and 2) with
///   3) $r role-player $e $p (role: $role)
pub fn role_player_fusion(sets: &mut FragmentSets, _schema: &impl SchemaOracle) -> Result<bool, SchemaReadError> {
    for index in 0..sets.len() {
        let Some(casting) = sets.get(index).and_then(|set| set.as_casting()) else {
            continue;
        };
        let (relation, edge, player) = (casting.relation(), casting.edge(), casting.player());
        let role = sets.sets_referencing(edge).iter().find_map(|&other| {
            sets.get(other)
                .and_then(|set| set.as_isa_castings())
                .filter(|isa_castings| isa_castings.edge() == edge)
                .map(|isa_castings| (other, isa_castings.role()))
        });
        let replacement =
            EquivalentFragmentSet::role_player(relation, edge, player, role.map(|(_, role)| role), None, None);
        match role {
            Some((isa_castings_index, _)) => sets.replace(&[index, isa_castings_index], replacement),
            None => sets.replace(&[index], replacement),
        }
        return Ok(true);
    }
    Ok(false)
}

/// Precondition:
///   1) $r role-player $e $p (role: $role)
///   2) $role label L
/// where L is the meta role, or a single role in the schema
///
/// Then
///   replace 1) with
///   3) $r role-player $e $p (roles: sub-roles of L), or with no role filter for the meta role
/// and keep 2)
pub fn role_label_specialisation(
    sets: &mut FragmentSets,
    schema: &impl SchemaOracle,
) -> Result<bool, SchemaReadError> {
    for index in 0..sets.len() {
        let Some(role_player) = sets.get(index).and_then(|set| set.as_role_player()) else {
            continue;
        };
        let Some(role) = role_player.role() else {
            continue;
        };
        let Some(label) = sets.find_label(role).and_then(|(_, label)| label.single_label()) else {
            continue;
        };
        let role_labels = if label.is_meta_role() {
            None
        } else {
            match schema.resolve_role(label)? {
                Some(role_meta) => Some(role_meta.sub_role_closure().clone()),
                None => continue,
            }
        };
        let replacement = EquivalentFragmentSet::role_player(
            role_player.relation(),
            role_player.edge(),
            role_player.player(),
            None,
            role_labels,
            role_player.relation_type_labels().cloned(),
        );
        sets.replace(&[index], replacement);
        return Ok(true);
    }
    Ok(false)
}

/// Precondition:
///   1) $r role-player $e $p, with no relation type filter yet
///   2) $r isa $t
///   3) $t label L
/// where L is a single relation type in the schema
///
/// Then
///   replace 1) with
///   4) $r role-player $e $p (relation types: subtypes of L)
/// and keep 2) and 3)
pub fn relation_type_label_specialisation(
    sets: &mut FragmentSets,
    schema: &impl SchemaOracle,
) -> Result<bool, SchemaReadError> {
    for index in 0..sets.len() {
        let Some(role_player) = sets.get(index).and_then(|set| set.as_role_player()) else {
            continue;
        };
        if role_player.relation_type_labels().is_some() {
            continue;
        }
        let Some(relation_types) = relation_type_closure(sets, role_player.relation(), schema)? else {
            continue;
        };
        let replacement = EquivalentFragmentSet::role_player(
            role_player.relation(),
            role_player.edge(),
            role_player.player(),
            role_player.role(),
            role_player.role_labels().cloned(),
            Some(relation_types),
        );
        sets.replace(&[index], replacement);
        return Ok(true);
    }
    Ok(false)
}

fn relation_type_closure(
    sets: &FragmentSets,
    relation: Variable,
    schema: &impl SchemaOracle,
) -> Result<Option<LabelSet>, SchemaReadError> {
    for &index in sets.sets_referencing(relation) {
        let Some(isa) = sets.get(index).and_then(|set| set.as_isa()).filter(|isa| isa.thing() == relation) else {
            continue;
        };
        let Some(label) = sets.find_label(isa.type_()).and_then(|(_, label)| label.single_label()) else {
            continue;
        };
        if let Some(relation_type) = schema.resolve_relation_type(label)? {
            return Ok(Some(relation_type.subtype_closure().clone()));
        }
    }
    Ok(None)
}
