/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use concept::{error::SchemaReadError, schema::SchemaOracle};

use crate::fragment_set::{EquivalentFragmentSet, FragmentSets};

/// Precondition:
///   1) $a == <literal>
///   2) $a isa $t
///   3) $t label L
/// where $t is anonymous and only used by 2) and 3), and L exists with no direct subtypes
///
/// Then
///   replace 1), 2) and 3) with
///   4) $a index L <literal>
pub fn resource_index_fusion(sets: &mut FragmentSets, schema: &impl SchemaOracle) -> Result<bool, SchemaReadError> {
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
) -> Result<Option<([usize; 3], EquivalentFragmentSet)>, SchemaReadError> {
    for (value_index, set) in sets.iter().enumerate() {
        let Some(value) = set.as_value() else {
            continue;
        };
        let Some(literal) = value.predicate().equality_literal() else {
            continue;
        };
        let attribute = value.var();
        for &isa_index in sets.sets_referencing(attribute) {
            let Some(isa) = sets.get(isa_index).and_then(|set| set.as_isa()).filter(|isa| isa.thing() == attribute)
            else {
                continue;
            };
            let type_ = isa.type_();
            if type_.is_named() {
                continue;
            }
            let Some((label_index, label)) = sets.find_label(type_) else {
                continue;
            };
            let Some(label) = label.single_label() else {
                continue;
            };
            if !sets.referenced_only_by(type_, &[isa_index, label_index]) {
                continue;
            }
            if !schema.exists(label)? || schema.direct_subtypes_exist(label)? {
                continue;
            }
            let replacement = EquivalentFragmentSet::resource_index(attribute, label.clone(), literal.clone());
            return Ok(Some(([value_index, isa_index, label_index], replacement)));
        }
    }
    Ok(None)
}
