/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use concept::{error::SchemaReadError, label::LabelSet, schema::SchemaOracle};

use crate::fragment_set::{EquivalentFragmentSet, FragmentSets};

/// Precondition:
///   1) $t label L
/// where $t is anonymous, appears in no other set, every label in L exists, and 1) is not the last set
///
/// Then
///   remove 1)
pub fn redundant_label_elimination(
    sets: &mut FragmentSets,
    schema: &impl SchemaOracle,
) -> Result<bool, SchemaReadError> {
    if sets.len() <= 1 {
        return Ok(false);
    }
    for index in 0..sets.len() {
        let Some(label) = sets.get(index).and_then(|set| set.as_label()) else {
            continue;
        };
        let var = label.var();
        if var.is_named() || !sets.referenced_only_by(var, &[index]) {
            continue;
        }
        if all_exist(label.labels(), schema)? {
            sets.remove(&[index]);
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn all_exist(labels: &LabelSet, schema: &impl SchemaOracle) -> Result<bool, SchemaReadError> {
    for label in labels {
        if !schema.exists(label)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Precondition:
///   1) $s sub $t
///   2) $t label L
/// where L is a single existing label with no subtypes
///
/// Then
///   replace 1) with
///   3) $s label L
/// and keep 2), which may still be referenced elsewhere
pub fn sub_label_expansion(sets: &mut FragmentSets, schema: &impl SchemaOracle) -> Result<bool, SchemaReadError> {
    for index in 0..sets.len() {
        let Some(sub) = sets.get(index).and_then(|set| set.as_sub()) else {
            continue;
        };
        let Some(label) = sets.find_label(sub.supertype()).and_then(|(_, label)| label.single_label()) else {
            continue;
        };
        let expanded = schema.subtype_closure(label)?;
        if expanded.len() != 1 || !expanded.contains(label) {
            continue;
        }
        let subtype = sub.subtype();
        let already_labelled = sets.find_label(subtype).is_some_and(|(_, existing)| existing.labels() == &expanded);
        if already_labelled {
            sets.remove(&[index]);
        } else {
            sets.replace(&[index], EquivalentFragmentSet::label(subtype, expanded));
        }
        return Ok(true);
    }
    Ok(false)
}
