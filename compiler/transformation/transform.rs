/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use concept::{error::SchemaReadError, schema::SchemaOracle};
use tracing::{event, Level};

use crate::{
    error::PlanningError,
    fragment_set::FragmentSets,
    transformation::{
        label::{redundant_label_elimination, sub_label_expansion},
        resource_index::resource_index_fusion,
        role_player::{relation_type_label_specialisation, role_label_specialisation, role_player_fusion},
        shortcut_edge::shortcut_edge_fusion,
    },
};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Transformation {
    RolePlayerFusion,
    ShortcutEdgeFusion,
    ResourceIndexFusion,
    SubLabelExpansion,
    RoleLabelSpecialisation,
    RelationTypeLabelSpecialisation,
    RedundantLabelElimination,
}

/// Rules in the order each pass tries them.
pub const CATALOG: [Transformation; 7] = [
    Transformation::RolePlayerFusion,
    Transformation::ShortcutEdgeFusion,
    Transformation::ResourceIndexFusion,
    Transformation::SubLabelExpansion,
    Transformation::RoleLabelSpecialisation,
    Transformation::RelationTypeLabelSpecialisation,
    Transformation::RedundantLabelElimination,
];

impl Transformation {
    pub fn name(&self) -> &'static str {
        match self {
            Transformation::RolePlayerFusion => "role-player fusion",
            Transformation::ShortcutEdgeFusion => "shortcut edge fusion",
            Transformation::ResourceIndexFusion => "resource index fusion",
            Transformation::SubLabelExpansion => "sub label expansion",
            Transformation::RoleLabelSpecialisation => "role label specialisation",
            Transformation::RelationTypeLabelSpecialisation => "relation type label specialisation",
            Transformation::RedundantLabelElimination => "redundant label elimination",
        }
    }

    /// Tries the rule once. Returns whether the bag was changed.
    pub fn apply(&self, sets: &mut FragmentSets, schema: &impl SchemaOracle) -> Result<bool, SchemaReadError> {
        match self {
            Transformation::RolePlayerFusion => role_player_fusion(sets, schema),
            Transformation::ShortcutEdgeFusion => shortcut_edge_fusion(sets, schema),
            Transformation::ResourceIndexFusion => resource_index_fusion(sets, schema),
            Transformation::SubLabelExpansion => sub_label_expansion(sets, schema),
            Transformation::RoleLabelSpecialisation => role_label_specialisation(sets, schema),
            Transformation::RelationTypeLabelSpecialisation => relation_type_label_specialisation(sets, schema),
            Transformation::RedundantLabelElimination => redundant_label_elimination(sets, schema),
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rewrites the bag until no rule in the catalog fires. After every firing the pass restarts from the first rule.
/// Returns the number of firings.
pub fn apply_transformations(sets: &mut FragmentSets, schema: &impl SchemaOracle) -> Result<usize, PlanningError> {
    let mut firings = 0;
    'fixpoint: loop {
        for transformation in CATALOG {
            let fired = transformation
                .apply(sets, schema)
                .map_err(|source| PlanningError::SchemaRead { typedb_source: source })?;
            if fired {
                firings += 1;
                event!(Level::TRACE, rule = transformation.name(), sets = sets.len(), "applied transformation");
                continue 'fixpoint;
            }
        }
        break;
    }
    event!(Level::DEBUG, firings, sets = sets.len(), "transformations reached fixpoint");
    Ok(firings)
}
