/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use resource::constants::planner::{
    CASTINGS_PER_ROLE, CASTING_HOP_PENALTY, CHECK_COST, DEFAULT_APPLY_TRANSFORMATIONS, EDGE_CHECK_COST,
    FULL_SCAN_COST, INDEXED_LOOKUP_COST, INSTANCES_PER_TYPE, LABEL_FILTER_SELECTIVITY, RELATIONS_PER_PLAYER,
    ROLE_PLAYERS_PER_RELATION, SUBTYPES_PER_TYPE, SUPERTYPES_PER_TYPE,
};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    /// Run the rewrite catalog to fixpoint before ordering. Disabling it plans the lowered fragment sets as-is.
    pub apply_transformations: bool,
    pub cost_model: CostModel,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self { apply_transformations: DEFAULT_APPLY_TRANSFORMATIONS, cost_model: CostModel::default() }
    }
}

/// Coefficients of the fragment cost function. These are tuning knobs, not a contract:
/// only the relative order between kinds of step is relied upon.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CostModel {
    pub indexed_lookup: f64,
    pub full_scan: f64,
    pub check: f64,
    pub edge_check: f64,
    pub instances_per_type: f64,
    pub subtypes_per_type: f64,
    pub supertypes_per_type: f64,
    pub role_players_per_relation: f64,
    pub relations_per_player: f64,
    pub castings_per_role: f64,
    pub casting_hop_penalty: f64,
    pub label_filter_selectivity: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            indexed_lookup: INDEXED_LOOKUP_COST,
            full_scan: FULL_SCAN_COST,
            check: CHECK_COST,
            edge_check: EDGE_CHECK_COST,
            instances_per_type: INSTANCES_PER_TYPE,
            subtypes_per_type: SUBTYPES_PER_TYPE,
            supertypes_per_type: SUPERTYPES_PER_TYPE,
            role_players_per_relation: ROLE_PLAYERS_PER_RELATION,
            relations_per_player: RELATIONS_PER_PLAYER,
            castings_per_role: CASTINGS_PER_ROLE,
            casting_hop_penalty: CASTING_HOP_PENALTY,
            label_filter_selectivity: LABEL_FILTER_SELECTIVITY,
        }
    }
}
