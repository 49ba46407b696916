/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashSet;

use ir::variable::Variable;
use options::CostModel;

use crate::fragment::{Direction, Fragment};

/// Estimated cost of running `fragment` next, given the variables bound by the steps already placed.
pub fn fragment_cost(fragment: &Fragment, bound: &HashSet<Variable>, model: &CostModel) -> f64 {
    let base = if !bound.contains(&fragment.start()) {
        start_cost(fragment, model)
    } else {
        match fragment.end() {
            None => model.check,
            Some(end) if bound.contains(&end) => model.edge_check,
            Some(_) => fan_out(fragment, model),
        }
    };
    base * model.label_filter_selectivity.powi(fragment.label_filter_count() as i32)
}

fn start_cost(fragment: &Fragment, model: &CostModel) -> f64 {
    match fragment {
        Fragment::Label(label) => model.indexed_lookup * label.labels().len().max(1) as f64,
        Fragment::Id(_) | Fragment::ResourceIndex(_) => model.indexed_lookup,
        _ => model.full_scan,
    }
}

fn fan_out(fragment: &Fragment, model: &CostModel) -> f64 {
    let canonical = fragment.direction() == Some(Direction::Canonical);
    match fragment {
        Fragment::Isa(_) => {
            if canonical {
                1.0
            } else {
                model.instances_per_type
            }
        }
        Fragment::Sub(_) => {
            if canonical {
                model.supertypes_per_type
            } else {
                model.subtypes_per_type
            }
        }
        Fragment::RolePlayer(_) => role_player_fan_out(canonical, model),
        Fragment::Casting(_) => role_player_fan_out(canonical, model) * model.casting_hop_penalty,
        Fragment::IsaCastings(_) => {
            if canonical {
                1.0
            } else {
                model.castings_per_role
            }
        }
        Fragment::ShortcutEdge(_) => model.relations_per_player,
        Fragment::Label(_)
        | Fragment::Id(_)
        | Fragment::Value(_)
        | Fragment::Neq(_)
        | Fragment::Abstract(_)
        | Fragment::DataType(_)
        | Fragment::Regex(_)
        | Fragment::ResourceIndex(_) => model.check,
    }
}

fn role_player_fan_out(canonical: bool, model: &CostModel) -> f64 {
    if canonical {
        model.role_players_per_relation
    } else {
        model.relations_per_player
    }
}
