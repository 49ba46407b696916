/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{collections::HashSet, fmt};

use ir::variable::Variable;
use options::CostModel;
use tracing::{event, Level};

use crate::{
    error::PlanningError,
    fragment::{Costed, Fragment},
    fragment_set::{EquivalentFragmentSet, FragmentSets},
};

/// Orders the fragment sets greedily: at each step, the cheapest variant whose inputs are bound is placed next.
/// Ties keep the earliest set and variant, so equal inputs always give equal plans.
pub struct PlanBuilder {
    sets: Vec<EquivalentFragmentSet>,
    cost_model: CostModel,
}

impl PlanBuilder {
    pub fn new(sets: FragmentSets, cost_model: CostModel) -> Self {
        Self { sets: sets.into_sets(), cost_model }
    }

    pub fn build(self) -> Result<QueryPlan, PlanningError> {
        let ordering = self.initialise_greedy()?;
        let plan = QueryPlan::new(ordering);
        event!(Level::DEBUG, steps = plan.len(), cost = plan.total_cost(), "built query plan:\n{}", plan);
        Ok(plan)
    }

    fn initialise_greedy(&self) -> Result<Vec<(Fragment, f64)>, PlanningError> {
        let mut open_set: Vec<usize> = (0..self.sets.len()).collect();
        let mut bound = HashSet::new();
        let mut ordering = Vec::with_capacity(self.sets.len());

        while !open_set.is_empty() {
            let mut next: Option<(usize, &Fragment, f64)> = None;
            for (position, &set_index) in open_set.iter().enumerate() {
                for fragment in self.sets[set_index].fragments() {
                    if !is_valid(fragment, &bound) {
                        continue;
                    }
                    let cost = fragment.cost(&bound, &self.cost_model);
                    if next.map_or(true, |(_, _, best_cost)| cost < best_cost) {
                        next = Some((position, fragment, cost));
                    }
                }
            }

            let Some((position, fragment, cost)) = next else {
                let stranded = self.stranded_variables(&open_set, &bound);
                event!(Level::DEBUG, ?stranded, "pattern is disconnected");
                return Err(PlanningError::DisconnectedPattern { stranded });
            };
            event!(Level::TRACE, fragment = %fragment, cost, "placed fragment");
            bound.extend(fragment.variables());
            ordering.push((fragment.clone(), cost));
            open_set.remove(position);
        }
        Ok(ordering)
    }

    fn stranded_variables(&self, open_set: &[usize], bound: &HashSet<Variable>) -> Vec<Variable> {
        let mut seen = HashSet::new();
        open_set
            .iter()
            .flat_map(|&set_index| self.sets[set_index].variables())
            .filter(|var| !bound.contains(var) && seen.insert(*var))
            .collect()
    }
}

fn is_valid(fragment: &Fragment, bound: &HashSet<Variable>) -> bool {
    let dependencies_bound = fragment.dependencies().map_or(true, |dependency| bound.contains(&dependency));
    dependencies_bound && (fragment.can_start() || bound.contains(&fragment.start()))
}

/// The ordered physical plan handed to the traversal engine.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    fragments: Vec<Fragment>,
    costs: Vec<f64>,
}

impl QueryPlan {
    fn new(ordering: Vec<(Fragment, f64)>) -> Self {
        let (fragments, costs) = ordering.into_iter().unzip();
        Self { fragments, costs }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    /// Estimated cost of each step at the point it was placed.
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    pub fn total_cost(&self) -> f64 {
        self.costs.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in &self.fragments {
            writeln!(f, "{}", fragment)?;
        }
        Ok(())
    }
}
