/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![deny(unused_must_use)]
#![deny(elided_lifetimes_in_paths)]
#![allow(clippy::result_large_err)]

use concept::schema::{SchemaOracle, SchemaSnapshot};
use ir::{pattern::conjunction::Conjunction, variable::VariableRegistry};
use options::PlannerOptions;
use tracing::{event, Level};

use crate::{error::PlanningError, planner::PlanBuilder, planner::QueryPlan};

pub mod error;
pub mod fragment;
pub mod fragment_set;
pub mod lowering;
pub mod planner;
pub mod transformation;

macro_rules! filter_variants {
    ($variant:path : $iterable:expr) => {
        $iterable.iter().filter_map(|item| if let $variant(inner) = item { Some(inner) } else { None })
    };
}
pub(crate) use filter_variants;

pub use lowering::lower_conjunction;

/// Compiles a conjunction into an ordered plan: lowering, rewriting to fixpoint, then cost-based ordering.
/// All schema reads of one call go through a single memoised snapshot.
pub fn plan(
    conjunction: &Conjunction,
    registry: &mut VariableRegistry,
    schema: &impl SchemaOracle,
    options: &PlannerOptions,
) -> Result<QueryPlan, PlanningError> {
    let mut sets = lower_conjunction(conjunction, registry)?;
    if options.apply_transformations {
        let snapshot = SchemaSnapshot::new(schema);
        transformation::apply_transformations(&mut sets, &snapshot)?;
    } else {
        event!(Level::DEBUG, "transformations disabled, planning lowered fragment sets");
    }
    PlanBuilder::new(sets, options.cost_model).build()
}
