/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod schema {
    pub const META_THING_LABEL: &str = "thing";
    pub const META_ENTITY_LABEL: &str = "entity";
    pub const META_RELATION_LABEL: &str = "relation";
    pub const META_ATTRIBUTE_LABEL: &str = "attribute";
    pub const META_ROLE_LABEL: &str = "role";

    // implicit relation backing `has`: `@has-<attribute>` relating `@has-<attribute>-owner` and `-value`
    pub const IMPLICIT_LABEL_PREFIX: &str = "@";
    pub const HAS_RELATION_PREFIX: &str = "@has-";
    pub const HAS_OWNER_ROLE_SUFFIX: &str = "-owner";
    pub const HAS_VALUE_ROLE_SUFFIX: &str = "-value";
}

pub mod ir {
    pub const VARIABLE_ID_LIMIT: u16 = u16::MAX;
}

pub mod planner {
    pub const DEFAULT_APPLY_TRANSFORMATIONS: bool = true;

    // Relative costs, in units of "one edge advanced"
    pub const INDEXED_LOOKUP_COST: f64 = 1.0;
    pub const FULL_SCAN_COST: f64 = 100_000.0;
    pub const CHECK_COST: f64 = 0.1;
    pub const EDGE_CHECK_COST: f64 = 0.5;

    // Expected fan-out per edge kind and direction
    pub const INSTANCES_PER_TYPE: f64 = 1_000.0;
    pub const SUBTYPES_PER_TYPE: f64 = 4.0;
    pub const SUPERTYPES_PER_TYPE: f64 = 2.0;
    pub const ROLE_PLAYERS_PER_RELATION: f64 = 2.0;
    pub const RELATIONS_PER_PLAYER: f64 = 10.0;
    pub const CASTINGS_PER_ROLE: f64 = 1_000.0;
    pub const CASTING_HOP_PENALTY: f64 = 2.0;

    // Applied once per label filter carried by a role-player style edge
    pub const LABEL_FILTER_SELECTIVITY: f64 = 0.5;
}
