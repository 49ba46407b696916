/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![deny(unused_must_use)]
#![deny(elided_lifetimes_in_paths)]

use error::typedb_error;

pub mod pattern;
pub mod variable;

typedb_error!(
    pub PatternDefinitionError(component = "Pattern definition", prefix = "PAT") {
        VariableIdLimitExceeded(1, "A pattern may declare at most {limit} variables.", limit: u16),
        EmptyLabel(2, "The type label given to variable '{variable}' is empty.", variable: String),
        EmptyVariableName(3, "Named variables must have a non-empty name."),
    }
);
