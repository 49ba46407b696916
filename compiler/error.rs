/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use concept::error::SchemaReadError;
use error::typedb_error;
use ir::{variable::Variable, PatternDefinitionError};

typedb_error!(
    pub PlanningError(component = "Query planning", prefix = "QPL") {
        UnsupportedConstraint(
            1,
            "The constraint '{constraint}' in clause '{clause}' cannot be lowered into traversal fragments.",
            constraint: String,
            clause: String
        ),
        DisconnectedPattern(
            2,
            "No startable traversal step can reach the variables {stranded:?}.",
            stranded: Vec<Variable>
        ),
        SchemaRead(3, "Error reading the schema while planning.", ( typedb_source: SchemaReadError )),
        PatternDefinition(4, "Error extending the pattern while lowering it.", ( typedb_source: PatternDefinitionError )),
    }
);
