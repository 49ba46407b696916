/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{error::Error, fmt, sync::Arc};

use error::typedb_error;

typedb_error! {
    pub SchemaReadError(component = "Schema read", prefix = "SCR") {
        BackendUnavailable(1, "The schema backend could not be reached: {reason}.", reason: String),
        InconsistentHierarchy(2, "The type hierarchy above '{label}' is cyclic or refers to an undefined type.", label: String),
        Backend(3, "The schema backend failed while reading '{label}'.", label: String, ( source: Arc<BackendError> )),
    }
}

/// Opaque failure reported by a schema backend that is not itself a coded error.
#[derive(Debug)]
pub struct BackendError {
    pub message: String,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for BackendError {}
