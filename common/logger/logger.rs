/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{prelude::*, EnvFilter};

pub use tracing::{debug, error, trace};

pub const LOG_FILTER_ENV: &str = "KB_LOG";

/// Installs a formatting subscriber for the current thread until the returned guard is dropped.
/// The filter is read from `KB_LOG` (same syntax as `RUST_LOG`), defaulting to `info`.
pub fn initialise_logging() -> DefaultGuard {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(tracing_subscriber::fmt::layer().with_filter(filter));
    tracing::subscriber::set_default(subscriber)
}
