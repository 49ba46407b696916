/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod label;
pub mod resource_index;
pub mod role_player;
pub mod shortcut_edge;
pub mod transform;

pub use transform::{apply_transformations, Transformation, CATALOG};
